use geo::{Distance, Haversine};
use geo_types::Point;

/// Great-circle distance in meters between two lon/lat points.
pub fn haversine_distance<P>(from: P, to: P) -> f64
where
    P: Into<Point>,
{
    Haversine.distance(from.into(), to.into())
}

/// Distance in meters from `point` to the segment `start`-`end`.
///
/// The projection is planar on raw longitude/latitude values, which only holds
/// at the scale of a single metro area.
pub fn distance_to_segment(point: Point, start: Point, end: Point) -> f64 {
    let delta_x = end.x() - start.x();
    let delta_y = end.y() - start.y();
    let length_squared = delta_x * delta_x + delta_y * delta_y;

    if length_squared == 0.0 {
        return haversine_distance(point, start);
    }

    let t = ((point.x() - start.x()) * delta_x + (point.y() - start.y()) * delta_y)
        / length_squared;

    if t < 0.0 {
        haversine_distance(point, start)
    } else if t > 1.0 {
        haversine_distance(point, end)
    } else {
        let projection = Point::new(start.x() + t * delta_x, start.y() + t * delta_y);
        haversine_distance(point, projection)
    }
}

/// Index of the polyline segment closest to `point`, with its distance in meters.
/// Segment `i` goes from `polyline[i]` to `polyline[i + 1]`.
pub fn closest_segment_index(point: Point, polyline: &[Point]) -> Option<(usize, f64)> {
    polyline
        .windows(2)
        .map(|segment| distance_to_segment(point, segment[0], segment[1]))
        .enumerate()
        .min_by(|(_, a), (_, b)| a.total_cmp(b))
}
