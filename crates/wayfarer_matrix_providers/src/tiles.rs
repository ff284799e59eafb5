use crate::{
    distance_matrix::DistanceMatrix,
    error::MatrixError,
    routing_api::MatrixRequestBody,
    waypoint::{LonLat, Waypoint},
};

/// A rectangular block of the full matrix that fits in a single request.
#[derive(Debug, Clone, Copy)]
pub struct Tile<'a> {
    pub sources: &'a [Waypoint],
    pub destinations: &'a [Waypoint],
    /// Position of `sources[0]` in the full waypoint list
    pub source_offset: usize,
    /// Position of `destinations[0]` in the full waypoint list
    pub destination_offset: usize,
}

impl<'a> Tile<'a> {
    /// The whole matrix as a single tile.
    pub fn whole(waypoints: &'a [Waypoint]) -> Self {
        Self {
            sources: waypoints,
            destinations: waypoints,
            source_offset: 0,
            destination_offset: 0,
        }
    }

    pub fn is_diagonal(&self) -> bool {
        self.source_offset == self.destination_offset
    }

    /// Diagonal tiles send their chunk once, other tiles send sources followed by destinations.
    pub fn request_body(&self) -> MatrixRequestBody {
        let coords = |waypoints: &[Waypoint]| -> Vec<LonLat> {
            waypoints.iter().map(|waypoint| waypoint.coords).collect()
        };

        if self.is_diagonal() {
            let indices = (0..self.sources.len()).collect::<Vec<_>>();
            return MatrixRequestBody::distances(
                coords(self.sources),
                Some(indices.clone()),
                Some(indices),
            );
        }

        let mut locations = coords(self.sources);
        locations.extend(coords(self.destinations));

        let sources = (0..self.sources.len()).collect();
        let destinations = (self.sources.len()..locations.len()).collect();

        MatrixRequestBody::distances(locations, Some(sources), Some(destinations))
    }
}

/// Number of tiles needed to cover `len` waypoints with square tiles of `tile_size`.
pub fn tile_count(len: usize, tile_size: usize) -> usize {
    len.div_ceil(tile_size).pow(2)
}

/// Row-major sweep of `tile_size` x `tile_size` tiles over the full matrix,
/// including the diagonal tiles.
///
/// The location limit applies per axis: an off-diagonal tile carries up to
/// `tile_size` sources and `tile_size` destinations in one request.
pub fn plan_tiles(waypoints: &[Waypoint], tile_size: usize) -> impl Iterator<Item = Tile<'_>> {
    waypoints
        .chunks(tile_size)
        .enumerate()
        .flat_map(move |(i, sources)| {
            waypoints
                .chunks(tile_size)
                .enumerate()
                .map(move |(j, destinations)| Tile {
                    sources,
                    destinations,
                    source_offset: i * tile_size,
                    destination_offset: j * tile_size,
                })
        })
}

/// Writes the rows returned for `tile` into `matrix`.
///
/// Self pairs are forced to zero, any other missing distance fails the whole tile.
pub fn scatter_tile(
    matrix: &mut DistanceMatrix,
    tile: &Tile,
    rows: Vec<Vec<Option<f64>>>,
) -> Result<(), MatrixError> {
    if rows.len() != tile.sources.len() {
        return Err(MatrixError::MalformedResponse(format!(
            "expected {} rows, found {}",
            tile.sources.len(),
            rows.len()
        )));
    }

    for (row_index, row) in rows.into_iter().enumerate() {
        if row.len() != tile.destinations.len() {
            return Err(MatrixError::MalformedResponse(format!(
                "expected {} columns, found {}",
                tile.destinations.len(),
                row.len()
            )));
        }

        let from = tile.source_offset + row_index;
        for (column_index, distance) in row.into_iter().enumerate() {
            let to = tile.destination_offset + column_index;
            if from == to {
                matrix.set(from, to, 0.0);
                continue;
            }

            match distance {
                Some(distance) => matrix.set(from, to, distance),
                None => {
                    return Err(MatrixError::MissingRoute {
                        from: tile.sources[row_index].id.clone(),
                        to: tile.destinations[column_index].id.clone(),
                    });
                }
            }
        }
    }

    Ok(())
}
