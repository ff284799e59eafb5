use serde::Serialize;
use tracing::debug;

use crate::{
    cache::MatrixCache,
    config::DEFAULT_SNAP_RADIUS_METERS,
    error::SnapError,
    geometry::haversine_distance,
    routing_api::{SNAP_API_PATH, SnapRequestBody, SnapResponse},
    routing_client::RoutingClient,
    waypoint::{LonLat, RoutingProfile, Waypoint},
};

/// A waypoint moved onto the closest road of the routing network.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnappedLocation {
    pub id: String,
    pub location: LonLat,
    /// Meters between the input coordinate and `location`
    pub snapped_distance: f64,
}

impl<C> RoutingClient<C>
where
    C: MatrixCache,
{
    /// Snaps every point onto the road network within `radius` meters.
    ///
    /// A single point without a road nearby fails the whole batch.
    pub async fn snap_locations(
        &self,
        points: &[Waypoint],
        profile: RoutingProfile,
        radius: f64,
    ) -> Result<Vec<SnappedLocation>, SnapError> {
        let url = self.params.url(SNAP_API_PATH, profile);
        let chunk_size = self.limits().location_limit();
        let total = points.len().div_ceil(chunk_size);
        let mut snapped = Vec::with_capacity(points.len());

        for (i, chunk) in points.chunks(chunk_size).enumerate() {
            debug!("RoutingClient: snap chunk {}/{}", i + 1, total);

            let body = SnapRequestBody {
                locations: chunk.iter().map(|point| point.coords).collect(),
                radius,
            };

            let response: SnapResponse = self.post(&url, &body).await?;
            if response.locations.len() != chunk.len() {
                return Err(SnapError::MalformedResponse(format!(
                    "expected {} locations, found {}",
                    chunk.len(),
                    response.locations.len()
                )));
            }

            for (point, location) in chunk.iter().zip(response.locations) {
                let location = location.ok_or_else(|| SnapError::UnsnappableLocation {
                    id: point.id.clone(),
                })?;

                let snapped_distance = location.snapped_distance.unwrap_or_else(|| {
                    haversine_distance(
                        geo_types::Point::from(location.location),
                        point.into(),
                    )
                });

                snapped.push(SnappedLocation {
                    id: point.id.clone(),
                    location: location.location,
                    snapped_distance,
                });
            }
        }

        Ok(snapped)
    }

    /// Whether `coordinate` lies within [`DEFAULT_SNAP_RADIUS_METERS`] of a road.
    pub async fn is_navigable(
        &self,
        coordinate: LonLat,
        profile: RoutingProfile,
    ) -> Result<bool, SnapError> {
        let point = Waypoint::new("coordinate", coordinate[0], coordinate[1]);

        match self
            .snap_locations(std::slice::from_ref(&point), profile, DEFAULT_SNAP_RADIUS_METERS)
            .await
        {
            Ok(snapped) => Ok(!snapped.is_empty()),
            Err(SnapError::UnsnappableLocation { .. }) => Ok(false),
            Err(error) => Err(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_partial_json, method, path},
    };

    use super::*;
    use crate::test_utils::{test_client, waypoint_line};

    #[tokio::test]
    async fn test_snap_locations() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/snap/foot-walking"))
            .and(body_partial_json(json!({ "radius": 2000.0 })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "locations": [
                    { "location": [13.0001, 52.0], "snapped_distance": 6.8 },
                    { "location": [13.001, 52.0] },
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let snapped = test_client(&server)
            .snap_locations(&waypoint_line(2), RoutingProfile::FootWalking, 2000.0)
            .await
            .unwrap();

        assert_eq!(snapped.len(), 2);
        assert_eq!(snapped[0].id, "w0");
        assert_eq!(snapped[0].snapped_distance, 6.8);
        assert_eq!(snapped[1].location, [13.001, 52.0]);
        assert!(snapped[1].snapped_distance < 1.0);
    }

    #[tokio::test]
    async fn test_unsnappable_location_names_waypoint() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/snap/driving-car"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "locations": [
                    { "location": [13.0, 52.0], "snapped_distance": 1.0 },
                    null,
                    { "location": [13.002, 52.0], "snapped_distance": 1.0 },
                ]
            })))
            .mount(&server)
            .await;

        let error = test_client(&server)
            .snap_locations(&waypoint_line(3), RoutingProfile::DrivingCar, 1500.0)
            .await
            .unwrap_err();

        assert!(matches!(error, SnapError::UnsnappableLocation { id } if id == "w1"));
    }

    #[tokio::test]
    async fn test_snap_service_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/snap/driving-car"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": { "code": 8003, "message": "Parameter 'radius' has incorrect value." }
            })))
            .mount(&server)
            .await;

        let error = test_client(&server)
            .snap_locations(&waypoint_line(1), RoutingProfile::DrivingCar, -1.0)
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            SnapError::RemoteService { status: 400, message }
                if message == "Parameter 'radius' has incorrect value."
        ));
    }

    #[tokio::test]
    async fn test_snap_location_count_mismatch() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/snap/driving-car"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "locations": [{ "location": [13.0, 52.0], "snapped_distance": 1.0 }]
            })))
            .mount(&server)
            .await;

        let error = test_client(&server)
            .snap_locations(&waypoint_line(3), RoutingProfile::DrivingCar, 1500.0)
            .await
            .unwrap_err();

        assert!(matches!(
            error,
            SnapError::MalformedResponse(message) if message == "expected 3 locations, found 1"
        ));
    }

    #[tokio::test]
    async fn test_snap_chunks_by_location_limit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/snap/driving-car"))
            .respond_with(|request: &wiremock::Request| {
                let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
                let locations = body["locations"]
                    .as_array()
                    .unwrap()
                    .iter()
                    .map(|location| json!({ "location": location, "snapped_distance": 0.0 }))
                    .collect::<Vec<_>>();
                ResponseTemplate::new(200).set_body_json(json!({ "locations": locations }))
            })
            .expect(3)
            .mount(&server)
            .await;

        let snapped = test_client(&server)
            .snap_locations(&waypoint_line(120), RoutingProfile::DrivingCar, 1500.0)
            .await
            .unwrap();

        assert_eq!(snapped.len(), 120);
        assert_eq!(snapped[119].id, "w119");
    }

    #[tokio::test]
    async fn test_is_navigable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v2/snap/driving-car"))
            .and(body_partial_json(json!({ "locations": [[13.0, 52.0]] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "locations": [{ "location": [13.0, 52.0], "snapped_distance": 0.0 }]
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v2/snap/driving-car"))
            .and(body_partial_json(json!({ "locations": [[-30.0, 40.0]] })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "locations": [null] })))
            .mount(&server)
            .await;

        let client = test_client(&server);

        assert!(
            client
                .is_navigable([13.0, 52.0], RoutingProfile::DrivingCar)
                .await
                .unwrap()
        );
        assert!(
            !client
                .is_navigable([-30.0, 40.0], RoutingProfile::DrivingCar)
                .await
                .unwrap()
        );
    }
}
