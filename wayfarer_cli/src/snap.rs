use std::path::PathBuf;

use clap::Args;
use tracing::{info, warn};
use wayfarer_matrix_providers::config::DEFAULT_SNAP_RADIUS_METERS;

use crate::{
    client::RoutingArgs,
    file_utils::{read_json, write_json},
    input::ItineraryInput,
};

/// Snapped points further than this from their input are reported.
const FAR_SNAP_METERS: f64 = 250.0;

#[derive(Args)]
pub struct SnapArgs {
    /// Itinerary file
    #[arg(short, long)]
    input: PathBuf,

    /// Output file, stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Search radius around each waypoint, in meters
    #[arg(short, long, default_value_t = DEFAULT_SNAP_RADIUS_METERS)]
    radius: f64,

    #[command(flatten)]
    routing: RoutingArgs,
}

pub async fn run(args: SnapArgs) -> Result<(), anyhow::Error> {
    let input: ItineraryInput = read_json(&args.input)?;
    let profile = args.routing.profile_or(input.profile);
    let client = args.routing.client()?;

    let snapped = client
        .snap_locations(&input.waypoints, profile, args.radius)
        .await?;

    for location in snapped.iter().filter(|location| location.snapped_distance > FAR_SNAP_METERS) {
        warn!(
            "Waypoint {} moved by {:.0} m",
            location.id, location.snapped_distance
        );
    }
    info!("Snapped {} waypoints", snapped.len());

    write_json(&snapped, args.output.as_deref())
}
