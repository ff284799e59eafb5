use std::path::PathBuf;

use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use wayfarer_matrix_providers::{
    as_the_crow_flies::as_the_crow_flies_matrix,
    distance_matrix::DistanceMatrix,
    waypoint::{RoutingProfile, Waypoint},
};

use crate::{
    client::RoutingArgs,
    file_utils::{read_json, write_json},
    input::ItineraryInput,
};

#[derive(Args)]
pub struct MatrixArgs {
    /// Itinerary file
    #[arg(short, long)]
    input: PathBuf,

    /// Output file, stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Use straight-line distances instead of the routing service
    #[arg(long)]
    offline: bool,

    /// Print distances as `{ from: { to: meters } }` instead of the reloadable format
    #[arg(long)]
    nested: bool,

    #[command(flatten)]
    routing: RoutingArgs,
}

/// Progress bar counting routing requests.
pub fn request_progress_bar() -> Result<ProgressBar, anyhow::Error> {
    let bar = ProgressBar::new(0);
    bar.set_style(ProgressStyle::default_bar().template("[{bar:40}] {pos}/{len} requests")?);

    Ok(bar)
}

pub async fn build_matrix(
    waypoints: &[Waypoint],
    profile: RoutingProfile,
    routing: &RoutingArgs,
    offline: bool,
) -> Result<DistanceMatrix, anyhow::Error> {
    if offline {
        info!("Computing straight-line distances for {} waypoints", waypoints.len());
        return Ok(as_the_crow_flies_matrix(waypoints)?);
    }

    let client = routing.client()?;
    let bar = request_progress_bar()?;

    let matrix = client
        .build_full_matrix_with_progress(waypoints, profile, |completed, total| {
            bar.set_length(total as u64);
            bar.set_position(completed as u64);
        })
        .await;

    bar.finish_and_clear();

    Ok(matrix?)
}

pub async fn run(args: MatrixArgs) -> Result<(), anyhow::Error> {
    let input: ItineraryInput = read_json(&args.input)?;
    let profile = args.routing.profile_or(input.profile);

    info!(
        "Building {} matrix for {} waypoints",
        profile,
        input.waypoints.len()
    );

    let matrix = build_matrix(&input.waypoints, profile, &args.routing, args.offline).await?;

    if args.nested {
        write_json(&matrix.to_nested(), args.output.as_deref())
    } else {
        write_json(&matrix, args.output.as_deref())
    }
}
