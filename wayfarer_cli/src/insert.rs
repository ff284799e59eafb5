use std::path::PathBuf;

use anyhow::anyhow;
use clap::Args;
use tracing::info;
use wayfarer_matrix_providers::distance_matrix::DistanceMatrix;

use crate::{
    client::RoutingArgs,
    file_utils::{read_json, write_json},
    input::ItineraryInput,
    matrix::request_progress_bar,
};

#[derive(Args)]
pub struct InsertArgs {
    /// Itinerary file, containing the new or moved waypoint
    #[arg(short, long)]
    input: PathBuf,

    /// Matrix previously written by the `matrix` subcommand
    #[arg(short, long)]
    matrix: PathBuf,

    /// Id of the waypoint to add or relocate
    #[arg(short, long)]
    waypoint: String,

    /// Output file, stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[command(flatten)]
    routing: RoutingArgs,
}

pub async fn run(args: InsertArgs) -> Result<(), anyhow::Error> {
    let input: ItineraryInput = read_json(&args.input)?;
    let mut matrix: DistanceMatrix = read_json(&args.matrix)?;
    let profile = args.routing.profile_or(input.profile);

    let new_waypoint = input
        .waypoints
        .iter()
        .find(|waypoint| waypoint.id == args.waypoint)
        .ok_or_else(|| anyhow!("waypoint {} is not part of the itinerary", args.waypoint))?;

    let client = args.routing.client()?;
    let bar = request_progress_bar()?;

    let result = client
        .build_incremental_matrix_with_progress(
            new_waypoint,
            &input.waypoints,
            profile,
            |completed, total| {
                bar.set_length(total as u64);
                bar.set_position(completed as u64);
            },
        )
        .await;

    bar.finish_and_clear();
    let result = result?;

    let replaced = matrix.contains(&new_waypoint.id);
    matrix.apply_incremental(&result)?;

    info!(
        "{} waypoint {} ({} distances updated)",
        if replaced { "Relocated" } else { "Added" },
        new_waypoint.id,
        result.outbound.len() + result.inbound.len()
    );

    write_json(&matrix, args.output.as_deref())
}
