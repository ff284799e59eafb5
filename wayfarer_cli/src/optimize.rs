use std::path::PathBuf;

use clap::Args;
use tracing::info;
use wayfarer_matrix_providers::distance_matrix::DistanceMatrix;
use wayfarer_optimizer::{
    itinerary::route_distance,
    optimizer::ItineraryOptimizer,
    optimizer_params::{DEFAULT_MAX_ATTEMPTS, OptimizerParams},
    randomized_two_opt::RandomizedTwoOptSolver,
};

use crate::{
    client::RoutingArgs,
    file_utils::{read_json, write_json},
    input::ItineraryInput,
    matrix::build_matrix,
};

#[derive(Args)]
pub struct OptimizeArgs {
    /// Itinerary file
    #[arg(short, long)]
    input: PathBuf,

    /// Matrix previously written by the `matrix` subcommand, built on the fly when omitted
    #[arg(short, long)]
    matrix: Option<PathBuf>,

    /// Output file, stdout when omitted
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Distance to beat, defaults to the `baselineDistance` of the input
    #[arg(short, long)]
    baseline: Option<f64>,

    /// Solver calls before keeping the current order
    #[arg(short, long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    attempts: usize,

    /// Seed of the solver, random when omitted
    #[arg(long)]
    seed: Option<u64>,

    /// Use straight-line distances instead of the routing service
    #[arg(long)]
    offline: bool,

    #[command(flatten)]
    routing: RoutingArgs,
}

pub async fn run(args: OptimizeArgs) -> Result<(), anyhow::Error> {
    let input: ItineraryInput = read_json(&args.input)?;
    let profile = args.routing.profile_or(input.profile);

    let matrix: DistanceMatrix = match &args.matrix {
        Some(path) => read_json(path)?,
        None => build_matrix(&input.waypoints, profile, &args.routing, args.offline).await?,
    };

    let baseline = args.baseline.or(input.baseline_distance).unwrap_or(0.0);
    let current_order = input
        .waypoints
        .iter()
        .map(|waypoint| waypoint.id.as_str())
        .collect::<Vec<_>>();
    if let Some(current) = route_distance(&matrix, &current_order) {
        info!("Current order: {:.1} m, baseline {:.1} m", current, baseline);
    }

    let solver = match args.seed {
        Some(seed) => RandomizedTwoOptSolver::with_seed(seed),
        None => RandomizedTwoOptSolver::new(),
    };
    let optimizer = ItineraryOptimizer::with_params(
        solver,
        OptimizerParams {
            max_attempts: args.attempts,
            ..OptimizerParams::default()
        },
    );

    let result = optimizer.optimize(&matrix, baseline).await?;

    if result.failed {
        info!("No shorter order found, keep the current one");
    } else {
        info!("Optimized itinerary: {:.1} m", result.distance);
    }

    write_json(&result, args.output.as_deref())
}
