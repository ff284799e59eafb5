use clap::{Parser, Subcommand};

use crate::{
    generate::GenerateSubcommands, insert::InsertArgs, matrix::MatrixArgs,
    optimize::OptimizeArgs, snap::SnapArgs,
};

mod client;
mod file_utils;
mod generate;
mod input;
mod insert;
mod matrix;
mod optimize;
mod parsers;
mod snap;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the distance matrix of an itinerary
    Matrix {
        #[command(flatten)]
        args: MatrixArgs,
    },
    /// Add or relocate one waypoint of an existing distance matrix
    Insert {
        #[command(flatten)]
        args: InsertArgs,
    },
    /// Find a shorter visiting order for an itinerary
    Optimize {
        #[command(flatten)]
        args: OptimizeArgs,
    },
    /// Snap waypoints onto the road network
    Snap {
        #[command(flatten)]
        args: SnapArgs,
    },
    #[command(visible_alias = "g")]
    Generate {
        #[command(subcommand)]
        commands: GenerateSubcommands,
    },
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenvy::from_filename("./.env.local").ok();

    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Matrix { args }) => matrix::run(args).await?,
        Some(Commands::Insert { args }) => insert::run(args).await?,
        Some(Commands::Optimize { args }) => optimize::run(args).await?,
        Some(Commands::Snap { args }) => snap::run(args).await?,
        Some(Commands::Generate { commands }) => generate::run(commands)?,
        None => {}
    }

    Ok(())
}
