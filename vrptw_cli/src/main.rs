use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;

use crate::{check::CheckArgs, matrix::MatrixArgs, solve::SolveArgs};

mod check;
mod matrix;
mod params;
mod parsers;
mod solve;
mod tables;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve a location file and print the routes
    Solve {
        #[command(flatten)]
        args: SolveArgs,
    },
    /// Validate a location file without solving
    #[command(visible_alias = "c")]
    Check {
        #[command(flatten)]
        args: CheckArgs,
    },
    /// Dump the distance and duration matrices as JSON
    Matrix {
        #[command(flatten)]
        args: MatrixArgs,
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
        .init();

    match cli.command {
        Commands::Solve { args } => solve::run(args).await?,
        Commands::Check { args } => check::run(args)?,
        Commands::Matrix { args } => matrix::run(args)?,
    }

    Ok(())
}
