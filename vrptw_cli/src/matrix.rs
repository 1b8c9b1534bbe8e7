use std::{fs::File, io::BufWriter, path::PathBuf};

use clap::Args;
use serde::Serialize;
use tracing::info;
use vrptw_core::loader::load_locations_from_path;
use vrptw_matrix::travel_matrices::TravelMatrices;

#[derive(Args)]
pub struct MatrixArgs {
    #[arg(short, long)]
    input: PathBuf,

    /// Average travel speed in miles per hour
    #[arg(short, long, default_value_t = 30.0)]
    speed: f64,

    #[arg(short, long, default_value_t = 0)]
    limit: usize,

    /// Writes to stdout when not set
    #[arg(short, long)]
    out: Option<PathBuf>,
}

#[derive(Serialize)]
struct MatrixDump<'a> {
    locations: Vec<&'a str>,
    #[serde(flatten)]
    matrices: &'a TravelMatrices,
}

pub fn run(args: MatrixArgs) -> anyhow::Result<()> {
    let locations = load_locations_from_path(&args.input, args.limit)?;
    let matrices = TravelMatrices::haversine(&locations, args.speed)?;

    let dump = MatrixDump {
        locations: locations
            .iter()
            .map(|location| location.name.as_str())
            .collect(),
        matrices: &matrices,
    };

    match args.out {
        Some(path) => {
            serde_json::to_writer_pretty(BufWriter::new(File::create(&path)?), &dump)?;
            info!("Wrote {0}x{0} matrices to {path:?}", matrices.num_locations());
        }
        None => println!("{}", serde_json::to_string_pretty(&dump)?),
    }

    Ok(())
}
