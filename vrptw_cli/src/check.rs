use std::path::PathBuf;

use anyhow::bail;
use clap::Args;
use tracing::{error, info};
use vrptw_core::loader::{LoadError, load_locations_from_path};

use crate::tables::locations_table;

#[derive(Args)]
pub struct CheckArgs {
    /// CSV file with name, address, latitude and longitude columns
    #[arg(short, long)]
    input: PathBuf,

    /// Only check the first N rows, 0 checks all of them
    #[arg(short, long, default_value_t = 0)]
    limit: usize,
}

pub fn run(args: CheckArgs) -> anyhow::Result<()> {
    info!("Checking {:?}", args.input);

    match load_locations_from_path(&args.input, args.limit) {
        Ok(locations) => {
            println!("{}", locations_table(&locations));
            info!(
                "{} locations are valid: 1 depot and {} customers",
                locations.len(),
                locations.len() - 1
            );
            Ok(())
        }
        Err(LoadError::Invalid(errors)) => {
            for validation_error in &errors {
                error!("{validation_error}");
            }
            bail!("{} validation errors in {:?}", errors.len(), args.input)
        }
        Err(err) => Err(err.into()),
    }
}
