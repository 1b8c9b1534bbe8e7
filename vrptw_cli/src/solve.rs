use std::{fs, path::PathBuf, sync::Arc};

use anyhow::Context;
use clap::Args;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};
use vrptw_core::{
    adapter::RuinRecreateEngine,
    artifacts::ArtifactScope,
    error::SolveError,
    job::{POLL_INTERVAL, SolveJob},
    loader::load_locations_from_path,
    map::render_solution_map,
    params::format_minutes,
    request::SolveRequest,
};

use crate::{params::ParamArgs, tables::solution_table};

#[derive(Args)]
pub struct SolveArgs {
    /// CSV file with name, address, latitude and longitude columns
    #[arg(short, long)]
    input: PathBuf,

    #[command(flatten)]
    params: ParamArgs,

    /// Seed of the search
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Copies the solution record to this file
    #[arg(long)]
    json: Option<PathBuf>,

    /// Copies the route map to this file
    #[arg(long)]
    map: Option<PathBuf>,
}

pub async fn run(args: SolveArgs) -> anyhow::Result<()> {
    let params = args.params.into_params();
    let locations = load_locations_from_path(&args.input, params.location_limit)
        .with_context(|| format!("invalid location file {:?}", args.input))?;

    let request = SolveRequest::new(locations, params)?;
    let time_budget = request.time_budget();

    let scope = ArtifactScope::new()?;
    scope.write_input(request.locations())?;

    info!(
        "Solving {} customers for up to {time_budget:#}",
        request.locations().len() - 1
    );

    let job = Arc::new(SolveJob::spawn(
        Arc::new(RuinRecreateEngine { seed: args.seed }),
        request,
    ));

    let cancel_job = Arc::clone(&job);
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Stopping the solver");
            cancel_job.cancel();
        }
    });

    let bar = ProgressBar::new(100);
    bar.set_style(ProgressStyle::default_bar().template("[{bar:40}] {pos}% ({elapsed})")?);

    let wait_job = Arc::clone(&job);
    let progress_bar = bar.clone();
    let outcome = tokio::task::spawn_blocking(move || {
        wait_job.wait_with_progress(POLL_INTERVAL, |progress| {
            progress_bar.set_position((progress * 100.0) as u64)
        })
    })
    .await?;

    bar.finish_and_clear();
    ctrl_c.abort();

    let solution = match outcome {
        Ok(solution) => solution,
        Err(SolveError::Cancelled) => {
            warn!("Solve cancelled, no solution");
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let solution_path = scope.write_solution(&solution)?;
    if let Some(json) = &args.json {
        fs::copy(&solution_path, json)?;
        info!("Wrote solution to {json:?}");
    }

    if !solution.feasible {
        warn!("No feasible solution found, try the following:");
        for suggestion in solution.guidance() {
            warn!("  - {suggestion}");
        }
        return Ok(());
    }

    println!("{}", solution_table(&solution));
    info!(
        "{} routes, {:.1} miles, {} total",
        solution.num_routes,
        solution.total_distance,
        format_minutes(solution.total_duration)
    );

    if let Some(html) = render_solution_map(&solution) {
        let map_path = scope.write_map(&html)?;
        if let Some(map) = &args.map {
            fs::copy(&map_path, map)?;
            info!("Wrote map to {map:?}");
        }
    }

    Ok(())
}
