use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::Parser;
use ising_mcmc::{run_temperature, CancelToken, SimulationConfig, SweepManifest};
use tracing::{info, warn};
use tracing_subscriber::filter::LevelFilter;

mod collaborators;
mod output;
mod temperatures;

use output::ResultTables;

/// Sweeps a 2D Ising lattice over temperatures and initial-condition biases.
#[derive(Parser, Debug)]
#[command(
    name = "ising-sim",
    about = "Metropolis Monte Carlo sweep of the 2D Ising model"
)]
struct Cli {
    /// Prefix of the `_dist.dat`, `_stdev.dat` and `_manifest.json` outputs.
    basename: String,
    /// One temperature, a `start end step` triple, or an explicit list.
    #[arg(required = true, allow_negative_numbers = true)]
    temperatures: Vec<f64>,
    /// YAML configuration; omitted fields take their defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Linear lattice size, overriding the configuration.
    #[arg(long)]
    size: Option<usize>,
    /// Master seed for reproducible sweeps.
    #[arg(long)]
    seed: Option<u64>,
    /// Directory for per-run time series and frame dumps.
    #[arg(long)]
    results_dir: Option<PathBuf>,
    /// Skip the per-run time series.
    #[arg(long)]
    no_series: bool,
    /// Dump snapshot frames as PGM images.
    #[arg(long)]
    frames: bool,
    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn main() -> Result<(), Box<dyn Error>> {
    // A malformed invocation prints usage and still exits successfully.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            err.print()?;
            return Ok(());
        }
    };

    let log_level_filter = cli
        .log_level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::INFO);
    tracing_subscriber::fmt()
        .with_max_level(log_level_filter)
        .with_target(false)
        .init();

    let config = load_config(&cli)?;
    let temperatures = temperatures::expand(&cli.temperatures)?;
    info!(?temperatures, "will use the following temperatures");

    let mut tables = ResultTables::create(&cli.basename)?;
    let manifest_path = PathBuf::from(format!("{}_manifest.json", cli.basename));
    SweepManifest::new(&config, &temperatures, tables.paths()).write(&manifest_path)?;

    let cancel = CancelToken::new();
    let interrupt = cancel.clone();
    ctrlc::set_handler(move || {
        warn!("interrupt received; stopping at the next snapshot");
        interrupt.cancel();
    })?;
    for (index, &temperature) in temperatures.iter().enumerate() {
        let result = run_temperature(
            &config,
            temperature,
            index,
            &cancel,
            |label| collaborators::hooks_for(label, &config.output),
            |run| tables.write_run(run),
        )?;
        tables.write_summary(config.lattice_size, &result)?;
        if result.cancelled {
            warn!(temperature, "sweep cancelled; remaining temperatures skipped");
            break;
        }
    }
    Ok(())
}

fn load_config(cli: &Cli) -> Result<SimulationConfig, Box<dyn Error>> {
    let mut config = match &cli.config {
        Some(path) => SimulationConfig::from_yaml_str(&fs::read_to_string(path)?)?,
        None => SimulationConfig::default(),
    };
    if let Some(size) = cli.size {
        config.lattice_size = size;
    }
    if let Some(seed) = cli.seed {
        config.seed_policy.master_seed = Some(seed);
    }
    if let Some(dir) = &cli.results_dir {
        config.output.results_dir = dir.clone();
    }
    if cli.no_series {
        config.output.time_series = false;
    }
    if cli.frames {
        config.output.frames = true;
    }
    config.validate()?;
    Ok(config)
}
