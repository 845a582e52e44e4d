mod scenario;

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(author, version, about = "Simulate herbivores and carnivores on an island")]
struct Cli {
    /// Island map: rows of W, L, H and D, water all around
    #[arg(long)]
    map: PathBuf,

    /// Initial population as JSON: [{"loc": [row, col], "pop": [...]}]
    #[arg(long)]
    population: PathBuf,

    /// Optional parameter overrides as JSON
    #[arg(long)]
    params: Option<PathBuf>,

    /// Random seed
    #[arg(long, default_value_t = 12345)]
    seed: u64,

    /// Number of years to simulate
    #[arg(long, default_value_t = 100)]
    years: u32,

    /// Write the full report as JSON to this file
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "biosim=info,sim=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let request = scenario::load_request(
        &cli.map,
        &cli.population,
        cli.params.as_deref(),
        cli.seed,
        cli.years,
    )?;

    tracing::info!("Simulating {} years with seed {}", cli.years, cli.seed);
    let report = sim::run_simulation(&request)?;

    print!("{}", scenario::format_history(&report));

    if let Some(path) = &cli.output {
        scenario::write_report(path, &report)?;
        tracing::info!("Report written to {}", path.display());
    }

    Ok(())
}
