use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use snakesim::report::{render_board, render_config, render_results};
use snakesim::util::io::atomic_write;
use snakesim::{init_logging, load_config};
use snakesim_core::BoardGraph;
use snakesim_core::simulation::{simulate, simulate_seeded};

#[derive(Parser, Debug)]
#[command(name = "snakesim")]
#[command(about = "Monte Carlo simulator for snakes and ladders boards")]
struct Args {
    /// Board and simulation settings (`.yaml`/`.yml`, or KEY=VALUE lines)
    config: PathBuf,

    /// Seed for reproducible runs (default: drawn from OS entropy)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Print the compiled board before simulating
    #[arg(long)]
    show_board: bool,

    /// Also write the results as JSON to this file
    #[arg(long, value_name = "PATH")]
    json: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Append logs to this file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(&args.log_level, args.log_file.as_deref())?;

    let config = load_config(&args.config)
        .wrap_err_with(|| format!("Failed to load {}", args.config.display()))?;
    println!("{}", render_config(&config));

    let board = BoardGraph::build(&config).wrap_err("Failed to build board")?;
    if args.show_board {
        println!("{}", render_board(&board));
    }

    let results = match args.seed {
        Some(seed) => simulate_seeded(&board, &config, seed),
        None => simulate(&board, &config),
    }
    .wrap_err("Simulation failed")?;
    println!("{}", render_results(&results));

    if let Some(path) = &args.json {
        let json = serde_json::to_string_pretty(&results)?;
        atomic_write(path, &json)
            .wrap_err_with(|| format!("Failed to write {}", path.display()))?;
        tracing::info!(path = %path.display(), "Wrote results");
    }

    Ok(())
}
