//! Headless driver for the Hearthfield life simulation.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "hearth",
    about = "Hearthfield: a tiny settlement that eats, builds and grows on its own",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log simulation decisions and rejected actions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a fixed number of ticks and print the resulting settlement
    Run {
        /// Number of ticks to run
        #[arg(short, long, default_value_t = 500)]
        ticks: u64,

        /// RNG seed (overrides the config file)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Speed multiplier
        #[arg(long)]
        speed: Option<f64>,

        /// TOML config file; unnamed values keep their defaults
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the final snapshot as JSON instead of tables
        #[arg(long)]
        json: bool,

        /// Number of event log lines to show
        #[arg(long, default_value_t = 10)]
        events: usize,
    },

    /// Drive the simulation with wall-clock frames, as a renderer would
    Play {
        /// Simulated wall-clock seconds
        #[arg(long, default_value_t = 10.0)]
        seconds: f64,

        /// Frames per second
        #[arg(long, default_value_t = 60)]
        fps: u32,

        /// RNG seed (overrides the config file)
        #[arg(short, long)]
        seed: Option<u64>,

        /// Speed multiplier
        #[arg(long)]
        speed: Option<f64>,

        /// TOML config file; unnamed values keep their defaults
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the default configuration as TOML
    Defaults,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("warn,hf_simulation=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            ticks,
            seed,
            speed,
            config,
            json,
            events,
        } => commands::load_config(config.as_deref(), seed, speed)
            .and_then(|config| commands::run::run(config, ticks, json, events)),
        Commands::Play {
            seconds,
            fps,
            seed,
            speed,
            config,
        } => commands::load_config(config.as_deref(), seed, speed)
            .and_then(|config| commands::play::run(config, seconds, fps)),
        Commands::Defaults => commands::defaults::run(),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
