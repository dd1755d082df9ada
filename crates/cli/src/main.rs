//! Snapwheel CLI - snapwheel command

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::Parser;
use std::io;
use std::path::PathBuf;

mod config;
mod locks;
mod prompt;
mod report;
mod run;

/// Snapwheel - Rolling btrfs snapshot rotation
#[derive(Parser)]
#[command(name = "snapwheel")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the volume configuration file
    #[arg(short = 'c', long, default_value = "/etc/snapwheel/config.toml")]
    config: PathBuf,

    /// Plan against this date instead of today (YYYY-MM-DD)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Print the plan and commands without prompting or executing
    #[arg(short = 'n', long)]
    dry_run: bool,

    /// Execute snapshot plan without confirmation
    #[arg(short = 'y', long)]
    yes: bool,

    /// Do not colorize output
    #[arg(long)]
    no_color: bool,

    /// Run verbosely
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = if cli.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    // 1. Load and validate the configuration before touching anything
    let config = config::Config::load(&cli.config)?;

    // 2. One rotation per configuration at a time
    let lock = locks::RunLock::acquire(&cli.config)?;

    // 3. Resolve the run parameters chosen once up front
    let today = cli.date.unwrap_or_else(|| Local::now().date_naive());
    let palette = report::Palette::new(!cli.no_color);
    let options = run::RunOptions {
        dry_run: cli.dry_run,
        yes: cli.yes,
    };

    // 4. Rotate each volume in order
    let mut out = io::stdout();
    let mut failed = false;
    for volume in &config.volumes {
        match run::run_volume(volume, today, &options, &palette, &mut out) {
            Ok(run::VolumeOutcome::Completed) => {}
            Ok(run::VolumeOutcome::Failed) => failed = true,
            Err(err) => {
                eprintln!("ERROR: {:#}", err);
                failed = true;
            }
        }
    }

    if failed {
        drop(lock);
        std::process::exit(1);
    }
    Ok(())
}
