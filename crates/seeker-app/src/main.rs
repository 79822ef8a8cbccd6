use anyhow::{Context, Result};
use clap::Parser;

use seeker_app::cli::{self, Args};

fn main() -> Result<()> {
    let args = Args::parse();
    cli::init_logging(&args.log_level)?;

    let snapshot = cli::run(&args)?;
    let json = serde_json::to_string_pretty(&snapshot).context("failed to encode snapshot")?;
    println!("{json}");
    Ok(())
}
