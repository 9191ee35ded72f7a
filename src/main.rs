//! Reads simulator commands from stdin or a file and prints the results.
//!
//! Usage:
//!   nextfit [--input FILE] [--seed N] [--name NAME] [--keep-going]

use std::{
  fs::File,
  io::{self, BufReader},
};

use anyhow::{Context, Result};
use clap::Parser;
use nextfit::{Cli, SimConfig, Simulator};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("nextfit=warn"));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(io::stderr)
    .init();

  let cli = Cli::parse();
  let mut simulator = Simulator::new(io::stdout().lock(), SimConfig::from(&cli));

  match &cli.input {
    Some(path) => {
      let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
      simulator.run(BufReader::new(file))
    }
    None => simulator.run(io::stdin().lock()),
  }
  .context("simulation stopped")?;

  Ok(())
}
