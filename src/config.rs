//! Command-line and environment configuration.

use std::path::PathBuf;

use clap::Parser;

pub const DEFAULT_NAME: &str = "nextfit";

#[derive(Parser, Debug)]
#[command(name = "nextfit", version)]
#[command(about = "Next-fit segment placement simulator")]
pub struct Cli {
  /// Command file to read instead of stdin
  #[arg(short, long)]
  pub input: Option<PathBuf>,

  /// Seed for random walks; drawn from entropy when absent
  #[arg(long, env = "NEXTFIT_SEED")]
  pub seed: Option<u64>,

  /// Name printed by the `N` command
  #[arg(long, env = "NEXTFIT_NAME", default_value = DEFAULT_NAME)]
  pub name: String,

  /// Report failing commands and carry on instead of stopping
  #[arg(long)]
  pub keep_going: bool,
}

/// Settings consumed by the [`Simulator`](crate::Simulator).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimConfig {
  pub name: String,
  pub seed: Option<u64>,
  pub keep_going: bool,
}

impl Default for SimConfig {
  fn default() -> Self {
    Self {
      name: DEFAULT_NAME.to_string(),
      seed: None,
      keep_going: false,
    }
  }
}

impl From<&Cli> for SimConfig {
  fn from(
    cli: &Cli,
  ) -> Self {
    Self {
      name: cli.name.clone(),
      seed: cli.seed,
      keep_going: cli.keep_going,
    }
  }
}
