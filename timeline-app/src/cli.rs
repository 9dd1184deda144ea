use clap::Parser;
use std::path::PathBuf;

/// Fetch or load an account's timeline and print posting statistics.
#[derive(Debug, Clone, Parser)]
#[command(name = "timeline", version)]
pub struct Args {
    /// Configuration file (YAML, TOML or JSON).
    #[arg(short, long, env = "TIMELINE_CONFIG", default_value = "timeline.yaml")]
    pub config: PathBuf,

    /// Account to analyse instead of the configured one.
    #[arg(short, long)]
    pub account: Option<String>,

    /// Fetch from the provider even when a snapshot exists.
    #[arg(short, long)]
    pub reload: bool,

    /// Print the report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Also write the JSON report to this file inside the project directory.
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}
