use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "sim-ingest")]
#[command(about = "Loads SIM provisioning batch files from a watched folder into the database")]
pub struct CliArgs {
    /// Optional TOML configuration file; environment variables override it
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long)]
    pub json_logs: bool,

    /// Run a single scan and exit
    #[arg(long)]
    pub once: bool,

    /// Keep records in memory instead of PostgreSQL (nothing is persisted)
    #[arg(long)]
    pub memory_store: bool,
}
