use clap::{Parser, ValueEnum};
use sitewatch_runtime::PersistenceMode;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sitewatch")]
#[command(about = "Log into a web application and persist every failed network request", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = "sitewatch.toml")]
    pub config: PathBuf,

    /// Base URL of the monitored application; skips the interactive prompt
    #[arg(long)]
    pub base_url: Option<String>,

    /// Persistence mode override
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,

    /// WebDriver endpoint override
    #[arg(long)]
    pub webdriver_url: Option<String>,

    /// Directory for textual logs and persisted records
    #[arg(long)]
    pub log_dir: Option<PathBuf>,

    /// Run the browser headless
    #[arg(long)]
    pub headless: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ModeArg {
    /// One JSON file per incident
    Snapshot,

    /// One growing JSON array file
    Ledger,
}

impl From<ModeArg> for PersistenceMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Snapshot => PersistenceMode::Snapshot,
            ModeArg::Ledger => PersistenceMode::Ledger,
        }
    }
}
