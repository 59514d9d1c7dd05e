pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "docket")]
#[command(about = "Look up district court cases by type, number and year", long_about = None)]
pub struct Cli {
    /// Config file to use instead of ~/.config/docket/config.toml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Search for a case and print the outcome as JSON
    Search {
        /// Case type code, e.g. RCS
        case_type: String,
        /// Case number
        case_number: String,
        /// Filing year
        year: i32,
        /// Abandon the lookup after this many seconds
        #[arg(long)]
        deadline_secs: Option<u64>,
    },
    /// Check that the court website is reachable and searchable
    Probe,
    /// List the case types offered by the live search form
    CaseTypes,
}
