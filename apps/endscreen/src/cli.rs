//! Command line flags. Anything not given here falls back to the
//! configuration file, then to built-in defaults.

use std::path::PathBuf;

use clap::Parser;

/// Custom end-of-mission screen for Warframe.
#[derive(Parser, Debug)]
#[command(name = "endscreen", version, about)]
pub struct Args {
    /// Log file to read
    #[arg(long, value_name = "EE.log")]
    pub log: Option<PathBuf>,

    /// Seconds between log updates
    #[arg(long, value_name = "SECONDS")]
    pub log_interval: Option<f64>,

    /// End screen document to display
    #[arg(long, value_name = "SCREEN.HTML")]
    pub screen: Option<String>,
}
