//! CLI definitions for pingd.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// pingd CLI.
#[derive(Parser)]
#[command(name = "pingd")]
#[command(about = "Encrypted, cron-scheduled HTTP ping jobs")]
#[command(version)]
pub(crate) struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "PINGD_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Run the server in foreground (default)
    Run {
        /// Server host, overrides `server.host`
        #[arg(long)]
        host: Option<String>,

        /// Server port, overrides `server.port`
        #[arg(long)]
        port: Option<u16>,
    },

    /// Print a fresh hex-encoded secret key
    Keygen,

    /// Load and validate the configuration, then exit
    CheckConfig,
}
