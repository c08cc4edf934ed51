//! pingd - encrypted, cron-scheduled HTTP ping jobs
//!
//! Main entry point for the pingd CLI and server.

mod cli;
mod server;

use clap::Parser;

use pingd_config::{ConfigLoader, ConfigValidator};
use pingd_core::SecretKey;

use crate::cli::{Cli, Commands};
use crate::server::{init_tracing, run_server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(Commands::Keygen) = cli.command {
        println!("{}", SecretKey::generate().to_hex());
        return Ok(());
    }

    let (mut config, source) = ConfigLoader::discover(cli.config.as_deref())?;
    let validation = ConfigValidator::validate(&config)?;
    for warning in &validation.warnings {
        eprintln!("warning: {}: {}", warning.path, warning.message);
    }
    if let Some(err) = validation.into_error() {
        return Err(err.into());
    }

    match cli.command {
        Some(Commands::CheckConfig) => {
            match &source {
                Some(path) => println!("{}: ok", path.display()),
                None => println!("built-in defaults: ok"),
            }
            Ok(())
        }
        Some(Commands::Run { host, port }) => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            init_tracing(&config.logging)?;
            run_server(config).await
        }
        Some(Commands::Keygen) | None => {
            init_tracing(&config.logging)?;
            run_server(config).await
        }
    }
}
