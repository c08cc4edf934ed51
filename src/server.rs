//! Server initialization and startup logic for pingd.

use std::sync::{Arc, OnceLock};

use tokio::sync::watch;
use tracing::{error, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pingd_api::{ApiServer, ApiState, ServerOptions};
use pingd_config::{Config, LoggingConfig};
use pingd_core::{Automator, AutomatorOptions, Reconciler, SecretKey};
use pingd_protocols::{Scheduler, Store};
use pingd_scheduler::CronScheduler;
use pingd_store::{MemoryStore, SqliteStore};

/// Keeps the file writer flushing for the life of the process.
static LOG_GUARD: OnceLock<WorkerGuard> = OnceLock::new();

/// Initialize tracing from the logging config.
///
/// `RUST_LOG` overrides `logging.level`. With `logging.dir` set, a second
/// layer writes daily-rolled files there.
pub(crate) fn init_tracing(logging: &LoggingConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(filter_directive(&logging.level)))?;

    let (text_layer, json_layer) = if logging.format == "json" {
        (None, Some(fmt::layer().json().with_current_span(true)))
    } else {
        (Some(fmt::layer().with_target(true)), None)
    };

    let file_layer = match &logging.dir {
        Some(dir) => {
            std::fs::create_dir_all(dir)?;
            let appender = RollingFileAppender::builder()
                .rotation(Rotation::DAILY)
                .filename_prefix("pingd")
                .filename_suffix("log")
                .max_log_files(30)
                .build(dir)?;
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            let _ = LOG_GUARD.set(guard);
            Some(fmt::layer().with_writer(non_blocking).with_ansi(false))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(text_layer)
        .with(json_layer)
        .with(file_layer)
        .try_init()?;

    Ok(())
}

/// Filter used when `RUST_LOG` is unset. An empty level means `info`.
fn filter_directive(level: &str) -> &str {
    match level.trim() {
        "" => "info",
        level => level,
    }
}

async fn build_store(config: &Config) -> Result<Arc<dyn Store>, Box<dyn std::error::Error>> {
    match config.store.backend.as_str() {
        "memory" => {
            warn!("Using in-memory store; jobs will not survive a restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        _ => {
            let store = SqliteStore::open(&config.store.path).await?;
            info!("SQLite store opened at {}", config.store.path.display());
            Ok(Arc::new(store))
        }
    }
}

/// Flip `shutdown` on SIGINT or SIGTERM.
#[cfg(unix)]
fn install_signal_handlers(shutdown: watch::Sender<bool>) -> std::io::Result<()> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;

    tokio::spawn(async move {
        tokio::select! {
            _ = sigterm.recv() => info!("Received SIGTERM"),
            _ = sigint.recv() => info!("Received SIGINT"),
        }
        let _ = shutdown.send(true);
    });

    Ok(())
}

#[cfg(not(unix))]
fn install_signal_handlers(shutdown: watch::Sender<bool>) -> std::io::Result<()> {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            info!("Received Ctrl+C");
        }
        let _ = shutdown.send(true);
    });

    Ok(())
}

/// Run the server in foreground until a shutdown signal arrives.
pub(crate) async fn run_server(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting pingd v{}", env!("CARGO_PKG_VERSION"));

    let key = config
        .security
        .secret_key
        .as_deref()
        .ok_or("no secret key configured (set security.secret_key or PINGD_SECRET_KEY)")?;
    let key = SecretKey::from_config_str(key)?;

    let store = build_store(&config).await?;
    let scheduler = Arc::new(CronScheduler::new()?);

    let http_client = reqwest::Client::builder()
        .user_agent(config.probe.user_agent.clone())
        .build()?;
    let options = AutomatorOptions {
        job_set_name: config.store.job_set_name.clone(),
        default_probe_timeout: config.probe.default_timeout(),
        http_client,
    };
    let automator = Arc::new(Automator::new(store, scheduler.clone(), &key, options));

    scheduler.start();
    info!("Scheduler started");

    let reconciler =
        Arc::new(Reconciler::new(automator.clone()).with_interval(config.scheduler.reconcile_interval()));

    // Restore jobs from the index before accepting requests.
    match reconciler.tick().await {
        Ok(report) => info!(
            "Restored {} of {} indexed job(s) ({} skipped)",
            report.rescheduled, report.expected, report.skipped
        ),
        Err(e) => warn!("Initial reconciliation failed: {}", e),
    }

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    install_signal_handlers(shutdown_tx)?;

    let reconcile_task = tokio::spawn(reconciler.run(shutdown_rx.clone()));

    let server = ApiServer::new(
        ServerOptions::new(config.server.host.clone(), config.server.port),
        ApiState::new(automator),
    );
    info!("pingd ready on http://{}", server.addr());

    let served = server.run(shutdown_rx).await;
    if served.is_err() {
        // Reconciler would otherwise wait for a signal that never comes.
        scheduler.stop();
        reconcile_task.abort();
    } else if let Err(e) = reconcile_task.await {
        error!("Reconciler task failed: {}", e);
    }

    served?;
    info!("Shutting down...");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_level_defaults_to_info() {
        assert_eq!(filter_directive(""), "info");
        assert_eq!(filter_directive("  "), "info");
        assert!(EnvFilter::try_new(filter_directive("")).is_ok());
    }

    #[test]
    fn test_level_is_passed_through() {
        assert_eq!(filter_directive("debug"), "debug");
        assert_eq!(filter_directive("pingd_core=trace,info"), "pingd_core=trace,info");
    }
}
