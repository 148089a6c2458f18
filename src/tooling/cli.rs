//! CLI Tooling
//!
//! Command-line interface for the sync daemon. Flags override the config file
//! and environment; see [`crate::config`] for the full precedence order.

use crate::config::{ConfigLoader, ConfigOverrides, ResolvedConfig};
use crate::driver::SyncDriver;
use crate::error::SyncResult;
use crate::sync::PassOutcome;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Treesync CLI - one-way periodic directory mirroring
#[derive(Parser, Debug)]
#[command(name = "treesync")]
#[command(about = "Keep a replica directory identical to a source directory")]
pub struct Cli {
    /// Configuration file path (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Source directory to mirror from
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Replica directory to keep in sync (created if absent)
    #[arg(long)]
    pub replica: Option<PathBuf>,

    /// Seconds between sync passes
    #[arg(long, value_parser = clap::value_parser!(u64).range(1..))]
    pub interval: Option<u64>,

    /// Audit log directory or file path
    #[arg(long)]
    pub log_path: Option<PathBuf>,

    /// Maximum concurrent file operations per pass
    #[arg(long)]
    pub max_concurrent_ops: Option<usize>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log format (text, json)
    #[arg(long, value_parser = ["text", "json"])]
    pub log_format: Option<String>,

    /// Run a single pass and exit instead of running periodically
    #[arg(long)]
    pub once: bool,
}

impl Cli {
    /// Configuration overrides carried by the command-line flags.
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            source: self.source.clone(),
            replica: self.replica.clone(),
            interval_secs: self.interval,
            log_path: self.log_path.clone(),
            max_concurrent_ops: self.max_concurrent_ops,
            log_level: self.log_level.clone(),
            log_format: self.log_format.clone(),
        }
    }
}

/// Process exit status for a single pass.
pub fn exit_code(outcome: PassOutcome) -> i32 {
    match outcome {
        PassOutcome::Success | PassOutcome::Cancelled => 0,
        PassOutcome::PartialFailure => 2,
    }
}

/// Validated configuration ready to execute.
pub struct CliContext {
    config: ResolvedConfig,
}

impl CliContext {
    /// Load and validate configuration for the given command line.
    pub fn new(cli: &Cli) -> SyncResult<Self> {
        let config = ConfigLoader::load_resolved(cli.config.as_deref(), &cli.overrides())?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ResolvedConfig {
        &self.config
    }

    /// Run the daemon until a stop signal arrives, or a single pass when
    /// `once` is set. Returns the process exit code.
    pub async fn execute(&self, once: bool) -> SyncResult<i32> {
        for warning in &self.config.warnings {
            warn!("{}", warning);
        }
        let driver = Arc::new(SyncDriver::from_config(&self.config));
        info!(
            source = %driver.source().display(),
            replica = %driver.replica().display(),
            log_file = %self.config.log_file.display(),
            interval_secs = self.config.interval.as_secs(),
            "Treesync starting"
        );

        if once {
            let cancel = CancellationToken::new();
            let on_signal = cancel.clone();
            let watcher = tokio::spawn(async move {
                shutdown_signal().await;
                on_signal.cancel();
            });
            let report = driver.run_once(&cancel).await;
            watcher.abort();
            println!("{}", report.summary);
            return Ok(exit_code(report.outcome()));
        }

        driver
            .run_until(self.config.interval, shutdown_signal())
            .await?;
        info!("Treesync stopped");
        Ok(0)
    }
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
