//! Shared components for CLI commands
//!
//! This module contains common types, utilities, and functions used across
//! multiple CLI command implementations.

use crate::config::ForecastOptions;
use crate::{Error, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Pipeline statistics for reporting across all commands
#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    /// Rows loaded from the canonical dataset after range restriction
    pub rows_loaded: usize,
    /// Value columns per row (target plus enabled features)
    pub feature_columns: usize,
    /// Rows in the training partition
    pub train_rows: usize,
    /// Rows in the test partition
    pub test_rows: usize,
    /// Windowed examples generated from the training partition
    pub train_examples: usize,
    /// Batches generated from the training partition
    pub train_batches: usize,
    /// Windowed examples generated from the test partition
    pub test_examples: usize,
    /// Batches generated from the test partition
    pub test_batches: usize,
    /// Total processing time
    pub processing_time: std::time::Duration,
}

/// Set up structured logging for a command
pub fn setup_logging(log_level: &str, quiet: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    // Create filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("pjm_forecaster={}", log_level)));

    // Set up subscriber based on output format preference
    if quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        // Standard logging with timestamps
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Validate and prepare the data and output directories
pub async fn prepare_directories(options: &ForecastOptions) -> Result<()> {
    tokio::fs::create_dir_all(&options.data_dir)
        .await
        .map_err(|e| {
            Error::io(
                format!("cannot create data directory '{}'", options.data_dir.display()),
                e,
            )
        })?;
    tokio::fs::create_dir_all(&options.out_dir)
        .await
        .map_err(|e| {
            Error::io(
                format!("cannot create output directory '{}'", options.out_dir.display()),
                e,
            )
        })?;
    debug!(
        "Prepared directories: data='{}', out='{}'",
        options.data_dir.display(),
        options.out_dir.display()
    );
    Ok(())
}

/// Create a progress bar for batch generation
pub fn create_progress_bar(total: u64, message: &'static str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}")
            .unwrap()
            .progress_chars("#>-"),
    );
    pb.set_message(message);
    pb
}

/// Fail fast at a stage boundary when the user has requested shutdown
pub fn ensure_not_cancelled(token: &CancellationToken) -> Result<()> {
    if token.is_cancelled() {
        return Err(Error::interrupted("cancelled by user"));
    }
    Ok(())
}
