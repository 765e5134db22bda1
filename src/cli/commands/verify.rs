//! Verify command implementation for the PJM forecaster CLI
//!
//! Runs the archive integrity check in isolation: fingerprint comparison
//! against the reference value plus the structural self-check. Useful after
//! downloading the archive and before committing to a long preparation run.

use super::shared::{PipelineStats, setup_logging};
use crate::Result;
use crate::app::services::archive::fingerprint;
use crate::cli::args::VerifyArgs;
use crate::config::ForecastOptions;
use crate::constants::ARCHIVE_FILENAME;
use colored::Colorize;
use tracing::{debug, info};

/// Verify command runner for the PJM forecaster
pub async fn run_verify(args: VerifyArgs) -> Result<PipelineStats> {
    setup_logging(args.get_log_level(), args.quiet)?;

    let defaults = ForecastOptions::default();
    let data_dir = args.data_dir.clone().unwrap_or(defaults.data_dir);
    let reference = args
        .reference
        .clone()
        .unwrap_or(defaults.reference_fingerprint);
    let archive_path = data_dir.join(ARCHIVE_FILENAME);

    info!("Verifying archive '{}'", archive_path.display());
    debug!("Reference fingerprint: {}", reference);

    let computed = fingerprint::verify(&archive_path, &reference)?;
    fingerprint::self_check(&archive_path)?;

    if !args.quiet {
        println!("{} {}", "Archive verified".green().bold(), archive_path.display());
        println!("  fingerprint: {computed}");
    }

    Ok(PipelineStats::default())
}
