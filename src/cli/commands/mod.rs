//! Command implementations for the PJM forecaster CLI
//!
//! This module contains the main command execution logic, progress reporting,
//! and error handling for the CLI interface. Each command is implemented in
//! its own module:
//! - `process`: full preparation pipeline up to the model-runner boundary
//! - `verify`: standalone archive integrity check

pub mod process;
pub mod shared;
pub mod verify;

pub use shared::PipelineStats;

use crate::Result;
use crate::cli::args::{Args, Commands};
use tokio_util::sync::CancellationToken;

/// Main command runner for the PJM forecaster
///
/// Dispatches to the appropriate subcommand handler based on CLI args. The
/// cancellation token is checked between pipeline stages so a ctrl-c lands
/// at a stage boundary rather than mid-write.
pub async fn run(args: Args, cancellation_token: CancellationToken) -> Result<PipelineStats> {
    match args.get_command() {
        Some(Commands::Process(process_args)) => {
            process::run_process(process_args, cancellation_token).await
        }
        Some(Commands::Verify(verify_args)) => verify::run_verify(verify_args).await,
        None => Ok(PipelineStats::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_stats_re_export() {
        let stats = PipelineStats::default();
        assert_eq!(stats.rows_loaded, 0);
        assert_eq!(stats.train_batches, 0);
    }
}
