//! Process command implementation for the PJM forecaster CLI
//!
//! This module contains the complete preparation workflow: archive
//! verification and extraction, localized loading, feature engineering,
//! scaling, splitting, and windowed dataset generation, ending at the
//! model-runner boundary.

use super::shared::{
    PipelineStats, create_progress_bar, ensure_not_cancelled, prepare_directories, setup_logging,
};
use crate::Result;
use crate::app::models::FeatureSeries;
use crate::app::services::archive::extractor::{DataExtractor, ExtractOutcome};
use crate::app::services::model::ModelHandoff;
use crate::app::services::preprocessing::{fit_transform, train_test_split};
use crate::app::services::windowing::{WindowConfig, WindowGenerator};
use crate::cli::args::ProcessArgs;
use colored::Colorize;
use indicatif::HumanDuration;
use std::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Process command runner for the PJM forecaster
///
/// This function orchestrates the entire preparation workflow:
/// 1. Set up logging and assemble configuration
/// 2. Pre-flight validate options (windowing numerics included)
/// 3. Verify and extract the raw archive
/// 4. Load, scale, and split the series
/// 5. Generate windowed batches and report the model-runner hand-off
pub async fn run_process(
    args: ProcessArgs,
    cancellation_token: CancellationToken,
) -> Result<PipelineStats> {
    let start_time = Instant::now();

    setup_logging(args.get_log_level(), args.quiet)?;

    info!("Starting PJM forecast data preparation");
    debug!("Command line arguments: {:?}", args);

    args.validate()?;
    let options = args.to_options()?;
    options.validate()?;

    // windowing options are rejected before any data is touched
    let window_config = WindowConfig::new(&options.window)?;

    prepare_directories(&options).await?;
    ensure_not_cancelled(&cancellation_token)?;

    // verify + extract (no-op when the canonical parquet already exists)
    let extractor = DataExtractor::new(&options);
    match extractor.extract()? {
        ExtractOutcome::Extracted => info!("Archive verified and canonical parquet extracted"),
        ExtractOutcome::AlreadyExtracted => debug!("Canonical parquet already extracted"),
    }
    ensure_not_cancelled(&cancellation_token)?;

    let series = extractor.load(&options)?;
    if series.is_empty() {
        warn!("No rows loaded for the configured zone and date range; nothing to prepare");
        return Ok(PipelineStats {
            processing_time: start_time.elapsed(),
            ..Default::default()
        });
    }

    let mut stats = PipelineStats {
        rows_loaded: series.len(),
        feature_columns: series.feature_count(),
        ..Default::default()
    };

    // scale on the full series, retaining the inverse transform for reporting
    let (series, scaler) = if options.min_max_scale {
        let (scaled, scaler) = fit_transform(&series, options.zone.as_str())?;
        (scaled, Some(scaler))
    } else {
        (series, None)
    };
    ensure_not_cancelled(&cancellation_token)?;

    let (train, test) = train_test_split(&series, options.train_fraction);
    stats.train_rows = train.len();
    stats.test_rows = test.len();

    let mut generator = WindowGenerator::new(window_config, series.feature_count());
    if let Some(seed) = args.seed {
        generator = generator.with_seed(seed);
    }

    let (train_examples, train_batches) = generate_windows(
        &generator,
        &train,
        "windowing train partition",
        args.show_progress(),
    )?;
    stats.train_examples = train_examples;
    stats.train_batches = train_batches;
    ensure_not_cancelled(&cancellation_token)?;

    let (test_examples, test_batches) = generate_windows(
        &generator,
        &test,
        "windowing test partition",
        args.show_progress(),
    )?;
    stats.test_examples = test_examples;
    stats.test_batches = test_batches;

    // model training happens outside this tool; report the hand-off contract
    let handoff = ModelHandoff::new(&options, generator.input_shape(), scaler);
    info!(
        "Ready for model runner: {} over zone {}, input shape ({}, {}), checkpoint at '{}'",
        handoff.kind,
        options.zone,
        handoff.input_shape.0,
        handoff.input_shape.1,
        handoff.checkpoint_path.display()
    );

    stats.processing_time = start_time.elapsed();
    generate_final_report(&args, &stats);

    Ok(stats)
}

/// Drive one partition through the window generator, counting its output
///
/// Batches are produced lazily and dropped after counting; the model runner
/// re-creates the stream from the same generator when it consumes them.
fn generate_windows(
    generator: &WindowGenerator,
    partition: &FeatureSeries,
    message: &'static str,
    show_progress: bool,
) -> Result<(usize, usize)> {
    let rows = partition.rows()?;
    let expected_batches = generator.batch_count(rows.len()) as u64;

    let pb = if show_progress && expected_batches > 0 {
        Some(create_progress_bar(expected_batches, message))
    } else {
        None
    };

    let mut examples = 0usize;
    let mut batches = 0usize;
    for batch in generator.make_windows(&rows) {
        examples += batch.len();
        batches += 1;
        if let Some(pb) = &pb {
            pb.inc(1);
        }
    }
    if let Some(pb) = pb {
        pb.finish_and_clear();
    }

    debug!(
        "{}: {} examples in {} batches from {} rows",
        message,
        examples,
        batches,
        rows.len()
    );
    Ok((examples, batches))
}

/// Print the human-readable summary unless running quiet
fn generate_final_report(args: &ProcessArgs, stats: &PipelineStats) {
    if args.quiet {
        return;
    }

    println!();
    println!("{}", "Forecast data preparation complete".green().bold());
    println!(
        "  rows loaded:     {} ({} feature columns)",
        stats.rows_loaded, stats.feature_columns
    );
    println!(
        "  train partition: {} rows -> {} examples in {} batches",
        stats.train_rows, stats.train_examples, stats.train_batches
    );
    println!(
        "  test partition:  {} rows -> {} examples in {} batches",
        stats.test_rows, stats.test_examples, stats.test_batches
    );
    println!(
        "  elapsed:         {}",
        HumanDuration(stats.processing_time)
    );
}
