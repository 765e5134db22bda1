//! End-to-end integration tests for the preparation pipeline
//!
//! These tests build a synthetic raw archive containing an hourly-load
//! parquet, then drive extraction, localized loading, scaling, splitting,
//! and window generation through the public library API.

use chrono::NaiveDate;
use pjm_forecaster::app::services::archive::extractor::{DataExtractor, ExtractOutcome};
use pjm_forecaster::app::services::archive::fingerprint::compute_fingerprint;
use pjm_forecaster::app::services::preprocessing::{fit_transform, train_test_split};
use pjm_forecaster::app::services::windowing::{WindowConfig, WindowGenerator};
use pjm_forecaster::config::{DateSpec, ForecastOptions, TrainTestDates, WindowOptions};
use pjm_forecaster::constants::{ARCHIVE_FILENAME, ARCHIVE_PARQUET_ENTRY, TIMESTAMP_COLUMN};
use pjm_forecaster::{FeatureKind, Zone};
use polars::prelude::*;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use tempfile::TempDir;
use ::zip::ZipWriter;
use ::zip::write::SimpleFileOptions;

/// Hours in the synthetic series (late January, clear of DST transitions)
const HOURS: usize = 24 * 14;

fn synthetic_parquet_bytes() -> Vec<u8> {
    let start = NaiveDate::from_ymd_opt(2012, 1, 10)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let micros: Vec<i64> = (0..HOURS)
        .map(|h| {
            (start + chrono::Duration::hours(h as i64))
                .and_utc()
                .timestamp_micros()
        })
        .collect();
    // a daily-ish load shape so scaling has a real range
    let dom: Vec<f64> = (0..HOURS)
        .map(|h| 12_000.0 + 3_000.0 * ((h % 24) as f64 / 24.0 * std::f64::consts::TAU).sin())
        .collect();
    let pjme: Vec<f64> = (0..HOURS).map(|h| 30_000.0 + h as f64).collect();

    let datetime = Column::new(TIMESTAMP_COLUMN.into(), micros)
        .cast(&DataType::Datetime(TimeUnit::Microseconds, None))
        .unwrap();
    let mut frame = DataFrame::new(vec![
        datetime,
        Column::new("DOM".into(), dom),
        Column::new("PJME".into(), pjme),
    ])
    .unwrap();

    let mut buffer = Vec::new();
    ParquetWriter::new(&mut buffer).finish(&mut frame).unwrap();
    buffer
}

fn write_archive(data_dir: &Path) -> std::path::PathBuf {
    let parquet = synthetic_parquet_bytes();
    let path = data_dir.join(ARCHIVE_FILENAME);
    let mut writer = ZipWriter::new(File::create(&path).unwrap());
    writer
        .start_file(ARCHIVE_PARQUET_ENTRY, SimpleFileOptions::default())
        .unwrap();
    writer.write_all(&parquet).unwrap();
    writer.finish().unwrap();
    path
}

fn pipeline_options(data_dir: &Path) -> ForecastOptions {
    let archive = write_archive(data_dir);
    let mut options = ForecastOptions::default()
        .with_data_dir(data_dir)
        .with_out_dir(data_dir.join("out"));
    options.reference_fingerprint = compute_fingerprint(&archive).unwrap();
    options.dates = TrainTestDates {
        start: DateSpec::new(2012, 1, 10, 0),
        end: DateSpec::new(2012, 1, 23, 23),
    };
    options.window = WindowOptions {
        window: 24,
        horizon: 12,
        batch_size: 16,
        shuffle_buffer_size: None,
    };
    options
}

#[test]
fn test_full_pipeline_univariate() {
    let dir = TempDir::new().unwrap();
    let options = pipeline_options(dir.path());

    // extract is idempotent end to end
    let extractor = DataExtractor::new(&options);
    assert_eq!(extractor.extract().unwrap(), ExtractOutcome::Extracted);
    assert_eq!(
        extractor.extract().unwrap(),
        ExtractOutcome::AlreadyExtracted
    );

    let series = extractor.load(&options).unwrap();
    assert_eq!(series.len(), HOURS);
    assert_eq!(series.column_names(), vec!["DOM".to_string()]);

    // scale, retaining the inverse transform
    let (scaled, scaler) = fit_transform(&series, options.zone.as_str()).unwrap();
    let values = scaled.column_values("DOM").unwrap();
    assert!(values.iter().all(|v| (0.0..=1.0).contains(v)));

    // the inverse transform recovers megawatts
    let original = series.column_values("DOM").unwrap();
    for (scaled_value, original_value) in values.iter().zip(&original) {
        assert!((scaler.inverse_transform(*scaled_value) - original_value).abs() < 1e-9);
    }

    // chronological split
    let (train, test) = train_test_split(&scaled, options.train_fraction);
    assert_eq!(train.len(), (HOURS as f64 * 0.8).floor() as usize);
    assert_eq!(train.len() + test.len(), HOURS);

    // windowing
    let config = WindowConfig::new(&options.window).unwrap();
    let generator = WindowGenerator::new(config, scaled.feature_count());
    let train_rows = train.rows().unwrap();

    let expected_examples = train.len() - 24 - 12 + 1;
    let mut examples = 0;
    let mut batches = 0;
    for batch in generator.make_windows(&train_rows) {
        for example in &batch.examples {
            assert_eq!(example.inputs.len(), 24);
            assert_eq!(example.targets.len(), 12);
        }
        examples += batch.len();
        batches += 1;
    }
    assert_eq!(examples, expected_examples);
    assert_eq!(batches, expected_examples.div_ceil(16));
}

#[test]
fn test_full_pipeline_multivariate_shuffled() {
    let dir = TempDir::new().unwrap();
    let mut options = pipeline_options(dir.path());
    options.additional_features = vec![FeatureKind::SinDay, FeatureKind::Hour];
    options.window.shuffle_buffer_size = Some(64);

    let extractor = DataExtractor::new(&options);
    extractor.extract().unwrap();
    let series = extractor.load(&options).unwrap();

    assert_eq!(
        series.column_names(),
        vec!["DOM".to_string(), "sin_day".to_string(), "hour".to_string()]
    );
    assert_eq!(series.feature_count(), 3);

    let (scaled, _scaler) = fit_transform(&series, options.zone.as_str()).unwrap();
    // feature columns pass through scaling untouched
    assert_eq!(
        scaled.column_values("hour").unwrap(),
        series.column_values("hour").unwrap()
    );

    let (train, _test) = train_test_split(&scaled, options.train_fraction);
    let config = WindowConfig::new(&options.window).unwrap();
    let generator = WindowGenerator::new(config, scaled.feature_count()).with_seed(17);
    assert!(generator.multivariate());

    let rows = train.rows().unwrap();
    let mut examples = 0;
    for batch in generator.make_windows(&rows) {
        for example in &batch.examples {
            // inputs keep all three columns; targets reduce to the load column
            assert_eq!(example.inputs[0].len(), 3);
            assert_eq!(example.targets.len(), 12);
            assert!(example.targets.iter().all(|v| (0.0..=1.0).contains(v)));
        }
        examples += batch.len();
    }
    assert_eq!(examples, generator.example_count(rows.len()));
}

#[test]
fn test_mismatched_reference_stops_before_extraction() {
    let dir = TempDir::new().unwrap();
    let mut options = pipeline_options(dir.path());
    options.reference_fingerprint = "not-the-right-fingerprint".to_string();

    let extractor = DataExtractor::new(&options);
    assert!(extractor.extract().is_err());
    assert!(!extractor.canonical_path().exists());

    // load after the failed extraction warns and returns an empty series
    let series = extractor.load(&options).unwrap();
    assert!(series.is_empty());
}

#[test]
fn test_zone_selection_changes_target_column() {
    let dir = TempDir::new().unwrap();
    let options = pipeline_options(dir.path()).with_zone(Zone::Pjme);

    let extractor = DataExtractor::new(&options);
    extractor.extract().unwrap();
    let series = extractor.load(&options).unwrap();

    assert_eq!(series.column_names(), vec!["PJME".to_string()]);
    let values = series.column_values("PJME").unwrap();
    assert_eq!(values[0], 30_000.0);
    assert_eq!(values[HOURS - 1], 30_000.0 + (HOURS - 1) as f64);
}
