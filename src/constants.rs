//! Application constants for the PJM forecaster
//!
//! This module contains filenames, default option values, and the archive
//! reference fingerprint used throughout the forecast pipeline.

// =============================================================================
// Archive and Dataset Files
// =============================================================================

/// Name of the raw data archive inside the data directory
pub const ARCHIVE_FILENAME: &str = "hourly-energy-consumption.zip";

/// Name of the combined hourly-load parquet inside the archive.
/// The name is mis-spelled in the upstream Kaggle archive.
pub const ARCHIVE_PARQUET_ENTRY: &str = "est_hourly.paruqet";

/// Canonical name the extracted parquet is renamed to
pub const CANONICAL_PARQUET_FILENAME: &str = "est_hourly.parquet";

/// Name of the datetime column in the canonical parquet
pub const TIMESTAMP_COLUMN: &str = "Datetime";

/// Fallback column name pandas uses when the index was stored unnamed
pub const UNNAMED_INDEX_COLUMN: &str = "__index_level_0__";

/// Reference fingerprint of the expected raw archive.
///
/// Computed over the rendering defined in
/// [`crate::app::services::archive::fingerprint`]. The value is bound to that
/// exact rendering: changing how entries are serialized silently invalidates
/// it and requires regenerating this constant from a known-good archive.
pub const REFERENCE_FINGERPRINT: &str =
    "9464c1e4a98aa4bd9348e20629b77c16bf85a26cd9073ec2b262855a2d532b24";

// =============================================================================
// Default Forecast Options
// =============================================================================

/// Time zone the upstream load data is recorded in
pub const DEFAULT_TIMEZONE: &str = "US/Eastern";

/// Fraction of rows assigned to the training partition
pub const DEFAULT_TRAIN_FRACTION: f64 = 0.8;

/// Default lag window, one week of hourly intervals
pub const DEFAULT_WINDOW: i64 = 24 * 7;

/// Default forecast horizon, one week of hourly intervals
pub const DEFAULT_HORIZON: i64 = 24 * 7;

/// Default training batch size
pub const DEFAULT_BATCH_SIZE: i64 = 32;

/// Default reservoir size for shuffling windowed examples
pub const DEFAULT_SHUFFLE_BUFFER_SIZE: i64 = 1000;

/// Default training epochs (model-runner passthrough)
pub const DEFAULT_EPOCHS: u32 = 500;

/// Default early-stopping patience in epochs (model-runner passthrough)
pub const DEFAULT_EARLY_STOP_PATIENCE: u32 = 100;

/// Default learning-rate-reduction patience in epochs (model-runner passthrough)
pub const DEFAULT_LR_PATIENCE: u32 = 50;

// =============================================================================
// Feature Engineering Constants
// =============================================================================

/// Seconds per day, the period of the daily cyclical encodings
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Days per year used by the yearly cyclical encodings. The historical value
/// 365.245 (not 365.25) is load-bearing: models were trained against features
/// derived from it.
pub const DAYS_PER_YEAR: f64 = 365.245;
