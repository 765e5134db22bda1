//! PJM Forecaster Library
//!
//! A Rust library for preparing hourly PJM electrical load data for
//! neural-network forecasting models.
//!
//! This library provides tools for:
//! - Verifying the raw data archive against a reference fingerprint
//! - Extracting the canonical hourly-load parquet from the archive
//! - Localizing naive timestamps to a market time zone with explicit
//!   DST fold/gap resolution policies
//! - Deriving cyclical and calendar features from timestamps
//! - Min-max scaling with a retained inverse transform
//! - Chronological train/test splitting and sliding-window generation
//! - Comprehensive error handling and reporting

pub mod config;
pub mod constants;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod archive;
        pub mod model;
        pub mod preprocessing;
        pub mod windowing;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{FeatureKind, FeatureSeries, ModelKind, WindowedBatch, WindowedExample, Zone};
pub use config::ForecastOptions;

/// Result type alias for the PJM forecaster
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error types for forecast data preparation
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Polars data processing error
    #[error("Data processing error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Archive fingerprint does not match the configured reference
    #[error(
        "Archive integrity mismatch: the raw archive's entry listing or size has changed.\n  expected: {expected}\n  computed: {computed}\nWill not continue to extraction or model training."
    )]
    IntegrityMismatch { expected: String, computed: String },

    /// Archive failed its structural self-check
    #[error("Archive corrupt: {message}")]
    ArchiveCorrupt { message: String },

    /// Windowing options outside the accepted domain
    #[error(
        "Invalid windowing options: {}. The value for each windowing option must be >= 1.",
        format_invalid_options(.entries)
    )]
    InvalidWindowOptions { entries: Vec<(&'static str, i64)> },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Zone identifier outside the supported set
    #[error("Unknown grid zone: '{name}'")]
    UnknownZone { name: String },

    /// Model selector outside the supported set
    #[error("Unknown model selector: '{selector}'. Must be one of: cnn, lstm")]
    UnknownModel { selector: String },

    /// A local time could not be resolved under the configured policy
    #[error("Time localization error: {message}")]
    TimeLocalization { message: String },

    /// Data shape or ordering invariant violated
    #[error("Data validation error: {message}")]
    DataValidation { message: String },

    /// Processing interrupted
    #[error("Processing interrupted: {reason}")]
    Interrupted { reason: String },
}

/// Render the offending (option, value) pairs of a windowing validation failure
fn format_invalid_options(entries: &[(&'static str, i64)]) -> String {
    entries
        .iter()
        .map(|(option, value)| format!("{option}={value}"))
        .collect::<Vec<_>>()
        .join(", ")
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create an integrity mismatch error
    pub fn integrity_mismatch(expected: impl Into<String>, computed: impl Into<String>) -> Self {
        Self::IntegrityMismatch {
            expected: expected.into(),
            computed: computed.into(),
        }
    }

    /// Create an archive corruption error
    pub fn archive_corrupt(message: impl Into<String>) -> Self {
        Self::ArchiveCorrupt {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create an unknown zone error
    pub fn unknown_zone(name: impl Into<String>) -> Self {
        Self::UnknownZone { name: name.into() }
    }

    /// Create an unknown model selector error
    pub fn unknown_model(selector: impl Into<String>) -> Self {
        Self::UnknownModel {
            selector: selector.into(),
        }
    }

    /// Create a time localization error
    pub fn time_localization(message: impl Into<String>) -> Self {
        Self::TimeLocalization {
            message: message.into(),
        }
    }

    /// Create a data validation error
    pub fn data_validation(message: impl Into<String>) -> Self {
        Self::DataValidation {
            message: message.into(),
        }
    }

    /// Create a processing interrupted error
    pub fn interrupted(reason: impl Into<String>) -> Self {
        Self::Interrupted {
            reason: reason.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(error: zip::result::ZipError) -> Self {
        Self::ArchiveCorrupt {
            message: error.to_string(),
        }
    }
}
