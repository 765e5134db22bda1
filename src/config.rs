//! Configuration management and validation.
//!
//! Provides the forecast options record consumed by every pipeline stage:
//! zone selection, date range, time zone resolution policies, scaling and
//! windowing parameters, and model-runner passthrough settings. One value is
//! constructed at startup and passed by reference into each stage; no stage
//! reads ambient configuration.

use crate::app::models::{FeatureKind, ModelKind, Zone};
use crate::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_EARLY_STOP_PATIENCE, DEFAULT_EPOCHS, DEFAULT_HORIZON,
    DEFAULT_LR_PATIENCE, DEFAULT_SHUFFLE_BUFFER_SIZE, DEFAULT_TIMEZONE, DEFAULT_TRAIN_FRACTION,
    DEFAULT_WINDOW, REFERENCE_FINGERPRINT,
};
use crate::{Error, Result};
use chrono::{Duration, NaiveDateTime, NaiveTime};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// A calendar instant selected by year/month/day plus an hour offset
///
/// The hour is applied as an offset from midnight, so hour values past 23
/// roll into the following day rather than failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateSpec {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
}

impl DateSpec {
    pub fn new(year: i32, month: u32, day: u32, hour: u32) -> Self {
        Self {
            year,
            month,
            day,
            hour,
        }
    }

    /// Convert to a naive local datetime, rejecting impossible calendar dates
    pub fn to_naive(&self) -> Result<NaiveDateTime> {
        let date = chrono::NaiveDate::from_ymd_opt(self.year, self.month, self.day).ok_or_else(
            || {
                Error::configuration(format!(
                    "invalid calendar date {:04}-{:02}-{:02}",
                    self.year, self.month, self.day
                ))
            },
        )?;
        Ok(date.and_time(NaiveTime::MIN) + Duration::hours(i64::from(self.hour)))
    }
}

/// Inclusive start/end bounds of the modeled date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainTestDates {
    pub start: DateSpec,
    pub end: DateSpec,
}

/// Resolution policy for local times that occur twice at a DST fall-back
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguousTimePolicy {
    /// Fail the load with a localization error
    Raise,
    /// Resolve to the first occurrence (the DST instant)
    Earliest,
    /// Resolve to the second occurrence (the standard-time instant)
    Latest,
    /// Drop the row
    Skip,
}

impl FromStr for AmbiguousTimePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "raise" => Ok(Self::Raise),
            "earliest" => Ok(Self::Earliest),
            "latest" => Ok(Self::Latest),
            "skip" => Ok(Self::Skip),
            _ => Err(Error::configuration(format!(
                "unknown ambiguous-time policy '{s}'; expected raise, earliest, latest, or skip"
            ))),
        }
    }
}

/// Resolution policy for local times skipped over at a DST spring-forward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NonexistentTimePolicy {
    /// Fail the load with a localization error
    Raise,
    /// Move forward to the first instant after the gap
    ShiftForward,
    /// Move backward to the last representable instant before the gap
    ShiftBackward,
    /// Drop the row
    Skip,
}

impl FromStr for NonexistentTimePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "raise" => Ok(Self::Raise),
            "shift_forward" => Ok(Self::ShiftForward),
            "shift_backward" => Ok(Self::ShiftBackward),
            "skip" => Ok(Self::Skip),
            _ => Err(Error::configuration(format!(
                "unknown nonexistent-time policy '{s}'; expected raise, shift_forward, shift_backward, or skip"
            ))),
        }
    }
}

/// Time zone name plus DST resolution policies used to localize the index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimezoneOptions {
    /// IANA name of the zone the load data is recorded in
    pub name: String,
    pub ambiguous: AmbiguousTimePolicy,
    pub nonexistent: NonexistentTimePolicy,
}

impl Default for TimezoneOptions {
    fn default() -> Self {
        Self {
            name: DEFAULT_TIMEZONE.to_string(),
            // fall back resolves to the DST instant
            ambiguous: AmbiguousTimePolicy::Earliest,
            // turn the clock forward over spring-forward gaps
            nonexistent: NonexistentTimePolicy::ShiftForward,
        }
    }
}

impl TimezoneOptions {
    /// Parse the configured zone name
    pub fn tz(&self) -> Result<Tz> {
        self.name
            .parse::<Tz>()
            .map_err(|_| Error::configuration(format!("unknown time zone '{}'", self.name)))
    }
}

/// Raw windowing parameters as configured
///
/// Values are held signed so that out-of-domain settings survive long enough
/// to be reported; [`crate::app::services::windowing::WindowConfig`] is the
/// validated form every generator is built from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowOptions {
    /// Lag window length in hourly intervals
    pub window: i64,
    /// Forecast horizon length in hourly intervals
    pub horizon: i64,
    /// Examples per training batch
    pub batch_size: i64,
    /// Reservoir size for example shuffling; None disables shuffling
    pub shuffle_buffer_size: Option<i64>,
}

impl Default for WindowOptions {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            horizon: DEFAULT_HORIZON,
            batch_size: DEFAULT_BATCH_SIZE,
            shuffle_buffer_size: Some(DEFAULT_SHUFFLE_BUFFER_SIZE),
        }
    }
}

/// Training-loop settings carried through to the model runner
///
/// The pipeline validates none of these beyond type shape; they are opaque to
/// the core and interpreted only by the collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingOptions {
    pub epochs: u32,
    pub loss: String,
    pub metrics: Vec<String>,
    pub early_stop_patience: u32,
    pub lr_patience: u32,
}

impl Default for TrainingOptions {
    fn default() -> Self {
        Self {
            epochs: DEFAULT_EPOCHS,
            loss: "huber".to_string(),
            metrics: vec!["mae".to_string()],
            early_stop_patience: DEFAULT_EARLY_STOP_PATIENCE,
            lr_patience: DEFAULT_LR_PATIENCE,
        }
    }
}

/// Complete configuration for one forecast preparation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastOptions {
    /// Grid zone to forecast
    pub zone: Zone,

    /// Inclusive date range the series is restricted to
    pub dates: TrainTestDates,

    /// Time zone localization settings
    pub timezone: TimezoneOptions,

    /// Fraction of rows assigned to the training partition, in (0, 1)
    pub train_fraction: f64,

    /// Whether to min-max scale the target column
    pub min_max_scale: bool,

    /// Windowing parameters
    pub window: WindowOptions,

    /// Model architecture selector (validated, not interpreted)
    pub model: ModelKind,

    /// Model-runner passthrough settings
    pub training: TrainingOptions,

    /// Additional feature columns appended after the target column
    pub additional_features: Vec<FeatureKind>,

    /// Directory holding the raw archive and canonical parquet
    pub data_dir: PathBuf,

    /// Directory the model runner writes artifacts to
    pub out_dir: PathBuf,

    /// Expected fingerprint of the raw archive
    pub reference_fingerprint: String,
}

impl Default for ForecastOptions {
    fn default() -> Self {
        Self {
            zone: Zone::Dom,
            dates: TrainTestDates {
                start: DateSpec::new(2012, 1, 1, 0),
                end: DateSpec::new(2016, 12, 31, 23),
            },
            timezone: TimezoneOptions::default(),
            train_fraction: DEFAULT_TRAIN_FRACTION,
            min_max_scale: true,
            window: WindowOptions::default(),
            model: ModelKind::Lstm,
            training: TrainingOptions::default(),
            additional_features: Vec::new(),
            data_dir: default_data_dir(),
            out_dir: PathBuf::from("out"),
            reference_fingerprint: REFERENCE_FINGERPRINT.to_string(),
        }
    }
}

impl ForecastOptions {
    /// Create options with a custom zone
    pub fn with_zone(mut self, zone: Zone) -> Self {
        self.zone = zone;
        self
    }

    /// Create options with a custom data directory
    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }

    /// Create options with a custom output directory
    pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = out_dir.into();
        self
    }

    /// Create options with a custom model selector
    pub fn with_model(mut self, model: ModelKind) -> Self {
        self.model = model;
        self
    }

    /// Create options with a custom train fraction
    pub fn with_train_fraction(mut self, train_fraction: f64) -> Self {
        self.train_fraction = train_fraction;
        self
    }

    /// Create options with custom windowing parameters
    pub fn with_window_options(mut self, window: WindowOptions) -> Self {
        self.window = window;
        self
    }

    /// Create options with shuffling disabled
    pub fn without_shuffling(mut self) -> Self {
        self.window.shuffle_buffer_size = None;
        self
    }

    /// Create options with the given additional features enabled
    pub fn with_additional_features(mut self, features: Vec<FeatureKind>) -> Self {
        self.additional_features = features;
        self
    }

    /// Number of input feature columns the windowed examples carry
    pub fn feature_count(&self) -> usize {
        1 + self.additional_features.len()
    }

    /// Validate settings that do not depend on any data
    ///
    /// Windowing parameters have their own pre-flight validation when the
    /// generator is constructed; see `WindowConfig::new`.
    pub fn validate(&self) -> Result<()> {
        if !self.train_fraction.is_finite()
            || self.train_fraction <= 0.0
            || self.train_fraction >= 1.0
        {
            return Err(Error::configuration(format!(
                "train fraction must lie strictly between 0 and 1, got {}",
                self.train_fraction
            )));
        }

        self.timezone.tz()?;
        self.dates.start.to_naive()?;
        self.dates.end.to_naive()?;

        if self.reference_fingerprint.is_empty() {
            return Err(Error::configuration(
                "reference fingerprint must not be empty",
            ));
        }

        Ok(())
    }
}

/// Default data directory, resolved per platform
fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("pjm-forecaster"))
        .unwrap_or_else(|| PathBuf::from("data"))
}
