//! Data models for forecast data preparation
//!
//! This module contains the core data structures for representing hourly load
//! series, derived features, windowed training examples, and the closed sets
//! of zones, feature names, and model selectors the pipeline accepts.

use crate::{Error, Result};
use chrono_tz::Tz;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// =============================================================================
// Grid Zones
// =============================================================================

/// PJM grid zones present in the canonical hourly-load dataset
///
/// Each variant maps to one column of the combined parquet. One zone is
/// forecast per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Zone {
    #[serde(rename = "AEP")]
    Aep,
    #[serde(rename = "COMED")]
    Comed,
    #[serde(rename = "DAYTON")]
    Dayton,
    #[serde(rename = "DEOK")]
    Deok,
    #[serde(rename = "DOM")]
    Dom,
    #[serde(rename = "DUQ")]
    Duq,
    #[serde(rename = "EKPC")]
    Ekpc,
    #[serde(rename = "FE")]
    Fe,
    #[serde(rename = "NI")]
    Ni,
    #[serde(rename = "PJME")]
    Pjme,
    #[serde(rename = "PJMW")]
    Pjmw,
    #[serde(rename = "PJM_Load")]
    PjmLoad,
}

impl Zone {
    /// All supported zones, in dataset column order
    pub const ALL: &'static [Zone] = &[
        Zone::Aep,
        Zone::Comed,
        Zone::Dayton,
        Zone::Deok,
        Zone::Dom,
        Zone::Duq,
        Zone::Ekpc,
        Zone::Fe,
        Zone::Ni,
        Zone::Pjme,
        Zone::Pjmw,
        Zone::PjmLoad,
    ];

    /// The dataset column name for this zone
    pub fn as_str(&self) -> &'static str {
        match self {
            Zone::Aep => "AEP",
            Zone::Comed => "COMED",
            Zone::Dayton => "DAYTON",
            Zone::Deok => "DEOK",
            Zone::Dom => "DOM",
            Zone::Duq => "DUQ",
            Zone::Ekpc => "EKPC",
            Zone::Fe => "FE",
            Zone::Ni => "NI",
            Zone::Pjme => "PJME",
            Zone::Pjmw => "PJMW",
            Zone::PjmLoad => "PJM_Load",
        }
    }
}

impl FromStr for Zone {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Zone::ALL
            .iter()
            .find(|zone| zone.as_str().eq_ignore_ascii_case(s))
            .copied()
            .ok_or_else(|| Error::unknown_zone(s))
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Derived Features
// =============================================================================

/// Calendar and cyclical feature columns derivable from a row's timestamp
///
/// Column names are historical and two of them are misnomers; see
/// [`crate::app::services::preprocessing::features`] for the literal
/// definitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    SinDay,
    CosDay,
    SinYear,
    CosYear,
    Weekend,
    Dayofweek,
    Hour,
    Dayofyear,
}

impl FeatureKind {
    /// All derivable features, in the order the feature engine appends them
    pub const ALL: &'static [FeatureKind] = &[
        FeatureKind::SinDay,
        FeatureKind::CosDay,
        FeatureKind::SinYear,
        FeatureKind::CosYear,
        FeatureKind::Weekend,
        FeatureKind::Dayofweek,
        FeatureKind::Hour,
        FeatureKind::Dayofyear,
    ];

    /// The column name this feature is stored under
    pub fn as_str(&self) -> &'static str {
        match self {
            FeatureKind::SinDay => "sin_day",
            FeatureKind::CosDay => "cos_day",
            FeatureKind::SinYear => "sin_year",
            FeatureKind::CosYear => "cos_year",
            FeatureKind::Weekend => "weekend",
            FeatureKind::Dayofweek => "dayofweek",
            FeatureKind::Hour => "hour",
            FeatureKind::Dayofyear => "dayofyear",
        }
    }
}

impl FromStr for FeatureKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        FeatureKind::ALL
            .iter()
            .find(|kind| kind.as_str() == s)
            .copied()
            .ok_or_else(|| {
                Error::configuration(format!(
                    "unknown additional feature '{s}'; supported features: {}",
                    FeatureKind::ALL
                        .iter()
                        .map(|k| k.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }
}

impl fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Model Selector
// =============================================================================

/// Closed set of forecast model architectures the model runner supports
///
/// The pipeline validates the selector but never builds the network itself;
/// architecture internals belong to the model-runner collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Cnn,
    Lstm,
}

impl ModelKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Cnn => "cnn",
            ModelKind::Lstm => "lstm",
        }
    }

    /// Checkpoint filename the model runner writes best weights to
    pub fn checkpoint_filename(&self, zone: Zone) -> String {
        format!("{}{}.hdf5", self.as_str(), zone.as_str())
    }
}

impl FromStr for ModelKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "cnn" => Ok(ModelKind::Cnn),
            "lstm" => Ok(ModelKind::Lstm),
            _ => Err(Error::unknown_model(s)),
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Feature Series
// =============================================================================

/// A time-indexed table of load values and derived feature columns
///
/// The epoch-second index is kept alongside a polars frame holding the value
/// columns (target zone first, then features). Rows are ascending in time and
/// the index length always matches the frame height.
#[derive(Debug, Clone)]
pub struct FeatureSeries {
    tz: Tz,
    timestamps: Vec<i64>,
    frame: DataFrame,
}

impl FeatureSeries {
    /// Create a series, validating that index and frame agree on row count
    pub fn new(tz: Tz, timestamps: Vec<i64>, frame: DataFrame) -> Result<Self> {
        if timestamps.len() != frame.height() {
            return Err(Error::data_validation(format!(
                "index length {} does not match frame height {}",
                timestamps.len(),
                frame.height()
            )));
        }
        Ok(Self {
            tz,
            timestamps,
            frame,
        })
    }

    /// An empty series in the given time zone
    pub fn empty(tz: Tz) -> Self {
        Self {
            tz,
            timestamps: Vec::new(),
            frame: DataFrame::empty(),
        }
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn tz(&self) -> Tz {
        self.tz
    }

    /// Epoch-second timestamps, ascending
    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    /// Value column names in frame order
    pub fn column_names(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .iter()
            .map(|name| name.to_string())
            .collect()
    }

    /// Number of value columns
    pub fn feature_count(&self) -> usize {
        self.frame.width()
    }

    /// A single column's values as f64, nulls mapped to NaN
    pub fn column_values(&self, name: &str) -> Result<Vec<f64>> {
        let series = self
            .frame
            .column(name)?
            .as_materialized_series()
            .cast(&DataType::Float64)?;
        Ok(series
            .f64()?
            .into_iter()
            .map(|value| value.unwrap_or(f64::NAN))
            .collect())
    }

    /// Restrict to the named columns, in the given order
    pub fn select(&self, columns: &[&str]) -> Result<Self> {
        let frame = self.frame.select(columns.iter().copied())?;
        Self::new(self.tz, self.timestamps.clone(), frame)
    }

    /// Contiguous row slice, preserving order
    pub fn slice(&self, offset: usize, length: usize) -> Self {
        let end = (offset + length).min(self.timestamps.len());
        let timestamps = self.timestamps[offset.min(end)..end].to_vec();
        let frame = self.frame.slice(offset as i64, timestamps.len());
        Self {
            tz: self.tz,
            timestamps,
            frame,
        }
    }

    /// Materialize rows as feature vectors, column order preserved
    ///
    /// Row-major layout is what the window generator consumes; the target
    /// column is always position 0.
    pub fn rows(&self) -> Result<Vec<Vec<f64>>> {
        let mut columns = Vec::with_capacity(self.frame.width());
        for name in self.frame.get_column_names() {
            columns.push(self.column_values(name.as_str())?);
        }
        let mut rows = vec![Vec::with_capacity(columns.len()); self.len()];
        for column in &columns {
            for (row, value) in rows.iter_mut().zip(column.iter()) {
                row.push(*value);
            }
        }
        Ok(rows)
    }
}

// =============================================================================
// Windowed Examples and Batches
// =============================================================================

/// One (input window, forecast horizon) training example
///
/// `inputs` is `window` rows of feature vectors; `targets` is `horizon`
/// values of the target column. Both are contiguous in time and their
/// internal order is never permuted.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowedExample {
    pub inputs: Vec<Vec<f64>>,
    pub targets: Vec<f64>,
}

/// A group of windowed examples sized for one training step
///
/// All batches hold `batch_size` examples except possibly the last, which
/// keeps the remainder.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowedBatch {
    pub examples: Vec<WindowedExample>,
}

impl WindowedBatch {
    pub fn len(&self) -> usize {
        self.examples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.examples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zone_round_trips_through_column_name() {
        for zone in Zone::ALL {
            assert_eq!(zone.as_str().parse::<Zone>().unwrap(), *zone);
        }
    }

    #[test]
    fn test_zone_parse_is_case_insensitive() {
        assert_eq!("dom".parse::<Zone>().unwrap(), Zone::Dom);
        assert_eq!("pjme".parse::<Zone>().unwrap(), Zone::Pjme);
    }

    #[test]
    fn test_unknown_zone_is_rejected() {
        let err = "ERCOT".parse::<Zone>().unwrap_err();
        assert!(matches!(err, Error::UnknownZone { .. }));
    }

    #[test]
    fn test_model_selector_closed_set() {
        assert_eq!("cnn".parse::<ModelKind>().unwrap(), ModelKind::Cnn);
        assert_eq!("LSTM".parse::<ModelKind>().unwrap(), ModelKind::Lstm);
        assert!(matches!(
            "transformer".parse::<ModelKind>(),
            Err(Error::UnknownModel { .. })
        ));
    }

    #[test]
    fn test_checkpoint_filename_concatenates_selector_and_zone() {
        assert_eq!(
            ModelKind::Lstm.checkpoint_filename(Zone::Dom),
            "lstmDOM.hdf5"
        );
    }

    #[test]
    fn test_feature_series_rejects_length_mismatch() {
        let frame = df!("DOM" => [1.0f64, 2.0]).unwrap();
        let result = FeatureSeries::new(chrono_tz::UTC, vec![0], frame);
        assert!(matches!(result, Err(Error::DataValidation { .. })));
    }

    #[test]
    fn test_feature_series_rows_are_row_major() {
        let frame = df!(
            "DOM" => [1.0f64, 2.0, 3.0],
            "hour" => [0.0f64, 1.0, 2.0],
        )
        .unwrap();
        let series = FeatureSeries::new(chrono_tz::UTC, vec![0, 3600, 7200], frame).unwrap();
        let rows = series.rows().unwrap();
        assert_eq!(rows, vec![
            vec![1.0, 0.0],
            vec![2.0, 1.0],
            vec![3.0, 2.0]
        ]);
    }

    #[test]
    fn test_feature_series_slice_preserves_alignment() {
        let frame = df!("DOM" => [1.0f64, 2.0, 3.0, 4.0]).unwrap();
        let series =
            FeatureSeries::new(chrono_tz::UTC, vec![0, 3600, 7200, 10800], frame).unwrap();
        let sliced = series.slice(1, 2);
        assert_eq!(sliced.timestamps(), &[3600, 7200]);
        assert_eq!(sliced.column_values("DOM").unwrap(), vec![2.0, 3.0]);
    }
}
