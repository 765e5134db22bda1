//! Min-max scaling of the target column
//!
//! The transform is fitted over whatever series it is handed. In the
//! standard pipeline that is the full series before the train/test split,
//! which lets test-set extrema influence the scale; this mirrors the
//! upstream behavior and is deliberately left unchanged. See DESIGN.md.

use crate::app::models::FeatureSeries;
use crate::{Error, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A fitted min-max transform over one column
///
/// Maps the observed `[data_min, data_max]` range onto `[0, 1]` and retains
/// the parameters so predictions can be mapped back for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    data_min: f64,
    data_max: f64,
}

impl MinMaxScaler {
    /// Fit the transform on observed values, ignoring NaN gaps
    pub fn fit(values: &[f64]) -> Result<Self> {
        let mut data_min = f64::INFINITY;
        let mut data_max = f64::NEG_INFINITY;
        for &value in values.iter().filter(|v| !v.is_nan()) {
            data_min = data_min.min(value);
            data_max = data_max.max(value);
        }
        if !data_min.is_finite() || !data_max.is_finite() {
            return Err(Error::data_validation(
                "cannot fit min-max scaler: no finite values in target column",
            ));
        }
        Ok(Self { data_min, data_max })
    }

    /// Map a value into the fitted [0, 1] range
    ///
    /// A constant column maps to 0.0. NaN passes through.
    pub fn transform(&self, value: f64) -> f64 {
        let range = self.data_max - self.data_min;
        if range == 0.0 {
            if value.is_nan() { value } else { 0.0 }
        } else {
            (value - self.data_min) / range
        }
    }

    /// Map a scaled value back to the original scale
    pub fn inverse_transform(&self, value: f64) -> f64 {
        value * (self.data_max - self.data_min) + self.data_min
    }

    pub fn data_min(&self) -> f64 {
        self.data_min
    }

    pub fn data_max(&self) -> f64 {
        self.data_max
    }
}

/// Fit on the target column and return the scaled series plus the transform
///
/// Only the target column is rewritten; feature columns pass through
/// untouched. The rewrite happens on a private copy of the frame.
pub fn fit_transform(
    series: &FeatureSeries,
    target_column: &str,
) -> Result<(FeatureSeries, MinMaxScaler)> {
    let values = series.column_values(target_column)?;
    let scaler = MinMaxScaler::fit(&values)?;

    let scaled: Vec<f64> = values.iter().map(|&v| scaler.transform(v)).collect();

    let mut frame = series.frame().clone();
    frame.with_column(Column::new(target_column.into(), scaled))?;

    debug!(
        "Scaled column '{}' from [{}, {}] into [0, 1]",
        target_column,
        scaler.data_min(),
        scaler.data_max()
    );

    let scaled_series = FeatureSeries::new(series.tz(), series.timestamps().to_vec(), frame)?;
    Ok((scaled_series, scaler))
}
