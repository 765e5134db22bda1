//! Tests for the preprocessing stages


use crate::app::models::FeatureSeries;
use chrono_tz::Tz;
use polars::prelude::*;

/// Build a single-column load series with hourly timestamps from epoch zero
pub fn load_series(values: &[f64]) -> FeatureSeries {
    load_series_in(chrono_tz::UTC, values)
}

/// Build a single-column load series in a specific time zone
pub fn load_series_in(tz: Tz, values: &[f64]) -> FeatureSeries {
    let timestamps: Vec<i64> = (0..values.len() as i64).map(|h| h * 3600).collect();
    let frame = DataFrame::new(vec![Column::new("DOM".into(), values.to_vec())]).unwrap();
    FeatureSeries::new(tz, timestamps, frame).unwrap()
}
