//! Tests for window generation, batching, and shuffling

pub mod options_tests;
pub mod shuffle_tests;

use crate::app::models::WindowedExample;
use crate::config::WindowOptions;

/// Univariate rows [0], [1], ... [n-1]
pub fn univariate_rows(n: usize) -> Vec<Vec<f64>> {
    (0..n).map(|i| vec![i as f64]).collect()
}

/// Two-column rows [v, 100 + v]
pub fn multivariate_rows(n: usize) -> Vec<Vec<f64>> {
    (0..n).map(|i| vec![i as f64, 100.0 + i as f64]).collect()
}

/// Windowing options without shuffling
pub fn options(window: i64, horizon: i64, batch_size: i64) -> WindowOptions {
    WindowOptions {
        window,
        horizon,
        batch_size,
        shuffle_buffer_size: None,
    }
}

/// Check that an example is a contiguous slice of the source rows
///
/// Inputs must match `window` consecutive source rows and targets the next
/// `horizon` leading-column values, regardless of where shuffling moved the
/// example in the stream.
pub fn is_contiguous_slice(example: &WindowedExample, rows: &[Vec<f64>]) -> bool {
    let window = example.inputs.len();
    let start = example.inputs[0][0] as usize;
    if start + window + example.targets.len() > rows.len() {
        return false;
    }
    let inputs_match = example
        .inputs
        .iter()
        .zip(&rows[start..start + window])
        .all(|(actual, expected)| actual == expected);
    let targets_match = example
        .targets
        .iter()
        .zip(&rows[start + window..])
        .all(|(actual, expected)| *actual == expected[0]);
    inputs_match && targets_match
}
