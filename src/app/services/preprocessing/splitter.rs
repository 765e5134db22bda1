//! Chronological train/test partitioning
//!
//! Time series splits never shuffle: the training partition is strictly
//! earlier than the test partition and both preserve row order, so no test
//! information leaks backward across the boundary.

use crate::app::models::FeatureSeries;
use tracing::debug;

/// Split a series into contiguous train and test partitions
///
/// The cut index is `floor(len * train_fraction)`; train takes `[0, cut)`
/// and test takes `[cut, len)`. Degenerate fractions produce one empty
/// partition rather than an error.
pub fn train_test_split(
    series: &FeatureSeries,
    train_fraction: f64,
) -> (FeatureSeries, FeatureSeries) {
    let len = series.len();
    let cut = ((len as f64) * train_fraction).floor() as usize;
    let cut = cut.min(len);

    let train = series.slice(0, cut);
    let test = series.slice(cut, len - cut);

    debug!(
        "Split {} rows at index {}: {} train, {} test",
        len,
        cut,
        train.len(),
        test.len()
    );
    (train, test)
}
