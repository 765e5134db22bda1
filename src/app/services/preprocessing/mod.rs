//! Preprocessing stages between raw load data and windowed examples
//!
//! The module is organized into logical components:
//! - [`localize`] - Naive-to-zoned timestamp resolution with explicit DST
//!   fold/gap policies
//! - [`features`] - Calendar and cyclical feature derivation
//! - [`scaler`] - Min-max scaling of the target column with a retained
//!   inverse transform
//! - [`splitter`] - Chronological train/test partitioning
//!
//! Every stage reads its input immutably and returns a new series; the
//! scaler in particular rewrites the target column on a private copy rather
//! than aliasing the caller's frame.

pub mod features;
pub mod localize;
pub mod scaler;
pub mod splitter;

pub use features::add_features;
pub use scaler::{MinMaxScaler, fit_transform};
pub use splitter::train_test_split;

#[cfg(test)]
mod tests;
