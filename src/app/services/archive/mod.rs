//! Raw archive verification and extraction
//!
//! This module guards the front door of the pipeline: nothing downstream runs
//! until the raw archive on disk has been fingerprinted against the configured
//! reference value and passed a structural self-check.
//!
//! The module is organized into logical components:
//! - [`fingerprint`] - Archive fingerprint computation and verification
//! - [`extractor`] - Idempotent extraction and localized loading of the
//!   canonical hourly-load parquet

pub mod extractor;
pub mod fingerprint;

pub use extractor::{DataExtractor, ExtractOutcome};
pub use fingerprint::{compute_fingerprint, self_check, verify};

#[cfg(test)]
mod tests;
