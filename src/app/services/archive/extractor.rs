//! Idempotent extraction and loading of the canonical hourly-load parquet
//!
//! Extraction unpacks the combined parquet out of the validated archive and
//! renames it from its mis-spelled archive-internal name to the canonical
//! filename. Loading localizes the naive datetime index to the configured
//! market time zone, restricts to the configured date range, and hands back
//! the target zone column plus any configured feature columns.

use crate::app::models::FeatureSeries;
use crate::app::services::preprocessing::features::add_features;
use crate::app::services::preprocessing::localize::{localize_bound, localize_naive};
use crate::config::ForecastOptions;
use crate::constants::{
    ARCHIVE_FILENAME, ARCHIVE_PARQUET_ENTRY, CANONICAL_PARQUET_FILENAME, TIMESTAMP_COLUMN,
    UNNAMED_INDEX_COLUMN,
};
use crate::{Error, Result};
use chrono::{DateTime, NaiveDateTime};
use polars::prelude::*;
use std::fs::File;
use std::path::PathBuf;
use tracing::{debug, info, warn};
use ::zip::ZipArchive;

use super::fingerprint;

/// Result of an extraction attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractOutcome {
    /// The canonical parquet was already present; nothing was touched
    AlreadyExtracted,
    /// The archive was verified and the canonical parquet written
    Extracted,
}

/// Extracts and loads the canonical hourly-load dataset
#[derive(Debug, Clone)]
pub struct DataExtractor {
    data_dir: PathBuf,
    reference_fingerprint: String,
}

impl DataExtractor {
    /// Create an extractor bound to the configured data directory
    pub fn new(options: &ForecastOptions) -> Self {
        Self {
            data_dir: options.data_dir.clone(),
            reference_fingerprint: options.reference_fingerprint.clone(),
        }
    }

    /// Path to the raw archive
    pub fn archive_path(&self) -> PathBuf {
        self.data_dir.join(ARCHIVE_FILENAME)
    }

    /// Path the canonical parquet is extracted to
    pub fn canonical_path(&self) -> PathBuf {
        self.data_dir.join(CANONICAL_PARQUET_FILENAME)
    }

    /// Extract the canonical parquet from the archive if not already present
    ///
    /// Idempotent: an existing canonical file short-circuits before any
    /// archive access. Otherwise the archive must pass fingerprint
    /// verification and its structural self-check before the entry is
    /// unpacked and renamed.
    pub fn extract(&self) -> Result<ExtractOutcome> {
        let canonical = self.canonical_path();
        if canonical.exists() {
            debug!(
                "Canonical parquet already present at '{}', skipping extraction",
                canonical.display()
            );
            return Ok(ExtractOutcome::AlreadyExtracted);
        }

        let archive_path = self.archive_path();
        fingerprint::verify(&archive_path, &self.reference_fingerprint)?;
        fingerprint::self_check(&archive_path)?;

        let file = File::open(&archive_path).map_err(|e| {
            Error::io(format!("cannot open archive '{}'", archive_path.display()), e)
        })?;
        let mut archive = ZipArchive::new(file)?;

        let staged = self.data_dir.join(ARCHIVE_PARQUET_ENTRY);
        {
            let mut entry = archive.by_name(ARCHIVE_PARQUET_ENTRY).map_err(|e| {
                Error::archive_corrupt(format!(
                    "canonical entry '{ARCHIVE_PARQUET_ENTRY}' missing from archive: {e}"
                ))
            })?;
            let mut out = File::create(&staged)
                .map_err(|e| Error::io(format!("cannot create '{}'", staged.display()), e))?;
            std::io::copy(&mut entry, &mut out)
                .map_err(|e| Error::io("failed writing canonical parquet", e))?;
        }

        // the entry name is mis-spelled upstream; fix it on the way out
        std::fs::rename(&staged, &canonical)
            .map_err(|e| Error::io("failed renaming canonical parquet", e))?;

        info!("Extracted canonical parquet to '{}'", canonical.display());
        Ok(ExtractOutcome::Extracted)
    }

    /// Load the configured zone's series, localized and range-restricted
    ///
    /// A missing canonical parquet is not an error: a warning is emitted and
    /// an empty series returned so the caller can decide how to proceed.
    pub fn load(&self, options: &ForecastOptions) -> Result<FeatureSeries> {
        let tz = options.timezone.tz()?;

        let canonical = self.canonical_path();
        if !canonical.exists() {
            warn!(
                "Nothing was loaded: canonical parquet not found at '{}'. \
                 Run extraction to create it.",
                canonical.display()
            );
            return Ok(FeatureSeries::empty(tz));
        }

        let file = File::open(&canonical)
            .map_err(|e| Error::io(format!("cannot open '{}'", canonical.display()), e))?;
        let frame = ParquetReader::new(file).finish()?;
        debug!(
            "Loaded canonical parquet: {} rows x {} columns",
            frame.height(),
            frame.width()
        );

        let naive = naive_timestamps(&frame)?;

        let start = localize_bound(options.dates.start.to_naive()?, tz, &options.timezone)?;
        let end = localize_bound(options.dates.end.to_naive()?, tz, &options.timezone)?;
        let (start_epoch, end_epoch) = (start.timestamp(), end.timestamp());

        // localize each row, drop rows the policy resolves to nothing, and
        // keep those inside the inclusive bounds
        let mut keyed: Vec<(i64, u32)> = Vec::with_capacity(naive.len());
        for (index, naive_dt) in naive.iter().enumerate() {
            let localized = localize_naive(
                *naive_dt,
                tz,
                options.timezone.ambiguous,
                options.timezone.nonexistent,
            )?;
            if let Some(dt) = localized {
                let epoch = dt.timestamp();
                if epoch >= start_epoch && epoch <= end_epoch {
                    keyed.push((epoch, index as u32));
                }
            }
        }
        keyed.sort_by_key(|(epoch, _)| *epoch);

        let timestamps: Vec<i64> = keyed.iter().map(|(epoch, _)| *epoch).collect();
        let indices: Vec<u32> = keyed.iter().map(|(_, index)| *index).collect();
        let idx = IdxCa::from_vec("idx".into(), indices);
        let restricted = frame.take(&idx)?;

        let target = restricted.select([options.zone.as_str()])?;
        let mut series = FeatureSeries::new(tz, timestamps, target)?;

        if !options.additional_features.is_empty() {
            let augmented = add_features(&series)?;
            let mut columns = vec![options.zone.as_str()];
            columns.extend(options.additional_features.iter().map(|f| f.as_str()));
            series = augmented.select(&columns)?;
        }

        info!(
            "Loaded {} rows for zone {} ({} feature columns)",
            series.len(),
            options.zone,
            series.feature_count()
        );
        Ok(series)
    }
}

/// Read the naive datetime index column of the canonical parquet
///
/// pandas stores the index under its name when it has one and under a
/// generated name otherwise; both are accepted.
fn naive_timestamps(frame: &DataFrame) -> Result<Vec<NaiveDateTime>> {
    let column = frame
        .column(TIMESTAMP_COLUMN)
        .or_else(|_| frame.column(UNNAMED_INDEX_COLUMN))
        .map_err(|_| {
            Error::data_validation(format!(
                "canonical parquet has no '{TIMESTAMP_COLUMN}' datetime column"
            ))
        })?;

    let series = column.as_materialized_series();
    let divisor = match series.dtype() {
        DataType::Datetime(TimeUnit::Nanoseconds, _) => 1_000_000_000,
        DataType::Datetime(TimeUnit::Microseconds, _) => 1_000_000,
        DataType::Datetime(TimeUnit::Milliseconds, _) => 1_000,
        other => {
            return Err(Error::data_validation(format!(
                "index column has dtype {other:?}, expected a datetime"
            )));
        }
    };
    let physical = series.cast(&DataType::Int64)?;

    let mut naive = Vec::with_capacity(frame.height());
    for (row, value) in physical.i64()?.into_iter().enumerate() {
        let raw = value.ok_or_else(|| {
            Error::data_validation(format!("null timestamp at row {row} of canonical parquet"))
        })?;
        let seconds = raw.div_euclid(divisor);
        let datetime = DateTime::from_timestamp(seconds, 0).ok_or_else(|| {
            Error::data_validation(format!("out-of-range timestamp at row {row}"))
        })?;
        naive.push(datetime.naive_utc());
    }
    Ok(naive)
}
