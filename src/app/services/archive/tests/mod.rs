//! Tests for archive verification and extraction


use crate::config::{DateSpec, ForecastOptions, TrainTestDates};
use crate::constants::{ARCHIVE_FILENAME, ARCHIVE_PARQUET_ENTRY, TIMESTAMP_COLUMN};
use chrono::NaiveDate;
use polars::prelude::*;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use ::zip::ZipWriter;
use ::zip::write::SimpleFileOptions;

/// Write a zip archive with the given (name, content) entries
pub fn write_archive(dir: &Path, entries: &[(&str, &[u8])]) -> PathBuf {
    let path = dir.join(ARCHIVE_FILENAME);
    let mut writer = ZipWriter::new(File::create(&path).unwrap());
    for (name, bytes) in entries {
        writer
            .start_file(*name, SimpleFileOptions::default())
            .unwrap();
        writer.write_all(bytes).unwrap();
    }
    writer.finish().unwrap();
    path
}

/// Build an hourly load frame starting 2012-01-01 00:00 with DOM and PJME columns
pub fn hourly_frame(hours: usize) -> DataFrame {
    let start = NaiveDate::from_ymd_opt(2012, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let micros: Vec<i64> = (0..hours)
        .map(|h| (start + chrono::Duration::hours(h as i64)).and_utc().timestamp_micros())
        .collect();
    let dom: Vec<f64> = (0..hours).map(|h| 10_000.0 + h as f64).collect();
    let pjme: Vec<f64> = (0..hours).map(|h| 30_000.0 + 2.0 * h as f64).collect();

    let datetime = Column::new(TIMESTAMP_COLUMN.into(), micros)
        .cast(&DataType::Datetime(TimeUnit::Microseconds, None))
        .unwrap();
    DataFrame::new(vec![
        datetime,
        Column::new("DOM".into(), dom),
        Column::new("PJME".into(), pjme),
    ])
    .unwrap()
}

/// Serialize an hourly frame to parquet bytes for embedding in an archive
pub fn hourly_parquet_bytes(hours: usize) -> Vec<u8> {
    let mut frame = hourly_frame(hours);
    let mut buffer = Vec::new();
    ParquetWriter::new(&mut buffer).finish(&mut frame).unwrap();
    buffer
}

/// Write an archive containing an hourly parquet under the mis-spelled entry name
pub fn write_data_archive(dir: &Path, hours: usize) -> PathBuf {
    let parquet = hourly_parquet_bytes(hours);
    write_archive(dir, &[
        (ARCHIVE_PARQUET_ENTRY, parquet.as_slice()),
        ("DOM_hourly.csv", b"Datetime,DOM\n"),
    ])
}

/// Forecast options pointed at a test data directory, covering the synthetic range
pub fn test_options(data_dir: &Path) -> ForecastOptions {
    let mut options = ForecastOptions::default().with_data_dir(data_dir);
    options.dates = TrainTestDates {
        start: DateSpec::new(2012, 1, 1, 0),
        end: DateSpec::new(2012, 12, 31, 23),
    };
    options
}
