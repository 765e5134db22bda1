//! Command-line argument definitions for the PJM forecaster
//!
//! This module defines the complete CLI interface using the clap derive API.
//! Arguments only override the built-in defaults; the assembled
//! [`ForecastOptions`] value is what the pipeline stages actually consume.

use crate::app::models::{FeatureKind, ModelKind, Zone};
use crate::config::ForecastOptions;
use crate::{Error, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;

/// CLI arguments for the PJM load forecaster
///
/// Prepares hourly PJM electrical load data for neural-network forecasting:
/// archive verification, extraction, feature engineering, scaling, splitting,
/// and sliding-window dataset generation.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "pjm-forecaster",
    version,
    about = "Prepare hourly PJM load data for neural forecast models",
    long_about = "Prepares hourly PJM electrical load data for neural-network forecasting. \
                  Verifies the raw Kaggle archive against a reference fingerprint, extracts \
                  the canonical parquet, derives calendar/cyclical features, scales and splits \
                  the series, and generates windowed training/test datasets for the model runner."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands for the PJM forecaster
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Run the full preparation pipeline up to the model-runner boundary
    Process(ProcessArgs),
    /// Verify the raw archive against the reference fingerprint and exit
    Verify(VerifyArgs),
}

/// Arguments for the process command (main preparation pipeline)
#[derive(Debug, Clone, Parser)]
pub struct ProcessArgs {
    /// Data directory holding the raw archive
    ///
    /// Must contain hourly-energy-consumption.zip. The canonical parquet is
    /// extracted next to it. If not specified, a per-platform application
    /// data directory is used.
    #[arg(
        short = 'i',
        long = "data",
        value_name = "PATH",
        help = "Directory holding the raw archive and extracted parquet"
    )]
    pub data_dir: Option<PathBuf>,

    /// Output directory for model artifacts
    ///
    /// The model runner writes checkpoint weights here. Created if missing.
    #[arg(
        short = 'o',
        long = "out",
        value_name = "PATH",
        help = "Output directory for model artifacts"
    )]
    pub out_dir: Option<PathBuf>,

    /// Grid zone to forecast
    ///
    /// One of: AEP, COMED, DAYTON, DEOK, DOM, DUQ, EKPC, FE, NI, PJME, PJMW,
    /// PJM_Load. Defaults to DOM.
    #[arg(short = 'z', long = "zone", value_name = "ZONE", help = "Grid zone to forecast")]
    pub zone: Option<String>,

    /// Model architecture selector passed to the model runner
    ///
    /// One of: cnn, lstm. Validated here; interpreted by the model runner.
    #[arg(short = 'm', long = "model", value_name = "MODEL", help = "Model selector (cnn or lstm)")]
    pub model: Option<String>,

    /// Fraction of rows assigned to the training partition
    #[arg(
        long = "train-fraction",
        value_name = "FRACTION",
        help = "Training fraction, strictly between 0 and 1"
    )]
    pub train_fraction: Option<f64>,

    /// Lag window length in hourly intervals
    #[arg(long = "window", value_name = "HOURS", help = "Lag window length in hours")]
    pub window: Option<i64>,

    /// Forecast horizon length in hourly intervals
    #[arg(long = "horizon", value_name = "HOURS", help = "Forecast horizon length in hours")]
    pub horizon: Option<i64>,

    /// Examples per training batch
    #[arg(long = "batch-size", value_name = "N", help = "Examples per batch")]
    pub batch_size: Option<i64>,

    /// Reservoir size for shuffling windowed examples
    #[arg(
        long = "shuffle-buffer",
        value_name = "N",
        help = "Shuffle reservoir size",
        conflicts_with = "no_shuffle"
    )]
    pub shuffle_buffer: Option<i64>,

    /// Disable example shuffling entirely
    #[arg(long = "no-shuffle", help = "Emit windowed examples in chronological order")]
    pub no_shuffle: bool,

    /// Disable min-max scaling of the target column
    #[arg(long = "no-scale", help = "Skip min-max scaling of the target column")]
    pub no_scale: bool,

    /// Additional feature columns to append (comma-separated list)
    ///
    /// Available features: sin_day, cos_day, sin_year, cos_year, weekend,
    /// dayofweek, hour, dayofyear. If not specified, only the load column is
    /// used.
    #[arg(
        short = 'f',
        long = "features",
        value_name = "LIST",
        help = "Comma-separated list of additional feature columns"
    )]
    pub features: Option<FeatureList>,

    /// Fix the shuffle RNG seed for reproducible example order
    #[arg(long = "seed", value_name = "SEED", help = "Shuffle RNG seed")]
    pub seed: Option<u64>,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the verify command (integrity check only)
#[derive(Debug, Clone, Parser)]
pub struct VerifyArgs {
    /// Data directory holding the raw archive
    #[arg(
        short = 'i',
        long = "data",
        value_name = "PATH",
        help = "Directory holding the raw archive"
    )]
    pub data_dir: Option<PathBuf>,

    /// Reference fingerprint to compare against
    ///
    /// Overrides the built-in reference value. Useful after regenerating the
    /// reference from a known-good archive.
    #[arg(
        long = "reference",
        value_name = "FINGERPRINT",
        help = "Expected archive fingerprint (overrides the built-in value)"
    )]
    pub reference: Option<String>,

    /// Increase logging verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress output except errors
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Comma-separated feature list parsed into the closed feature set
#[derive(Debug, Clone)]
pub struct FeatureList {
    pub features: Vec<FeatureKind>,
}

impl FromStr for FeatureList {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let features = s
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(FeatureKind::from_str)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { features })
    }
}

impl Args {
    /// Get the command if one was specified
    pub fn get_command(&self) -> Option<Commands> {
        self.command.clone()
    }
}

impl ProcessArgs {
    /// Validate the process command arguments for consistency
    ///
    /// Windowing numerics are deliberately not checked here; the window
    /// generator's own validation reports every offending option at once.
    pub fn validate(&self) -> Result<()> {
        if let Some(data_dir) = &self.data_dir {
            if !data_dir.exists() {
                return Err(Error::configuration(format!(
                    "Data directory does not exist: {}",
                    data_dir.display()
                )));
            }
            if !data_dir.is_dir() {
                return Err(Error::configuration(format!(
                    "Data path is not a directory: {}",
                    data_dir.display()
                )));
            }
        }
        Ok(())
    }

    /// Assemble forecast options from defaults plus CLI overrides
    pub fn to_options(&self) -> Result<ForecastOptions> {
        let mut options = ForecastOptions::default();

        if let Some(data_dir) = &self.data_dir {
            options.data_dir = data_dir.clone();
        }
        if let Some(out_dir) = &self.out_dir {
            options.out_dir = out_dir.clone();
        }
        if let Some(zone) = &self.zone {
            options.zone = Zone::from_str(zone)?;
        }
        if let Some(model) = &self.model {
            options.model = ModelKind::from_str(model)?;
        }
        if let Some(train_fraction) = self.train_fraction {
            options.train_fraction = train_fraction;
        }
        if let Some(window) = self.window {
            options.window.window = window;
        }
        if let Some(horizon) = self.horizon {
            options.window.horizon = horizon;
        }
        if let Some(batch_size) = self.batch_size {
            options.window.batch_size = batch_size;
        }
        if let Some(shuffle_buffer) = self.shuffle_buffer {
            options.window.shuffle_buffer_size = Some(shuffle_buffer);
        }
        if self.no_shuffle {
            options.window.shuffle_buffer_size = None;
        }
        if self.no_scale {
            options.min_max_scale = false;
        }
        if let Some(features) = &self.features {
            options.additional_features = features.features.clone();
        }

        Ok(options)
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars (not in quiet mode)
    pub fn show_progress(&self) -> bool {
        !self.quiet
    }
}

impl VerifyArgs {
    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feature_list_parsing() {
        let list: FeatureList = "sin_day, hour,dayofyear".parse().unwrap();
        assert_eq!(list.features, vec![
            FeatureKind::SinDay,
            FeatureKind::Hour,
            FeatureKind::Dayofyear
        ]);
    }

    #[test]
    fn test_feature_list_rejects_unknown_names() {
        assert!("sin_day,month".parse::<FeatureList>().is_err());
    }

    #[test]
    fn test_to_options_applies_overrides() {
        let args = Args::parse_from([
            "pjm-forecaster",
            "process",
            "--zone",
            "PJME",
            "--model",
            "cnn",
            "--window",
            "48",
            "--no-shuffle",
            "--no-scale",
        ]);
        let Some(Commands::Process(process_args)) = args.get_command() else {
            panic!("expected process command");
        };

        let options = process_args.to_options().unwrap();
        assert_eq!(options.zone, Zone::Pjme);
        assert_eq!(options.model, ModelKind::Cnn);
        assert_eq!(options.window.window, 48);
        assert_eq!(options.window.shuffle_buffer_size, None);
        assert!(!options.min_max_scale);
    }

    #[test]
    fn test_to_options_rejects_unknown_zone() {
        let args = ProcessArgs {
            data_dir: None,
            out_dir: None,
            zone: Some("ERCOT".to_string()),
            model: None,
            train_fraction: None,
            window: None,
            horizon: None,
            batch_size: None,
            shuffle_buffer: None,
            no_shuffle: false,
            no_scale: false,
            features: None,
            seed: None,
            verbose: 0,
            quiet: false,
        };
        assert!(matches!(
            args.to_options(),
            Err(Error::UnknownZone { .. })
        ));
    }

    #[test]
    fn test_log_level_mapping() {
        let mut args = ProcessArgs::parse_from(["process"]);
        assert_eq!(args.get_log_level(), "warn");
        args.verbose = 2;
        assert_eq!(args.get_log_level(), "debug");
        args.verbose = 0;
        args.quiet = true;
        assert_eq!(args.get_log_level(), "error");
    }
}
