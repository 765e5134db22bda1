//! Model-runner boundary
//!
//! The pipeline ends where model training begins. This module defines the
//! hand-off contract: what a trained-model collaborator receives and the
//! interface it is expected to expose back. Network architecture, optimizer
//! behavior, and the training loop live entirely on the collaborator's side.

use crate::app::models::{ModelKind, WindowedBatch, WindowedExample};
use crate::app::services::preprocessing::MinMaxScaler;
use crate::config::{ForecastOptions, TrainingOptions};
use crate::Result;
use std::path::{Path, PathBuf};

/// Everything the model runner receives besides the batch streams
///
/// Batch streams are passed separately as iterators so the hand-off stays
/// lazy; this struct carries the fitted inverse transform, the input tensor
/// shape, and the passthrough training settings the core never interprets.
#[derive(Debug, Clone)]
pub struct ModelHandoff {
    /// Validated architecture selector
    pub kind: ModelKind,

    /// (window, features) shape of each example's input
    pub input_shape: (usize, usize),

    /// Fitted transform for mapping predictions back to megawatts, when
    /// scaling was applied
    pub scaler: Option<MinMaxScaler>,

    /// Training-loop settings carried through unchanged
    pub training: TrainingOptions,

    /// Where the runner is expected to write best-validation-loss weights
    pub checkpoint_path: PathBuf,
}

impl ModelHandoff {
    /// Assemble the hand-off record for a prepared run
    pub fn new(
        options: &ForecastOptions,
        input_shape: (usize, usize),
        scaler: Option<MinMaxScaler>,
    ) -> Self {
        Self {
            kind: options.model,
            input_shape,
            scaler,
            training: options.training.clone(),
            checkpoint_path: options
                .out_dir
                .join(options.model.checkpoint_filename(options.zone)),
        }
    }
}

/// Interface a trained-model collaborator exposes to the pipeline
///
/// Implementations live outside this crate; the pipeline only relies on
/// being able to fit against windowed batch streams, predict over a single
/// example, and locate the checkpoint weights.
pub trait ForecastModel {
    /// Train against the windowed training stream, validating against the
    /// windowed test stream
    fn fit<T, V>(&mut self, train: T, validation: V) -> Result<()>
    where
        T: Iterator<Item = WindowedBatch>,
        V: Iterator<Item = WindowedBatch>;

    /// Predict the forecast horizon for one input window
    fn predict(&self, example: &WindowedExample) -> Result<Vec<f64>>;

    /// Path of the best-weights checkpoint
    fn checkpoint_path(&self) -> &Path;
}
