//! Sliding-window dataset generation for time series models
//!
//! Converts a flat chronological series into (input window, forecast
//! horizon) pairs, optionally shuffles pair order through a bounded
//! reservoir, and groups pairs into batches.
//!
//! The module is organized into logical components:
//! - [`generator`] - Window slicing and batch grouping iterators
//! - [`shuffle`] - Bounded-memory reservoir shuffle
//!
//! One generator covers the whole behavior space. Its two axes are
//! orthogonal: whether a shuffle buffer is configured, and whether the
//! series carries more than one feature column. The target is always the
//! leading column, so univariate and multivariate series share one
//! extraction path.

pub mod generator;
pub mod shuffle;

pub use generator::{BatchIter, ExampleIter};
pub use shuffle::ReservoirShuffle;

#[cfg(test)]
mod tests;

use crate::app::models::WindowedBatch;
use crate::config::WindowOptions;
use crate::{Error, Result};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::debug;

/// Validated windowing parameters
///
/// The only way to build one is [`WindowConfig::new`], which rejects any
/// option below 1 and reports every offending option, not just the first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowConfig {
    window: usize,
    horizon: usize,
    batch_size: usize,
    shuffle_buffer: Option<usize>,
}

impl WindowConfig {
    /// Validate raw options into a usable configuration
    pub fn new(options: &WindowOptions) -> Result<Self> {
        let mut entries: Vec<(&'static str, i64)> = Vec::new();
        if options.window < 1 {
            entries.push(("window", options.window));
        }
        if options.horizon < 1 {
            entries.push(("horizon", options.horizon));
        }
        if options.batch_size < 1 {
            entries.push(("batch_size", options.batch_size));
        }
        if let Some(size) = options.shuffle_buffer_size {
            if size < 1 {
                entries.push(("shuffle_buffer_size", size));
            }
        }
        if !entries.is_empty() {
            return Err(Error::InvalidWindowOptions { entries });
        }

        Ok(Self {
            window: options.window as usize,
            horizon: options.horizon as usize,
            batch_size: options.batch_size as usize,
            shuffle_buffer: options.shuffle_buffer_size.map(|size| size as usize),
        })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn shuffle_buffer(&self) -> Option<usize> {
        self.shuffle_buffer
    }

    /// Combined slice length: lag window plus forecast horizon
    pub fn total_len(&self) -> usize {
        self.window + self.horizon
    }
}

/// Produces windowed, batched example streams from a flat series
#[derive(Debug, Clone)]
pub struct WindowGenerator {
    config: WindowConfig,
    feature_count: usize,
    seed: Option<u64>,
}

impl WindowGenerator {
    /// Create a generator for a series with the given feature column count
    pub fn new(config: WindowConfig, feature_count: usize) -> Self {
        Self {
            config,
            feature_count,
            seed: None,
        }
    }

    /// Fix the shuffle RNG seed (deterministic example order across runs)
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Whether windowed inputs carry more than one feature column
    pub fn multivariate(&self) -> bool {
        self.feature_count > 1
    }

    /// The (window, features) shape of every example's input
    pub fn input_shape(&self) -> (usize, usize) {
        (self.config.window(), self.feature_count)
    }

    /// Number of examples a series of `series_len` rows yields
    ///
    /// `max(0, len - window - horizon + 1)`: the trailing remainder shorter
    /// than a full slice is dropped.
    pub fn example_count(&self, series_len: usize) -> usize {
        series_len.saturating_sub(self.config.total_len() - 1)
    }

    /// Number of batches a series of `series_len` rows yields
    ///
    /// The final partial batch is retained, unlike the windowing remainder.
    pub fn batch_count(&self, series_len: usize) -> usize {
        self.example_count(series_len)
            .div_ceil(self.config.batch_size())
    }

    /// Lazily produce windowed batches over the given rows
    ///
    /// The source is traversed exactly once; batches materialize only as the
    /// returned iterator is advanced. Shuffling, when configured, permutes
    /// example order only; the rows inside any example stay contiguous and
    /// chronological.
    pub fn make_windows<'a>(
        &self,
        rows: &'a [Vec<f64>],
    ) -> Box<dyn Iterator<Item = WindowedBatch> + 'a> {
        let examples = ExampleIter::new(rows, self.config.window(), self.config.horizon());
        debug!(
            "Windowing {} rows: {} examples expected ({}, {})",
            rows.len(),
            self.example_count(rows.len()),
            if self.config.shuffle_buffer().is_some() {
                "shuffled"
            } else {
                "chronological"
            },
            if self.multivariate() {
                "multivariate"
            } else {
                "univariate"
            },
        );

        match self.config.shuffle_buffer() {
            Some(capacity) => {
                let rng = match self.seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                let shuffled = ReservoirShuffle::new(examples, capacity, rng);
                Box::new(BatchIter::new(shuffled, self.config.batch_size()))
            }
            None => Box::new(BatchIter::new(examples, self.config.batch_size())),
        }
    }
}
