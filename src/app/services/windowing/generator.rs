//! Window slicing and batch grouping iterators

use crate::app::models::{WindowedBatch, WindowedExample};

/// Slides a `window + horizon` slice across the rows with stride 1
///
/// Each slice splits into an input of the first `window` rows (all columns)
/// and a target of the last `horizon` rows reduced to the leading column —
/// the target column always leads the frame, so a univariate series is just
/// the single-column case of the same extraction.
#[derive(Debug, Clone)]
pub struct ExampleIter<'a> {
    rows: &'a [Vec<f64>],
    window: usize,
    horizon: usize,
    pos: usize,
}

impl<'a> ExampleIter<'a> {
    pub fn new(rows: &'a [Vec<f64>], window: usize, horizon: usize) -> Self {
        Self {
            rows,
            window,
            horizon,
            pos: 0,
        }
    }
}

impl Iterator for ExampleIter<'_> {
    type Item = WindowedExample;

    fn next(&mut self) -> Option<Self::Item> {
        let total = self.window + self.horizon;
        if self.pos + total > self.rows.len() {
            // trailing remainder shorter than a full slice is dropped
            return None;
        }

        let slice = &self.rows[self.pos..self.pos + total];
        let inputs = slice[..self.window].to_vec();
        let targets = slice[self.window..].iter().map(|row| row[0]).collect();
        self.pos += 1;

        Some(WindowedExample { inputs, targets })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let total = self.window + self.horizon;
        let remaining = self
            .rows
            .len()
            .saturating_sub(self.pos)
            .saturating_sub(total - 1);
        (remaining, Some(remaining))
    }
}

/// Groups consecutive examples into batches of a fixed size
///
/// The final batch keeps whatever remains, so no examples are lost to
/// batching.
#[derive(Debug, Clone)]
pub struct BatchIter<I> {
    examples: I,
    batch_size: usize,
}

impl<I> BatchIter<I> {
    pub fn new(examples: I, batch_size: usize) -> Self {
        Self {
            examples,
            batch_size,
        }
    }
}

impl<I> Iterator for BatchIter<I>
where
    I: Iterator<Item = WindowedExample>,
{
    type Item = WindowedBatch;

    fn next(&mut self) -> Option<Self::Item> {
        let mut examples = Vec::with_capacity(self.batch_size);
        while examples.len() < self.batch_size {
            match self.examples.next() {
                Some(example) => examples.push(example),
                None => break,
            }
        }
        if examples.is_empty() {
            None
        } else {
            Some(WindowedBatch { examples })
        }
    }
}
