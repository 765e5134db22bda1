//! Bounded-memory reservoir shuffle
//!
//! Approximates a full shuffle while holding at most `capacity` items: the
//! reservoir fills from the source, then each pull emits a uniformly random
//! occupant and backfills from the source until it runs dry. Buffer size
//! trades randomness quality against memory; a capacity of 1 degenerates to
//! pass-through order.

use rand::Rng;
use rand::rngs::StdRng;

/// Shuffles an iterator's item order through a bounded reservoir
#[derive(Debug)]
pub struct ReservoirShuffle<I: Iterator> {
    inner: I,
    buffer: Vec<I::Item>,
    capacity: usize,
    rng: StdRng,
    primed: bool,
}

impl<I: Iterator> ReservoirShuffle<I> {
    pub fn new(inner: I, capacity: usize, rng: StdRng) -> Self {
        Self {
            inner,
            buffer: Vec::with_capacity(capacity.min(1024)),
            capacity,
            rng,
            primed: false,
        }
    }
}

impl<I: Iterator> Iterator for ReservoirShuffle<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        if !self.primed {
            while self.buffer.len() < self.capacity {
                match self.inner.next() {
                    Some(item) => self.buffer.push(item),
                    None => break,
                }
            }
            self.primed = true;
        }

        if self.buffer.is_empty() {
            return None;
        }

        let index = self.rng.gen_range(0..self.buffer.len());
        match self.inner.next() {
            Some(replacement) => Some(std::mem::replace(&mut self.buffer[index], replacement)),
            None => Some(self.buffer.swap_remove(index)),
        }
    }
}
