//! Tests for the bounded reservoir shuffle

use super::*;
use crate::app::services::windowing::shuffle::ReservoirShuffle;
use crate::app::services::windowing::{WindowConfig, WindowGenerator};
use crate::config::WindowOptions;
use rand::SeedableRng;
use rand::rngs::StdRng;

fn shuffled_generator(buffer: i64, seed: u64) -> WindowGenerator {
    let config = WindowConfig::new(&WindowOptions {
        window: 5,
        horizon: 3,
        batch_size: 4,
        shuffle_buffer_size: Some(buffer),
    })
    .unwrap();
    WindowGenerator::new(config, 1).with_seed(seed)
}

#[test]
fn test_shuffle_emits_every_item_exactly_once() {
    let source: Vec<u32> = (0..100).collect();
    let rng = StdRng::seed_from_u64(7);
    let mut shuffled: Vec<u32> = ReservoirShuffle::new(source.iter().copied(), 10, rng).collect();

    assert_eq!(shuffled.len(), 100);
    shuffled.sort_unstable();
    assert_eq!(shuffled, source);
}

#[test]
fn test_capacity_one_degenerates_to_pass_through() {
    let source: Vec<u32> = (0..20).collect();
    let rng = StdRng::seed_from_u64(7);
    let shuffled: Vec<u32> = ReservoirShuffle::new(source.iter().copied(), 1, rng).collect();
    assert_eq!(shuffled, source);
}

#[test]
fn test_capacity_larger_than_source_still_drains_completely() {
    let source: Vec<u32> = (0..5).collect();
    let rng = StdRng::seed_from_u64(3);
    let mut shuffled: Vec<u32> = ReservoirShuffle::new(source.iter().copied(), 1000, rng).collect();
    shuffled.sort_unstable();
    assert_eq!(shuffled, source);
}

#[test]
fn test_empty_source_yields_nothing() {
    let rng = StdRng::seed_from_u64(3);
    let mut shuffled = ReservoirShuffle::new(std::iter::empty::<u32>(), 8, rng);
    assert!(shuffled.next().is_none());
}

#[test]
fn test_shuffle_actually_permutes_order() {
    let source: Vec<u32> = (0..200).collect();
    let rng = StdRng::seed_from_u64(42);
    let shuffled: Vec<u32> = ReservoirShuffle::new(source.iter().copied(), 50, rng).collect();
    assert_ne!(shuffled, source);
}

#[test]
fn test_shuffled_windows_preserve_intra_pair_order() {
    // shuffling permutes example order only; each example remains a
    // contiguous sub-slice of the source
    let rows = univariate_rows(60);
    let windows = shuffled_generator(16, 11);

    let mut seen = 0usize;
    for batch in windows.make_windows(&rows) {
        for example in &batch.examples {
            assert!(is_contiguous_slice(example, &rows));
            seen += 1;
        }
    }
    assert_eq!(seen, windows.example_count(rows.len()));
}

#[test]
fn test_shuffled_windows_cover_the_same_example_set() {
    let rows = univariate_rows(40);
    let windows = shuffled_generator(8, 5);

    let mut starts: Vec<usize> = windows
        .make_windows(&rows)
        .flat_map(|batch| {
            batch
                .examples
                .iter()
                .map(|example| example.inputs[0][0] as usize)
                .collect::<Vec<_>>()
        })
        .collect();
    starts.sort_unstable();

    let expected: Vec<usize> = (0..windows.example_count(rows.len())).collect();
    assert_eq!(starts, expected);
}

#[test]
fn test_seeded_shuffle_is_reproducible() {
    let rows = univariate_rows(50);

    let order = |seed: u64| -> Vec<f64> {
        shuffled_generator(12, seed)
            .make_windows(&rows)
            .flat_map(|batch| {
                batch
                    .examples
                    .iter()
                    .map(|example| example.inputs[0][0])
                    .collect::<Vec<_>>()
            })
            .collect()
    };

    assert_eq!(order(9), order(9));
    assert_ne!(order(9), order(10));
}

#[test]
fn test_shuffle_with_tiny_buffer_keeps_batch_sizes() {
    let rows = univariate_rows(20); // 13 examples
    let windows = shuffled_generator(2, 1);

    let sizes: Vec<usize> = windows.make_windows(&rows).map(|batch| batch.len()).collect();
    assert_eq!(sizes, vec![4, 4, 4, 1]);
}
