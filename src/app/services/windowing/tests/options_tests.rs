//! Tests for windowing option validation

use super::*;
use crate::Error;
use crate::app::services::windowing::WindowConfig;

#[test]
fn test_valid_options_are_accepted() {
    let config = WindowConfig::new(&WindowOptions {
        window: 24 * 7,
        horizon: 24,
        batch_size: 32,
        shuffle_buffer_size: Some(1000),
    })
    .unwrap();

    assert_eq!(config.window(), 168);
    assert_eq!(config.horizon(), 24);
    assert_eq!(config.batch_size(), 32);
    assert_eq!(config.shuffle_buffer(), Some(1000));
    assert_eq!(config.total_len(), 192);
}

#[test]
fn test_absent_shuffle_buffer_is_valid() {
    let config = WindowConfig::new(&options(5, 3, 2)).unwrap();
    assert_eq!(config.shuffle_buffer(), None);
}

#[test]
fn test_every_offending_option_is_reported() {
    // window and horizon are invalid; batch_size is fine and must not appear
    let err = WindowConfig::new(&WindowOptions {
        window: 0,
        horizon: -1,
        batch_size: 1,
        shuffle_buffer_size: None,
    })
    .unwrap_err();

    match err {
        Error::InvalidWindowOptions { entries } => {
            assert_eq!(entries, vec![("window", 0), ("horizon", -1)]);
        }
        other => panic!("expected InvalidWindowOptions, got {other:?}"),
    }
}

#[test]
fn test_invalid_shuffle_buffer_is_reported() {
    let err = WindowConfig::new(&WindowOptions {
        window: 5,
        horizon: 3,
        batch_size: 2,
        shuffle_buffer_size: Some(0),
    })
    .unwrap_err();

    match err {
        Error::InvalidWindowOptions { entries } => {
            assert_eq!(entries, vec![("shuffle_buffer_size", 0)]);
        }
        other => panic!("expected InvalidWindowOptions, got {other:?}"),
    }
}

#[test]
fn test_all_four_options_can_offend_at_once() {
    let err = WindowConfig::new(&WindowOptions {
        window: 0,
        horizon: 0,
        batch_size: -5,
        shuffle_buffer_size: Some(-1),
    })
    .unwrap_err();

    match err {
        Error::InvalidWindowOptions { entries } => {
            assert_eq!(entries.len(), 4);
        }
        other => panic!("expected InvalidWindowOptions, got {other:?}"),
    }
}

#[test]
fn test_error_message_lists_offenders() {
    let err = WindowConfig::new(&WindowOptions {
        window: 0,
        horizon: -1,
        batch_size: 1,
        shuffle_buffer_size: None,
    })
    .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("window=0"));
    assert!(message.contains("horizon=-1"));
    assert!(!message.contains("batch_size"));
}
