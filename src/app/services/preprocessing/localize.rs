//! Timestamp localization with explicit DST resolution policies
//!
//! The canonical dataset stores naive local wall-clock times. Mapping them
//! onto a real time zone hits two DST edge cases every year: the fall-back
//! hour occurs twice, and the spring-forward hour does not occur at all.
//! Both are resolved by policy rather than silently.

use crate::config::{AmbiguousTimePolicy, NonexistentTimePolicy, TimezoneOptions};
use crate::{Error, Result};
use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, TimeZone};
use chrono_tz::Tz;

/// Probe step when shifting out of a DST gap. Gaps in supported zones are at
/// most an hour; half-hour steps also cover zones with fractional offsets,
/// and land exactly on the gap edge for on-the-hour data.
const GAP_PROBE_MINUTES: i64 = 30;
const GAP_PROBE_LIMIT: usize = 6;

/// Resolve a naive local time in `tz` under the configured policies
///
/// Returns `Ok(None)` when the applicable policy says to drop the row.
pub fn localize_naive(
    naive: NaiveDateTime,
    tz: Tz,
    ambiguous: AmbiguousTimePolicy,
    nonexistent: NonexistentTimePolicy,
) -> Result<Option<DateTime<Tz>>> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(datetime) => Ok(Some(datetime)),
        LocalResult::Ambiguous(earliest, latest) => match ambiguous {
            AmbiguousTimePolicy::Raise => Err(Error::time_localization(format!(
                "local time {naive} occurs twice in {tz}"
            ))),
            AmbiguousTimePolicy::Earliest => Ok(Some(earliest)),
            AmbiguousTimePolicy::Latest => Ok(Some(latest)),
            AmbiguousTimePolicy::Skip => Ok(None),
        },
        LocalResult::None => match nonexistent {
            NonexistentTimePolicy::Raise => Err(Error::time_localization(format!(
                "local time {naive} does not exist in {tz}"
            ))),
            NonexistentTimePolicy::ShiftForward => shift_from_gap(naive, tz, 1).map(Some),
            NonexistentTimePolicy::ShiftBackward => shift_from_gap(naive, tz, -1).map(Some),
            NonexistentTimePolicy::Skip => Ok(None),
        },
    }
}

/// Localize a range bound, which must resolve to a concrete instant
///
/// Bounds share the row policies, but a bound the policy would drop cannot
/// delimit anything and is a configuration error.
pub fn localize_bound(
    naive: NaiveDateTime,
    tz: Tz,
    options: &TimezoneOptions,
) -> Result<DateTime<Tz>> {
    localize_naive(naive, tz, options.ambiguous, options.nonexistent)?.ok_or_else(|| {
        Error::time_localization(format!(
            "range bound {naive} resolves to no instant in {tz} under the skip policy"
        ))
    })
}

/// Walk out of a DST gap in the given direction until a real instant appears
fn shift_from_gap(naive: NaiveDateTime, tz: Tz, direction: i64) -> Result<DateTime<Tz>> {
    let step = Duration::minutes(direction * GAP_PROBE_MINUTES);
    let mut probe = naive;
    for _ in 0..GAP_PROBE_LIMIT {
        probe = probe + step;
        match tz.from_local_datetime(&probe) {
            LocalResult::Single(datetime) => return Ok(datetime),
            // stepping backward out of a gap can land in the fold; the
            // earlier occurrence is the one adjacent to the gap
            LocalResult::Ambiguous(earliest, _) => return Ok(earliest),
            LocalResult::None => continue,
        }
    }
    Err(Error::time_localization(format!(
        "could not resolve nonexistent local time {naive} in {tz}"
    )))
}
