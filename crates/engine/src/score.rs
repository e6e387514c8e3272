//! Time-decayed access score.
//!
//! `score = access_count / log2(age_in_days + 2)`
//!
//! - `access_count == 0` → `0.0`
//! - age is measured from `created_at` in fractional days, floored at 0
//! - unparseable or missing `created_at` with accesses → raw `access_count`
//!
//! At age 0 the divisor is exactly 1, so a fresh item scores its raw count.

use chrono::{DateTime, Utc};
use hmem_core::model::Scorable;
use hmem_core::time::parse_timestamp;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// An item paired with its score for one request.
#[derive(Debug, Clone, Copy)]
pub struct ScoredItem<'a, T: ?Sized> {
    pub item: &'a T,
    pub score: f64,
}

/// Score a record or node as of `now`.
pub fn score<T: Scorable + ?Sized>(item: &T, now: DateTime<Utc>) -> f64 {
    score_at(item.access_count(), item.created_at(), now)
}

/// Score raw fields as of `now`. Never panics and never returns a negative
/// or non-finite value.
pub fn score_at(access_count: u64, created_at: &str, now: DateTime<Utc>) -> f64 {
    if access_count == 0 {
        return 0.0;
    }
    let count = access_count as f64;

    let Some(created) = parse_timestamp(created_at) else {
        return count;
    };

    let age_days = ((now - created).num_milliseconds() as f64 / MILLIS_PER_DAY).max(0.0);
    count / (age_days + 2.0).log2()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap()
    }

    fn days_ago(days: i64) -> String {
        (now() - Duration::days(days)).to_rfc3339()
    }

    #[test]
    fn zero_accesses_score_zero() {
        assert_eq!(score_at(0, &days_ago(0), now()), 0.0);
        assert_eq!(score_at(0, "garbage", now()), 0.0);
    }

    #[test]
    fn fresh_item_scores_raw_count() {
        assert!((score_at(7, &days_ago(0), now()) - 7.0).abs() < 1e-9);
    }

    #[test]
    fn two_days_old_halves_the_count() {
        // log2(2 + 2) = 2
        assert!((score_at(10, &days_ago(2), now()) - 5.0).abs() < 1e-9);
    }

    #[test]
    fn future_timestamps_are_floored_at_age_zero() {
        let future = (now() + Duration::days(30)).to_rfc3339();
        assert!((score_at(4, &future, now()) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn unparseable_timestamp_falls_back_to_raw_count() {
        assert_eq!(score_at(12, "", now()), 12.0);
        assert_eq!(score_at(12, "last tuesday", now()), 12.0);
    }

    #[test]
    fn non_increasing_in_age() {
        let mut previous = f64::INFINITY;
        for days in [0, 1, 3, 10, 100, 730, 5000] {
            let s = score_at(50, &days_ago(days), now());
            assert!(s <= previous, "score rose at {days} days");
            assert!(s.is_finite() && s >= 0.0);
            previous = s;
        }
    }

    #[test]
    fn non_decreasing_in_access_count() {
        let created = days_ago(45);
        let mut previous = 0.0;
        for count in [0, 1, 2, 10, 1000] {
            let s = score_at(count, &created, now());
            assert!(s >= previous);
            previous = s;
        }
    }

    #[test]
    fn newer_item_with_fewer_accesses_can_outrank_older() {
        let old = score_at(200, &days_ago(730), now());
        let new = score_at(30, &days_ago(1), now());
        assert!(old > new, "raw volume still matters: {old} vs {new}");

        let stale = score_at(40, &days_ago(730), now());
        assert!(new > stale);
    }
}
