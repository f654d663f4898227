//! Timestamp sampling under shaped distributions.
//!
//! Every entity generator draws its timestamps through these helpers so the
//! weekday bias, decay, and cycle-time shapes stay consistent across tables.

use rand::Rng;
use rand_distr::{Distribution, Exp1, LogNormal};
use time::{Duration, OffsetDateTime, Weekday};

/// Log-space mean of the task cycle time distribution (days).
const CYCLE_TIME_MU: f64 = 2.0;
/// Log-space standard deviation of the task cycle time distribution.
const CYCLE_TIME_SIGMA: f64 = 0.8;
const MIN_CYCLE_DAYS: i64 = 1;
const MAX_CYCLE_DAYS: i64 = 60;

/// Probability that a weekend creation time is moved onto the following Monday.
const WEEKEND_SHIFT_PROBABILITY: f64 = 0.8;

/// Returns true on Saturday and Sunday.
pub fn is_weekend(ts: OffsetDateTime) -> bool {
    matches!(ts.weekday(), Weekday::Saturday | Weekday::Sunday)
}

/// Whole days from `from` until `to`, never negative.
pub fn days_until(from: OffsetDateTime, to: OffsetDateTime) -> i64 {
    (to - from).whole_days().max(0)
}

/// Picks an index from `weights` with probability proportional to its weight.
///
/// Weights need not sum to one. An empty slice returns 0.
pub fn categorical(weights: &[f64], rng: &mut impl Rng) -> usize {
    let total: f64 = weights.iter().sum();
    if weights.is_empty() || total <= 0.0 {
        return 0;
    }

    let roll = rng.r#gen::<f64>() * total;
    let mut cumulative = 0.0;

    for (i, &weight) in weights.iter().enumerate() {
        cumulative += weight;
        if roll < cumulative {
            return i;
        }
    }

    weights.len() - 1
}

/// Uniform timestamp in `[start, end)` at whole-day granularity.
///
/// Callers guarantee `end` is at least one day after `start`; shorter spans
/// collapse to `start`.
pub fn uniform_between(
    start: OffsetDateTime,
    end: OffsetDateTime,
    rng: &mut impl Rng,
) -> OffsetDateTime {
    debug_assert!(end > start, "uniform_between requires end > start");
    let days = (end - start).whole_days().max(1);
    start + Duration::days(rng.gen_range(0..days))
}

/// Uniform timestamp nudged off the weekend.
///
/// Weekend picks move forward to Monday unless that lands after `end - 2 days`,
/// in which case they move back to Friday. The result stays in `[start, end)`:
/// when Friday is before `start`, Monday is used if it is before `end`, and
/// otherwise the weekend pick is kept.
pub fn weekday_biased(
    start: OffsetDateTime,
    end: OffsetDateTime,
    rng: &mut impl Rng,
) -> OffsetDateTime {
    let picked = uniform_between(start, end, rng);
    if !is_weekend(picked) {
        return picked;
    }

    let forward = picked + Duration::days(days_to_monday(picked));
    if forward <= end - Duration::days(2) {
        return forward;
    }

    let back = match picked.weekday() {
        Weekday::Saturday => 1,
        _ => 2,
    };
    let friday = picked - Duration::days(back);
    if friday >= start {
        friday
    } else if forward < end {
        forward
    } else {
        picked
    }
}

/// Exponentially distributed offset in days with the given rate.
///
/// Larger rates concentrate offsets near zero. Callers clamp the result.
pub fn decayed_offset(rate: f64, rng: &mut impl Rng) -> f64 {
    let unit: f64 = Exp1.sample(rng);
    unit / rate
}

/// Days between creation and completion of a task, from a log-normal
/// distribution truncated to whole days in `1..=60`.
pub fn cycle_time(rng: &mut impl Rng) -> i64 {
    let days = LogNormal::new(CYCLE_TIME_MU, CYCLE_TIME_SIGMA)
        .map(|dist| dist.sample(rng))
        .unwrap_or(CYCLE_TIME_MU.exp());
    (days as i64).clamp(MIN_CYCLE_DAYS, MAX_CYCLE_DAYS)
}

/// Sorted creation times spread over `[start, end]` with a weekday skew.
///
/// Each draw that lands on a weekend moves to the next Monday with 80%
/// probability. A shift past `end` wraps back a week; if that would fall
/// before `start` the unshifted draw is kept.
pub fn weekday_skewed_series(
    start: OffsetDateTime,
    end: OffsetDateTime,
    count: usize,
    rng: &mut impl Rng,
) -> Vec<OffsetDateTime> {
    let span = (end - start).whole_seconds().max(0);
    let mut times = Vec::with_capacity(count);

    for _ in 0..count {
        let mut ts = start + Duration::seconds(rng.gen_range(0..=span));

        if is_weekend(ts) && rng.r#gen::<f64>() < WEEKEND_SHIFT_PROBABILITY {
            let mut shifted = ts + Duration::days(days_to_monday(ts));
            if shifted > end {
                shifted -= Duration::weeks(1);
            }
            if shifted >= start {
                ts = shifted;
            }
        }

        times.push(ts);
    }

    times.sort();
    times
}

fn days_to_monday(ts: OffsetDateTime) -> i64 {
    match ts.weekday() {
        Weekday::Saturday => 2,
        Weekday::Sunday => 1,
        _ => 0,
    }
}
