//! Countdown to the next daily credit refresh.
//!
//! Nothing here schedules anything; callers tick on their own cadence and ask
//! how long is left. Once the countdown hits zero it stays there until the
//! caller records a new `last_refresh`.

use chrono::{DateTime, Utc};

pub const CREDIT_REFRESH_PERIOD_MS: u64 = 24 * 60 * 60 * 1000;

const MS_PER_MINUTE: u64 = 60 * 1000;
const MS_PER_HOUR: u64 = 60 * MS_PER_MINUTE;

/// Milliseconds left until `last_refresh + period_ms`, clamped at zero.
pub fn time_until_refresh_at(
    last_refresh: DateTime<Utc>,
    period_ms: u64,
    now: DateTime<Utc>,
) -> u64 {
    let period = i64::try_from(period_ms).unwrap_or(i64::MAX);
    let next_refresh = last_refresh.timestamp_millis().saturating_add(period);
    let left = next_refresh.saturating_sub(now.timestamp_millis());
    left.max(0) as u64
}

pub fn time_until_refresh(last_refresh: DateTime<Utc>, period_ms: u64) -> u64 {
    time_until_refresh_at(last_refresh, period_ms, Utc::now())
}

pub fn can_refresh_credits_at(
    last_refresh: DateTime<Utc>,
    period_ms: u64,
    now: DateTime<Utc>,
) -> bool {
    time_until_refresh_at(last_refresh, period_ms, now) == 0
}

pub fn can_refresh_credits(last_refresh: DateTime<Utc>, period_ms: u64) -> bool {
    can_refresh_credits_at(last_refresh, period_ms, Utc::now())
}

/// Countdown label, e.g. `5h 32m`.
pub fn format_time_left(milliseconds: u64) -> String {
    if milliseconds == 0 {
        return "Ready to refresh!".to_string();
    }
    let hours = milliseconds / MS_PER_HOUR;
    let minutes = (milliseconds % MS_PER_HOUR) / MS_PER_MINUTE;
    format!("{}h {}m", hours, minutes)
}
