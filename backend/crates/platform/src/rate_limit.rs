//! Rate Limiting Policies
//!
//! Pure evaluation of sliding-window caps and cooldowns. Counting is left
//! to the caller, which usually queries an append-only event log.

use chrono::{DateTime, TimeDelta, Utc};
use std::time::Duration;

/// At most `max_requests` events in the trailing `window`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub max_requests: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window: Duration::from_secs(window_secs),
        }
    }

    /// Start of the trailing window ending at `now`
    pub fn window_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - to_delta(self.window)
    }

    /// Decide given the number of events already inside the window.
    pub fn check(&self, recorded: u64) -> RateLimitResult {
        if recorded >= u64::from(self.max_requests) {
            RateLimitResult::LimitExceeded {
                limit: self.max_requests,
                window: self.window,
            }
        } else {
            RateLimitResult::Allowed
        }
    }
}

/// Minimum spacing between two events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CooldownConfig {
    pub interval: Duration,
}

impl CooldownConfig {
    pub fn new(interval_secs: u64) -> Self {
        Self {
            interval: Duration::from_secs(interval_secs),
        }
    }

    /// Decide given the timestamp of the most recent event, if any.
    pub fn check(&self, last: Option<DateTime<Utc>>, now: DateTime<Utc>) -> RateLimitResult {
        let Some(last) = last else {
            return RateLimitResult::Allowed;
        };

        let ready_at = last + to_delta(self.interval);
        if ready_at <= now {
            return RateLimitResult::Allowed;
        }

        let retry_after = (ready_at - now).to_std().unwrap_or(self.interval);
        RateLimitResult::CoolingDown { retry_after }
    }
}

/// Rate limit check result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitResult {
    Allowed,
    LimitExceeded { limit: u32, window: Duration },
    CoolingDown { retry_after: Duration },
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed)
    }
}

/// Human-readable duration, coarsest unit first ("24 hours", "4 minutes")
pub fn describe_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    let (value, unit) = if secs >= 3600 && secs % 3600 == 0 {
        (secs / 3600, "hour")
    } else if secs >= 60 {
        (secs.div_ceil(60), "minute")
    } else {
        (secs.max(1), "second")
    };

    if value == 1 {
        format!("1 {unit}")
    } else {
        format!("{value} {unit}s")
    }
}

fn to_delta(duration: Duration) -> TimeDelta {
    TimeDelta::from_std(duration).unwrap_or(TimeDelta::MAX)
}
