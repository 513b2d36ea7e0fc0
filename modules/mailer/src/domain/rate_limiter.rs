use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;

use crate::contract::error::MailerError;
use crate::contract::model::RateLimitInfo;

pub const MAX_ATTEMPTS: u32 = 5;
pub const RATE_LIMIT_WINDOW_SECS: i64 = 15 * 60;

#[derive(Debug, Clone, Copy)]
struct RateLimitRecord {
    count: u32,
    window_start: DateTime<Utc>,
}

/// Fixed-window per-email rate limiter.
///
/// State is process-local: concurrent server instances keep independent
/// counters, so the limit is only guaranteed within a single process
/// lifetime. Keys are lower-cased email addresses.
#[derive(Debug)]
pub struct RateLimiter {
    records: DashMap<String, RateLimitRecord>,
    max_attempts: u32,
    window: Duration,
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::with_limits(MAX_ATTEMPTS, Duration::seconds(RATE_LIMIT_WINDOW_SECS))
    }

    pub fn with_limits(max_attempts: u32, window: Duration) -> Self {
        Self {
            records: DashMap::new(),
            max_attempts,
            window,
        }
    }

    /// Count one request against `email`, rejecting once the window budget
    /// is exhausted.
    pub fn check(&self, email: &str) -> Result<(), MailerError> {
        self.check_at(email, Utc::now())
    }

    pub fn check_at(&self, email: &str, now: DateTime<Utc>) -> Result<(), MailerError> {
        let key = email.to_lowercase();
        let mut entry = self.records.entry(key).or_insert(RateLimitRecord {
            count: 0,
            window_start: now,
        });

        // Reset the window once it has expired
        if now - entry.window_start > self.window {
            entry.count = 1;
            entry.window_start = now;
            return Ok(());
        }

        if entry.count >= self.max_attempts {
            let remaining = self.window - (now - entry.window_start);
            return Err(MailerError::rate_limited(
                remaining.num_seconds().max(0) as u64
            ));
        }

        entry.count += 1;
        Ok(())
    }

    /// Remaining budget for `email`, for response payloads.
    pub fn info(&self, email: &str) -> RateLimitInfo {
        let key = email.to_lowercase();
        let used = self.records.get(&key).map(|r| r.count).unwrap_or(0);
        RateLimitInfo {
            remaining_attempts: self.max_attempts.saturating_sub(used),
            window_ms: (self.window.num_milliseconds().max(0)) as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-01-01T12:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn allows_up_to_max_attempts_within_window() {
        let limiter = RateLimiter::new();
        for _ in 0..MAX_ATTEMPTS {
            assert!(limiter.check_at("student@university.edu", t0()).is_ok());
        }
        let err = limiter
            .check_at("student@university.edu", t0())
            .expect_err("sixth request must be rejected");
        match err {
            MailerError::RateLimited { seconds_remaining } => {
                assert_eq!(seconds_remaining, RATE_LIMIT_WINDOW_SECS as u64);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn wait_time_tracks_remaining_window() {
        let limiter = RateLimiter::new();
        for _ in 0..MAX_ATTEMPTS {
            limiter.check_at("x@university.edu", t0()).unwrap();
        }
        // 10 minutes into the 15-minute window → 5 minutes remaining
        let later = t0() + Duration::minutes(10);
        let err = limiter.check_at("x@university.edu", later).unwrap_err();
        match err {
            MailerError::RateLimited { seconds_remaining } => {
                assert_eq!(seconds_remaining, 5 * 60);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn window_expiry_resets_the_counter() {
        let limiter = RateLimiter::new();
        for _ in 0..MAX_ATTEMPTS {
            limiter.check_at("y@university.edu", t0()).unwrap();
        }
        let after_window = t0() + Duration::seconds(RATE_LIMIT_WINDOW_SECS + 1);
        assert!(limiter.check_at("y@university.edu", after_window).is_ok());
        assert_eq!(
            limiter.info("y@university.edu").remaining_attempts,
            MAX_ATTEMPTS - 1
        );
    }

    #[test]
    fn emails_are_tracked_case_insensitively() {
        let limiter = RateLimiter::new();
        for _ in 0..MAX_ATTEMPTS {
            limiter.check_at("Mixed@University.EDU", t0()).unwrap();
        }
        assert!(limiter
            .check_at("mixed@university.edu", t0())
            .is_err());
    }

    #[test]
    fn independent_emails_have_independent_budgets() {
        let limiter = RateLimiter::new();
        for _ in 0..MAX_ATTEMPTS {
            limiter.check_at("a@university.edu", t0()).unwrap();
        }
        assert!(limiter.check_at("b@university.edu", t0()).is_ok());
    }

    #[test]
    fn info_reports_full_budget_for_unknown_email() {
        let limiter = RateLimiter::new();
        let info = limiter.info("new@university.edu");
        assert_eq!(info.remaining_attempts, MAX_ATTEMPTS);
        assert_eq!(info.window_ms, (RATE_LIMIT_WINDOW_SECS as u64) * 1000);
    }
}
