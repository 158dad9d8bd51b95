//! Refill rate and the time/token algebra built on it.

use std::fmt;
use std::time::Duration;

use crate::error::ConfigError;

/// Longest representable delay. Used as "never" for refused reservations and
/// as "wait as long as needed" tolerance.
pub const INFINITE_DURATION: Duration = Duration::MAX;

/// Refill rate in tokens per second.
///
/// A `Rate` is always strictly positive; [`Rate::INFINITE`] turns accounting
/// off entirely.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct Rate(f64);

impl Rate {
    /// No limit: every request is admitted without touching the ledger.
    pub const INFINITE: Rate = Rate(f64::INFINITY);

    /// Creates a rate of `per_second` tokens per second.
    ///
    /// `f64::INFINITY` yields [`Rate::INFINITE`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRate`] for zero, negative or NaN rates.
    pub fn new(per_second: f64) -> Result<Self, ConfigError> {
        if per_second.is_nan() || per_second <= 0.0 {
            return Err(ConfigError::InvalidRate(per_second));
        }
        Ok(Rate(per_second))
    }

    /// One token every `interval`. A zero interval means no limit.
    ///
    /// ```rust
    /// use rate_guard_limiter::Rate;
    /// use std::time::Duration;
    ///
    /// assert_eq!(Rate::every(Duration::from_millis(100)).per_second(), 10.0);
    /// assert!(Rate::every(Duration::ZERO).is_infinite());
    /// ```
    pub fn every(interval: Duration) -> Self {
        if interval.is_zero() {
            return Rate::INFINITE;
        }
        Rate(1.0 / interval.as_secs_f64())
    }

    /// Tokens per second.
    pub fn per_second(self) -> f64 {
        self.0
    }

    /// Whether this is [`Rate::INFINITE`].
    pub fn is_infinite(self) -> bool {
        self.0.is_infinite()
    }

    /// Time needed to accrue `tokens` at this rate.
    ///
    /// Non-positive amounts take no time; amounts too large to represent
    /// saturate to [`INFINITE_DURATION`].
    pub(crate) fn duration_from_tokens(self, tokens: f64) -> Duration {
        if tokens <= 0.0 {
            return Duration::ZERO;
        }
        Duration::try_from_secs_f64(tokens / self.0).unwrap_or(INFINITE_DURATION)
    }

    /// Tokens accrued over `elapsed` at this rate.
    pub(crate) fn tokens_from_duration(self, elapsed: Duration) -> f64 {
        if elapsed.is_zero() {
            // Keeps 0 * inf from turning into NaN.
            return 0.0;
        }
        elapsed.as_secs_f64() * self.0
    }
}

impl fmt::Display for Rate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_infinite() {
            write!(f, "unlimited")
        } else {
            write!(f, "{}/s", self.0)
        }
    }
}
