//! Token bucket limiter with reservations.
//!
//! A [`Limiter`] holds a token balance that refills continuously at its
//! [`Rate`] up to its burst ceiling. Refill is computed lazily from the time
//! elapsed since the last update, so there is no background timer.
//!
//! Every admission decision goes through one protocol:
//!
//! - [`allow_n`](Limiter::allow_n) admits only if the tokens are available right now
//! - [`reserve_n`](Limiter::reserve_n) always commits (within burst) and reports how long to wait
//! - [`wait`](Limiter::wait) reserves and then sleeps on the limiter's [`Clock`]
//!
//! # Thread Safety
//!
//! All state lives behind a single mutex. The lock is never held while
//! `wait` sleeps, so other callers keep reserving during the delay.
//! Requests are served in the order they take the lock.

mod ledger;
mod reservation;

pub use reservation::Reservation;

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use self::ledger::Ledger;
use crate::clock::{Clock, SystemClock};
use crate::error::{ConfigError, WaitError, WaitResult};
use crate::rate::{Rate, INFINITE_DURATION};
use crate::types::Uint;

/// Thread-safe token bucket limiter.
///
/// The bucket starts full with `burst` tokens.
///
/// # Example
///
/// ```rust
/// use rate_guard_limiter::{Limiter, ManualClock, Rate};
/// use std::time::Duration;
///
/// let clock = ManualClock::new();
/// // One token every 100ms, bursts of up to 2
/// let limiter = Limiter::new(Rate::every(Duration::from_millis(100)), 2, &clock);
///
/// assert!(limiter.allow());
/// assert!(limiter.allow());
/// assert!(!limiter.allow());
///
/// clock.advance(Duration::from_millis(100));
/// assert!(limiter.allow());
/// ```
#[derive(Debug)]
pub struct Limiter<C: Clock = SystemClock> {
    /// Time source for refill and for sleeping in `wait`
    clock: C,
    /// Accounting state
    ledger: Mutex<Ledger>,
}

impl<C: Clock> Limiter<C> {
    /// Creates a full limiter refilling at `rate` with a ceiling of `burst` tokens.
    ///
    /// A burst of zero admits only zero-token requests unless the rate is
    /// [`Rate::INFINITE`].
    pub fn new(rate: Rate, burst: Uint, clock: C) -> Self {
        let now = clock.now();
        Limiter {
            clock,
            ledger: Mutex::new(Ledger::new(rate, burst, now)),
        }
    }

    /// The ledger is only ever mutated through complete assignments, so a
    /// panic in another caller cannot leave it half-written.
    fn ledger(&self) -> MutexGuard<'_, Ledger> {
        self.ledger.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The clock this limiter reads time from.
    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn rate(&self) -> Rate {
        self.ledger().rate
    }

    pub fn burst(&self) -> Uint {
        self.ledger().max_tokens
    }

    /// Tokens available right now, between zero and the burst.
    pub fn available_tokens(&self) -> f64 {
        self.available_tokens_at(self.clock.now())
    }

    /// Tokens available at `at`, between zero and the burst.
    ///
    /// Read-only: the projection is not committed.
    pub fn available_tokens_at(&self, at: Instant) -> f64 {
        self.ledger().available_at(at)
    }

    /// Shorthand for `allow_n(1)`.
    pub fn allow(&self) -> bool {
        self.allow_n(1)
    }

    /// Takes `n` tokens if they are available now; otherwise takes nothing.
    pub fn allow_n(&self, n: Uint) -> bool {
        self.allow_n_at(self.clock.now(), n)
    }

    /// Takes `n` tokens if they are available at `at`; otherwise takes nothing.
    pub fn allow_n_at(&self, at: Instant, n: Uint) -> bool {
        self.reserve_at(at, n, Duration::ZERO).is_granted()
    }

    /// Shorthand for `reserve_n(1)`.
    pub fn reserve(&self) -> Reservation<'_, C> {
        self.reserve_n(1)
    }

    /// Reserves `n` tokens now, however long they take to accrue.
    ///
    /// Refused only when `n` exceeds the burst (with a finite rate).
    pub fn reserve_n(&self, n: Uint) -> Reservation<'_, C> {
        self.reserve_n_at(self.clock.now(), n)
    }

    /// Reserves `n` tokens at `at`, however long they take to accrue.
    pub fn reserve_n_at(&self, at: Instant, n: Uint) -> Reservation<'_, C> {
        self.reserve_at(at, n, INFINITE_DURATION)
    }

    /// Blocks on the clock until `n` tokens can be used.
    ///
    /// # Errors
    ///
    /// * [`WaitError::ExceedsBurst`] if `n` exceeds the burst and the rate is
    ///   finite. Returned without sleeping.
    /// * [`WaitError::CannotReserve`] if the reservation is refused anyway,
    ///   e.g. because the burst shrank concurrently.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rate_guard_limiter::{Limiter, ManualClock, Rate, WaitError};
    /// use std::time::Duration;
    ///
    /// let clock = ManualClock::new();
    /// let limiter = Limiter::new(Rate::every(Duration::from_millis(100)), 2, &clock);
    ///
    /// assert_eq!(limiter.wait(2), Ok(()));
    /// assert_eq!(limiter.wait(1), Ok(()));
    /// assert_eq!(clock.elapsed(), Duration::from_millis(100));
    ///
    /// assert_eq!(
    ///     limiter.wait(3),
    ///     Err(WaitError::ExceedsBurst { requested: 3, burst: 2 })
    /// );
    /// ```
    pub fn wait(&self, n: Uint) -> WaitResult {
        let now = self.clock.now();

        let (burst, rate) = {
            let ledger = self.ledger();
            (ledger.max_tokens, ledger.rate)
        };
        if n > burst && !rate.is_infinite() {
            return Err(WaitError::ExceedsBurst { requested: n, burst });
        }

        let reservation = self.reserve_at(now, n, INFINITE_DURATION);
        if !reservation.is_granted() {
            tracing::warn!(requested = %n, "wait could not reserve tokens after passing the burst check");
            return Err(WaitError::CannotReserve { requested: n });
        }

        let delay = reservation.delay_from(now);
        if !delay.is_zero() {
            tracing::trace!(requested = %n, ?delay, "waiting for tokens");
            self.clock.sleep(delay);
        }
        Ok(())
    }

    /// Changes the refill rate as of now.
    pub fn set_rate(&self, rate: Rate) {
        self.set_rate_at(self.clock.now(), rate);
    }

    /// Changes the refill rate as of `at`.
    ///
    /// Tokens accrued up to `at` are credited at the old rate first.
    pub fn set_rate_at(&self, at: Instant, rate: Rate) {
        let mut ledger = self.ledger();
        tracing::debug!(old = %ledger.rate, new = %rate, "rate changed");
        ledger.set_rate(at, rate);
    }

    /// Changes the burst ceiling as of now.
    pub fn set_burst(&self, burst: Uint) {
        self.set_burst_at(self.clock.now(), burst);
    }

    /// Changes the burst ceiling as of `at`.
    ///
    /// The balance is clipped to the new ceiling. Reservations outstanding at
    /// the time of the change can no longer be rolled back precisely.
    pub fn set_burst_at(&self, at: Instant, burst: Uint) {
        let mut ledger = self.ledger();
        tracing::debug!(old = %ledger.max_tokens, new = %burst, "burst changed");
        ledger.set_burst(at, burst);
    }
}

impl Limiter<SystemClock> {
    /// Creates a limiter driven by the real monotonic clock.
    pub fn with_system_clock(rate: Rate, burst: Uint) -> Self {
        Limiter::new(rate, burst, SystemClock)
    }
}

/// Configuration structure for creating a [`Limiter`].
///
/// Keeps the rate as a plain number so it can come from a config file;
/// validation happens when the limiter is built.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LimiterConfig {
    /// Tokens per second. `None` disables limiting.
    #[cfg_attr(feature = "serde", serde(default))]
    pub rate: Option<f64>,
    /// Maximum tokens held, and the largest single request.
    pub burst: Uint,
}

impl LimiterConfig {
    /// Creates a new configuration instance.
    pub fn new(rate: Option<f64>, burst: Uint) -> Self {
        Self { rate, burst }
    }

    /// The validated rate.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidRate`] for a zero, negative or NaN rate.
    pub fn rate(&self) -> Result<Rate, ConfigError> {
        match self.rate {
            Some(per_second) => Rate::new(per_second),
            None => Ok(Rate::INFINITE),
        }
    }

    /// Validates the configuration and builds a limiter on `clock`.
    ///
    /// # Example
    ///
    /// ```
    /// use rate_guard_limiter::{LimiterConfig, ManualClock};
    ///
    /// let limiter = LimiterConfig::new(Some(5.0), 10).build(ManualClock::new()).unwrap();
    /// assert_eq!(limiter.burst(), 10);
    ///
    /// assert!(LimiterConfig::new(Some(0.0), 10).build(ManualClock::new()).is_err());
    /// ```
    pub fn build<C: Clock>(&self, clock: C) -> Result<Limiter<C>, ConfigError> {
        Ok(Limiter::new(self.rate()?, self.burst, clock))
    }
}

impl TryFrom<LimiterConfig> for Limiter<SystemClock> {
    type Error = ConfigError;

    /// Converts a `LimiterConfig` into a limiter on the system clock.
    ///
    /// ```
    /// use rate_guard_limiter::{Limiter, LimiterConfig};
    ///
    /// let limiter: Limiter = LimiterConfig::new(None, 3).try_into().unwrap();
    /// assert!(limiter.allow_n(1_000));
    /// ```
    fn try_from(config: LimiterConfig) -> Result<Self, Self::Error> {
        config.build(SystemClock)
    }
}
