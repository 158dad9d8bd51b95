//! Time sources for the limiter.
//!
//! The limiter never reads the system clock directly. It asks a [`Clock`] for
//! the current instant and, inside `wait`, asks the same clock to suspend the
//! caller. Tests swap in [`ManualClock`], whose `sleep` simply moves virtual
//! time forward.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

/// A source of monotonic time that can also suspend the calling thread.
pub trait Clock {
    /// Returns the current instant.
    fn now(&self) -> Instant;

    /// Suspends the calling context for at least `duration`.
    fn sleep(&self, duration: Duration);
}

/// Real monotonic clock backed by [`Instant::now`] and [`std::thread::sleep`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Virtual clock that only moves when told to.
///
/// [`sleep`](Clock::sleep) advances the clock by the requested duration and
/// returns immediately, so code paths that wait can be tested without real
/// delays. Time never moves backwards: an advance past the last representable
/// [`Instant`] stops at the furthest instant that can be reached.
///
/// # Example
///
/// ```rust
/// use rate_guard_limiter::{Clock, ManualClock};
/// use std::time::Duration;
///
/// let clock = ManualClock::new();
/// let start = clock.now();
/// clock.sleep(Duration::from_millis(250));
/// assert_eq!(clock.now() - start, Duration::from_millis(250));
/// ```
#[derive(Debug)]
pub struct ManualClock {
    base: Instant,
    current: Mutex<Instant>,
}

impl ManualClock {
    /// Creates a clock frozen at the instant of construction.
    pub fn new() -> Self {
        let base = Instant::now();
        Self {
            base,
            current: Mutex::new(base),
        }
    }

    fn current(&self) -> MutexGuard<'_, Instant> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The current virtual instant.
    pub fn now(&self) -> Instant {
        *self.current()
    }

    /// Moves the clock forward by `duration`.
    pub fn advance(&self, duration: Duration) {
        let mut current = self.current();
        let mut step = duration;
        // Halve until the target is representable; zero always is.
        let target = loop {
            match current.checked_add(step) {
                Some(target) => break target,
                None => step /= 2,
            }
        };
        *current = target;
    }

    /// Total virtual time elapsed since construction.
    pub fn elapsed(&self) -> Duration {
        self.now().duration_since(self.base)
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        ManualClock::now(self)
    }

    fn sleep(&self, duration: Duration) {
        self.advance(duration);
    }
}

impl<T: Clock + ?Sized> Clock for &T {
    fn now(&self) -> Instant {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}

impl<T: Clock + ?Sized> Clock for Arc<T> {
    fn now(&self) -> Instant {
        (**self).now()
    }

    fn sleep(&self, duration: Duration) {
        (**self).sleep(duration)
    }
}
