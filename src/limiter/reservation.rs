//! The reservation protocol and its rollback.

use std::fmt;
use std::time::{Duration, Instant};

use super::Limiter;
use crate::clock::Clock;
use crate::rate::{Rate, INFINITE_DURATION};
use crate::types::Uint;

/// Outcome of a reservation request.
///
/// A granted reservation has already been charged to the limiter: the caller
/// may proceed once [`delay_from`](Reservation::delay_from) reaches zero, or
/// hand the tokens back with [`cancel`](Reservation::cancel). A refused
/// reservation changed nothing.
///
/// # Example
///
/// ```rust
/// use rate_guard_limiter::{Limiter, ManualClock, Rate};
/// use std::time::Duration;
///
/// let clock = ManualClock::new();
/// let limiter = Limiter::new(Rate::new(10.0).unwrap(), 1, &clock);
///
/// assert!(limiter.allow());
/// let reservation = limiter.reserve();
/// assert!(reservation.is_granted());
/// assert_eq!(reservation.delay(), Duration::from_millis(100));
///
/// // Not needed after all; the debt is forgiven.
/// reservation.cancel();
/// assert_eq!(limiter.available_tokens(), 0.0);
/// clock.advance(Duration::from_millis(100));
/// assert!(limiter.allow());
/// ```
#[must_use = "a granted reservation holds tokens until it is acted on or cancelled"]
pub struct Reservation<'a, C: Clock> {
    limiter: &'a Limiter<C>,
    granted: bool,
    tokens: Uint,
    time_to_act: Instant,
    rate: Rate,
}

impl<C: Clock> Limiter<C> {
    /// Runs the admission algorithm for `n` tokens at `at`, tolerating up to
    /// `max_wait` of delay. Commits to the ledger only when granted.
    pub(crate) fn reserve_at(&self, at: Instant, n: Uint, max_wait: Duration) -> Reservation<'_, C> {
        let mut ledger = self.ledger();

        if ledger.rate.is_infinite() {
            return Reservation {
                limiter: self,
                granted: true,
                tokens: n,
                time_to_act: at,
                rate: Rate::INFINITE,
            };
        }

        let at = ledger.clamp(at);
        let remaining = ledger.tokens_at(at) - n as f64;
        let wait = ledger.rate.duration_from_tokens(-remaining);

        let time_to_act = match at.checked_add(wait) {
            Some(time_to_act) if n <= ledger.max_tokens && wait <= max_wait => time_to_act,
            _ => {
                tracing::debug!(
                    requested = %n,
                    burst = %ledger.max_tokens,
                    ?wait,
                    ?max_wait,
                    "reservation refused"
                );
                return Reservation {
                    limiter: self,
                    granted: false,
                    tokens: n,
                    time_to_act: at,
                    rate: ledger.rate,
                };
            }
        };

        ledger.updated_at = at;
        ledger.tokens = remaining;
        ledger.event_at = time_to_act;
        tracing::trace!(requested = %n, balance = remaining, ?wait, "reservation granted");

        Reservation {
            limiter: self,
            granted: true,
            tokens: n,
            time_to_act,
            rate: ledger.rate,
        }
    }
}

impl<'a, C: Clock> Reservation<'a, C> {
    /// Whether the limiter admitted this request.
    pub fn is_granted(&self) -> bool {
        self.granted
    }

    /// Number of tokens requested.
    pub fn tokens(&self) -> Uint {
        self.tokens
    }

    /// Instant at which the reserved tokens may be used, if granted.
    pub fn time_to_act(&self) -> Option<Instant> {
        self.granted.then_some(self.time_to_act)
    }

    /// How long after `at` the caller must wait before acting.
    ///
    /// Zero once the time-to-act has passed; [`INFINITE_DURATION`] when the
    /// reservation was refused.
    pub fn delay_from(&self, at: Instant) -> Duration {
        if !self.granted {
            return INFINITE_DURATION;
        }
        self.time_to_act.saturating_duration_since(at)
    }

    /// [`delay_from`](Self::delay_from) the limiter clock's current instant.
    pub fn delay(&self) -> Duration {
        self.delay_from(self.limiter.clock.now())
    }

    /// Returns the unused tokens to the limiter as of now.
    pub fn cancel(self) {
        let now = self.limiter.clock.now();
        self.cancel_at(now);
    }

    /// Returns the unused tokens to the limiter as of `at`.
    ///
    /// Does nothing for refused or empty reservations, reservations whose
    /// time-to-act is already before `at`, and limiters without a rate limit.
    ///
    /// The rollback is exact only while this is the most recent reservation.
    /// Every reservation committed after it pushed the event horizon further
    /// out and consumed refill this one would otherwise return, so that share
    /// is withheld. Cancellation can therefore hand back less than was
    /// reserved, never more.
    pub fn cancel_at(self, at: Instant) {
        if !self.granted || self.tokens == 0 || self.time_to_act < at || self.rate.is_infinite() {
            return;
        }

        let mut ledger = self.limiter.ledger();
        if ledger.rate.is_infinite() {
            return;
        }

        let superseded = ledger.event_at.saturating_duration_since(self.time_to_act);
        let restore = self.tokens as f64 - self.rate.tokens_from_duration(superseded);
        if restore <= 0.0 {
            tracing::trace!(requested = %self.tokens, "cancellation absorbed by later reservations");
            return;
        }

        let at = ledger.clamp(at);
        ledger.tokens = (ledger.tokens_at(at) + restore).min(ledger.ceiling());
        ledger.updated_at = at;
        tracing::trace!(requested = %self.tokens, restore, balance = ledger.tokens, "reservation cancelled");

        if self.time_to_act == ledger.event_at {
            let rollback = self.rate.duration_from_tokens(self.tokens as f64);
            if let Some(previous) = self.time_to_act.checked_sub(rollback) {
                if previous >= at {
                    ledger.event_at = previous;
                }
            }
        }
    }
}

impl<C: Clock> fmt::Debug for Reservation<'_, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reservation")
            .field("granted", &self.granted)
            .field("tokens", &self.tokens)
            .field("time_to_act", &self.time_to_act)
            .field("rate", &self.rate)
            .finish()
    }
}
