use std::time::Instant;

use crate::rate::Rate;
use crate::types::Uint;

/// Mutable accounting state of a [`Limiter`](super::Limiter), guarded by its mutex.
///
/// `tokens` is the balance as of `updated_at` and is allowed to go negative:
/// a negative balance is debt already promised to reservations whose
/// time-to-act lies in the future. Refill pays it down lazily.
#[derive(Debug)]
pub(crate) struct Ledger {
    /// Refill rate in effect since `updated_at`
    pub(crate) rate: Rate,
    /// Burst ceiling; also the largest admissible single request
    pub(crate) max_tokens: Uint,
    /// Signed balance as of `updated_at`
    pub(crate) tokens: f64,
    /// Lazy refill watermark, never moves backwards
    pub(crate) updated_at: Instant,
    /// Time-to-act of the latest committed reservation
    pub(crate) event_at: Instant,
}

impl Ledger {
    /// A full ledger anchored at `now`.
    pub(crate) fn new(rate: Rate, burst: Uint, now: Instant) -> Self {
        Ledger {
            rate,
            max_tokens: burst,
            tokens: burst as f64,
            updated_at: now,
            event_at: now,
        }
    }

    #[inline]
    pub(crate) fn ceiling(&self) -> f64 {
        self.max_tokens as f64
    }

    /// Stale instants are treated as `updated_at`; accounting time never flows backwards.
    #[inline]
    pub(crate) fn clamp(&self, at: Instant) -> Instant {
        at.max(self.updated_at)
    }

    /// Balance projected to `at` under the current configuration.
    ///
    /// Capped at the burst ceiling but not floored: debt is returned as a
    /// negative number. Does not modify the ledger.
    pub(crate) fn tokens_at(&self, at: Instant) -> f64 {
        let elapsed = self.clamp(at).duration_since(self.updated_at);
        let tokens = self.tokens + self.rate.tokens_from_duration(elapsed);
        tokens.min(self.ceiling())
    }

    /// Balance at `at` as callers see it, within `[0, burst]`.
    pub(crate) fn available_at(&self, at: Instant) -> f64 {
        self.tokens_at(at).max(0.0)
    }

    /// Folds accrued tokens into the balance and moves the watermark to `at`.
    /// Returns the effective (clamped) instant.
    pub(crate) fn advance_to(&mut self, at: Instant) -> Instant {
        let at = self.clamp(at);
        self.tokens = self.tokens_at(at);
        self.updated_at = at;
        at
    }

    /// Installs a new rate after accruing everything owed under the old one.
    pub(crate) fn set_rate(&mut self, at: Instant, rate: Rate) {
        self.advance_to(at);
        self.rate = rate;
    }

    /// Installs a new burst ceiling.
    ///
    /// The balance is projected under the old ceiling, then clipped to the new
    /// one. Outstanding reservations lose their rollback anchor because the
    /// clip may already have discarded value they would hand back.
    pub(crate) fn set_burst(&mut self, at: Instant, burst: Uint) {
        let at = self.advance_to(at);
        self.max_tokens = burst;
        self.tokens = self.tokens.min(self.ceiling());
        self.event_at = at;
    }
}
