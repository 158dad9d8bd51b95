//! Object-safe admission trait.
//!
//! This module defines the trait callers can hold instead of a concrete
//! [`Limiter`](crate::Limiter), so admission can be swapped out or faked
//! behind a `Box<dyn RateLimit>`.

use crate::clock::Clock;
use crate::error::WaitResult;
use crate::limiter::Limiter;
use crate::types::Uint;

/// The admission operations exposed by a rate limiter.
pub trait RateLimit: Send + Sync {
    /// Takes `n` tokens if they are available right now.
    ///
    /// # Returns
    /// `true` if admitted; `false` leaves the limiter untouched.
    fn allow_n(&self, n: Uint) -> bool;

    /// Takes one token if available right now.
    fn allow(&self) -> bool {
        self.allow_n(1)
    }

    /// Blocks until `n` tokens can be used.
    ///
    /// # Returns
    /// * `Ok(())` once the tokens are usable
    /// * `Err(WaitError)` if the request can never be satisfied
    fn wait(&self, n: Uint) -> WaitResult;

    /// Tokens currently available, between zero and the burst.
    fn available_tokens(&self) -> f64;
}

impl<C: Clock + Send + Sync> RateLimit for Limiter<C> {
    #[inline(always)]
    fn allow_n(&self, n: Uint) -> bool {
        Limiter::allow_n(self, n)
    }

    #[inline(always)]
    fn wait(&self, n: Uint) -> WaitResult {
        Limiter::wait(self, n)
    }

    #[inline(always)]
    fn available_tokens(&self) -> f64 {
        Limiter::available_tokens(self)
    }
}
