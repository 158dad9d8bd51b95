//! error.rs
//! Defines the configuration and wait error/result types.

use crate::types::Uint;

/// Error returned when a rate or limiter configuration is invalid.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The rate was zero, negative or NaN. A finite rate must be strictly positive.
    #[error("Invalid rate: must be positive events per second, got {0}")]
    InvalidRate(f64),
}

/// Error type for [`Limiter::wait`](crate::Limiter::wait).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WaitError {
    /// Request permanently exceeds the configured burst.
    ///
    /// Waiting longer cannot help; only a larger burst can.
    #[error("wait(n={requested}) exceeds limiter's burst {burst}")]
    ExceedsBurst {
        requested: Uint,
        burst: Uint,
    },
    /// The reservation was refused even with unbounded wait tolerance.
    ///
    /// Only reachable when the burst shrinks between the burst check and the
    /// reservation, or when the computed delay overflows the clock.
    #[error("wait(n={requested}) cannot reserve tokens")]
    CannotReserve {
        requested: Uint,
    },
}

/// Result type for [`Limiter::wait`](crate::Limiter::wait).
pub type WaitResult = Result<(), WaitError>;
