//! A token bucket admission controller for Rust applications.
//!
//! A [`Limiter`] decides, for a stream of events, whether and when each one
//! may proceed given a sustained [`Rate`] and a maximum burst. It is safe to
//! share between threads and never runs a background timer: the balance is
//! recomputed from elapsed time whenever it is needed.
//!
//! # Quick Start
//!
//! ```rust
//! use rate_guard_limiter::{Limiter, Rate};
//! use std::time::Duration;
//!
//! // 5 events per second, bursts of up to 10
//! let limiter = Limiter::with_system_clock(Rate::new(5.0).unwrap(), 10);
//!
//! if limiter.allow() {
//!     println!("Request allowed");
//! }
//!
//! // Block until 3 tokens are available
//! limiter.wait(3).unwrap();
//!
//! // Or reserve and decide later
//! let reservation = limiter.reserve_n(2);
//! if reservation.delay() > Duration::from_secs(1) {
//!     reservation.cancel();
//! }
//! ```
//!
//! # Core Concepts
//!
//! ## Reservations
//! Every admission goes through a reservation. A reservation commits tokens
//! at a possibly future time-to-act; the balance may go negative in the
//! meantime and is paid back by refill. [`allow_n`](Limiter::allow_n) only
//! accepts reservations with no delay, [`wait`](Limiter::wait) sleeps out the
//! delay, and [`reserve_n`](Limiter::reserve_n) hands the
//! [`Reservation`] to the caller, who may [`cancel`](Reservation::cancel) it.
//!
//! ## Time
//! Time comes from an injected [`Clock`]. [`SystemClock`] uses the real
//! monotonic clock; [`ManualClock`] only moves when told to, which makes
//! limiter behavior fully deterministic in tests.
//!
//! ## Reconfiguration
//! [`set_rate`](Limiter::set_rate) and [`set_burst`](Limiter::set_burst) take
//! effect immediately. Tokens accrued before the change are credited under
//! the old configuration.
//!
//! ## Error Handling
//! Only [`wait`](Limiter::wait) fails, with a [`WaitError`]:
//! - **[`ExceedsBurst`](WaitError::ExceedsBurst)** - the request can never fit in the bucket
//! - **[`CannotReserve`](WaitError::CannotReserve)** - the reservation was refused regardless
//!
//! Invalid rates are rejected up front with [`ConfigError`].
//!
//! ## Logging
//! Decisions are reported through [`tracing`] at `trace`/`debug` level; the
//! crate never installs a subscriber.

pub mod clock;
pub mod error;
pub mod limiter;
pub mod rate;
pub mod rate_limit;
pub mod types;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, WaitError, WaitResult};
pub use limiter::{Limiter, LimiterConfig, Reservation};
pub use rate::{Rate, INFINITE_DURATION};
pub use rate_limit::RateLimit;
pub use types::Uint;
