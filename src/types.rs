//! Unsigned integer type alias for token counts and burst sizes.
//!
//! `Uint` is the type of every whole-token quantity the limiter accepts:
//! the burst ceiling and the `n` passed to `allow_n`, `reserve_n` and `wait`.
//! The actual type is determined at compile time via feature flags.
//!
//! # Features
//! - `count-u64` (default): uses [`u64`] as `Uint`
//! - `count-u128`: uses [`u128`] as `Uint`
//!   (Both features cannot be enabled at the same time.)
//! - If neither feature is enabled, `u64` is used as the default type.

/// Alias for the unsigned integer type used for token counts.
///
/// The type is selected at compile time using feature flags:
/// - **`count-u64`** (default): uses [`u64`]
/// - **`count-u128`**: uses [`u128`]
///
/// > **Note:** Enabling both `count-u64` and `count-u128` at the same time
///   will result in a compile error. If neither is enabled, [`u64`] is used.
#[cfg(all(feature = "count-u64", feature = "count-u128"))]
compile_error!("You cannot enable both `count-u64` and `count-u128` features at the same time");

#[cfg(all(feature = "count-u64", not(feature = "count-u128")))]
pub type Uint = u64;

#[cfg(all(feature = "count-u128", not(feature = "count-u64")))]
pub type Uint = u128;

#[cfg(not(any(feature = "count-u64", feature = "count-u128")))]
pub type Uint = u64;
