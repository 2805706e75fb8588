//! Bounded retry for bus transfers
//!
//! Every transport routes its transfers through one [`RetryPolicy`]: up to
//! `attempts` tries separated by a fixed `delay_ms`. There is no background
//! retry and no timeout beyond the attempt count; after the last failure the
//! error is handed back to the caller.
//!
//! ## Example
//!
//! ```
//! use embedded_hal::delay::DelayNs;
//! use monoraster::RetryPolicy;
//! # struct NoDelay;
//! # impl DelayNs for NoDelay { fn delay_ns(&mut self, _ns: u32) {} }
//!
//! let policy = RetryPolicy::new(3, 100);
//! let mut calls = 0;
//! let result: Result<(), &str> = policy.run(&mut NoDelay, |_| {
//!     calls += 1;
//!     if calls < 2 { Err("nack") } else { Ok(()) }
//! });
//! assert!(result.is_ok());
//! assert_eq!(calls, 2);
//! ```

use core::fmt::Debug;
use embedded_hal::delay::DelayNs;

/// Default number of transfer attempts
pub const DEFAULT_ATTEMPTS: u8 = 3;

/// Default delay between attempts in milliseconds
pub const DEFAULT_RETRY_DELAY_MS: u32 = 100;

/// Retry policy for bus transfers
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of attempts (0 is treated as 1)
    pub attempts: u8,
    /// Delay between attempts in milliseconds
    pub delay_ms: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            attempts: DEFAULT_ATTEMPTS,
            delay_ms: DEFAULT_RETRY_DELAY_MS,
        }
    }
}

impl RetryPolicy {
    /// Create a new policy
    pub const fn new(attempts: u8, delay_ms: u32) -> Self {
        Self { attempts, delay_ms }
    }

    /// A policy that tries exactly once
    pub const fn no_retry() -> Self {
        Self {
            attempts: 1,
            delay_ms: 0,
        }
    }

    /// Run `op` until it succeeds or the attempt budget is spent
    ///
    /// `op` receives the delay so it can time its own bus activity. The
    /// back-off delay is only taken between attempts, never after the last one.
    ///
    /// # Errors
    ///
    /// Returns the error of the final attempt.
    pub fn run<T, E, D, F>(&self, delay: &mut D, mut op: F) -> Result<T, E>
    where
        E: Debug,
        D: DelayNs,
        F: FnMut(&mut D) -> Result<T, E>,
    {
        let attempts = self.attempts.max(1);
        let mut attempt = 1;
        loop {
            match op(delay) {
                Ok(value) => return Ok(value),
                Err(e) if attempt >= attempts => {
                    log::error!("transfer failed after {attempts} attempts: {e:?}");
                    return Err(e);
                }
                Err(e) => {
                    log::warn!("transfer attempt {attempt}/{attempts} failed: {e:?}");
                    delay.delay_ms(self.delay_ms);
                    attempt += 1;
                }
            }
        }
    }
}
