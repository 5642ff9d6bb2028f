//! Time source abstraction: the clock behind token expiry.
//!
//! Expiry is *lazy* — nothing in the vault runs timers. Every expiry
//! decision is a comparison against "now" at verification time, so the
//! only thing we need from the environment is a millisecond timestamp.
//!
//! # Why a trait?
//!
//! Token lifetimes are 30 minutes and 28 days. Tests can't sleep that
//! long, and fiddling with the system clock is worse. The [`Clock`]
//! trait lets production code use the real wall clock ([`SystemClock`])
//! while tests and demos drive a [`ManualClock`] forward by hand.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// A source of "now", in milliseconds since the Unix epoch.
///
/// # Trait bounds
///
/// - `Send + Sync` → a clock handle can be shared freely; every
///   implementation here is read-mostly and interior-mutable at worst.
/// - `'static` → the clock doesn't borrow temporary data; it lives as
///   long as the vault that holds it.
pub trait Clock: Send + Sync + 'static {
    /// Returns the current time in milliseconds since the Unix epoch.
    fn now_ms(&self) -> u64;
}

/// The real wall clock. This is what production code uses.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        // SystemTime can in principle report a time before the epoch
        // (badly misconfigured host). Treat that as t=0 rather than
        // panicking — every token simply reads as freshly expired.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// A clock that only moves when told to. For tests and demos.
///
/// Cloning a `ManualClock` shares the underlying instant: hand one
/// clone to a [`TokenVault`](crate::TokenVault) and keep the other to
/// advance time from the outside.
///
/// ```rust
/// use lectern_token::{Clock, ManualClock};
///
/// let clock = ManualClock::new(1_000);
/// let handle = clock.clone();
/// clock.advance(500);
/// assert_eq!(handle.now_ms(), 1_500);
/// ```
#[derive(Debug, Clone)]
pub struct ManualClock {
    now_ms: Arc<AtomicU64>,
}

impl ManualClock {
    /// Creates a clock frozen at the given epoch-millisecond instant.
    pub fn new(start_ms: u64) -> Self {
        Self {
            now_ms: Arc::new(AtomicU64::new(start_ms)),
        }
    }

    /// Moves the clock forward by `delta_ms` milliseconds.
    pub fn advance(&self, delta_ms: u64) {
        self.now_ms.fetch_add(delta_ms, Ordering::Relaxed);
    }

    /// Jumps the clock to an absolute instant.
    pub fn set(&self, now_ms: u64) {
        self.now_ms.store(now_ms, Ordering::Relaxed);
    }
}

impl Clock for ManualClock {
    fn now_ms(&self) -> u64 {
        self.now_ms.load(Ordering::Relaxed)
    }
}
