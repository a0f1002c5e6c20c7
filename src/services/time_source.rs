//! Time source abstraction for testability.
//!
//! The exit guard measures the gap between two back presses. Production code
//! reads the monotonic clock through [`RealTimeSource`]; tests drive a
//! [`TestTimeSource`] forward explicitly so timing behaviour is deterministic
//! and nothing ever sleeps.

use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Abstraction over the monotonic clock.
pub trait TimeSource: fmt::Debug {
    /// Get the current instant for measuring elapsed time.
    fn now(&self) -> Instant;

    /// Calculate elapsed time since an earlier instant.
    fn elapsed_since(&self, earlier: Instant) -> Duration {
        self.now().saturating_duration_since(earlier)
    }
}

/// Type alias for a shared time source.
///
/// Everything that reads time lives on the control thread, so a plain `Rc`
/// is enough.
pub type SharedTimeSource = Rc<dyn TimeSource>;

/// Production implementation using the system monotonic clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct RealTimeSource;

impl RealTimeSource {
    pub fn new() -> Self {
        Self
    }

    /// Create a shared RealTimeSource.
    pub fn shared() -> SharedTimeSource {
        Rc::new(Self)
    }
}

impl TimeSource for RealTimeSource {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Test implementation with controllable time.
///
/// `now()` returns a fixed base instant plus a logical offset that only
/// moves when [`TestTimeSource::advance`] is called.
///
/// # Example
///
/// ```
/// use burrow::services::time_source::{TestTimeSource, TimeSource};
/// use std::time::Duration;
///
/// let time = TestTimeSource::new();
/// let start = time.now();
/// time.advance(Duration::from_millis(3600));
/// assert_eq!(time.elapsed_since(start), Duration::from_millis(3600));
/// ```
#[derive(Debug)]
pub struct TestTimeSource {
    /// Logical time in nanoseconds since creation.
    logical_nanos: AtomicU64,
    base_instant: Instant,
}

impl Default for TestTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTimeSource {
    pub fn new() -> Self {
        Self {
            logical_nanos: AtomicU64::new(0),
            base_instant: Instant::now(),
        }
    }

    /// Create a shared TestTimeSource.
    ///
    /// Keep the returned `Rc` to advance time; clone it into anything that
    /// needs a [`SharedTimeSource`].
    pub fn shared() -> Rc<Self> {
        Rc::new(Self::new())
    }

    /// Advance logical time by the given duration.
    pub fn advance(&self, duration: Duration) {
        self.logical_nanos
            .fetch_add(duration.as_nanos() as u64, Ordering::SeqCst);
    }

    /// Logical time elapsed since creation.
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.logical_nanos.load(Ordering::SeqCst))
    }
}

impl TimeSource for TestTimeSource {
    fn now(&self) -> Instant {
        self.base_instant + self.elapsed()
    }
}
