//! Injectable time sources.
//!
//! Nothing in the decision core reads the wall clock directly. Each entity owns one [`Clock`]
//! (shared between its blackboard TTLs and time-based nodes) so tests can drive time by hand.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;
use std::time::Instant;

pub trait Clock {
    /// Seconds since an arbitrary, fixed origin. Must never decrease.
    fn now(&self) -> f64;
}

/// Entities are single-threaded, so a plain `Rc` handle is enough to share a clock.
pub type SharedClock = Rc<dyn Clock>;

/// Hand-driven clock for deterministic simulations and tests.
///
/// Clones share the same underlying time, so a test can keep one handle and advance it while the
/// blackboard holds another.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn starting_at(seconds: f64) -> Self {
        let clock = Self::default();
        clock.set(seconds);
        clock
    }

    pub fn set(&self, seconds: f64) {
        self.now.set(seconds);
    }

    pub fn advance(&self, seconds: f64) {
        if seconds > 0.0 {
            self.now.set(self.now.get() + seconds);
        }
    }

    pub fn shared(&self) -> SharedClock {
        Rc::new(self.clone())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }
}

/// Real time, measured from construction.
#[derive(Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MonotonicClock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MonotonicClock")
            .field("elapsed", &self.origin.elapsed())
            .finish()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}
