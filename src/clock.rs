//! Clocks
//!
//! The register never reads the system time directly; it asks a [`Clock`], so tests can
//! pin "now" to a known instant.

use jiff::{Timestamp, Zoned, tz::TimeZone};

/// Source of the current time.
pub trait Clock: std::fmt::Debug {
    /// The current instant, in the time zone sales are bucketed by.
    fn now(&self) -> Zoned;
}

/// Wall-clock time in a fixed time zone.
#[derive(Debug, Clone)]
pub struct SystemClock {
    time_zone: TimeZone,
}

impl SystemClock {
    /// Use the system time zone.
    pub fn new() -> Self {
        Self::with_time_zone(TimeZone::system())
    }

    /// Use an explicit time zone.
    pub fn with_time_zone(time_zone: TimeZone) -> Self {
        Self { time_zone }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Zoned {
        Timestamp::now().to_zoned(self.time_zone.clone())
    }
}

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct FixedClock {
    now: std::cell::RefCell<Zoned>,
}

impl FixedClock {
    /// Pin the clock to `now`.
    pub fn new(now: Zoned) -> Self {
        Self {
            now: std::cell::RefCell::new(now),
        }
    }

    /// Move the clock to `now`.
    pub fn set(&self, now: Zoned) {
        *self.now.borrow_mut() = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> Zoned {
        self.now.borrow().clone()
    }
}

impl<C: Clock + ?Sized> Clock for std::rc::Rc<C> {
    fn now(&self) -> Zoned {
        (**self).now()
    }
}
