//! Relay driver (one active-HIGH actuator line).
//!
//! Generic over any [`embedded_hal::digital::OutputPin`]: an ESP-IDF
//! `PinDriver` on the device, an in-memory pin in host tests.
//!
//! ## Safety contract
//!
//! The driver is a dumb actuator.  Which level a line should carry is
//! decided by the output applier; this module only writes it and
//! remembers what was written.

use embedded_hal::digital::{OutputPin, PinState};
use log::warn;

use crate::app::state::Level;

impl From<Level> for PinState {
    fn from(level: Level) -> Self {
        match level {
            Level::High => PinState::High,
            Level::Low => PinState::Low,
        }
    }
}

pub struct Relay<P> {
    pin: P,
    name: &'static str,
    level: Level,
    write_failures: u32,
}

impl<P: OutputPin> Relay<P> {
    /// Wrap `pin` and force it LOW.
    pub fn new(pin: P, name: &'static str) -> Self {
        let mut relay = Self {
            pin,
            name,
            level: Level::Low,
            write_failures: 0,
        };
        relay.set(Level::Low);
        relay
    }

    pub fn set(&mut self, level: Level) {
        if let Err(e) = self.pin.set_state(level.into()) {
            self.write_failures = self.write_failures.saturating_add(1);
            warn!("Relay {}: write {:?} failed: {:?}", self.name, level, e);
            return;
        }
        self.level = level;
    }

    /// Last level successfully written.
    pub fn level(&self) -> Level {
        self.level
    }

    pub fn write_failures(&self) -> u32 {
        self.write_failures
    }
}
