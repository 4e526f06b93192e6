//! Hardware adapter bridging real peripherals to domain port traits.
//!
//! Owns the relay bank, the log volume, the EEPROM image and the clock,
//! exposing them through [`OutputPort`], [`LogStorePort`], [`EepromPort`]
//! and [`ClockPort`].  The controller takes it as one
//! `&mut (impl OutputPort + LogStorePort + …)` argument.

use embedded_hal::digital::OutputPin;

use crate::app::ports::{ClockPort, EepromPort, LogStorePort, OutputPort, StorageError};
use crate::app::state::{Actuator, CalendarDate, Level};
use crate::drivers::relay::Relay;

// ── Relay bank ────────────────────────────────────────────────

/// The four actuator relays.
pub struct RelayBank<P> {
    heat: Relay<P>,
    fan: Relay<P>,
    pump: Relay<P>,
    light: Relay<P>,
}

impl<P: OutputPin> RelayBank<P> {
    /// Take ownership of the four pins; every line starts LOW.
    pub fn new(heat: P, fan: P, pump: P, light: P) -> Self {
        Self {
            heat: Relay::new(heat, "heat"),
            fan: Relay::new(fan, "fan"),
            pump: Relay::new(pump, "pump"),
            light: Relay::new(light, "light"),
        }
    }

    fn relay_mut(&mut self, actuator: Actuator) -> &mut Relay<P> {
        match actuator {
            Actuator::Heat => &mut self.heat,
            Actuator::Fan => &mut self.fan,
            Actuator::Pump => &mut self.pump,
            Actuator::Light => &mut self.light,
        }
    }

    /// Level last written to a line.
    pub fn level(&self, actuator: Actuator) -> Level {
        match actuator {
            Actuator::Heat => self.heat.level(),
            Actuator::Fan => self.fan.level(),
            Actuator::Pump => self.pump.level(),
            Actuator::Light => self.light.level(),
        }
    }
}

impl<P: OutputPin> OutputPort for RelayBank<P> {
    fn drive(&mut self, actuator: Actuator, level: Level) {
        self.relay_mut(actuator).set(level);
    }
}

// ── Board adapter ─────────────────────────────────────────────

/// Concrete adapter that combines all board peripherals behind port traits.
pub struct HardwareAdapter<P, L, E, C> {
    relays: RelayBank<P>,
    logs: L,
    eeprom: E,
    clock: C,
}

impl<P, L, E, C> HardwareAdapter<P, L, E, C> {
    pub fn new(relays: RelayBank<P>, logs: L, eeprom: E, clock: C) -> Self {
        Self {
            relays,
            logs,
            eeprom,
            clock,
        }
    }

    pub fn relays(&self) -> &RelayBank<P> {
        &self.relays
    }
}

impl<P: OutputPin, L, E, C> OutputPort for HardwareAdapter<P, L, E, C> {
    fn drive(&mut self, actuator: Actuator, level: Level) {
        self.relays.drive(actuator, level);
    }
}

impl<P, L: LogStorePort, E, C> LogStorePort for HardwareAdapter<P, L, E, C> {
    type Reader = L::Reader;

    fn open(&mut self, name: &str) -> Result<Self::Reader, StorageError> {
        self.logs.open(name)
    }
}

impl<P, L, E: EepromPort, C> EepromPort for HardwareAdapter<P, L, E, C> {
    fn read(&self, addr: usize, buf: &mut [u8]) -> Result<(), StorageError> {
        self.eeprom.read(addr, buf)
    }
}

impl<P, L, E, C: ClockPort> ClockPort for HardwareAdapter<P, L, E, C> {
    fn now_ms(&self) -> u64 {
        self.clock.now_ms()
    }

    fn today(&self) -> Option<CalendarDate> {
        self.clock.today()
    }
}
