//! Control state, the one mutable record the command core owns.
//!
//! Initialised to safe-off defaults at boot and mutated only by the
//! [`Controller`](super::controller::Controller).  Nothing else holds a
//! reference to it between dispatches.

use core::fmt;

/// Binary signal level of an actuator line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Level {
    #[default]
    Low,
    High,
}

impl Level {
    pub fn is_high(self) -> bool {
        self == Self::High
    }
}

impl From<bool> for Level {
    fn from(on: bool) -> Self {
        if on { Self::High } else { Self::Low }
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        match level {
            Level::Low => 0,
            Level::High => 1,
        }
    }
}

/// The four relay-driven actuators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actuator {
    Heat,
    Fan,
    Pump,
    Light,
}

impl Actuator {
    pub const ALL: [Self; 4] = [Self::Heat, Self::Fan, Self::Pump, Self::Light];

    /// Operator-facing name used in confirmations.
    pub fn label(self) -> &'static str {
        match self {
            Self::Heat => "HEAT",
            Self::Fan => "FAN",
            Self::Pump => "PUMP",
            Self::Light => "LIGHT",
        }
    }
}

impl fmt::Display for Actuator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Who is in charge of the actuators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControlMode {
    /// The hysteresis loop drives actuators; override commands are ignored.
    #[default]
    Autonomous,
    /// Operator commands set actuator intents directly.
    Manual,
}

impl ControlMode {
    pub fn is_manual(self) -> bool {
        self == Self::Manual
    }
}

/// Local calendar date as reported by the RTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarDate {
    pub year: u16,
    pub month: u8,
    pub day: u8,
}

impl CalendarDate {
    pub const fn new(year: u16, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }
}

/// Latest environmental reading, supplied by the sensor driver.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SensorSnapshot {
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

/// Actuator intents, output levels, mode and bookkeeping timestamps.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ControlState {
    // ── Intents ───────────────────────────────────────────────
    pub heating: bool,
    pub cooling: bool,
    pub pumping: bool,
    pub lighting: bool,
    /// Light energised as a heat source rather than for photoperiod.
    pub light_heat: bool,

    pub mode: ControlMode,

    // ── Derived output levels ─────────────────────────────────
    pub heat: Level,
    pub fan: Level,
    pub pump: Level,
    pub light: Level,

    // ── Diagnostics ───────────────────────────────────────────
    /// Time of the most recent received command, recognised or not.
    pub last_command_ms: u64,
    pub cooling_trigger_ms: u64,
    pub test_fan_active: bool,
    pub test_fan_start_ms: u64,
    pub light_on_minutes: u32,
    pub light_heat_minutes: u32,
    pub last_logged_day: Option<u8>,
    pub previous_light: Level,
}

impl ControlState {
    /// Safe-off state used at boot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current level of one actuator line.
    pub fn level(&self, actuator: Actuator) -> Level {
        match actuator {
            Actuator::Heat => self.heat,
            Actuator::Fan => self.fan,
            Actuator::Pump => self.pump,
            Actuator::Light => self.light,
        }
    }
}
