//! Application core: pure domain logic, zero I/O.
//!
//! This module contains the command core of the controller: the control
//! state record, the output applier, the manual override arbiter, the fan
//! self-test timer, the log query engine, the EEPROM counter reporter and
//! the dispatcher that ties them together.  All interaction with hardware
//! happens through **port traits** defined in [`ports`], keeping this layer
//! fully testable without real peripherals.

pub mod arbiter;
pub mod commands;
pub mod controller;
pub mod counters;
pub mod events;
pub mod log_query;
pub mod outputs;
pub mod ports;
pub mod state;
