//! Actuator drivers.

pub mod relay;
