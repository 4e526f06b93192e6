//! EEPROM counter reporter.
//!
//! Two `u32` counters are persisted by the light-tracking logic at fixed
//! offsets in the EEPROM image.  This module only reads them back and
//! reports whatever bytes are there, without any validation.

use crate::error::QueryError;

use super::ports::{Console, EepromPort, StorageError};

/// Cumulative minutes the light has been on.
pub const LIGHT_MINUTES_ADDR: usize = 0;
/// Cumulative minutes the light has been used as a heat source.
pub const LIGHT_HEAT_MINUTES_ADDR: usize = LIGHT_MINUTES_ADDR + COUNTER_WIDTH;

const COUNTER_WIDTH: usize = core::mem::size_of::<u32>();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersistedCounters {
    pub light_minutes: u32,
    pub light_heat_minutes: u32,
}

fn read_counter(eeprom: &impl EepromPort, addr: usize) -> Result<u32, StorageError> {
    let mut raw = [0u8; COUNTER_WIDTH];
    eeprom.read(addr, &mut raw)?;
    Ok(u32::from_le_bytes(raw))
}

/// Read both counters.
pub fn read_counters(eeprom: &impl EepromPort) -> Result<PersistedCounters, StorageError> {
    Ok(PersistedCounters {
        light_minutes: read_counter(eeprom, LIGHT_MINUTES_ADDR)?,
        light_heat_minutes: read_counter(eeprom, LIGHT_HEAT_MINUTES_ADDR)?,
    })
}

/// Read both counters and print them.
pub fn report(
    eeprom: &impl EepromPort,
    console: &mut impl Console,
) -> Result<PersistedCounters, QueryError> {
    let counters = read_counters(eeprom).map_err(|e| {
        log::warn!("Counters: EEPROM read failed: {}", e);
        QueryError::CounterUnavailable
    })?;
    console.write_line(&format!("📦 EEPROM LightMinutes: {}", counters.light_minutes));
    console.write_line(&format!(
        "📦 EEPROM LightHeatMinutes: {}",
        counters.light_heat_minutes
    ));
    Ok(counters)
}
