//! GPIO / peripheral pin assignments for the controller board.
//!
//! Single source of truth: every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Actuator relays (active HIGH)
// ---------------------------------------------------------------------------

/// Heater relay.
pub const HEAT_GPIO: i32 = 7;
/// Circulation / cooling fan relay.
pub const FAN_GPIO: i32 = 8;
/// Grow light relay (also used as a secondary heat source).
pub const LIGHT_GPIO: i32 = 6;
/// Irrigation pump relay.
pub const PUMP_GPIO: i32 = 5;

// ---------------------------------------------------------------------------
// SD card (SPI)
// ---------------------------------------------------------------------------

pub const SD_SCLK_GPIO: i32 = 12;
pub const SD_MOSI_GPIO: i32 = 11;
pub const SD_MISO_GPIO: i32 = 13;
pub const SD_CS_GPIO: i32 = 10;

// ---------------------------------------------------------------------------
// UART console
// ---------------------------------------------------------------------------

pub const UART_TX_GPIO: i32 = 43;
pub const UART_RX_GPIO: i32 = 44;
