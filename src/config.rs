//! Controller configuration parameters
//!
//! All tunable parameters for the command core and its poll loop.
//! Values can be overridden via NVS (non-volatile storage).

use serde::{Deserialize, Serialize};

/// Hard ceiling for the tail ring, whatever NVS says.
pub const TAIL_LINES_CEILING: u16 = 500;

/// Core controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    // --- Manual override ---
    /// Inactivity period (milliseconds) after which MANUAL reverts to AUTONOMOUS
    pub manual_timeout_ms: u32,

    // --- Log queries ---
    /// Largest count accepted by `TAIL <n>`
    pub max_tail_lines: u16,
    /// CSV file name on the log volume
    pub log_file_name: heapless::String<16>,

    // --- Timing / comms ---
    /// Poll loop interval (milliseconds)
    pub poll_interval_ms: u32,
    /// Console UART baud rate
    pub serial_baud: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        let mut log_file_name = heapless::String::new();
        let _ = log_file_name.push_str("DATA.CSV");

        Self {
            manual_timeout_ms: 10 * 60 * 1000, // 10 min
            max_tail_lines: 50,
            log_file_name,
            poll_interval_ms: 50,
            serial_baud: 9600,
        }
    }
}
