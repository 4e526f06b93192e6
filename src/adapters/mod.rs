//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements    | Connects to                    |
//! |------------|---------------|--------------------------------|
//! | `hardware` | OutputPort    | Relay GPIOs                    |
//! |            | LogStorePort  | (delegates to `sd_log`)        |
//! |            | EepromPort    | (delegates to `eeprom`)        |
//! |            | ClockPort     | (delegates to `time`)          |
//! | `sd_log`   | LogStorePort  | FAT volume on the SD card      |
//! | `eeprom`   | EepromPort    | Counter image in NVS           |
//! | `nvs`      | ConfigPort    | NVS / in-memory store          |
//! |            | StoragePort   |                                |
//! | `serial`   | SerialPort    | Console UART                   |
//! | `time`     | ClockPort     | ESP32 system timer + RTC       |
//! | `log_sink` | EventSink     | Serial log output              |

pub mod eeprom;
pub mod hardware;
pub mod log_sink;
pub mod nvs;
pub mod sd_log;
pub mod serial;
pub mod time;
