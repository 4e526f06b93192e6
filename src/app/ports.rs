//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ Controller (domain)
//! ```
//!
//! Driven adapters (relays, log volume, EEPROM image, clock, console, event
//! sinks) implement these traits.  The [`Controller`](super::controller::Controller)
//! consumes them via generics, so the command core never touches hardware
//! directly and can be exercised with injected fakes.

use crate::app::state::{Actuator, CalendarDate, Level};
use crate::config::ControllerConfig;

// ───────────────────────────────────────────────────────────────
// Output port (driven adapter: domain → relays)
// ───────────────────────────────────────────────────────────────

/// Write-side port: drives one actuator line to a level.
pub trait OutputPort {
    fn drive(&mut self, actuator: Actuator, level: Level);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

pub trait ClockPort {
    /// Milliseconds since boot (monotonic).
    fn now_ms(&self) -> u64;

    /// Today's local calendar date, or `None` while the wall clock is unset.
    fn today(&self) -> Option<CalendarDate>;
}

// ───────────────────────────────────────────────────────────────
// Log store port (driven adapter: domain ← CSV log volume)
// ───────────────────────────────────────────────────────────────

/// Read access to the append-only record file.
///
/// The returned reader is the file handle: dropping it closes the file,
/// so every exit path of a query releases it.
pub trait LogStorePort {
    type Reader: std::io::BufRead;

    fn open(&mut self, name: &str) -> Result<Self::Reader, StorageError>;
}

// ───────────────────────────────────────────────────────────────
// EEPROM port (read-only byte image)
// ───────────────────────────────────────────────────────────────

pub trait EepromPort {
    /// Fill `buf` with the bytes starting at `addr`.
    fn read(&self, addr: usize, buf: &mut [u8]) -> Result<(), StorageError>;
}

// ───────────────────────────────────────────────────────────────
// Console ports (operator-facing serial channel)
// ───────────────────────────────────────────────────────────────

/// Diagnostic channel the dispatcher reports on.
pub trait Console {
    /// Emit one line; the adapter appends the line terminator.
    fn write_line(&mut self, line: &str);

    /// Emit bytes verbatim (log file dumps).
    fn write_raw(&mut self, bytes: &[u8]);
}

/// Full serial channel: console output plus line-oriented input.
pub trait SerialPort: Console {
    /// Return the next complete input line, if one has arrived.
    fn read_line(&mut self) -> Option<heapless::String<LINE_CAPACITY>>;

    /// Throw away any buffered input that has not formed a line yet.
    fn discard_input(&mut self);
}

/// Longest accepted command line, excluding the terminator.
pub const LINE_CAPACITY: usize = 64;

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`ControlEvent`](super::events::ControlEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::ControlEvent);
}

// ───────────────────────────────────────────────────────────────
// Configuration port (driven adapter: domain ↔ persistent config)
// ───────────────────────────────────────────────────────────────

/// Loads and persists controller configuration.
///
/// Implementations MUST validate config values before persisting and
/// reject out-of-range values with [`ConfigError::ValidationFailed`].
pub trait ConfigPort {
    /// Load configuration from persistent storage.
    /// Returns [`ControllerConfig::default()`] if no stored config exists.
    fn load(&self) -> Result<ControllerConfig, ConfigError>;

    /// Validate and persist configuration.
    fn save(&self, config: &ControllerConfig) -> Result<(), ConfigError>;
}

// ───────────────────────────────────────────────────────────────
// Storage port (driven adapter: domain ↔ NVS / flash)
// ───────────────────────────────────────────────────────────────

/// Persistent key-value storage (NVS).
///
/// Keys are namespaced to prevent collisions between subsystems.
/// Write operations MUST be atomic, with no partial writes on power loss.
pub trait StoragePort {
    /// Read a value.  Returns the number of bytes written to `buf`.
    fn read(&self, namespace: &str, key: &str, buf: &mut [u8]) -> Result<usize, StorageError>;

    /// Write a value atomically.
    fn write(&mut self, namespace: &str, key: &str, data: &[u8]) -> Result<(), StorageError>;

    /// Delete a key.  Returns `Ok(())` even if the key didn't exist.
    fn delete(&mut self, namespace: &str, key: &str) -> Result<(), StorageError>;

    /// Check whether a key exists without reading it.
    fn exists(&self, namespace: &str, key: &str) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Error types
// ───────────────────────────────────────────────────────────────

/// Errors from [`ConfigPort`] operations.
#[derive(Debug)]
pub enum ConfigError {
    /// Stored config failed deserialization.
    Corrupted,
    /// A config field failed range validation.
    ValidationFailed(&'static str),
    /// Generic I/O error from the storage backend.
    IoError,
}

/// Errors from storage-backed ports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageError {
    /// Requested key or file does not exist.
    NotFound,
    /// Read past the end of a fixed-size image.
    OutOfBounds,
    /// Generic I/O error.
    IoError,
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Corrupted => write!(f, "config corrupted"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}

impl core::fmt::Display for StorageError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::NotFound => write!(f, "not found"),
            Self::OutOfBounds => write!(f, "out of bounds"),
            Self::IoError => write!(f, "I/O error"),
        }
    }
}
