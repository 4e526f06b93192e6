//! Unified error types for the controller firmware.
//!
//! Every failure in the command core is locally recovered: the dispatcher
//! turns these into a console diagnostic and carries on.  All variants are
//! `Copy` so they pass through the dispatcher without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Query errors
// ---------------------------------------------------------------------------

/// Failures of the log query engine and counter reporter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryError {
    /// `TAIL` without an argument.
    MissingCount,
    /// Tail count is not a number or is not positive.
    InvalidCount,
    /// Tail count exceeds the configured ring capacity.
    CountTooLarge { max: u16 },
    /// Wall clock not set, so "today" is unknown.
    ClockUnavailable,
    /// The log file could not be opened.
    OpenFailed,
    /// Reading the log file failed part-way through.
    ReadFailed,
    /// The counter image could not be read.
    CounterUnavailable,
}

impl fmt::Display for QueryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingCount => write!(f, "missing line count"),
            Self::InvalidCount => write!(f, "invalid line count"),
            Self::CountTooLarge { max } => write!(f, "line count above {max}"),
            Self::ClockUnavailable => write!(f, "clock not set"),
            Self::OpenFailed => write!(f, "open failed"),
            Self::ReadFailed => write!(f, "read failed"),
            Self::CounterUnavailable => write!(f, "counters unavailable"),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
