//! Outbound control events.
//!
//! The [`Controller`](super::controller::Controller) emits these through the
//! [`EventSink`](super::ports::EventSink) port alongside the operator-facing
//! console text.  Adapters decide what to do with them.

use crate::error::QueryError;

use super::state::{Actuator, ControlMode};

/// Structured events emitted by the command core.
#[derive(Debug, Clone, PartialEq)]
pub enum ControlEvent {
    /// The arbiter switched mode (by command or timeout).
    ModeChanged { to: ControlMode, by_timeout: bool },

    /// An override set one actuator intent.
    OverrideApplied { actuator: Actuator, on: bool },

    /// Fan self-test armed at the given uptime.
    FanTestStarted { at_ms: u64 },

    /// Fan self-test window closed.
    FanTestFinished,

    /// A gated command arrived while AUTONOMOUS and was dropped.
    GatedCommandIgnored,

    /// Text matched no command while MANUAL.
    UnknownCommand,

    /// A log or counter query failed.
    QueryFailed(QueryError),

    /// A tail query finished.
    TailServed { requested: u32, matched: usize, emitted: usize },
}
