//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing structured control events to the
//! ESP-IDF logger.  Operator-facing text goes to the console separately;
//! this is the developer trail.

use log::{debug, info, warn};

use crate::app::events::ControlEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`ControlEvent`].
#[derive(Default)]
pub struct LogEventSink;

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &ControlEvent) {
        match event {
            ControlEvent::ModeChanged { to, by_timeout } => {
                info!(
                    "MODE  | -> {:?}{}",
                    to,
                    if *by_timeout { " (inactivity timeout)" } else { "" }
                );
            }
            ControlEvent::OverrideApplied { actuator, on } => {
                info!("OVRD  | {} {}", actuator, if *on { "ON" } else { "OFF" });
            }
            ControlEvent::FanTestStarted { at_ms } => {
                info!("FTEST | started at {} ms", at_ms);
            }
            ControlEvent::FanTestFinished => {
                info!("FTEST | finished");
            }
            ControlEvent::GatedCommandIgnored => {
                debug!("CMD   | gated command ignored in AUTONOMOUS mode");
            }
            ControlEvent::UnknownCommand => {
                info!("CMD   | unknown command");
            }
            ControlEvent::QueryFailed(e) => {
                warn!("QUERY | failed: {}", e);
            }
            ControlEvent::TailServed {
                requested,
                matched,
                emitted,
            } => {
                info!(
                    "QUERY | tail n={} matched={} emitted={}",
                    requested, matched, emitted
                );
            }
        }
    }
}
