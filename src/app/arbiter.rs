//! Manual override arbiter.
//!
//! Two states, AUTONOMOUS (boot) and MANUAL.  Only `M ON` / `M OFF` and
//! the inactivity timeout move between them.
//!
//! ```text
//!              M ON
//!   AUTONOMOUS ─────▶ MANUAL
//!        ▲              │
//!        └──────────────┘
//!          M OFF / timeout
//! ```
//!
//! MANUAL unlocks the gated command branch of the dispatcher.  The time of
//! every received command is recorded in both modes; the supervisory tick
//! compares it against the configured timeout.

use log::info;

use super::state::{ControlMode, ControlState};

/// Note receipt of a command line, recognised or not.
pub fn record_command(state: &mut ControlState, now_ms: u64) {
    state.last_command_ms = now_ms;
}

/// Switch mode.  Returns `true` if the mode actually changed.
pub fn set_mode(state: &mut ControlState, mode: ControlMode) -> bool {
    let changed = state.mode != mode;
    if changed {
        info!("Arbiter: {:?} -> {:?}", state.mode, mode);
    }
    state.mode = mode;
    changed
}

/// Whether gated (override) commands are honoured right now.
pub fn overrides_allowed(state: &ControlState) -> bool {
    state.mode.is_manual()
}

/// True when MANUAL has seen no command for at least `timeout_ms`.
pub fn manual_timed_out(state: &ControlState, now_ms: u64, timeout_ms: u32) -> bool {
    state.mode.is_manual()
        && now_ms.saturating_sub(state.last_command_ms) >= u64::from(timeout_ms)
}
