//! Output applier.
//!
//! Translates the intent flags of [`ControlState`] into line levels and
//! drives every relay through the [`OutputPort`].  Called with `&mut`
//! access to the state, so nothing can observe an intent change before
//! its level has been re-derived and written out.

use super::ports::OutputPort;
use super::state::{Actuator, ControlState, Level};

/// Recompute the four output levels from the current intents.
pub fn derive_levels(state: &mut ControlState) {
    state.heat = Level::from(state.heating);
    // A running self-test holds the fan on regardless of the cooling intent.
    state.fan = Level::from(state.cooling || state.test_fan_active);
    state.pump = Level::from(state.pumping);
    state.light = Level::from(state.lighting || state.light_heat);
}

/// Drive every actuator line to the level stored in `state`.
pub fn drive_outputs(state: &ControlState, hw: &mut impl OutputPort) {
    for actuator in Actuator::ALL {
        hw.drive(actuator, state.level(actuator));
    }
}

/// Derive and drive in one step.
pub fn apply(state: &mut ControlState, hw: &mut impl OutputPort) {
    derive_levels(state);
    drive_outputs(state, hw);
}
