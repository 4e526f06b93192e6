//! Command dispatcher, the hexagonal core.
//!
//! [`Controller`] owns the [`ControlState`] and the live configuration.
//! Each poll cycle the main loop hands it at most one serial line; the
//! controller parses it, applies the mode gate, mutates state, re-drives
//! the relays and reports on the console.  All I/O flows through port
//! traits passed in at the call site.
//!
//! ```text
//!  SerialPort ──▶ ┌────────────────────────────┐ ──▶ Console
//!                 │        Controller          │
//!  LogStore   ──▶ │ Arbiter · Applier · Tail   │ ──▶ OutputPort
//!  Eeprom     ──▶ │ FanTest · Counters         │ ──▶ EventSink
//!                 └────────────────────────────┘
//! ```

use log::{debug, info, warn};

use crate::config::ControllerConfig;
use crate::error::QueryError;

use super::commands::{Command, HELP_LINES, TailArg};
use super::events::ControlEvent;
use super::ports::{ClockPort, Console, EepromPort, EventSink, LogStorePort, OutputPort, SerialPort};
use super::state::{Actuator, ControlMode, ControlState, Level, SensorSnapshot};
use super::{arbiter, counters, fan_test, log_query, outputs};

/// What the dispatcher did with a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Unconditional command, served in either mode.
    Handled,
    /// Gated command processed in MANUAL mode (unknown text included).
    Overridden,
    /// Gated command dropped because the controller is AUTONOMOUS.
    Ignored,
}

pub struct Controller {
    state: ControlState,
    config: ControllerConfig,
    sensors: SensorSnapshot,
}

impl Controller {
    pub fn new(config: ControllerConfig) -> Self {
        Self {
            state: ControlState::new(),
            config,
            sensors: SensorSnapshot::default(),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive the safe-off boot levels onto every relay and pick up the
    /// persisted light counters, so `STAT` and `DUMP EEPROM` agree.
    pub fn start(&mut self, hw: &mut (impl OutputPort + EepromPort)) {
        outputs::apply(&mut self.state, hw);
        match counters::read_counters(&*hw) {
            Ok(c) => {
                self.state.light_on_minutes = c.light_minutes;
                self.state.light_heat_minutes = c.light_heat_minutes;
            }
            Err(e) => warn!("Counters unavailable at start, starting from 0: {}", e),
        }
        info!("Controller started in {:?} mode", self.state.mode);
    }

    /// Store the latest reading from the sensor driver for `STAT`.
    pub fn update_sensors(&mut self, snapshot: SensorSnapshot) {
        self.sensors = snapshot;
    }

    // ── Per-tick entry points ─────────────────────────────────

    /// Serve at most one pending serial line.
    ///
    /// Residual input is discarded after a gated command has been handled,
    /// so a burst of pasted overrides cannot queue up behind it.
    pub fn poll_serial(
        &mut self,
        serial: &mut impl SerialPort,
        hw: &mut (impl OutputPort + LogStorePort + EepromPort + ClockPort),
        sink: &mut impl EventSink,
    ) -> Option<DispatchOutcome> {
        let line = serial.read_line()?;
        let outcome = self.dispatch(line.as_str(), hw, &mut *serial, sink);
        if outcome == DispatchOutcome::Overridden {
            serial.discard_input();
        }
        Some(outcome)
    }

    /// Interpret one command line.
    pub fn dispatch(
        &mut self,
        line: &str,
        hw: &mut (impl OutputPort + LogStorePort + EepromPort + ClockPort),
        console: &mut impl Console,
        sink: &mut impl EventSink,
    ) -> DispatchOutcome {
        let now_ms = hw.now_ms();
        arbiter::record_command(&mut self.state, now_ms);

        let cmd = Command::parse(line);
        debug!("Dispatch: {:?} (mode={:?})", cmd, self.state.mode);

        if !cmd.is_gated() {
            self.run_unconditional(cmd, hw, console, sink);
            return DispatchOutcome::Handled;
        }

        // Out-of-mode overrides get no console feedback.
        if !arbiter::overrides_allowed(&self.state) {
            sink.emit(&ControlEvent::GatedCommandIgnored);
            return DispatchOutcome::Ignored;
        }

        self.run_gated(cmd, now_ms, hw, console, sink);
        outputs::apply(&mut self.state, hw);
        DispatchOutcome::Overridden
    }

    /// Housekeeping for the poll loop: closes an elapsed fan self-test
    /// window and drops back to AUTONOMOUS after operator inactivity.
    pub fn supervise(
        &mut self,
        hw: &mut (impl OutputPort + ClockPort),
        console: &mut impl Console,
        sink: &mut impl EventSink,
    ) {
        let now_ms = hw.now_ms();

        if fan_test::expire_if_due(&mut self.state, now_ms, fan_test::DURATION_MS) {
            outputs::apply(&mut self.state, hw);
            console.write_line("🧪 Fan test finished");
            sink.emit(&ControlEvent::FanTestFinished);
        }

        if arbiter::manual_timed_out(&self.state, now_ms, self.config.manual_timeout_ms) {
            arbiter::set_mode(&mut self.state, ControlMode::Autonomous);
            console.write_line("⏱️ Manual override timed out, returned to AUTONOMOUS mode");
            sink.emit(&ControlEvent::ModeChanged {
                to: ControlMode::Autonomous,
                by_timeout: true,
            });
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn state(&self) -> &ControlState {
        &self.state
    }

    pub fn mode(&self) -> ControlMode {
        self.state.mode
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// One-line status snapshot, as printed by `STAT`.
    pub fn status_line(&self) -> String {
        let s = &self.state;
        format!(
            "🌡️ Temp: {:.2} C, 💧 Humidity: {:.2} %, 🔥 Heat: {}, 🌀 Fan: {}, 💡 Light: {}, ⏱️ Lm: {}, MODE: {}",
            self.sensors.temperature_c,
            self.sensors.humidity_pct,
            u8::from(s.heat),
            u8::from(s.fan),
            u8::from(s.light),
            s.light_on_minutes,
            u8::from(s.mode.is_manual()),
        )
    }

    // ── Internal ──────────────────────────────────────────────

    fn run_unconditional(
        &mut self,
        cmd: Command,
        hw: &mut (impl LogStorePort + EepromPort + ClockPort),
        console: &mut impl Console,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            Command::SetMode(mode) => {
                if arbiter::set_mode(&mut self.state, mode) {
                    sink.emit(&ControlEvent::ModeChanged { to: mode, by_timeout: false });
                }
                console.write_line(match mode {
                    ControlMode::Manual => "🔧 Manual override ENABLED",
                    ControlMode::Autonomous => "🔄 Returned to AUTONOMOUS mode",
                });
            }
            Command::Status => console.write_line(&self.status_line()),
            Command::ReadLog => {
                if let Err(e) = log_query::dump_log(hw, &self.config.log_file_name, console) {
                    self.report_query_error(e, console, sink);
                }
            }
            Command::Tail(arg) => self.serve_tail(arg, hw, console, sink),
            Command::DumpEeprom => {
                if let Err(e) = counters::report(&*hw, console) {
                    self.report_query_error(e, console, sink);
                }
            }
            Command::Help => {
                for line in HELP_LINES {
                    console.write_line(line);
                }
            }
            Command::Override { .. } | Command::TestFan | Command::Unrecognized => {}
        }
    }

    fn serve_tail(
        &mut self,
        arg: TailArg,
        hw: &mut (impl LogStorePort + ClockPort),
        console: &mut impl Console,
        sink: &mut impl EventSink,
    ) {
        let count = match log_query::tail_capacity(arg, self.config.max_tail_lines) {
            Ok(count) => count,
            Err(e) => return self.report_query_error(e, console, sink),
        };
        let Some(today) = hw.today() else {
            return self.report_query_error(QueryError::ClockUnavailable, console, sink);
        };

        match log_query::tail_today(hw, &self.config.log_file_name, today, count, console) {
            Ok(summary) => sink.emit(&ControlEvent::TailServed {
                requested: count.get() as u32,
                matched: summary.matched,
                emitted: summary.emitted,
            }),
            Err(e) => self.report_query_error(e, console, sink),
        }
    }

    fn run_gated(
        &mut self,
        cmd: Command,
        now_ms: u64,
        hw: &mut impl OutputPort,
        console: &mut impl Console,
        sink: &mut impl EventSink,
    ) {
        match cmd {
            Command::Override { actuator, on } => {
                self.set_intent(actuator, on, now_ms);
                console.write_line(&format!(
                    "🛠️ {} overridden {}",
                    actuator.label(),
                    if on { "ON" } else { "OFF" }
                ));
                sink.emit(&ControlEvent::OverrideApplied { actuator, on });
            }
            Command::TestFan => {
                fan_test::arm(&mut self.state, now_ms);
                hw.drive(Actuator::Fan, Level::High);
                console.write_line(&format!(
                    "🧪 Fan test started ({}s)",
                    fan_test::DURATION_MS / 1000
                ));
                sink.emit(&ControlEvent::FanTestStarted { at_ms: now_ms });
            }
            _ => {
                console.write_line("❓ Unknown command");
                sink.emit(&ControlEvent::UnknownCommand);
            }
        }
    }

    fn set_intent(&mut self, actuator: Actuator, on: bool, now_ms: u64) {
        let s = &mut self.state;
        match (actuator, on) {
            (Actuator::Heat, true) => {
                s.heating = true;
                s.cooling = false;
            }
            (Actuator::Heat, false) => s.heating = false,
            (Actuator::Fan, true) => {
                s.cooling = true;
                s.cooling_trigger_ms = now_ms;
            }
            (Actuator::Fan, false) => s.cooling = false,
            (Actuator::Light, on) => {
                s.lighting = on;
                s.light_heat = false;
            }
            (Actuator::Pump, on) => s.pumping = on,
        }
    }

    fn report_query_error(
        &self,
        err: QueryError,
        console: &mut impl Console,
        sink: &mut impl EventSink,
    ) {
        let name = self.config.log_file_name.as_str();
        let text = match err {
            QueryError::MissingCount => "⚠️ Usage: TAIL <number>".to_owned(),
            QueryError::InvalidCount => "⚠️ Invalid line count".to_owned(),
            QueryError::CountTooLarge { max } => format!("⚠️ Line count too large (max {max})"),
            QueryError::ClockUnavailable => "⚠️ Clock not set".to_owned(),
            QueryError::OpenFailed => format!("❌ Failed to open {name}"),
            QueryError::ReadFailed => format!("❌ Read error in {name}"),
            QueryError::CounterUnavailable => "❌ EEPROM read failed".to_owned(),
        };
        console.write_line(&text);
        sink.emit(&ControlEvent::QueryFailed(err));
    }
}
