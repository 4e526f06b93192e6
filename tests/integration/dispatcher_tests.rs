//! Dispatcher behaviour against the mock board: mode gating, overrides,
//! fan self-test and the supervisory tick.

use envctl::app::controller::{Controller, DispatchOutcome};
use envctl::app::events::ControlEvent;
use envctl::app::state::{Actuator, ControlMode, Level};
use envctl::config::ControllerConfig;

use super::mock_hw::{EventLog, MockBoard, MockConsole, MockSerial};

struct Rig {
    ctl: Controller,
    hw: MockBoard,
    out: MockConsole,
    sink: EventLog,
}

impl Rig {
    fn new() -> Self {
        let mut hw = MockBoard::new();
        let mut ctl = Controller::new(ControllerConfig::default());
        ctl.start(&mut hw);
        Self {
            ctl,
            hw,
            out: MockConsole::default(),
            sink: EventLog::default(),
        }
    }

    fn manual() -> Self {
        let mut rig = Self::new();
        rig.send("M ON");
        rig.out.lines.clear();
        rig.sink.events.clear();
        rig
    }

    fn send(&mut self, line: &str) -> DispatchOutcome {
        self.ctl
            .dispatch(line, &mut self.hw, &mut self.out, &mut self.sink)
    }

    fn tick(&mut self) {
        self.ctl.supervise(&mut self.hw, &mut self.out, &mut self.sink);
    }
}

#[test]
fn start_drives_every_line_low() {
    let rig = Rig::new();
    assert_eq!(rig.hw.drives.len(), 4);
    assert!(rig.hw.drives.iter().all(|(_, l)| *l == Level::Low));
    assert_eq!(rig.ctl.mode(), ControlMode::Autonomous);
}

// ── Mode gate ─────────────────────────────────────────────────

#[test]
fn autonomous_override_is_silently_ignored() {
    let mut rig = Rig::new();
    let before = rig.ctl.state().clone();
    let drives_before = rig.hw.drives.len();

    assert_eq!(rig.send("H ON"), DispatchOutcome::Ignored);

    assert!(rig.out.lines.is_empty());
    assert_eq!(rig.hw.drives.len(), drives_before);
    assert!(!rig.ctl.state().heating);
    assert_eq!(rig.ctl.state().heat, before.heat);
    assert_eq!(rig.sink.events, [ControlEvent::GatedCommandIgnored]);
}

#[test]
fn autonomous_unknown_text_gets_no_reply() {
    let mut rig = Rig::new();
    assert_eq!(rig.send("FROB"), DispatchOutcome::Ignored);
    assert!(rig.out.lines.is_empty());
}

#[test]
fn autonomous_still_records_command_time() {
    let mut rig = Rig::new();
    rig.hw.now_ms = 7_777;
    rig.send("whatever");
    assert_eq!(rig.ctl.state().last_command_ms, 7_777);
}

#[test]
fn mode_switch_is_idempotent() {
    let mut rig = Rig::new();
    rig.send("M ON");
    rig.send("M ON");
    assert_eq!(rig.ctl.mode(), ControlMode::Manual);
    assert_eq!(
        rig.out.lines,
        ["🔧 Manual override ENABLED", "🔧 Manual override ENABLED"]
    );
    // Only the real transition is an event.
    assert_eq!(
        rig.sink.events,
        [ControlEvent::ModeChanged {
            to: ControlMode::Manual,
            by_timeout: false
        }]
    );

    assert_eq!(rig.send("P ON"), DispatchOutcome::Overridden);
    assert_eq!(rig.hw.level(Actuator::Pump), Level::High);
}

#[test]
fn m_off_returns_to_autonomous_and_closes_the_gate() {
    let mut rig = Rig::manual();
    rig.send("M OFF");
    assert_eq!(rig.ctl.mode(), ControlMode::Autonomous);
    assert_eq!(rig.out.lines, ["🔄 Returned to AUTONOMOUS mode"]);
    assert_eq!(rig.send("P ON"), DispatchOutcome::Ignored);
    assert!(!rig.ctl.state().pumping);
}

// ── Overrides ─────────────────────────────────────────────────

#[test]
fn heat_on_then_off() {
    let mut rig = Rig::manual();
    rig.send("H ON");
    assert_eq!(rig.hw.level(Actuator::Heat), Level::High);
    rig.send("H OFF");

    assert!(!rig.ctl.state().heating);
    assert_eq!(rig.ctl.state().heat, Level::Low);
    assert_eq!(rig.hw.level(Actuator::Heat), Level::Low);
    assert_eq!(
        rig.out.lines,
        ["🛠️ HEAT overridden ON", "🛠️ HEAT overridden OFF"]
    );
}

#[test]
fn outputs_follow_intents_after_each_override() {
    let mut rig = Rig::manual();
    for cmd in ["F ON", "L ON", "P ON", "H ON", "L OFF", "F OFF"] {
        rig.send(cmd);
        let s = rig.ctl.state();
        assert_eq!(s.heat, Level::from(s.heating));
        assert_eq!(s.fan, Level::from(s.cooling || s.test_fan_active));
        assert_eq!(s.pump, Level::from(s.pumping));
        assert_eq!(s.light, Level::from(s.lighting || s.light_heat));
        for a in Actuator::ALL {
            assert_eq!(rig.hw.level(a), s.level(a), "{a} out of sync after {cmd}");
        }
    }
}

#[test]
fn fan_on_stamps_cooling_trigger() {
    let mut rig = Rig::manual();
    rig.hw.now_ms = 55_000;
    rig.send("F ON");
    assert!(rig.ctl.state().cooling);
    assert_eq!(rig.ctl.state().cooling_trigger_ms, 55_000);
    assert_eq!(rig.out.lines, ["🛠️ FAN overridden ON"]);
}

#[test]
fn heat_on_cancels_cooling() {
    let mut rig = Rig::manual();
    rig.send("F ON");
    rig.send("H ON");
    assert!(!rig.ctl.state().cooling);
    assert_eq!(rig.hw.level(Actuator::Fan), Level::Low);
    assert_eq!(rig.hw.level(Actuator::Heat), Level::High);
}

#[test]
fn manual_unknown_command_is_reported() {
    let mut rig = Rig::manual();
    assert_eq!(rig.send("H MAYBE"), DispatchOutcome::Overridden);
    assert_eq!(rig.out.lines, ["❓ Unknown command"]);
    assert_eq!(rig.sink.events, [ControlEvent::UnknownCommand]);
}

#[test]
fn surrounding_whitespace_is_ignored() {
    let mut rig = Rig::manual();
    rig.send("  L ON \r");
    assert!(rig.ctl.state().lighting);
}

// ── Fan self-test ─────────────────────────────────────────────

#[test]
fn fan_test_energises_fan_immediately() {
    let mut rig = Rig::manual();
    rig.hw.now_ms = 123_456;
    rig.send("TEST FAN 10s");

    let s = rig.ctl.state();
    assert!(s.test_fan_active);
    assert_eq!(s.test_fan_start_ms, 123_456);
    assert_eq!(s.fan, Level::High);
    assert_eq!(rig.hw.level(Actuator::Fan), Level::High);
    assert_eq!(rig.out.lines, ["🧪 Fan test started (10s)"]);
}

#[test]
fn fan_test_ignored_when_autonomous() {
    let mut rig = Rig::new();
    rig.send("TEST FAN 10s");
    assert!(!rig.ctl.state().test_fan_active);
    assert_eq!(rig.hw.level(Actuator::Fan), Level::Low);
}

#[test]
fn fan_test_expires_on_supervisory_tick() {
    let mut rig = Rig::manual();
    rig.send("TEST FAN 10s");
    rig.out.lines.clear();

    rig.hw.advance(9_999);
    rig.tick();
    assert!(rig.ctl.state().test_fan_active);
    assert_eq!(rig.hw.level(Actuator::Fan), Level::High);

    rig.hw.advance(1);
    rig.tick();
    assert!(!rig.ctl.state().test_fan_active);
    assert_eq!(rig.hw.level(Actuator::Fan), Level::Low);
    assert_eq!(rig.out.lines, ["🧪 Fan test finished"]);
    assert!(rig.sink.events.contains(&ControlEvent::FanTestFinished));
}

#[test]
fn fan_stays_on_after_test_if_cooling_requested() {
    let mut rig = Rig::manual();
    rig.send("F ON");
    rig.send("TEST FAN 10s");
    rig.hw.advance(10_000);
    rig.tick();
    assert_eq!(rig.hw.level(Actuator::Fan), Level::High);
}

// ── Manual timeout ────────────────────────────────────────────

#[test]
fn manual_mode_times_out_after_inactivity() {
    let mut rig = Rig::manual();
    rig.hw.advance(599_999);
    rig.tick();
    assert_eq!(rig.ctl.mode(), ControlMode::Manual);

    rig.hw.advance(1);
    rig.tick();
    assert_eq!(rig.ctl.mode(), ControlMode::Autonomous);
    assert_eq!(
        rig.out.lines,
        ["⏱️ Manual override timed out, returned to AUTONOMOUS mode"]
    );
    assert!(rig.sink.events.contains(&ControlEvent::ModeChanged {
        to: ControlMode::Autonomous,
        by_timeout: true
    }));
}

#[test]
fn any_command_postpones_the_timeout() {
    let mut rig = Rig::manual();
    rig.hw.advance(500_000);
    rig.send("STAT");
    rig.hw.advance(500_000);
    rig.tick();
    assert_eq!(rig.ctl.mode(), ControlMode::Manual);
}

#[test]
fn timeout_keeps_intents() {
    let mut rig = Rig::manual();
    rig.send("P ON");
    rig.hw.advance(600_000);
    rig.tick();
    assert_eq!(rig.ctl.mode(), ControlMode::Autonomous);
    assert!(rig.ctl.state().pumping);
}

// ── Unconditional commands ────────────────────────────────────

#[test]
fn stat_reports_levels_and_mode() {
    let mut rig = Rig::manual();
    rig.send("H ON");
    rig.send("L ON");
    rig.out.lines.clear();
    rig.send("STAT");
    assert_eq!(rig.out.lines.len(), 1);
    let line = &rig.out.lines[0];
    assert!(line.contains("🔥 Heat: 1"));
    assert!(line.contains("🌀 Fan: 0"));
    assert!(line.contains("💡 Light: 1"));
    assert!(line.ends_with("MODE: 1"));
}

#[test]
fn stat_light_minutes_match_persisted_counter() {
    let mut hw = MockBoard::new();
    hw.put_counter(0, 1_234);
    hw.put_counter(4, 56);
    let mut ctl = Controller::new(ControllerConfig::default());
    ctl.start(&mut hw);
    assert_eq!(ctl.state().light_on_minutes, 1_234);
    assert_eq!(ctl.state().light_heat_minutes, 56);

    let mut out = MockConsole::default();
    let mut sink = EventLog::default();
    ctl.dispatch("STAT", &mut hw, &mut out, &mut sink);
    ctl.dispatch("DUMP EEPROM", &mut hw, &mut out, &mut sink);
    assert!(out.lines[0].contains("⏱️ Lm: 1234,"));
    assert_eq!(out.lines[1], "📦 EEPROM LightMinutes: 1234");
}

#[test]
fn start_survives_unreadable_counters() {
    let mut hw = MockBoard::new();
    hw.eeprom_fails = true;
    let mut ctl = Controller::new(ControllerConfig::default());
    ctl.start(&mut hw);
    assert_eq!(ctl.state().light_on_minutes, 0);
    assert_eq!(hw.level(Actuator::Heat), Level::Low);
}

#[test]
fn help_lists_commands_in_either_mode() {
    let mut rig = Rig::new();
    assert_eq!(rig.send("HELP"), DispatchOutcome::Handled);
    assert_eq!(rig.out.lines.len(), 6);
    assert_eq!(rig.out.lines[0], "📖 Available Commands:");
    assert!(rig.out.lines.iter().any(|l| l.contains("TEST FAN 10s")));
}

#[test]
fn dump_eeprom_reports_counters() {
    let mut rig = Rig::new();
    rig.hw.put_counter(0, 1_234);
    rig.hw.put_counter(4, 56);
    rig.send("DUMP EEPROM");
    assert_eq!(
        rig.out.lines,
        ["📦 EEPROM LightMinutes: 1234", "📦 EEPROM LightHeatMinutes: 56"]
    );
}

#[test]
fn dump_eeprom_is_repeatable_and_read_only() {
    let mut rig = Rig::new();
    rig.hw.put_counter(0, 42);
    let image = rig.hw.eeprom;
    rig.send("DUMP EEPROM");
    rig.send("DUMP EEPROM");
    assert_eq!(rig.out.lines[..2], rig.out.lines[2..]);
    assert_eq!(rig.hw.eeprom, image);
}

#[test]
fn erased_eeprom_is_shown_verbatim() {
    let mut rig = Rig::new();
    rig.send("DUMP EEPROM");
    assert_eq!(rig.out.lines[0], "📦 EEPROM LightMinutes: 4294967295");
}

#[test]
fn eeprom_failure_is_diagnosed() {
    let mut rig = Rig::new();
    rig.hw.eeprom_fails = true;
    rig.send("DUMP EEPROM");
    assert_eq!(rig.out.lines, ["❌ EEPROM read failed"]);
}

// ── Serial polling ────────────────────────────────────────────

#[test]
fn poll_serial_serves_one_line_per_call() {
    let mut rig = Rig::new();
    let mut serial = MockSerial::with_input(&["STAT", "HELP"]);
    let out = rig.ctl.poll_serial(&mut serial, &mut rig.hw, &mut rig.sink);
    assert_eq!(out, Some(DispatchOutcome::Handled));
    assert_eq!(serial.pending.len(), 1);
    assert_eq!(serial.discards, 0);
}

#[test]
fn poll_serial_without_input_does_nothing() {
    let mut rig = Rig::new();
    let mut serial = MockSerial::default();
    assert_eq!(rig.ctl.poll_serial(&mut serial, &mut rig.hw, &mut rig.sink), None);
    assert_eq!(rig.ctl.state().last_command_ms, 0);
}

#[test]
fn residual_input_is_drained_after_manual_override() {
    let mut rig = Rig::manual();
    let mut serial = MockSerial::with_input(&["H ON", "P ON", "L ON"]);
    rig.ctl.poll_serial(&mut serial, &mut rig.hw, &mut rig.sink);

    assert_eq!(serial.discards, 1);
    assert!(serial.pending.is_empty());
    assert!(rig.ctl.state().heating);
    assert!(!rig.ctl.state().pumping);
    assert_eq!(serial.console.lines, ["🛠️ HEAT overridden ON"]);
}

#[test]
fn ignored_override_does_not_drain() {
    let mut rig = Rig::new();
    let mut serial = MockSerial::with_input(&["H ON", "STAT"]);
    let out = rig.ctl.poll_serial(&mut serial, &mut rig.hw, &mut rig.sink);
    assert_eq!(out, Some(DispatchOutcome::Ignored));
    assert_eq!(serial.discards, 0);
    assert_eq!(serial.pending.len(), 1);
}
