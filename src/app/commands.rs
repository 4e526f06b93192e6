//! Serial command grammar.
//!
//! ```text
//! M ON | M OFF                 mode switch
//! STAT                         status snapshot
//! READ                         full log dump
//! TAIL <n>                     today's last n log lines
//! DUMP EEPROM                  persisted counter report
//! HELP                         command list
//! H|F|L|P ON|OFF               actuator override   (manual only)
//! TEST FAN 10s                 fan self-test       (manual only)
//! ```
//!
//! Matching is case-sensitive on the trimmed line.  Anything that is not an
//! unconditional command is treated as gated, including unknown text.

use core::num::IntErrorKind;

use super::state::{Actuator, ControlMode};

/// One parsed operator command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    SetMode(ControlMode),
    Status,
    ReadLog,
    Tail(TailArg),
    DumpEeprom,
    Help,
    Override { actuator: Actuator, on: bool },
    TestFan,
    /// Did not match the grammar; handled by the gated branch.
    Unrecognized,
}

/// The argument of `TAIL`, validated for shape but not yet against config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TailArg {
    /// `TAIL` with no argument.
    Missing,
    /// Not a positive integer.
    Invalid,
    /// A positive integer too large to represent.
    Overflow,
    Count(u32),
}

/// Fan self-test command, matched verbatim.
pub const TEST_FAN_COMMAND: &str = "TEST FAN 10s";

/// Help text, one entry per console line.
pub const HELP_LINES: [&str; 6] = [
    "📖 Available Commands:",
    " - M ON / M OFF",
    " - STAT / READ / TAIL <n>",
    " - H ON/OFF / F ON/OFF / L ON/OFF / P ON/OFF",
    " - DUMP EEPROM",
    " - TEST FAN 10s",
];

impl Command {
    /// Parse one input line.  Surrounding whitespace is ignored.
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        match line {
            "M ON" => Self::SetMode(ControlMode::Manual),
            "M OFF" => Self::SetMode(ControlMode::Autonomous),
            "STAT" => Self::Status,
            "READ" => Self::ReadLog,
            "DUMP EEPROM" => Self::DumpEeprom,
            "HELP" => Self::Help,
            TEST_FAN_COMMAND => Self::TestFan,
            _ if line.starts_with("TAIL") => Self::Tail(parse_tail_arg(line)),
            _ => parse_override(line).unwrap_or(Self::Unrecognized),
        }
    }

    /// Gated commands are honoured only in MANUAL mode.
    pub fn is_gated(&self) -> bool {
        matches!(
            self,
            Self::Override { .. } | Self::TestFan | Self::Unrecognized
        )
    }
}

/// The count follows the first space of the line.
fn parse_tail_arg(line: &str) -> TailArg {
    let Some((_, arg)) = line.split_once(' ') else {
        return TailArg::Missing;
    };
    match arg.trim().parse::<u32>() {
        Ok(0) => TailArg::Invalid,
        Ok(n) => TailArg::Count(n),
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => TailArg::Overflow,
        Err(_) => TailArg::Invalid,
    }
}

fn parse_override(line: &str) -> Option<Command> {
    let (target, state) = line.split_once(' ')?;
    let actuator = match target {
        "H" => Actuator::Heat,
        "F" => Actuator::Fan,
        "L" => Actuator::Light,
        "P" => Actuator::Pump,
        _ => return None,
    };
    let on = match state {
        "ON" => true,
        "OFF" => false,
        _ => return None,
    };
    Some(Command::Override { actuator, on })
}
