//! Fuzz target: serial bytes → `LineAssembler` → `Command::parse`
//!
//! Feeds arbitrary bytes through the line assembler and parses every line
//! it yields.  Lines must never exceed the buffer capacity, parsing must
//! never panic, and a parsed `TAIL` count is always positive.
//!
//! cargo fuzz run fuzz_command_line

#![no_main]

use envctl::adapters::serial::LineAssembler;
use envctl::app::commands::{Command, TailArg};
use envctl::app::ports::LINE_CAPACITY;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut lines = LineAssembler::new();

    for &byte in data {
        if let Some(line) = lines.push(byte) {
            assert!(line.len() <= LINE_CAPACITY, "line exceeds capacity");
            assert!(!line.contains('\n'), "terminator leaked into line");

            if let Command::Tail(TailArg::Count(n)) = Command::parse(&line) {
                assert!(n > 0, "non-positive tail count accepted");
            }
        }
    }
});
