//! Mock board for integration tests.
//!
//! Records every relay write, serves log files from memory and keeps a
//! small EEPROM image, so tests can assert on the full I/O history
//! without touching real GPIO or an SD card.

use std::collections::{HashMap, VecDeque};
use std::io::{BufRead, BufReader, Cursor, Read};

use envctl::app::events::ControlEvent;
use envctl::app::ports::{
    ClockPort, Console, EepromPort, EventSink, LINE_CAPACITY, LogStorePort, OutputPort,
    SerialPort, StorageError,
};
use envctl::app::state::{Actuator, CalendarDate, Level};

pub const TODAY: CalendarDate = CalendarDate::new(2025, 7, 4);

// ── MockBoard ─────────────────────────────────────────────────

pub struct MockBoard {
    pub drives: Vec<(Actuator, Level)>,
    pub files: HashMap<String, Vec<u8>>,
    /// Number of `open` calls, successful or not.
    pub opens: usize,
    /// Fail every read after this many bytes.
    pub fail_reads_after: Option<usize>,
    pub eeprom: [u8; 16],
    pub eeprom_fails: bool,
    pub now_ms: u64,
    pub today: Option<CalendarDate>,
}

#[allow(dead_code)]
impl MockBoard {
    pub fn new() -> Self {
        Self {
            drives: Vec::new(),
            files: HashMap::new(),
            opens: 0,
            fail_reads_after: None,
            eeprom: [0xFF; 16],
            eeprom_fails: false,
            now_ms: 1_000,
            today: Some(TODAY),
        }
    }

    pub fn with_log(mut self, name: &str, content: &str) -> Self {
        self.files.insert(name.to_owned(), content.as_bytes().to_vec());
        self
    }

    /// Level last driven onto a line (LOW if never driven).
    pub fn level(&self, actuator: Actuator) -> Level {
        self.drives
            .iter()
            .rev()
            .find(|(a, _)| *a == actuator)
            .map_or(Level::Low, |(_, l)| *l)
    }

    pub fn advance(&mut self, ms: u64) {
        self.now_ms += ms;
    }

    pub fn put_counter(&mut self, addr: usize, value: u32) {
        self.eeprom[addr..addr + 4].copy_from_slice(&value.to_le_bytes());
    }
}

impl Default for MockBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputPort for MockBoard {
    fn drive(&mut self, actuator: Actuator, level: Level) {
        self.drives.push((actuator, level));
    }
}

/// Reader that yields `limit` bytes of `inner`, then an I/O error.
struct FailingReader {
    inner: Cursor<Vec<u8>>,
    limit: usize,
}

impl Read for FailingReader {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        let pos = self.inner.position() as usize;
        if pos >= self.limit {
            return Err(std::io::Error::other("card removed"));
        }
        let max = buf.len().min(self.limit - pos);
        self.inner.read(&mut buf[..max])
    }
}

impl LogStorePort for MockBoard {
    type Reader = Box<dyn BufRead>;

    fn open(&mut self, name: &str) -> Result<Self::Reader, StorageError> {
        self.opens += 1;
        let data = self.files.get(name).cloned().ok_or(StorageError::NotFound)?;
        Ok(match self.fail_reads_after {
            Some(limit) => Box::new(BufReader::new(FailingReader {
                inner: Cursor::new(data),
                limit,
            })),
            None => Box::new(Cursor::new(data)),
        })
    }
}

impl EepromPort for MockBoard {
    fn read(&self, addr: usize, buf: &mut [u8]) -> Result<(), StorageError> {
        if self.eeprom_fails {
            return Err(StorageError::IoError);
        }
        let src = self
            .eeprom
            .get(addr..addr + buf.len())
            .ok_or(StorageError::OutOfBounds)?;
        buf.copy_from_slice(src);
        Ok(())
    }
}

impl ClockPort for MockBoard {
    fn now_ms(&self) -> u64 {
        self.now_ms
    }

    fn today(&self) -> Option<CalendarDate> {
        self.today
    }
}

// ── Console / serial ──────────────────────────────────────────

#[derive(Default)]
pub struct MockConsole {
    pub lines: Vec<String>,
    pub raw: Vec<u8>,
}

impl Console for MockConsole {
    fn write_line(&mut self, line: &str) {
        self.lines.push(line.to_owned());
    }

    fn write_raw(&mut self, bytes: &[u8]) {
        self.raw.extend_from_slice(bytes);
    }
}

#[derive(Default)]
pub struct MockSerial {
    pub pending: VecDeque<String>,
    pub console: MockConsole,
    pub discards: usize,
}

#[allow(dead_code)]
impl MockSerial {
    pub fn with_input(lines: &[&str]) -> Self {
        Self {
            pending: lines.iter().map(|l| (*l).to_owned()).collect(),
            ..Default::default()
        }
    }
}

impl Console for MockSerial {
    fn write_line(&mut self, line: &str) {
        self.console.write_line(line);
    }

    fn write_raw(&mut self, bytes: &[u8]) {
        self.console.write_raw(bytes);
    }
}

impl SerialPort for MockSerial {
    fn read_line(&mut self) -> Option<heapless::String<LINE_CAPACITY>> {
        let line = self.pending.pop_front()?;
        heapless::String::try_from(line.as_str()).ok()
    }

    fn discard_input(&mut self) {
        self.discards += 1;
        self.pending.clear();
    }
}

// ── Event log ─────────────────────────────────────────────────

#[derive(Default)]
pub struct EventLog {
    pub events: Vec<ControlEvent>,
}

impl EventSink for EventLog {
    fn emit(&mut self, event: &ControlEvent) {
        self.events.push(event.clone());
    }
}
