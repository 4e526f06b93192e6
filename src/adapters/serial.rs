//! Serial console adapter.
//!
//! [`LineAssembler`] turns a byte stream into bounded command lines and is
//! target-independent.  [`UartSerial`] wires it to an ESP-IDF `UartDriver`
//! and implements [`SerialPort`] for the firmware.
//!
//! Lines end at `\n`; `\r` bytes are dropped.  A line longer than
//! [`LINE_CAPACITY`] is discarded whole, up to and including its
//! terminator, so a truncated prefix can never be dispatched.

use heapless::{String, Vec};
use log::warn;

use crate::app::ports::LINE_CAPACITY;

#[derive(Default)]
pub struct LineAssembler {
    buf: Vec<u8, LINE_CAPACITY>,
    overflowed: bool,
}

impl LineAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one received byte; returns a line when `byte` completes one.
    pub fn push(&mut self, byte: u8) -> Option<String<LINE_CAPACITY>> {
        match byte {
            b'\r' => None,
            b'\n' => {
                let bytes = core::mem::take(&mut self.buf);
                if core::mem::take(&mut self.overflowed) {
                    warn!("serial: line longer than {} bytes discarded", LINE_CAPACITY);
                    return None;
                }
                match String::from_utf8(bytes) {
                    Ok(line) => Some(line),
                    Err(_) => {
                        warn!("serial: non-UTF-8 line discarded");
                        None
                    }
                }
            }
            _ => {
                if !self.overflowed && self.buf.push(byte).is_err() {
                    self.overflowed = true;
                    self.buf.clear();
                }
                None
            }
        }
    }

    /// Drop any partial line.
    pub fn clear(&mut self) {
        self.buf.clear();
        self.overflowed = false;
    }

    /// Whether a partial line is pending.
    pub fn is_idle(&self) -> bool {
        self.buf.is_empty() && !self.overflowed
    }
}

/// Outcome of one non-blocking receive: `true` when a byte arrived.
/// Driver errors are logged and treated as an empty FIFO.
pub fn byte_received<E: core::fmt::Debug>(result: core::result::Result<usize, E>) -> bool {
    match result {
        Ok(n) => n > 0,
        Err(e) => {
            warn!("serial: read failed: {:?}", e);
            false
        }
    }
}

#[cfg(target_os = "espidf")]
pub use uart::UartSerial;

#[cfg(target_os = "espidf")]
mod uart {
    use esp_idf_svc::hal::delay::NON_BLOCK;
    use esp_idf_svc::hal::uart::UartDriver;
    use log::warn;

    use super::{LineAssembler, byte_received};
    use crate::app::ports::{Console, LINE_CAPACITY, SerialPort};

    /// Console UART with line assembly.
    pub struct UartSerial<'d> {
        uart: UartDriver<'d>,
        lines: LineAssembler,
    }

    impl<'d> UartSerial<'d> {
        pub fn new(uart: UartDriver<'d>) -> Self {
            Self {
                uart,
                lines: LineAssembler::new(),
            }
        }

        fn write_all(&mut self, mut bytes: &[u8]) {
            while !bytes.is_empty() {
                match self.uart.write(bytes) {
                    Ok(n) if n > 0 => bytes = &bytes[n..],
                    Ok(_) => return,
                    Err(e) => {
                        warn!("serial: write failed: {:?}", e);
                        return;
                    }
                }
            }
        }
    }

    impl Console for UartSerial<'_> {
        fn write_line(&mut self, line: &str) {
            self.write_all(line.as_bytes());
            self.write_all(b"\r\n");
        }

        fn write_raw(&mut self, bytes: &[u8]) {
            self.write_all(bytes);
        }
    }

    impl SerialPort for UartSerial<'_> {
        fn read_line(&mut self) -> Option<heapless::String<LINE_CAPACITY>> {
            let mut byte = [0u8; 1];
            while byte_received(self.uart.read(&mut byte, NON_BLOCK)) {
                if let Some(line) = self.lines.push(byte[0]) {
                    return Some(line);
                }
            }
            None
        }

        fn discard_input(&mut self) {
            self.lines.clear();
            if let Err(e) = self.uart.clear_rx() {
                warn!("serial: clear_rx failed: {:?}", e);
            }
        }
    }
}
