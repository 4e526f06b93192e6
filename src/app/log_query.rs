//! Log query engine.
//!
//! Serves `READ` (verbatim dump of the CSV log) and `TAIL <n>` (the last
//! `n` records dated today) from the append-only file written by the
//! logging task.
//!
//! ## Record dates
//!
//! Records start with `year,month,day,` in unpadded decimal.  The engine
//! parses those three fields and compares them as integers, so the
//! on-disk format is unchanged while a zero-padded writer (`2025,07,04,`)
//! still matches and the header row (`Y,M,D,…`) never does.
//!
//! ## Tail ring
//!
//! Matches land in a [`TailRing`] of capacity `n`: the k-th match goes to
//! slot `k mod n`, so only the newest `n` survive the scan.  The capacity
//! is validated against the configured ceiling before the file is opened.

use core::num::NonZeroUsize;
use std::io::{BufRead, ErrorKind, Read};

use log::{debug, warn};

use crate::error::QueryError;

use super::commands::TailArg;
use super::ports::{Console, LogStorePort};
use super::state::CalendarDate;

pub const DUMP_HEADER_PREFIX: &str = "📄 --- Contents of ";
pub const DUMP_FOOTER: &str = "📄 --- End of File ---";
pub const TAIL_HEADER: &str = "📄 --- Filtered TAIL (Today) ---";
pub const TAIL_FOOTER: &str = "📄 --- End ---";

const DUMP_CHUNK: usize = 128;

// ───────────────────────────────────────────────────────────────
// Tail ring
// ───────────────────────────────────────────────────────────────

/// Fixed-capacity circular store that keeps the most recent pushes.
#[derive(Debug)]
pub struct TailRing<T> {
    slots: Vec<T>,
    capacity: usize,
    seen: usize,
}

impl<T> TailRing<T> {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity.get()),
            capacity: capacity.get(),
            seen: 0,
        }
    }

    pub fn push(&mut self, item: T) {
        let slot = self.seen % self.capacity;
        if slot < self.slots.len() {
            self.slots[slot] = item;
        } else {
            self.slots.push(item);
        }
        self.seen += 1;
    }

    /// Total pushes, including overwritten ones.
    pub fn seen(&self) -> usize {
        self.seen
    }

    /// Retained items (at most the capacity).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Retained items, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        let start = if self.seen <= self.capacity {
            0
        } else {
            (self.seen - self.capacity) % self.capacity
        };
        (0..self.slots.len()).map(move |i| &self.slots[(start + i) % self.capacity])
    }
}

// ───────────────────────────────────────────────────────────────
// Record parsing
// ───────────────────────────────────────────────────────────────

/// Date of a log record, from its leading `year,month,day,` fields.
pub fn record_date(line: &str) -> Option<CalendarDate> {
    let mut fields = line.splitn(4, ',');
    let year = fields.next()?.parse().ok()?;
    let month = fields.next()?.parse().ok()?;
    let day = fields.next()?.parse().ok()?;
    // The day field must be followed by a separator.
    fields.next()?;
    Some(CalendarDate::new(year, month, day))
}

/// Validate a `TAIL` argument against the configured ring ceiling.
pub fn tail_capacity(arg: TailArg, max_lines: u16) -> Result<NonZeroUsize, QueryError> {
    let count = match arg {
        TailArg::Missing => return Err(QueryError::MissingCount),
        TailArg::Invalid => return Err(QueryError::InvalidCount),
        TailArg::Overflow => return Err(QueryError::CountTooLarge { max: max_lines }),
        TailArg::Count(n) => n,
    };
    if count > u32::from(max_lines) {
        return Err(QueryError::CountTooLarge { max: max_lines });
    }
    NonZeroUsize::new(count as usize).ok_or(QueryError::InvalidCount)
}

// ───────────────────────────────────────────────────────────────
// Queries
// ───────────────────────────────────────────────────────────────

/// Outcome of a served tail query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TailSummary {
    pub matched: usize,
    pub emitted: usize,
}

/// Stream the whole log file to the console.  Returns the byte count.
pub fn dump_log(
    store: &mut impl LogStorePort,
    name: &str,
    console: &mut impl Console,
) -> Result<usize, QueryError> {
    let mut file = store.open(name).map_err(|e| {
        warn!("LogQuery: open {} failed: {}", name, e);
        QueryError::OpenFailed
    })?;

    let mut header = String::with_capacity(48);
    header.push_str(DUMP_HEADER_PREFIX);
    header.push_str(name);
    header.push_str(" ---");
    console.write_line(&header);

    let mut buf = [0u8; DUMP_CHUNK];
    let mut total = 0;
    loop {
        match file.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => {
                console.write_raw(&buf[..n]);
                total += n;
            }
            Err(e) if e.kind() == ErrorKind::Interrupted => {}
            Err(e) => {
                warn!("LogQuery: read {} failed after {} bytes: {}", name, total, e);
                return Err(QueryError::ReadFailed);
            }
        }
    }

    console.write_line(DUMP_FOOTER);
    debug!("LogQuery: dumped {} bytes of {}", total, name);
    Ok(total)
}

/// Emit the newest `count` records dated `today`, oldest first.
pub fn tail_today(
    store: &mut impl LogStorePort,
    name: &str,
    today: CalendarDate,
    count: NonZeroUsize,
    console: &mut impl Console,
) -> Result<TailSummary, QueryError> {
    let ring = {
        let file = store.open(name).map_err(|e| {
            warn!("LogQuery: open {} failed: {}", name, e);
            QueryError::OpenFailed
        })?;
        scan_matches(file, today, count)?
        // file closed here, before anything is emitted
    };

    console.write_line(TAIL_HEADER);
    for line in ring.iter() {
        console.write_line(line);
    }
    console.write_line(TAIL_FOOTER);

    Ok(TailSummary {
        matched: ring.seen(),
        emitted: ring.len(),
    })
}

fn scan_matches(
    mut file: impl BufRead,
    today: CalendarDate,
    count: NonZeroUsize,
) -> Result<TailRing<String>, QueryError> {
    let mut ring = TailRing::new(count);
    let mut raw = Vec::with_capacity(96);
    loop {
        raw.clear();
        match file.read_until(b'\n', &mut raw) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => {
                warn!("LogQuery: scan failed: {}", e);
                return Err(QueryError::ReadFailed);
            }
        }
        while matches!(raw.last(), Some(b'\n' | b'\r')) {
            raw.pop();
        }
        let line = String::from_utf8_lossy(&raw);
        if record_date(&line) == Some(today) {
            ring.push(line.into_owned());
        }
    }
    Ok(ring)
}
