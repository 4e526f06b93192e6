//! Fuzz target: `tail_today` over arbitrary log content
//!
//! The first byte picks the requested count; the rest is the log file.
//! The query must never panic, never emit more than the requested lines,
//! and every emitted line must carry today's date.
//!
//! cargo fuzz run fuzz_tail_query

#![no_main]

use std::io::Cursor;
use std::num::NonZeroUsize;

use envctl::app::log_query::{record_date, tail_today};
use envctl::app::ports::{Console, LogStorePort, StorageError};
use envctl::app::state::CalendarDate;
use libfuzzer_sys::fuzz_target;

const TODAY: CalendarDate = CalendarDate::new(2025, 7, 4);

struct Store(Vec<u8>);

impl LogStorePort for Store {
    type Reader = Cursor<Vec<u8>>;

    fn open(&mut self, _name: &str) -> Result<Self::Reader, StorageError> {
        Ok(Cursor::new(self.0.clone()))
    }
}

#[derive(Default)]
struct Lines(Vec<String>);

impl Console for Lines {
    fn write_line(&mut self, line: &str) {
        self.0.push(line.to_owned());
    }

    fn write_raw(&mut self, _bytes: &[u8]) {}
}

fuzz_target!(|data: &[u8]| {
    let Some((&n, log)) = data.split_first() else {
        return;
    };
    let Some(count) = NonZeroUsize::new(usize::from(n)) else {
        return;
    };

    let mut store = Store(log.to_vec());
    let mut out = Lines::default();
    let summary = tail_today(&mut store, "DATA.CSV", TODAY, count, &mut out)
        .expect("in-memory reads cannot fail");

    let body = &out.0[1..out.0.len() - 1];
    assert!(body.len() <= count.get());
    assert_eq!(body.len(), summary.emitted);
    assert!(summary.emitted <= summary.matched);
    for line in body {
        assert_eq!(record_date(line), Some(TODAY));
    }
});
