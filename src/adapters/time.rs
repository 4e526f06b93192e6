//! System clock adapter.
//!
//! Implements [`ClockPort`]: monotonic uptime for the override and
//! self-test timers, plus the local calendar date for `TAIL`.
//!
//! - **`target_os = "espidf"`**: `esp_timer_get_time()` for uptime,
//!   `gettimeofday` + `localtime_r` for the date (RTC/SNTP backed).
//! - **`not(target_os = "espidf")`**: `std::time::Instant` for uptime and
//!   `chrono::Local` for the date, for host-side testing and simulation.

use crate::app::ports::ClockPort;
use crate::app::state::CalendarDate;

/// Time source for the controller.
pub struct SystemClock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }
}

#[cfg(target_os = "espidf")]
impl ClockPort for SystemClock {
    fn now_ms(&self) -> u64 {
        (unsafe { esp_idf_svc::sys::esp_timer_get_time() }) as u64 / 1_000
    }

    fn today(&self) -> Option<CalendarDate> {
        use core::ptr;
        let mut tv = esp_idf_svc::sys::timeval {
            tv_sec: 0,
            tv_usec: 0,
        };
        if unsafe { esp_idf_svc::sys::gettimeofday(&mut tv, ptr::null_mut()) } != 0 {
            return None;
        }
        // Reject obviously unset time (before 2020-01-01)
        const EPOCH_2020: i64 = 1_577_836_800;
        if (tv.tv_sec as i64) < EPOCH_2020 {
            return None;
        }
        let secs = tv.tv_sec as esp_idf_svc::sys::time_t;
        let mut tm: esp_idf_svc::sys::tm = unsafe { core::mem::zeroed() };
        if unsafe { esp_idf_svc::sys::localtime_r(&secs, &mut tm) }.is_null() {
            return None;
        }
        let year = u16::try_from(tm.tm_year + 1900).ok()?;
        let month = u8::try_from(tm.tm_mon + 1).ok()?;
        let day = u8::try_from(tm.tm_mday).ok()?;
        Some(CalendarDate::new(year, month, day))
    }
}

#[cfg(not(target_os = "espidf"))]
impl ClockPort for SystemClock {
    fn now_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }

    /// Local date of the host clock.
    fn today(&self) -> Option<CalendarDate> {
        calendar_date(chrono::Local::now().date_naive())
    }
}

#[cfg(not(target_os = "espidf"))]
fn calendar_date(date: chrono::NaiveDate) -> Option<CalendarDate> {
    use chrono::Datelike;
    let year = u16::try_from(date.year()).ok()?;
    Some(CalendarDate::new(year, date.month() as u8, date.day() as u8))
}
