//! Time sources for duration measurement and display timestamps.

use chrono::{DateTime, Local};
use std::time::Instant;

/// A source of time for the logger.
///
/// `now` is used for durations and must not go backwards; `wall_time` is
/// only ever displayed.
pub trait Clock {
    /// Milliseconds elapsed since an arbitrary fixed origin.
    fn now(&self) -> f64;
    /// The current local wall-clock time.
    fn wall_time(&self) -> DateTime<Local>;
}

/// The default clock: [`Instant`] for durations, the system clock for display.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        SystemClock {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64() * 1000.0
    }

    fn wall_time(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Format a wall-clock time the way it appears in a block title.
///
/// # Examples
///
/// ```
/// use actionlog::format_time;
/// use chrono::{Local, NaiveDate};
///
/// let time = NaiveDate::from_ymd_opt(2024, 1, 1)
///     .unwrap()
///     .and_hms_milli_opt(9, 5, 3, 42)
///     .unwrap()
///     .and_local_timezone(Local)
///     .unwrap();
/// assert_eq!(format_time(&time), "@ 09:05:03.042");
/// ```
pub fn format_time(time: &DateTime<Local>) -> String {
    time.format("@ %H:%M:%S%.3f").to_string()
}
