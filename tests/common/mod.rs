#![allow(dead_code)]

use actionlog::{
    Action, Clock, Console, Level, Logger, LoggerOptions, Record, RecordingConsole, Rgb,
};
use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::cell::Cell;
use std::io;
use std::rc::Rc;

/// A clock that only moves when told to.
#[derive(Clone)]
pub struct ManualClock {
    now: Rc<Cell<f64>>,
    wall: DateTime<Local>,
}

impl ManualClock {
    pub fn new() -> Self {
        ManualClock {
            now: Rc::new(Cell::new(0.0)),
            wall: fixed_wall_time(),
        }
    }

    pub fn advance(&self, ms: f64) {
        self.now.set(self.now.get() + ms);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }

    fn wall_time(&self) -> DateTime<Local> {
        self.wall
    }
}

pub fn fixed_wall_time() -> DateTime<Local> {
    NaiveDate::from_ymd_opt(2024, 1, 15)
        .unwrap()
        .and_hms_milli_opt(12, 34, 56, 789)
        .unwrap()
        .and_local_timezone(Local)
        .unwrap()
}

pub fn recording_logger(options: LoggerOptions) -> (Logger<RecordingConsole>, ManualClock) {
    let clock = ManualClock::new();
    let logger =
        Logger::with_console(options, RecordingConsole::new()).with_clock(clock.clone());
    (logger, clock)
}

#[derive(Default, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Counter {
    pub count: i64,
}

pub fn counter_reducer(mut state: Counter, action: &Action) -> Counter {
    match action.action_type.as_str() {
        "INCREMENT" => state.count += 1,
        "DECREMENT" => state.count -= 1,
        "ADD" => state.count += action.payload["amount"].as_i64().unwrap_or(0),
        _ => {}
    }
    state
}

pub fn strict_counter(state: &Counter, action: &Action) -> Result<Counter, Value> {
    match action.action_type.as_str() {
        "INCREMENT" => Ok(Counter {
            count: state.count + 1,
        }),
        "DECREMENT" if state.count == 0 => Err(json!({"reason": "count would go negative"})),
        "DECREMENT" => Ok(Counter {
            count: state.count - 1,
        }),
        _ => Ok(state.clone()),
    }
}

/// `(title, collapsed)` of every opened group.
pub fn groups(records: &[Record]) -> Vec<(String, bool)> {
    records
        .iter()
        .filter_map(|r| match r {
            Record::GroupStart {
                title, collapsed, ..
            } => Some((title.clone(), *collapsed)),
            _ => None,
        })
        .collect()
}

/// `(level, label, payload)` of every emitted line.
pub fn lines(records: &[Record]) -> Vec<(Level, String, Value)> {
    records
        .iter()
        .filter_map(|r| match r {
            Record::Line {
                level,
                label,
                payload,
                ..
            } => Some((*level, label.clone(), payload.clone())),
            _ => None,
        })
        .collect()
}

/// Payloads of every line with the given label, in order.
pub fn payloads(records: &[Record], label: &str) -> Vec<Value> {
    lines(records)
        .into_iter()
        .filter(|(_, l, _)| l == label)
        .map(|(_, _, payload)| payload)
        .collect()
}

pub fn labels(records: &[Record]) -> Vec<String> {
    lines(records).into_iter().map(|(_, label, _)| label).collect()
}

/// Claims grouping support but rejects every group call at runtime.
#[derive(Default)]
pub struct GrouplessConsole {
    pub inner: RecordingConsole,
}

impl Console for GrouplessConsole {
    fn begin_group(
        &mut self,
        _title: &str,
        _color: Option<Rgb>,
        _collapsed: bool,
    ) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::Unsupported, "no groups here"))
    }

    fn end_group(&mut self) -> io::Result<()> {
        Err(io::Error::new(io::ErrorKind::Unsupported, "no groups here"))
    }

    fn line(
        &mut self,
        level: Level,
        label: &str,
        color: Option<Rgb>,
        payload: &Value,
    ) -> io::Result<()> {
        self.inner.line(level, label, color, payload)
    }

    fn plain(&mut self, text: &str) -> io::Result<()> {
        self.inner.plain(text)
    }
}

/// A console whose writes all fail, as when stdout is a closed pipe.
pub struct BrokenConsole;

impl Console for BrokenConsole {
    fn begin_group(
        &mut self,
        _title: &str,
        _color: Option<Rgb>,
        _collapsed: bool,
    ) -> io::Result<()> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }

    fn end_group(&mut self) -> io::Result<()> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }

    fn line(
        &mut self,
        _level: Level,
        _label: &str,
        _color: Option<Rgb>,
        _payload: &Value,
    ) -> io::Result<()> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }

    fn plain(&mut self, _text: &str) -> io::Result<()> {
        Err(io::Error::from(io::ErrorKind::BrokenPipe))
    }
}
