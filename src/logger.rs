use crate::action::Action;
use crate::clock::{Clock, SystemClock};
use crate::console::{default_console, Console};
use crate::entry::LogEntry;
use crate::error::Result;
use crate::options::{LoggerOptions, TransformFn};
use crate::printer::Printer;
use crate::store::{Emission, Middleware};
use serde::Serialize;
use serde_json::Value;
use std::any::Any;

/// Store middleware that prints every action with the states around it.
///
/// The `before` hook records the action and the state the reducer is about
/// to receive; the `after` hook records the resulting state and duration,
/// queues the entry and, unless batching, prints it right away.
///
/// Only one entry is in flight between the two hooks. This holds as long as
/// actions are dispatched one at a time, which [`Store`](crate::Store)
/// guarantees.
///
/// # Examples
///
/// ```
/// use actionlog::{Action, Logger, LoggerOptions, Record, RecordingConsole, Store};
///
/// fn counter(state: u64, action: &Action) -> u64 {
///     if action.action_type == "INCREMENT" { state + 1 } else { state }
/// }
///
/// let logger = Logger::with_console(LoggerOptions::default(), RecordingConsole::new());
/// let mut store = Store::builder(0, counter).middleware(logger).build().unwrap();
/// store.dispatch(Action::new("INCREMENT")).unwrap();
///
/// let logger = store.middleware::<Logger<RecordingConsole>>().unwrap();
/// let groups = logger
///     .console()
///     .records()
///     .iter()
///     .filter(|r| matches!(r, Record::GroupStart { .. }))
///     .count();
/// assert_eq!(groups, 1);
/// ```
pub struct Logger<C = Box<dyn Console>> {
    printer: Printer<C>,
    clock: Box<dyn Clock>,
    pending: Option<LogEntry>,
    buffer: Vec<LogEntry>,
}

impl Logger<Box<dyn Console>> {
    /// A logger printing to stdout through [`default_console`].
    pub fn new(options: LoggerOptions) -> Self {
        Logger::with_console(options, default_console())
    }
}

impl<C: Console> Logger<C> {
    pub fn with_console(options: LoggerOptions, console: C) -> Self {
        Logger {
            printer: Printer::new(options, console),
            clock: Box::new(SystemClock::new()),
            pending: None,
            buffer: Vec::new(),
        }
    }

    /// Replace the clock used for durations and timestamps.
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn options(&self) -> &LoggerOptions {
        self.printer.options()
    }

    pub fn console(&self) -> &C {
        self.printer.console()
    }

    pub fn console_mut(&mut self) -> &mut C {
        self.printer.console_mut()
    }

    /// The entry captured for the action currently being reduced, if any.
    pub fn pending(&self) -> Option<&LogEntry> {
        self.pending.as_ref()
    }

    /// Entries waiting to be printed.
    pub fn buffered(&self) -> &[LogEntry] {
        &self.buffer
    }

    /// Record `action` and the state it is about to be reduced against.
    ///
    /// A value that cannot be converted to JSON is recorded as an
    /// `<unserializable: ..>` string; capturing never fails.
    pub fn capture_before<S: Serialize>(&mut self, action: &Action, state: &S) -> Result<()> {
        let action = to_json(action, "action");
        let prev_state = snapshot(state, &self.options().state_transformer);
        let entry = LogEntry::new(self.clock.now(), self.clock.wall_time(), action, prev_state);

        if let Some(stale) = self.pending.replace(entry) {
            log::warn!(
                "actionlog: action {} was never followed by a state, dropping its entry",
                stale.action["type"]
            );
        }
        Ok(())
    }

    /// Finalize the pending entry with the state the store emitted for
    /// `action`, then queue it.
    ///
    /// The init action clears the pending slot and records nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if printing fails. The entry
    /// has been queued and the store's state updated by then.
    pub fn capture_after<S: Serialize>(
        &mut self,
        action: &Action,
        state: &S,
        error: Option<&Value>,
    ) -> Result<()> {
        if action.is_init() {
            self.pending = None;
            return Ok(());
        }

        let Some(mut entry) = self.pending.take() else {
            log::warn!(
                "actionlog: state emitted for {} with no captured action, skipping",
                action.action_type
            );
            return Ok(());
        };

        let took = self.clock.now() - entry.started;
        entry.finalize(took, snapshot(state, &self.options().state_transformer));
        entry.error = error.cloned();
        self.buffer.push(entry);

        if self.options().batch {
            return Ok(());
        }
        self.flush()
    }

    /// Print and drain every queued entry.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`](crate::Error::Io) if the console fails. The queue is emptied
    /// regardless.
    pub fn flush(&mut self) -> Result<()> {
        if self.buffer.is_empty() {
            return Ok(());
        }
        let now = self.clock.now();
        self.printer.print(&mut self.buffer, now)
    }
}

impl<C> std::fmt::Debug for Logger<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("pending", &self.pending)
            .field("buffer", &self.buffer)
            .finish_non_exhaustive()
    }
}

impl<S, C> Middleware<S> for Logger<C>
where
    S: Serialize,
    C: Console + 'static,
{
    fn before(&mut self, action: &Action, state: &S) -> Result<()> {
        self.capture_before(action, state)
    }

    fn after(&mut self, emission: &Emission<'_, S>) -> Result<()> {
        self.capture_after(emission.action, emission.state, emission.error)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn snapshot<S: Serialize>(state: &S, transform: &TransformFn) -> Value {
    transform(to_json(state, "state"))
}

fn to_json<T: Serialize>(value: &T, what: &str) -> Value {
    serde_json::to_value(value).unwrap_or_else(|e| {
        log::warn!("actionlog: {what} cannot be shown as JSON: {e}");
        Value::String(format!("<unserializable: {e}>"))
    })
}
