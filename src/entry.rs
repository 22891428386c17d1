use chrono::{DateTime, Local};
use serde_json::Value;

static NULL_STATE: Value = Value::Null;

/// One action's trip through the store, as the logger records it.
///
/// Created when the action is dispatched, finalized once the store emits
/// the resulting state, then printed and discarded.
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    /// [`Clock::now`](crate::Clock::now) when the action was dispatched.
    pub started: f64,
    /// Wall-clock dispatch time, for display.
    pub started_time: DateTime<Local>,
    /// The dispatched action, before the action transformer.
    pub action: Value,
    /// Transformed state before the reducer ran.
    pub prev_state: Value,
    /// Milliseconds between dispatch and state emission.
    pub took: Option<f64>,
    /// Transformed state after the reducer ran.
    pub next_state: Option<Value>,
    /// What a fallible reducer rejected the action with.
    pub error: Option<Value>,
}

impl LogEntry {
    pub fn new(
        started: f64,
        started_time: DateTime<Local>,
        action: Value,
        prev_state: Value,
    ) -> Self {
        LogEntry {
            started,
            started_time,
            action,
            prev_state,
            took: None,
            next_state: None,
            error: None,
        }
    }

    /// Record the duration and resulting state.
    pub fn finalize(&mut self, took: f64, next_state: Value) {
        self.took = Some(took);
        self.next_state = Some(next_state);
    }

    pub fn with_error(mut self, error: Value) -> Self {
        self.error = Some(error);
        self
    }

    /// The `(next_state, took)` to display for this entry.
    ///
    /// When `next` exists (the entry queued right after this one), its
    /// `prev_state` and start time win over whatever was recorded here.
    /// Otherwise the finalized values are used; an entry that was never
    /// finalized shows a null state and the time elapsed until `now`.
    ///
    /// # Examples
    ///
    /// ```
    /// use actionlog::LogEntry;
    /// use chrono::Local;
    /// use serde_json::json;
    ///
    /// let now = Local::now();
    /// let mut first = LogEntry::new(10.0, now, json!({"type": "A"}), json!(0));
    /// first.finalize(1.0, json!(1));
    /// let second = LogEntry::new(15.0, now, json!({"type": "B"}), json!(5));
    ///
    /// assert_eq!(first.paired(Some(&second), 20.0), (&json!(5), 5.0));
    /// assert_eq!(first.paired(None, 20.0), (&json!(1), 1.0));
    /// assert_eq!(second.paired(None, 20.0), (&json!(null), 5.0));
    /// ```
    pub fn paired<'a>(&'a self, next: Option<&'a LogEntry>, now: f64) -> (&'a Value, f64) {
        match next {
            Some(next) => (&next.prev_state, next.started - self.started),
            None => (
                self.next_state.as_ref().unwrap_or(&NULL_STATE),
                self.took.unwrap_or(now - self.started),
            ),
        }
    }
}
