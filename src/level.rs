//! Output levels and the per-field level resolution policy.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// The console level a line is emitted at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Log,
    Info,
    Warn,
    Error,
    Debug,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Log => "log",
            Level::Info => "info",
            Level::Warn => "warn",
            Level::Error => "error",
            Level::Debug => "debug",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One of the four lines printed inside a block, in print order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Field {
    PrevState,
    Action,
    Error,
    NextState,
}

impl Field {
    /// Fields in the order they are printed.
    pub const ALL: [Field; 4] = [Field::PrevState, Field::Action, Field::Error, Field::NextState];

    /// The label printed in front of the field's payload.
    pub fn label(self) -> &'static str {
        match self {
            Field::PrevState => "prev state",
            Field::Action => "action",
            Field::Error => "error",
            Field::NextState => "next state",
        }
    }
}

/// Level function of the formatted action.
pub type ActionLevelFn = Arc<dyn Fn(&Value) -> Option<Level> + Send + Sync>;

/// Level function of a field's payload arguments.
pub type PayloadLevelFn = Arc<dyn Fn(&[&Value]) -> Option<Level> + Send + Sync>;

/// How one field of a per-field map resolves its level.
#[derive(Clone)]
pub enum FieldLevel {
    Constant(Option<Level>),
    Computed(PayloadLevelFn),
}

impl fmt::Debug for FieldLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldLevel::Constant(level) => f.debug_tuple("Constant").field(level).finish(),
            FieldLevel::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// A configured level: the same for every field, computed from the action,
/// or chosen per field.
///
/// `None` means "do not print".
#[derive(Clone)]
pub enum LevelSpec {
    Constant(Option<Level>),
    Computed(ActionLevelFn),
    PerField(HashMap<Field, FieldLevel>),
}

impl LevelSpec {
    /// A level computed from the formatted action.
    pub fn computed(f: impl Fn(&Value) -> Option<Level> + Send + Sync + 'static) -> Self {
        LevelSpec::Computed(Arc::new(f))
    }

    /// An empty per-field map. Every field is skipped until set.
    pub fn per_field() -> Self {
        LevelSpec::PerField(HashMap::new())
    }

    /// Set a constant level for one field of a per-field map.
    ///
    /// Turns any other spec into a per-field map first, dropping it.
    pub fn with_field(self, field: Field, level: Option<Level>) -> Self {
        self.insert(field, FieldLevel::Constant(level))
    }

    /// Set a computed level for one field of a per-field map.
    ///
    /// The function receives the field's payload arguments: `[prev_state]`,
    /// `[formatted_action]`, `[error, prev_state]` or `[next_state]`.
    pub fn with_field_fn(
        self,
        field: Field,
        f: impl Fn(&[&Value]) -> Option<Level> + Send + Sync + 'static,
    ) -> Self {
        self.insert(field, FieldLevel::Computed(Arc::new(f)))
    }

    fn insert(self, field: Field, level: FieldLevel) -> Self {
        let mut map = match self {
            LevelSpec::PerField(map) => map,
            _ => HashMap::new(),
        };
        map.insert(field, level);
        LevelSpec::PerField(map)
    }
}

impl Default for LevelSpec {
    fn default() -> Self {
        LevelSpec::Constant(Some(Level::Log))
    }
}

impl From<Level> for LevelSpec {
    fn from(level: Level) -> Self {
        LevelSpec::Constant(Some(level))
    }
}

impl fmt::Debug for LevelSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LevelSpec::Constant(level) => f.debug_tuple("Constant").field(level).finish(),
            LevelSpec::Computed(_) => f.write_str("Computed(..)"),
            LevelSpec::PerField(map) => f.debug_tuple("PerField").field(map).finish(),
        }
    }
}

/// Resolve the level `field` is printed at.
///
/// # Examples
///
/// ```
/// use actionlog::{resolve, Field, Level, LevelSpec};
/// use serde_json::json;
///
/// let action = json!({"type": "INCREMENT"});
/// let state = json!({"count": 0});
///
/// let spec = LevelSpec::per_field()
///     .with_field(Field::Action, Some(Level::Info))
///     .with_field_fn(Field::NextState, |args| {
///         args[0]["count"].as_u64().filter(|c| *c > 0).map(|_| Level::Warn)
///     });
///
/// assert_eq!(resolve(&spec, &action, &[&state], Field::Action), Some(Level::Info));
/// assert_eq!(resolve(&spec, &action, &[&state], Field::NextState), None);
/// assert_eq!(resolve(&spec, &action, &[&state], Field::PrevState), None);
/// ```
pub fn resolve(
    spec: &LevelSpec,
    formatted_action: &Value,
    payload: &[&Value],
    field: Field,
) -> Option<Level> {
    match spec {
        LevelSpec::PerField(map) => match map.get(&field)? {
            FieldLevel::Computed(f) => f(payload),
            FieldLevel::Constant(level) => *level,
        },
        LevelSpec::Computed(f) => f(formatted_action),
        LevelSpec::Constant(level) => *level,
    }
}
