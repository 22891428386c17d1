//! Logger options, their defaults, and the JSON config layer.

use crate::error::{Error, Result};
use crate::level::{Field, Level, LevelSpec};
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Applied to a state or action before it is displayed or handed to a
/// level, collapsed or color function. Never affects what the reducer sees.
pub type TransformFn = Arc<dyn Fn(Value) -> Value + Send + Sync>;

/// Decides whether a block starts collapsed, given `(next_state, action)`.
pub type CollapsedFn = Arc<dyn Fn(&Value, &Value) -> bool + Send + Sync>;

/// Produces a color string (`#RRGGBB`) from a displayed value.
pub type ColorFn = Arc<dyn Fn(&Value) -> String + Send + Sync>;

/// Produces a color string from `(error, prev_state)`.
pub type ErrorColorFn = Arc<dyn Fn(&Value, &Value) -> String + Send + Sync>;

pub const DEFAULT_TITLE_COLOR: &str = "#000000";
pub const DEFAULT_PREV_STATE_COLOR: &str = "#9E9E9E";
pub const DEFAULT_ACTION_COLOR: &str = "#03A9F4";
pub const DEFAULT_NEXT_STATE_COLOR: &str = "#4CAF50";
pub const DEFAULT_ERROR_COLOR: &str = "#F20404";

/// Whether a printed block starts collapsed.
#[derive(Clone)]
pub enum Collapsed {
    Fixed(bool),
    Computed(CollapsedFn),
}

impl Collapsed {
    /// Resolve for one entry.
    pub fn resolve(&self, next_state: &Value, action: &Value) -> bool {
        match self {
            Collapsed::Fixed(collapsed) => *collapsed,
            Collapsed::Computed(f) => f(next_state, action),
        }
    }
}

impl fmt::Debug for Collapsed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Collapsed::Fixed(collapsed) => f.debug_tuple("Fixed").field(collapsed).finish(),
            Collapsed::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Color functions per printed element. A `None` entry prints plain.
#[derive(Clone)]
pub struct Colors {
    pub title: Option<ColorFn>,
    pub prev_state: Option<ColorFn>,
    pub action: Option<ColorFn>,
    pub next_state: Option<ColorFn>,
    pub error: Option<ErrorColorFn>,
}

impl Colors {
    /// No colors at all.
    pub fn none() -> Self {
        Colors {
            title: None,
            prev_state: None,
            action: None,
            next_state: None,
            error: None,
        }
    }
}

impl Default for Colors {
    fn default() -> Self {
        Colors {
            title: Some(fixed_color(DEFAULT_TITLE_COLOR)),
            prev_state: Some(fixed_color(DEFAULT_PREV_STATE_COLOR)),
            action: Some(fixed_color(DEFAULT_ACTION_COLOR)),
            next_state: Some(fixed_color(DEFAULT_NEXT_STATE_COLOR)),
            error: Some(fixed_error_color(DEFAULT_ERROR_COLOR)),
        }
    }
}

impl fmt::Debug for Colors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Colors")
            .field("title", &self.title.is_some())
            .field("prev_state", &self.prev_state.is_some())
            .field("action", &self.action.is_some())
            .field("next_state", &self.next_state.is_some())
            .field("error", &self.error.is_some())
            .finish()
    }
}

/// A color function that ignores its argument.
pub fn fixed_color(color: &str) -> ColorFn {
    let color = color.to_string();
    Arc::new(move |_| color.clone())
}

/// An error color function that ignores its arguments.
pub fn fixed_error_color(color: &str) -> ErrorColorFn {
    let color = color.to_string();
    Arc::new(move |_, _| color.clone())
}

fn identity() -> TransformFn {
    Arc::new(|value| value)
}

/// Resolved logger options.
///
/// Start from [`LoggerOptions::default`] and override with the `with_*`
/// methods, or build from a [`LoggerConfig`].
///
/// # Examples
///
/// ```
/// use actionlog::{Level, LoggerOptions};
///
/// let options = LoggerOptions::default()
///     .with_level(Level::Info)
///     .with_timestamp(false)
///     .with_duration(true);
/// assert!(options.duration);
/// assert!(!options.timestamp);
/// ```
#[derive(Clone)]
pub struct LoggerOptions {
    pub level: LevelSpec,
    pub collapsed: Collapsed,
    pub duration: bool,
    pub timestamp: bool,
    /// Queue entries until [`Logger::flush`](crate::Logger::flush) instead of
    /// printing each one as soon as its state is emitted.
    pub batch: bool,
    pub state_transformer: TransformFn,
    pub action_transformer: TransformFn,
    pub colors: Colors,
}

impl Default for LoggerOptions {
    fn default() -> Self {
        LoggerOptions {
            level: LevelSpec::default(),
            collapsed: Collapsed::Fixed(false),
            duration: false,
            timestamp: true,
            batch: false,
            state_transformer: identity(),
            action_transformer: identity(),
            colors: Colors::default(),
        }
    }
}

impl fmt::Debug for LoggerOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoggerOptions")
            .field("level", &self.level)
            .field("collapsed", &self.collapsed)
            .field("duration", &self.duration)
            .field("timestamp", &self.timestamp)
            .field("batch", &self.batch)
            .field("colors", &self.colors)
            .finish_non_exhaustive()
    }
}

impl LoggerOptions {
    pub fn with_level(mut self, level: impl Into<LevelSpec>) -> Self {
        self.level = level.into();
        self
    }

    pub fn with_collapsed(mut self, collapsed: bool) -> Self {
        self.collapsed = Collapsed::Fixed(collapsed);
        self
    }

    /// Collapse per entry, from `(next_state, action)`.
    pub fn with_collapsed_fn(
        mut self,
        f: impl Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.collapsed = Collapsed::Computed(Arc::new(f));
        self
    }

    pub fn with_duration(mut self, duration: bool) -> Self {
        self.duration = duration;
        self
    }

    pub fn with_timestamp(mut self, timestamp: bool) -> Self {
        self.timestamp = timestamp;
        self
    }

    pub fn with_batch(mut self, batch: bool) -> Self {
        self.batch = batch;
        self
    }

    pub fn with_state_transformer(
        mut self,
        f: impl Fn(Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.state_transformer = Arc::new(f);
        self
    }

    pub fn with_action_transformer(
        mut self,
        f: impl Fn(Value) -> Value + Send + Sync + 'static,
    ) -> Self {
        self.action_transformer = Arc::new(f);
        self
    }

    pub fn with_colors(mut self, colors: Colors) -> Self {
        self.colors = colors;
        self
    }
}

/// Elements a color can be configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ColorField {
    Title,
    PrevState,
    Action,
    NextState,
    Error,
}

/// A configured level: nothing at all, one level for every field, or one
/// per field.
///
/// `null` turns every line off (titles still print). A per-field map
/// prints only the fields it names with a non-null level.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LevelConfig {
    Off,
    Single(Level),
    PerField(HashMap<Field, Option<Level>>),
}

/// The data-only part of [`LoggerOptions`], loadable from JSON.
///
/// Every key is optional; absent keys keep their defaults. An explicit
/// `"level": null` prints no lines. Under `colors`, a hex string replaces
/// that element's color and `null` disables it.
///
/// ```json
/// {
///   "level": { "action": "info", "nextState": "debug", "prevState": null },
///   "collapsed": true,
///   "duration": true,
///   "timestamp": false,
///   "colors": { "title": "#FF00FF", "error": null }
/// }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct LoggerConfig {
    #[serde(deserialize_with = "present")]
    pub level: Option<LevelConfig>,
    pub collapsed: Option<bool>,
    pub duration: Option<bool>,
    pub timestamp: Option<bool>,
    pub batch: Option<bool>,
    pub colors: HashMap<ColorField, Option<String>>,
}

/// Deserialize a key that is present, keeping `null` as a value rather
/// than folding it into "absent".
fn present<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}

impl LoggerConfig {
    /// Parse a config document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the document is not valid config JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(Error::Config)
    }

    /// Read and parse a config file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConfigIo`] if the file cannot be read, or
    /// [`Error::Config`] if it does not parse.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| Error::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }
}

impl From<LoggerConfig> for LoggerOptions {
    fn from(config: LoggerConfig) -> Self {
        let mut options = LoggerOptions::default();

        match config.level {
            Some(LevelConfig::Off) => options.level = LevelSpec::Constant(None),
            Some(LevelConfig::Single(level)) => options.level = level.into(),
            Some(LevelConfig::PerField(map)) => {
                options.level = map
                    .into_iter()
                    .fold(LevelSpec::per_field(), |spec, (field, level)| {
                        spec.with_field(field, level)
                    });
            }
            None => {}
        }
        if let Some(collapsed) = config.collapsed {
            options.collapsed = Collapsed::Fixed(collapsed);
        }
        if let Some(duration) = config.duration {
            options.duration = duration;
        }
        if let Some(timestamp) = config.timestamp {
            options.timestamp = timestamp;
        }
        if let Some(batch) = config.batch {
            options.batch = batch;
        }

        let colors = &mut options.colors;
        for (field, color) in config.colors {
            let color = color.as_deref();
            match field {
                ColorField::Title => colors.title = color.map(fixed_color),
                ColorField::PrevState => colors.prev_state = color.map(fixed_color),
                ColorField::Action => colors.action = color.map(fixed_color),
                ColorField::NextState => colors.next_state = color.map(fixed_color),
                ColorField::Error => colors.error = color.map(fixed_error_color),
            }
        }

        options
    }
}
