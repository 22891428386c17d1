mod action;
mod clock;
pub mod console;
mod entry;
mod error;
mod level;
mod logger;
mod options;
mod printer;
mod store;

pub use action::{Action, INIT_ACTION};
pub use clock::{format_time, Clock, SystemClock};
pub use console::{
    default_console, Console, FlatConsole, Record, RecordingConsole, Rgb, TerminalConsole,
};
pub use entry::LogEntry;
pub use error::{Error, Result};
pub use level::{resolve, ActionLevelFn, Field, FieldLevel, Level, LevelSpec, PayloadLevelFn};
pub use logger::Logger;
pub use options::{
    fixed_color, fixed_error_color, Collapsed, CollapsedFn, ColorField, ColorFn, Colors,
    ErrorColorFn, LevelConfig, LoggerConfig, LoggerOptions, TransformFn, DEFAULT_ACTION_COLOR,
    DEFAULT_ERROR_COLOR, DEFAULT_NEXT_STATE_COLOR, DEFAULT_PREV_STATE_COLOR, DEFAULT_TITLE_COLOR,
};
pub use printer::{Printer, GROUP_END_FALLBACK};
pub use store::{Emission, Middleware, ReduceFn, Store, StoreBuilder, TryReduceFn};
