use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the store and the logger middleware.
///
/// Panics raised inside user callbacks (transformers, level functions,
/// color functions) are not caught and unwind through `dispatch`.
#[derive(Debug, Error)]
pub enum Error {
    /// Writing to the console failed.
    #[error("console write failed: {0}")]
    Io(#[from] io::Error),

    /// A logger config document did not parse.
    #[error("invalid logger config: {0}")]
    Config(#[source] serde_json::Error),

    /// A logger config file could not be read.
    #[error("failed to read logger config {}: {source}", path.display())]
    ConfigIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
