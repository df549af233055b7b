//! Shared error taxonomy (spec §7).
//!
//! Every component crate defines its own `thiserror` enum with a
//! `#[error(transparent)]` variant wrapping [`CoreError`], the same way the
//! teacher layers `HfError`/`LlmModelsError` over `FileSystemError`.

use std::path::PathBuf;

/// The four fatal/retryable buckets from spec §7. `BudgetExhausted` and
/// `CancelRequested` are deliberately absent here: spec §7 treats them as
/// result flags and control-flow signals, not errors.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// A configuration invariant was violated at startup. Fatal, surfaced
    /// before any I/O.
    #[error("config error: {0}")]
    Config(String),

    /// Reading or writing persistent state failed.
    #[error("io error while {operation} at {path:?}: {source}")]
    Io {
        operation: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An on-disk artefact could not be parsed.
    #[error("format error: {0}")]
    Format(String),

    /// An on-disk artefact parsed but violates an invariant.
    #[error("content error: {0}")]
    Content(String),
}

impl CoreError {
    pub fn io(operation: &'static str, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CoreError::Io {
            operation,
            path: path.into(),
            source,
        }
    }
}

pub type CoreResult<T> = std::result::Result<T, CoreError>;
