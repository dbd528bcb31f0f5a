use thiserror::Error;

/// Failure kinds of the capture pipeline. None of these is fatal to the
/// process: callers log the error and keep the remaining capabilities
/// running.
#[derive(Debug, Error)]
pub enum Error {
    /// Clipboard read or write-back failed this attempt.
    #[error("clipboard unavailable: {0}")]
    Clipboard(String),
    /// File or database write failed. In-memory state is preserved
    /// where applicable; the monitor retries on the next change.
    #[error("persistence failure: {0}")]
    Persistence(String),
    /// Global hotkey could not be registered; the picker shortcut is
    /// simply absent for this run.
    #[error("hotkey registration failure: {0}")]
    Registration(String),
    /// Config file missing or unreadable; hardcoded defaults apply.
    #[error("config load failure: {0}")]
    ConfigLoad(String),
}

impl From<rusqlite::Error> for Error {
    fn from(err: rusqlite::Error) -> Self {
        Error::Persistence(err.to_string())
    }
}

impl From<r2d2::Error> for Error {
    fn from(err: r2d2::Error) -> Self {
        Error::Persistence(err.to_string())
    }
}
