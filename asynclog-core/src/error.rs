use thiserror::Error;

/// Errors raised while configuring a logger or dispatching a record.
///
/// Configuration errors are returned to whoever builds the logger. Dispatch
/// errors stay inside the drain worker and are only ever reported on stderr.
#[derive(Error, Debug)]
pub enum LogError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown placeholder {{{0}}} in log format")]
    UnknownPlaceholder(String),

    #[error("unbalanced brace at byte {0} in log format")]
    UnbalancedBrace(usize),

    #[error("invalid time format: {0:?}")]
    InvalidTimeFormat(String),

    #[error("handler failure: {0}")]
    Handler(String),

    #[error("a global logger is already installed")]
    BridgeInstalled(#[from] log::SetLoggerError),
}

pub type Result<T> = std::result::Result<T, LogError>;
