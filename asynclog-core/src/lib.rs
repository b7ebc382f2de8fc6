//! # asynclog-core
//! Core of asynclog: a work queue drained by a single background thread into
//! file, console or custom handlers.
//!
//! Producers only ever pay for an enqueue; formatting and I/O happen on the
//! drain worker, which survives handler failures and preserves submission
//! order.
//!
//! ```rust
//! use asynclog_core::{Formatter, Severity, SinkConfig, FileMode, spawn_log_thread};
//!
//! let sink = SinkConfig::File { path: "/tmp/asynclog_doc.log".into(), mode: FileMode::Truncate }
//!     .resolve(Formatter::new("[{level}] {message}", "%s").unwrap())
//!     .unwrap();
//! let sender = spawn_log_thread("doc".into(), sink, Severity::Info).unwrap();
//! sender.submit(Severity::Info, "Hello, world!");
//! sender.shutdown(); // flushes pending records
//! assert_eq!(std::fs::read_to_string("/tmp/asynclog_doc.log").unwrap(), "[INFO] Hello, world!\n");
//! ```

mod bridge;
mod config;
mod error;
mod format;
mod log_writer;
mod record;
mod severity;
mod sink;
mod worker;

pub use bridge::{LogBridge, install_log_bridge};
pub use config::{ASYNCLOG_CONFIG, AsyncLogConfig};
pub use error::{LogError, Result};
pub use format::{DEFAULT_FORMAT, DEFAULT_TIME_FORMAT, Formatter};
pub use log_writer::{FileMode, LogFile, LogStream, LogWriter, StreamTarget};
pub use record::{LogMessage, LogRecord, new_logger_name};
pub use severity::Severity;
pub use sink::{FormattedHandler, LogHandler, Sink, SinkConfig, stream_handler};
pub use worker::{LogSender, spawn_log_thread};
