//! # asynclog-tokio
//! Non-blocking log submission for tokio applications.
//!
//! Request handlers `await` a submission only until the record sits in the
//! work queue; formatting and writing happen on a dedicated drain thread.
//!
//! ## Usage
//! ```toml
//! // Cargo.toml
//! ...
//! [dependencies]
//! asynclog-tokio = "0.1.0"
//! tokio = {version = "1.40.0", features = ["full"]}
//! ```
//!
//! ```rust
//! use asynclog_tokio::{logger_config, Severity};
//!
//! #[tokio::main]
//! async fn main() {
//!     let logger = logger_config()
//!         .with_min_severity(Severity::Debug)
//!         .start()
//!         .unwrap();
//!     logger.info("Hello, world!").await;
//!     logger.stop().await; // pending records are written before this returns
//! }
//! ```
//!
//! ## Logging to files
//! The log file is created if it does not exist and appended to unless
//! [`FileMode::Truncate`] is chosen.
//!
//! ```rust
//! use asynclog_tokio::{logger_config, FileMode};
//!
//! #[tokio::main]
//! async fn main() {
//!     logger_config()
//!         .with_log_file("/tmp/asynclog_app.log")
//!         .with_file_mode(FileMode::Truncate)
//!         .with_format("[{level}] {message}")
//!         .scope(|logger| async move {
//!             logger.error("Hello, world!").await;
//!             // the logger is stopped and flushed when the scope completes
//!         })
//!         .await
//!         .unwrap();
//!     assert_eq!(std::fs::read_to_string("/tmp/asynclog_app.log").unwrap(), "[ERROR] Hello, world!\n");
//! }
//! ```

mod pool;

pub use asynclog_core::{
    ASYNCLOG_CONFIG, DEFAULT_FORMAT, DEFAULT_TIME_FORMAT, FileMode, FormattedHandler, Formatter,
    LogError, LogHandler, LogRecord, LogStream, LogWriter, Severity, StreamTarget,
};
use asynclog_core::{LogSender, SinkConfig, install_log_bridge, new_logger_name, spawn_log_thread};
use pool::EnqueuePool;
use std::{future::Future, path::PathBuf, sync::Arc};

struct Inner {
    pool: EnqueuePool,
    queue: Arc<LogSender>,
    minimum: Severity,
}

/// Handle to a running logger. Clones share the same queue and worker.
#[derive(Clone)]
pub struct AsyncLogger {
    inner: Arc<Inner>,
}

impl AsyncLogger {
    pub fn name(&self) -> &str {
        self.inner.queue.name()
    }

    /// Queue `message` at `severity`.
    ///
    /// Returns once the record is in the work queue, regardless of how long
    /// the sink takes to write it. Never fails.
    pub async fn submit(&self, severity: Severity, message: impl Into<String>) {
        let record = LogRecord::new(severity, message, Arc::clone(self.inner.queue.name()));
        self.inner.pool.enqueue(record).await;
    }

    pub async fn debug(&self, message: impl Into<String>) {
        self.submit(Severity::Debug, message).await
    }

    pub async fn info(&self, message: impl Into<String>) {
        self.submit(Severity::Info, message).await
    }

    pub async fn warning(&self, message: impl Into<String>) {
        self.submit(Severity::Warning, message).await
    }

    pub async fn error(&self, message: impl Into<String>) {
        self.submit(Severity::Error, message).await
    }

    pub async fn exception(&self, message: impl Into<String>) {
        self.submit(Severity::Exception, message).await
    }

    pub async fn critical(&self, message: impl Into<String>) {
        self.submit(Severity::Critical, message).await
    }

    /// Write everything submitted so far, then stop the logger.
    ///
    /// Submissions made after this are dropped. Calling it twice is harmless.
    pub async fn stop(&self) {
        let inner = Arc::clone(&self.inner);
        let stopped = tokio::task::spawn_blocking(move || {
            inner.pool.shutdown();
            inner.queue.shutdown();
        })
        .await;
        if stopped.is_err() {
            eprintln!("Logging error: shutdown of {} did not complete", self.name());
        }
    }

    /// Route `log::info!` and friends into this logger.
    ///
    /// Those records skip the enqueue pool and go straight into the queue.
    pub fn install_log_bridge(&self) -> Result<(), LogError> {
        install_log_bridge(Arc::clone(&self.inner.queue), self.inner.minimum)
    }
}

/// Builder for configuring and starting a logger.
pub struct ConfigBuilder {
    log_file: Option<PathBuf>,
    file_mode: FileMode,
    stream: StreamTarget,
    handlers: Option<Vec<Box<dyn LogHandler>>>,
    min_severity: Severity,
    format: String,
    time_format: String,
    name: Option<String>,
    enqueue_workers: usize,
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self {
            log_file: None,
            file_mode: FileMode::Append,
            stream: StreamTarget::default(),
            handlers: None,
            min_severity: Severity::Warning,
            format: DEFAULT_FORMAT.into(),
            time_format: DEFAULT_TIME_FORMAT.into(),
            name: None,
            enqueue_workers: ASYNCLOG_CONFIG.ENQUEUE_WORKERS,
        }
    }
}

impl ConfigBuilder {
    /// Sets a log file. Without one, records go to the console stream.
    pub fn with_log_file<P: Into<PathBuf>>(self, path: P) -> Self {
        Self {
            log_file: Some(path.into()),
            ..self
        }
    }
    /// Maybe sets a log file.
    pub fn maybe_with_log_file<P: Into<PathBuf>>(self, path: Option<P>) -> Self {
        Self {
            log_file: path.map(Into::into),
            ..self
        }
    }
    /// Append to or truncate an existing log file.
    pub fn with_file_mode(self, file_mode: FileMode) -> Self {
        Self { file_mode, ..self }
    }
    /// Console stream used when no log file is set.
    pub fn with_stream(self, stream: StreamTarget) -> Self {
        Self { stream, ..self }
    }
    /// Replace the file/console destination and formatting with custom handlers.
    pub fn with_handlers(self, handlers: Vec<Box<dyn LogHandler>>) -> Self {
        Self {
            handlers: Some(handlers),
            ..self
        }
    }
    /// Records below this severity are never written.
    pub fn with_min_severity(self, min_severity: Severity) -> Self {
        Self {
            min_severity,
            ..self
        }
    }
    /// Line template, e.g. `"{time} [{level}] {message}"`.
    pub fn with_format(self, format: &str) -> Self {
        Self {
            format: format.into(),
            ..self
        }
    }
    /// chrono strftime string for `{time}`.
    pub fn with_time_format(self, time_format: &str) -> Self {
        Self {
            time_format: time_format.into(),
            ..self
        }
    }
    /// Sets a logger name
    pub fn with_name(self, name: &str) -> Self {
        Self {
            name: Some(name.into()),
            ..self
        }
    }
    /// Number of threads moving submissions into the queue.
    pub fn with_enqueue_workers(self, enqueue_workers: usize) -> Self {
        Self {
            enqueue_workers,
            ..self
        }
    }

    fn sink(&mut self) -> SinkConfig {
        if let Some(handlers) = self.handlers.take() {
            SinkConfig::Handlers(handlers)
        } else if let Some(path) = self.log_file.take() {
            SinkConfig::File {
                path,
                mode: self.file_mode,
            }
        } else {
            SinkConfig::Stream(self.stream)
        }
    }

    /// Open the sink and start the drain worker and enqueue pool.
    ///
    /// Invalid formats and unopenable files are reported here.
    pub fn start(mut self) -> Result<AsyncLogger, LogError> {
        let formatter = Formatter::new(&self.format, &self.time_format)?;
        let sink = self.sink().resolve(formatter)?;
        let name = self
            .name
            .as_deref()
            .map(Arc::<str>::from)
            .unwrap_or_else(new_logger_name);
        let queue = Arc::new(spawn_log_thread(name, sink, self.min_severity)?);
        let pool = EnqueuePool::new(Arc::clone(&queue), self.enqueue_workers)?;
        Ok(AsyncLogger {
            inner: Arc::new(Inner {
                pool,
                queue,
                minimum: self.min_severity,
            }),
        })
    }

    /// Start a logger, run the provided future with it, then stop it.
    pub async fn scope<F, Fut>(self, f: F) -> Result<Fut::Output, LogError>
    where
        F: FnOnce(AsyncLogger) -> Fut,
        Fut: Future,
    {
        let logger = self.start()?;
        let result = f(logger.clone()).await;
        logger.stop().await;
        Ok(result)
    }
}

/// Returns a default ConfigBuilder for configuring the logger.
pub fn logger_config() -> ConfigBuilder {
    ConfigBuilder::default()
}
