use std::sync::Arc;

use log::{Log, Metadata, Record};

use crate::{error::LogError, severity::Severity, worker::LogSender};

/// Feeds `log` facade macros into a logger's work queue.
pub struct LogBridge {
    sender: Arc<LogSender>,
    minimum: Severity,
}

impl LogBridge {
    pub fn new(sender: Arc<LogSender>, minimum: Severity) -> Self {
        Self { sender, minimum }
    }
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &Metadata) -> bool {
        Severity::from(metadata.level()).passes(self.minimum)
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        self.sender
            .submit(Severity::from(record.level()), record.args().to_string());
    }

    fn flush(&self) {}
}

/// Install `sender` as the process-wide `log` backend.
///
/// Fails if any global logger has already been set.
pub fn install_log_bridge(sender: Arc<LogSender>, minimum: Severity) -> Result<(), LogError> {
    log::set_boxed_logger(Box::new(LogBridge::new(sender, minimum)))?;
    log::set_max_level(minimum.to_level_filter());
    Ok(())
}
