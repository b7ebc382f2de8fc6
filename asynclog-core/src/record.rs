use std::sync::Arc;

use uuid::Uuid;

use crate::severity::Severity;

/// Fresh, unique logger instance name.
pub fn new_logger_name() -> Arc<str> {
    format!("AsyncLogger_{}", Uuid::new_v4().simple()).into()
}

/// A single log record travelling from a producer to the drain worker.
#[derive(Debug, Clone)]
pub struct LogRecord {
    severity: Severity,
    message: String,
    logger: Arc<str>,
}

impl LogRecord {
    pub fn new(severity: Severity, message: impl Into<String>, logger: Arc<str>) -> Self {
        Self {
            severity,
            message: message.into(),
            logger,
        }
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Name of the logger instance that produced the record.
    pub fn logger(&self) -> &str {
        &self.logger
    }
}

/// Messages carried by the work queue.
#[derive(Debug)]
pub enum LogMessage {
    Record(LogRecord),
    /// Sentinel queued behind every pending record on shutdown.
    Shutdown,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logger_names_are_unique() {
        let a = new_logger_name();
        let b = new_logger_name();
        assert!(a.starts_with("AsyncLogger_"));
        assert_ne!(a, b);
    }
}
