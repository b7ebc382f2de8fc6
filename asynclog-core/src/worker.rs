use std::{
    panic::{self, AssertUnwindSafe},
    sync::{Arc, Mutex},
    thread::JoinHandle,
    time::{Duration, Instant},
};

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, unbounded};

use crate::{
    config::ASYNCLOG_CONFIG,
    error::LogError,
    record::{LogMessage, LogRecord},
    severity::Severity,
    sink::Sink,
};

const BATCH_SIZE: usize = 32;

/// Producer side of the work queue, owning the drain worker thread.
///
/// Cloned senders may be handed to any number of producers; the worker is
/// joined by [`LogSender::shutdown`] or when this value is dropped.
pub struct LogSender {
    sender: Sender<LogMessage>,
    name: Arc<str>,
    handler: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for LogSender {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl LogSender {
    /// Logger instance name stamped onto every record.
    pub fn name(&self) -> &Arc<str> {
        &self.name
    }

    /// Enqueue a record. Never blocks on the sink and never fails observably.
    pub fn submit(&self, severity: Severity, message: impl Into<String>) {
        let record = LogRecord::new(severity, message, Arc::clone(&self.name));
        self.enqueue(record);
    }

    pub fn enqueue(&self, record: LogRecord) {
        // A closed queue means the logger was shut down; the record is dropped.
        self.sender.send(LogMessage::Record(record)).ok();
    }

    /// Process everything queued so far, flush the sink and stop the worker.
    pub fn shutdown(&self) {
        let Ok(mut guard) = self.handler.lock() else {
            return;
        };
        if let Some(handle) = guard.take() {
            self.sender.send(LogMessage::Shutdown).ok();
            if handle.join().is_err() {
                eprintln!("Logging error: drain worker {} panicked", self.name);
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.handler
            .lock()
            .map(|guard| guard.is_some())
            .unwrap_or(false)
    }
}

/// Start the drain worker for `sink`.
///
/// Records below `minimum` are still queued but never reach the sink.
pub fn spawn_log_thread(
    name: Arc<str>,
    sink: Sink,
    minimum: Severity,
) -> Result<LogSender, LogError> {
    let (sender, receiver) = unbounded::<LogMessage>();
    let flush_interval = Duration::from_millis(ASYNCLOG_CONFIG.FLUSH_INTERVAL_MS);
    let handler = std::thread::Builder::new()
        .name(format!("{name}-drain"))
        .spawn(move || drain(receiver, sink, minimum, flush_interval))?;
    Ok(LogSender {
        sender,
        name,
        handler: Mutex::new(Some(handler)),
    })
}

fn drain(
    receiver: Receiver<LogMessage>,
    mut sink: Sink,
    minimum: Severity,
    flush_interval: Duration,
) {
    let mut batch = Vec::with_capacity(BATCH_SIZE);
    let mut last_flush = Instant::now();
    loop {
        let timeout = flush_interval
            .checked_sub(last_flush.elapsed())
            .unwrap_or(Duration::from_millis(1));

        match receiver.recv_timeout(timeout) {
            Ok(msg) => {
                batch.push(msg);
                while batch.len() < BATCH_SIZE {
                    match receiver.try_recv() {
                        Ok(msg) => batch.push(msg),
                        Err(_) => break,
                    }
                }
            }
            Err(RecvTimeoutError::Timeout) => {
                flush(&mut sink);
                last_flush = Instant::now();
                continue;
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }

        let mut should_shutdown = false;
        for msg in batch.drain(..) {
            match msg {
                LogMessage::Record(record) => {
                    if record.severity().passes(minimum) {
                        dispatch(&mut sink, &record);
                    }
                }
                LogMessage::Shutdown => {
                    should_shutdown = true;
                    break;
                }
            }
        }

        if should_shutdown || last_flush.elapsed() >= flush_interval {
            flush(&mut sink);
            last_flush = Instant::now();
        }
        if should_shutdown {
            return;
        }
    }
    flush(&mut sink);
}

/// Hand one record to every handler. A failing handler is reported and skipped.
fn dispatch(sink: &mut Sink, record: &LogRecord) {
    for handler in sink.handlers_mut() {
        match panic::catch_unwind(AssertUnwindSafe(|| handler.handle(record))) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => report(&e),
            Err(_) => report(&LogError::Handler("handler panicked".into())),
        }
    }
}

fn flush(sink: &mut Sink) {
    for handler in sink.handlers_mut() {
        match panic::catch_unwind(AssertUnwindSafe(|| handler.flush())) {
            Ok(Ok(())) => {}
            Ok(Err(e)) => report(&e),
            Err(_) => report(&LogError::Handler("handler panicked on flush".into())),
        }
    }
}

/// Fallback channel for failures of the sink itself.
fn report(error: &LogError) {
    eprintln!("Logging error: {error}");
}
