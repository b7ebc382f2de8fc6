use std::{
    sync::{Arc, Mutex, RwLock},
    thread::JoinHandle,
};

use asynclog_core::{LogRecord, LogSender};
use crossbeam_channel::{Sender, unbounded};
use tokio::sync::oneshot;

struct EnqueueJob {
    record: LogRecord,
    done: oneshot::Sender<()>,
}

/// Fixed set of threads whose only job is moving records into the work queue.
///
/// Async callers hand a record over and await the completion signal, so the
/// queue insertion never runs on the async scheduler.
pub(crate) struct EnqueuePool {
    jobs: RwLock<Option<Sender<EnqueueJob>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl EnqueuePool {
    pub(crate) fn new(queue: Arc<LogSender>, size: usize) -> std::io::Result<Self> {
        let (jobs, receiver) = unbounded::<EnqueueJob>();
        let workers = (0..size.max(1))
            .map(|i| {
                let receiver = receiver.clone();
                let queue = Arc::clone(&queue);
                std::thread::Builder::new()
                    .name(format!("{}-enqueue-{i}", queue.name()))
                    .spawn(move || {
                        for EnqueueJob { record, done } in receiver {
                            queue.enqueue(record);
                            // The submitter may have been cancelled; nothing to tell.
                            done.send(()).ok();
                        }
                    })
            })
            .collect::<std::io::Result<Vec<_>>>()?;
        Ok(Self {
            jobs: RwLock::new(Some(jobs)),
            workers: Mutex::new(workers),
        })
    }

    /// Hand `record` to the pool and wait until it sits in the work queue.
    ///
    /// Returns `false` when the pool was already shut down.
    pub(crate) async fn enqueue(&self, record: LogRecord) -> bool {
        let (done, landed) = oneshot::channel();
        let sent = match self.jobs.read() {
            Ok(jobs) => jobs
                .as_ref()
                .is_some_and(|jobs| jobs.send(EnqueueJob { record, done }).is_ok()),
            Err(_) => false,
        };
        sent && landed.await.is_ok()
    }

    /// Stop accepting jobs and wait for the in-flight ones to land.
    ///
    /// Blocks the calling thread while joining the workers. Concurrent callers
    /// all return only once every worker has been joined.
    pub(crate) fn shutdown(&self) {
        if let Ok(mut jobs) = self.jobs.write() {
            jobs.take();
        }
        let Ok(mut workers) = self.workers.lock() else {
            return;
        };
        for worker in workers.drain(..) {
            if worker.join().is_err() {
                eprintln!("Logging error: enqueue worker panicked");
            }
        }
    }

    #[cfg(test)]
    fn size(&self) -> usize {
        self.workers.lock().map(|w| w.len()).unwrap_or(0)
    }
}

impl Drop for EnqueuePool {
    fn drop(&mut self) {
        self.shutdown();
    }
}
