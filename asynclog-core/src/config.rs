use std::sync::LazyLock;

use derive_from_env::FromEnv;

/// Process-wide tuning read once from `ASYNCLOG_*` environment variables.
#[derive(FromEnv)]
#[from_env(prefix = "ASYNCLOG")]
#[allow(non_snake_case)]
pub struct AsyncLogConfig {
    /// Interval between flushes of buffered handlers.
    #[from_env(default = "100")]
    pub FLUSH_INTERVAL_MS: u64,
    /// Threads dedicated to moving submissions into the work queue.
    #[from_env(default = "2")]
    pub ENQUEUE_WORKERS: usize,
}

impl Default for AsyncLogConfig {
    fn default() -> Self {
        Self {
            FLUSH_INTERVAL_MS: 100,
            ENQUEUE_WORKERS: 2,
        }
    }
}

pub static ASYNCLOG_CONFIG: LazyLock<AsyncLogConfig> =
    LazyLock::new(|| AsyncLogConfig::from_env().unwrap_or_default());
