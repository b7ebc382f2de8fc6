use std::time::Duration;

use asynclog_tokio::{Severity, logger_config};

/// Simulated request handler logging on entry and on failure.
async fn handle_request(logger: asynclog_tokio::AsyncLogger, uid: usize) {
    logger.info(format!("get_files: uid: {uid}")).await;
    tokio::time::sleep(Duration::from_millis(5)).await;
    if uid % 7 == 0 {
        logger.error(format!("get_files: uid: {uid}: no such user")).await;
    }
}

#[tokio::main]
async fn main() {
    let path = "/tmp/asynclog_requests.log";
    logger_config()
        .with_log_file(path)
        .with_min_severity(Severity::Debug)
        .with_format("{time} [{level}] {message}")
        .scope(|logger| async move {
            let handles: Vec<_> = (0..50)
                .map(|uid| tokio::spawn(handle_request(logger.clone(), uid)))
                .collect();
            for handle in handles {
                handle.await.unwrap();
            }
            logger.debug("all requests served").await;
        })
        .await
        .expect("Unable to start logger");
    let content = std::fs::read_to_string(path).unwrap();
    println!("{} lines written to {path}", content.lines().count());
    println!("last line: {}", content.lines().last().unwrap_or_default());
}
