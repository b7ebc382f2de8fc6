use std::{
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use asynclog_tokio::{FileMode, LogError, LogHandler, LogRecord, Severity, logger_config};
use chrono::NaiveDateTime;

/// Handler keeping every message it receives, optionally slow or failing.
#[derive(Clone, Default)]
struct Collect {
    lines: Arc<Mutex<Vec<String>>>,
    delay: Duration,
    fail_on: Option<&'static str>,
}

impl Collect {
    fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

impl LogHandler for Collect {
    fn handle(&mut self, record: &LogRecord) -> Result<(), LogError> {
        std::thread::sleep(self.delay);
        if self.fail_on == Some(record.message()) {
            return Err(LogError::Handler(format!("cannot write {}", record.message())));
        }
        self.lines.lock().unwrap().push(record.message().to_string());
        Ok(())
    }
}

fn tmp_log(name: &str) -> String {
    let path = format!("/tmp/asynclog_test_{name}.log");
    std::fs::remove_file(&path).ok();
    path
}

#[tokio::test]
async fn test_single_producer_fifo() {
    let collect = Collect::default();
    let logger = logger_config()
        .with_handlers(vec![Box::new(collect.clone())])
        .with_min_severity(Severity::Debug)
        .start()
        .unwrap();
    for i in 0..1000 {
        logger.info(format!("message {i}")).await;
    }
    logger.stop().await;
    let expected: Vec<_> = (0..1000).map(|i| format!("message {i}")).collect();
    assert_eq!(collect.lines(), expected);
}

#[tokio::test]
async fn test_submission_does_not_wait_for_sink() {
    let collect = Collect {
        delay: Duration::from_millis(50),
        ..Default::default()
    };
    let logger = logger_config()
        .with_handlers(vec![Box::new(collect.clone())])
        .with_min_severity(Severity::Debug)
        .start()
        .unwrap();
    let start = Instant::now();
    for i in 0..20 {
        logger.warning(format!("slow {i}")).await;
    }
    let submitted = start.elapsed();
    // The sink needs a full second for these; submitting must not.
    assert!(
        submitted < Duration::from_millis(500),
        "submission took {submitted:?}"
    );
    assert!(collect.lines().len() < 20);
    logger.stop().await;
    assert_eq!(collect.lines().len(), 20);
}

#[tokio::test]
async fn test_worker_survives_sink_failure() {
    let collect = Collect {
        fail_on: Some("record 3"),
        ..Default::default()
    };
    let logger = logger_config()
        .with_handlers(vec![Box::new(collect.clone())])
        .with_min_severity(Severity::Debug)
        .start()
        .unwrap();
    for i in 0..10 {
        logger.error(format!("record {i}")).await;
    }
    logger.stop().await;
    let expected: Vec<_> = (0..10)
        .filter(|i| *i != 3)
        .map(|i| format!("record {i}"))
        .collect();
    assert_eq!(collect.lines(), expected);
}

#[tokio::test]
async fn test_threshold_filtering() {
    let path = tmp_log("threshold");
    let logger = logger_config()
        .with_log_file(&path)
        .with_min_severity(Severity::Warning)
        .with_format("{level} {message}")
        .start()
        .unwrap();
    logger.debug("d").await;
    logger.info("i").await;
    logger.warning("w").await;
    logger.error("e").await;
    logger.exception("x").await;
    logger.critical("c").await;
    logger.stop().await;
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "WARNING w\nERROR e\nERROR x\nCRITICAL c\n"
    );
}

#[tokio::test]
async fn test_default_threshold_is_warning() {
    let collect = Collect::default();
    let logger = logger_config()
        .with_handlers(vec![Box::new(collect.clone())])
        .start()
        .unwrap();
    logger.debug("hidden").await;
    logger.info("hidden").await;
    logger.warning("shown").await;
    logger.critical("shown").await;
    logger.stop().await;
    assert_eq!(collect.lines(), vec!["shown", "shown"]);
}

#[tokio::test]
async fn test_format_template() {
    let path = tmp_log("format");
    let logger = logger_config()
        .with_log_file(&path)
        .with_min_severity(Severity::Info)
        .with_format("{time} [{level}] {message}")
        .with_time_format("%Y-%m-%dT%H:%M:%S")
        .start()
        .unwrap();
    logger.info("hello").await;
    logger.stop().await;
    let content = std::fs::read_to_string(&path).unwrap();
    let line = content.strip_suffix('\n').unwrap();
    let (time, rest) = line.split_once(' ').unwrap();
    assert_eq!(rest, "[INFO] hello");
    assert!(NaiveDateTime::parse_from_str(time, "%Y-%m-%dT%H:%M:%S").is_ok());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_producers() {
    const PRODUCERS: usize = 8;
    const MESSAGES: usize = 250;
    let path = tmp_log("concurrent");
    let logger = logger_config()
        .with_log_file(&path)
        .with_file_mode(FileMode::Truncate)
        .with_min_severity(Severity::Debug)
        .with_format("{message}")
        .start()
        .unwrap();
    let handles: Vec<_> = (0..PRODUCERS)
        .map(|p| {
            let logger = logger.clone();
            tokio::spawn(async move {
                for m in 0..MESSAGES {
                    logger.debug(format!("{p}-{m}")).await;
                }
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }
    logger.stop().await;

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(lines.len(), PRODUCERS * MESSAGES);
    // Each producer awaits its submissions, so its own records stay in order.
    let mut next = vec![0; PRODUCERS];
    for line in lines {
        let (p, m) = line.split_once('-').unwrap();
        let (p, m): (usize, usize) = (p.parse().unwrap(), m.parse().unwrap());
        assert_eq!(m, next[p], "producer {p} out of order");
        next[p] += 1;
    }
    assert!(next.iter().all(|n| *n == MESSAGES));
}

#[tokio::test]
async fn test_stop_flushes_and_drops_late_records() {
    let collect = Collect::default();
    let logger = logger_config()
        .with_handlers(vec![Box::new(collect.clone())])
        .with_min_severity(Severity::Debug)
        .start()
        .unwrap();
    logger.info("before").await;
    logger.stop().await;
    logger.info("after").await;
    logger.stop().await;
    assert_eq!(collect.lines(), vec!["before"]);
}

#[tokio::test]
async fn test_file_modes() {
    let path = tmp_log("modes");
    std::fs::write(&path, "old\n").unwrap();
    let logger = logger_config()
        .with_log_file(&path)
        .with_format("{message}")
        .start()
        .unwrap();
    logger.error("appended").await;
    logger.stop().await;
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "old\nappended\n");

    let logger = logger_config()
        .with_log_file(&path)
        .with_file_mode(FileMode::Truncate)
        .with_format("{message}")
        .start()
        .unwrap();
    logger.error("fresh").await;
    logger.stop().await;
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "fresh\n");
}

#[tokio::test]
async fn test_configuration_errors_surface_at_start() {
    let missing_dir = logger_config()
        .with_log_file("/nonexistent-dir/app.log")
        .start();
    assert!(matches!(missing_dir, Err(LogError::Io(_))));

    let bad_template = logger_config().with_format("{when}").start();
    assert!(matches!(bad_template, Err(LogError::UnknownPlaceholder(_))));
}

#[tokio::test]
async fn test_scope_stops_logger() {
    let path = tmp_log("scope");
    let name = logger_config()
        .with_log_file(&path)
        .with_name("scoped")
        .with_format("{name}: {message}")
        .scope(|logger| async move {
            logger.critical("inside").await;
            logger.name().to_string()
        })
        .await
        .unwrap();
    assert_eq!(name, "scoped");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "scoped: inside\n");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_stops_drain_everything() {
    let collect = Collect::default();
    let logger = logger_config()
        .with_handlers(vec![Box::new(collect.clone())])
        .with_min_severity(Severity::Debug)
        .start()
        .unwrap();
    for i in 0..500 {
        logger.info(format!("{i}")).await;
    }
    tokio::join!(logger.stop(), logger.stop());
    assert_eq!(collect.lines().len(), 500);
}

#[tokio::test]
async fn test_file_line_visible_before_stop() {
    let path = tmp_log("visible");
    let logger = logger_config()
        .with_log_file(&path)
        .with_min_severity(Severity::Info)
        .with_format("{message}")
        .start()
        .unwrap();
    logger.info("hello").await;
    let deadline = Instant::now() + Duration::from_secs(1);
    let mut content = String::new();
    while Instant::now() < deadline {
        content = std::fs::read_to_string(&path).unwrap();
        if !content.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(content, "hello\n");
    // Never stopped, as when the process exits without shutting the logger down.
    std::mem::forget(logger);
}
