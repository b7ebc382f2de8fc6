use std::{fmt, str::FromStr};

use colored::{ColoredString, Colorize};

/// Severity of a log record.
///
/// `Exception` is an error-weight record raised from failure paths; it filters
/// and renders exactly like `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
    Exception,
    Critical,
}

impl Severity {
    pub const ALL: [Severity; 6] = [
        Severity::Debug,
        Severity::Info,
        Severity::Warning,
        Severity::Error,
        Severity::Exception,
        Severity::Critical,
    ];

    /// Numeric weight used for threshold filtering.
    pub fn weight(self) -> u8 {
        match self {
            Severity::Debug => 10,
            Severity::Info => 20,
            Severity::Warning => 30,
            Severity::Error | Severity::Exception => 40,
            Severity::Critical => 50,
        }
    }

    /// Whether a record of this severity passes the given threshold.
    pub fn passes(self, minimum: Severity) -> bool {
        self.weight() >= minimum.weight()
    }

    /// Level name as written into log lines.
    pub fn name(self) -> &'static str {
        match self {
            Severity::Debug => "DEBUG",
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Error | Severity::Exception => "ERROR",
            Severity::Critical => "CRITICAL",
        }
    }

    pub(crate) fn colored_name(self) -> ColoredString {
        match self {
            Severity::Debug => self.name().blue(),
            Severity::Info => self.name().green(),
            Severity::Warning => self.name().yellow(),
            Severity::Error | Severity::Exception => self.name().red(),
            Severity::Critical => self.name().red().bold(),
        }
    }

    /// Most verbose `log` filter still letting this severity through.
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Severity::Debug => log::LevelFilter::Trace,
            Severity::Info => log::LevelFilter::Info,
            Severity::Warning => log::LevelFilter::Warn,
            Severity::Error | Severity::Exception | Severity::Critical => log::LevelFilter::Error,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "debug" => Ok(Severity::Debug),
            "info" => Ok(Severity::Info),
            "warn" | "warning" => Ok(Severity::Warning),
            "error" => Ok(Severity::Error),
            "exception" => Ok(Severity::Exception),
            "critical" | "fatal" => Ok(Severity::Critical),
            other => Err(format!("unknown severity {other:?}")),
        }
    }
}

impl From<log::Level> for Severity {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Severity::Error,
            log::Level::Warn => Severity::Warning,
            log::Level::Info => Severity::Info,
            log::Level::Debug | log::Level::Trace => Severity::Debug,
        }
    }
}
