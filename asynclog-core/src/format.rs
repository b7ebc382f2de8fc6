use std::{fmt::Write, sync::LazyLock};

use chrono::{
    DateTime, Local,
    format::{Item, StrftimeItems},
};
use regex::Regex;

use crate::{
    error::{LogError, Result},
    record::LogRecord,
};

pub const DEFAULT_FORMAT: &str = "{time} - {level} - {message}";
pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

static TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{|\}\}|\{([A-Za-z_]*)\}|[{}]").expect("static regex is valid")
});

#[derive(Debug, Clone, PartialEq)]
enum Segment {
    Literal(String),
    Time,
    Level,
    Message,
    Name,
}

/// Renders a record into a single line according to a template.
///
/// Templates use `{time}`, `{level}`, `{message}` and `{name}` placeholders;
/// `{{` and `}}` produce literal braces.
#[derive(Debug, Clone)]
pub struct Formatter {
    segments: Vec<Segment>,
    time_format: String,
    colored: bool,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(DEFAULT_FORMAT, DEFAULT_TIME_FORMAT).expect("default formats are valid")
    }
}

impl Formatter {
    pub fn new(template: &str, time_format: &str) -> Result<Self> {
        if StrftimeItems::new(time_format).any(|item| matches!(item, Item::Error)) {
            return Err(LogError::InvalidTimeFormat(time_format.into()));
        }
        Ok(Self {
            segments: parse_template(template)?,
            time_format: time_format.into(),
            colored: false,
        })
    }

    /// Color the level name. Meant for terminal output only.
    pub fn colored(self, yes: bool) -> Self {
        Self {
            colored: yes,
            ..self
        }
    }

    pub fn format(&self, record: &LogRecord) -> Result<String> {
        self.format_at(record, Local::now())
    }

    pub fn format_at(&self, record: &LogRecord, time: DateTime<Local>) -> Result<String> {
        let mut line = String::with_capacity(record.message().len() + 48);
        for segment in &self.segments {
            let written = match segment {
                Segment::Literal(text) => {
                    line.push_str(text);
                    Ok(())
                }
                Segment::Time => write!(line, "{}", time.format(&self.time_format)),
                Segment::Level if self.colored => {
                    write!(line, "{}", record.severity().colored_name())
                }
                Segment::Level => {
                    line.push_str(record.severity().name());
                    Ok(())
                }
                Segment::Message => {
                    line.push_str(record.message());
                    Ok(())
                }
                Segment::Name => {
                    line.push_str(record.logger());
                    Ok(())
                }
            };
            written.map_err(|_| LogError::InvalidTimeFormat(self.time_format.clone()))?;
        }
        Ok(line)
    }
}

fn parse_template(template: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut last = 0;
    for caps in TOKEN.captures_iter(template) {
        let token = caps.get(0).expect("group 0 always matches");
        literal.push_str(&template[last..token.start()]);
        last = token.end();
        let placeholder = match token.as_str() {
            "{{" => {
                literal.push('{');
                continue;
            }
            "}}" => {
                literal.push('}');
                continue;
            }
            "{" | "}" => return Err(LogError::UnbalancedBrace(token.start())),
            _ => match caps.get(1).map(|m| m.as_str()) {
                Some("time") => Segment::Time,
                Some("level") => Segment::Level,
                Some("message") => Segment::Message,
                Some("name") => Segment::Name,
                other => return Err(LogError::UnknownPlaceholder(other.unwrap_or("").into())),
            },
        };
        if !literal.is_empty() {
            segments.push(Segment::Literal(std::mem::take(&mut literal)));
        }
        segments.push(placeholder);
    }
    literal.push_str(&template[last..]);
    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    Ok(segments)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::severity::Severity;
    use chrono::TimeZone;

    fn record(severity: Severity, message: &str) -> LogRecord {
        LogRecord::new(severity, message, "app".into())
    }

    #[test]
    fn test_format_with_template() {
        let formatter = Formatter::new("{time} [{level}] {message}", "%H:%M:%S").unwrap();
        let time = Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 5).unwrap();
        let line = formatter
            .format_at(&record(Severity::Info, "hello"), time)
            .unwrap();
        assert_eq!(line, "12:30:05 [INFO] hello");
    }

    #[test]
    fn test_default_format() {
        let time = Local.with_ymd_and_hms(2024, 5, 1, 12, 30, 5).unwrap();
        let line = Formatter::default()
            .format_at(&record(Severity::Warning, "disk low"), time)
            .unwrap();
        assert_eq!(line, "2024-05-01 12:30:05,000 - WARNING - disk low");
    }

    #[test]
    fn test_escaped_braces_and_name() {
        let formatter = Formatter::new("{{{name}}} {message}", "%s").unwrap();
        let line = formatter.format(&record(Severity::Debug, "x")).unwrap();
        assert_eq!(line, "{app} x");
    }

    #[test]
    fn test_message_braces_are_not_parsed() {
        let formatter = Formatter::new("{message}", "%s").unwrap();
        let line = formatter.format(&record(Severity::Debug, "{time}")).unwrap();
        assert_eq!(line, "{time}");
    }

    #[test]
    fn test_invalid_templates() {
        assert!(matches!(
            Formatter::new("{when} {message}", DEFAULT_TIME_FORMAT),
            Err(LogError::UnknownPlaceholder(p)) if p == "when"
        ));
        assert!(matches!(
            Formatter::new("{message", DEFAULT_TIME_FORMAT),
            Err(LogError::UnbalancedBrace(0))
        ));
        assert!(matches!(
            Formatter::new("{message}", "%Q"),
            Err(LogError::InvalidTimeFormat(_))
        ));
    }
}
