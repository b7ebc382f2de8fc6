use std::{fmt, path::PathBuf};

use crate::{
    error::Result,
    format::Formatter,
    log_writer::{FileMode, LogFile, LogStream, LogWriter, StreamTarget},
    record::LogRecord,
};

/// Something that consumes records on the drain worker thread.
///
/// Custom handlers format and store records however they like; they are
/// handed every record that passes the logger's threshold.
pub trait LogHandler: Send {
    fn handle(&mut self, record: &LogRecord) -> Result<()>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// A [`LogWriter`] paired with the [`Formatter`] rendering its lines.
pub struct FormattedHandler<W> {
    formatter: Formatter,
    writer: W,
}

impl<W: LogWriter> FormattedHandler<W> {
    pub fn new(formatter: Formatter, writer: W) -> Self {
        Self { formatter, writer }
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }
}

/// Console handler used for [`SinkConfig::Stream`]. Level names are colored.
pub fn stream_handler(
    target: StreamTarget,
    formatter: Formatter,
) -> FormattedHandler<LogStream> {
    FormattedHandler::new(formatter.colored(true), LogStream::new(target))
}

impl<W: LogWriter + Send> LogHandler for FormattedHandler<W> {
    fn handle(&mut self, record: &LogRecord) -> Result<()> {
        let line = self.formatter.format(record)?;
        self.writer.write_line(&line)?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Where records end up. Resolved once, when the logger starts.
pub enum SinkConfig {
    File { path: PathBuf, mode: FileMode },
    Stream(StreamTarget),
    /// Pre-built handlers replacing the file/stream choice and its formatting.
    Handlers(Vec<Box<dyn LogHandler>>),
}

impl Default for SinkConfig {
    fn default() -> Self {
        SinkConfig::Stream(StreamTarget::default())
    }
}

impl fmt::Debug for SinkConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SinkConfig::File { path, mode } => f
                .debug_struct("File")
                .field("path", path)
                .field("mode", mode)
                .finish(),
            SinkConfig::Stream(target) => f.debug_tuple("Stream").field(target).finish(),
            SinkConfig::Handlers(handlers) => {
                write!(f, "Handlers([{} handler(s)])", handlers.len())
            }
        }
    }
}

impl SinkConfig {
    /// Open the destination and bind it to `formatter`.
    ///
    /// The formatter is ignored for [`SinkConfig::Handlers`].
    pub fn resolve(self, formatter: Formatter) -> Result<Sink> {
        let handlers: Vec<Box<dyn LogHandler>> = match self {
            SinkConfig::File { path, mode } => {
                let file = LogFile::new(path, mode)?;
                vec![Box::new(FormattedHandler::new(formatter, file))]
            }
            SinkConfig::Stream(target) => vec![Box::new(stream_handler(target, formatter))],
            SinkConfig::Handlers(handlers) => handlers,
        };
        Ok(Sink { handlers })
    }
}

/// The resolved set of handlers owned by the drain worker.
pub struct Sink {
    handlers: Vec<Box<dyn LogHandler>>,
}

impl Sink {
    pub fn handlers_mut(&mut self) -> &mut [Box<dyn LogHandler>] {
        &mut self.handlers
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
