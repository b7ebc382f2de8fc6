use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

/// Destination for already formatted lines.
pub trait LogWriter {
    fn write_line(&mut self, line: &str) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
}

/// How an existing log file is treated when the logger starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FileMode {
    #[default]
    Append,
    Truncate,
}

/// File writer. Each line reaches the file with a single write.
pub struct LogFile {
    file: BufWriter<File>,
}

impl LogFile {
    pub fn new<P: AsRef<Path>>(path: P, mode: FileMode) -> Result<Self, io::Error> {
        let file = File::options()
            .create(true)
            .append(mode == FileMode::Append)
            .write(true)
            .truncate(mode == FileMode::Truncate)
            .open(path)?;
        Ok(Self {
            file: BufWriter::new(file),
        })
    }
}

impl LogWriter for LogFile {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        writeln!(self.file, "{line}")?;
        self.file.flush()
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file.flush()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StreamTarget {
    Stdout,
    #[default]
    Stderr,
}

/// Console writer. Lines are flushed as they are written.
#[derive(Debug, Default)]
pub struct LogStream {
    target: StreamTarget,
}

impl LogStream {
    pub fn new(target: StreamTarget) -> Self {
        Self { target }
    }

    pub fn target(&self) -> StreamTarget {
        self.target
    }
}

impl LogWriter for LogStream {
    fn write_line(&mut self, line: &str) -> io::Result<()> {
        match self.target {
            StreamTarget::Stdout => {
                let mut out = io::stdout().lock();
                writeln!(out, "{line}")?;
                out.flush()
            }
            StreamTarget::Stderr => {
                let mut err = io::stderr().lock();
                writeln!(err, "{line}")?;
                err.flush()
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.target {
            StreamTarget::Stdout => io::stdout().flush(),
            StreamTarget::Stderr => io::stderr().flush(),
        }
    }
}
