//! Append-only event log.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use super::{EventSink, SinkError};
use crate::tracker::event::{parse_log_line, LogParseError, LogRecord};
use crate::tracker::StateChangeEvent;

/// Appends `name,STATUS,HH:MM:SS` lines to a file.
///
/// The file is opened in append mode on every write so that an external
/// rotation or a transient failure does not poison later writes.
#[derive(Debug, Clone)]
pub struct LogFileSink {
    path: PathBuf,
}

impl LogFileSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, line: &str) -> io::Result<()> {
        let mut file = OpenOptions::new().create(true).append(true).open(&self.path)?;
        // One write call per line keeps concurrent appenders from interleaving.
        file.write_all(format!("{}\n", line).as_bytes())?;
        file.flush()
    }
}

impl EventSink for LogFileSink {
    fn record(&mut self, event: &StateChangeEvent) -> Result<(), SinkError> {
        self.append(&event.log_line())
            .map_err(|source| SinkError::Io { sink: "log file", source })
    }
}

/// Error reading the event log back.
#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{path}:{line}: {source}")]
    Parse {
        path: PathBuf,
        line: usize,
        #[source]
        source: LogParseError,
    },
}

/// Reconstruct the full event history from a log file, in write order.
///
/// Blank lines are skipped. A missing file is an empty history.
pub fn read_history(path: &Path) -> Result<Vec<LogRecord>, HistoryError> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(HistoryError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    let mut records = Vec::new();
    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|source| HistoryError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }
        let record = parse_log_line(&line).map_err(|source| HistoryError::Parse {
            path: path.to_path_buf(),
            line: index + 1,
            source,
        })?;
        records.push(record);
    }
    Ok(records)
}
