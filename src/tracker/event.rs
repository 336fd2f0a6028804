//! State change events and their log representation.
//!
//! Log line format: `<link>,<UP|DOWN>,<HH:MM:SS>`

use chrono::{DateTime, Local, NaiveTime, Timelike};
use thiserror::Error;

use crate::tracker::link::Status;

const TIME_FORMAT: &str = "%H:%M:%S";

/// A confirmed transition of one link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateChangeEvent {
    pub link: String,
    pub status: Status,
    pub at: DateTime<Local>,
}

impl StateChangeEvent {
    pub fn new(link: impl Into<String>, status: Status, at: DateTime<Local>) -> Self {
        Self {
            link: link.into(),
            status,
            at,
        }
    }

    /// Line appended to the event log, without the trailing newline.
    pub fn log_line(&self) -> String {
        format!("{},{},{}", self.link, self.status, self.at.format(TIME_FORMAT))
    }

    /// Operator-facing message.
    pub fn console_line(&self) -> String {
        format!("{} changed to {} at {}", self.link, self.status, self.at.format(TIME_FORMAT))
    }
}

/// An event read back from the log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub link: String,
    pub status: Status,
    pub time: NaiveTime,
}

impl From<&StateChangeEvent> for LogRecord {
    fn from(event: &StateChangeEvent) -> Self {
        // Second precision, matching what the log stores.
        let time = event.at.time();
        let time = time.with_nanosecond(0).unwrap_or(time);
        Self {
            link: event.link.clone(),
            status: event.status,
            time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LogParseError {
    #[error("expected 3 comma-separated fields, found {0}")]
    FieldCount(usize),

    #[error("empty link name")]
    EmptyName,

    #[error("{0}")]
    Status(String),

    #[error("invalid timestamp '{0}'")]
    Time(String),
}

/// Parse one log line back into its parts.
pub fn parse_log_line(line: &str) -> Result<LogRecord, LogParseError> {
    let fields: Vec<&str> = line.trim_end_matches(['\r', '\n']).split(',').collect();
    let [link, status, time] = fields.as_slice() else {
        return Err(LogParseError::FieldCount(fields.len()));
    };

    if link.is_empty() {
        return Err(LogParseError::EmptyName);
    }
    let status = status.parse::<Status>().map_err(LogParseError::Status)?;
    let time = NaiveTime::parse_from_str(time, TIME_FORMAT)
        .map_err(|_| LogParseError::Time(time.to_string()))?;

    Ok(LogRecord {
        link: link.to_string(),
        status,
        time,
    })
}
