//! Event sinks.
//!
//! # Data Flow
//! ```text
//! StateChangeEvent
//!     → FanoutSink
//!         → file.rs    (append-only log, one line per event)
//!         → console.rs (operator-facing line on stdout)
//! ```
//!
//! # Design Decisions
//! - Events are written in the order they are produced
//! - A failed write is reported to the caller, never retried
//! - The tracker's state is not rolled back on sink failure

pub mod console;
pub mod file;

use thiserror::Error;

use crate::tracker::StateChangeEvent;

pub use console::ConsoleSink;
pub use file::{read_history, HistoryError, LogFileSink};

/// Errors raised while recording an event.
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("{sink} write failed: {source}")]
    Io {
        sink: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("{} sink(s) failed: {}", .0.len(), join(.0))]
    Multiple(Vec<SinkError>),
}

fn join(errors: &[SinkError]) -> String {
    errors.iter().map(|e| e.to_string()).collect::<Vec<_>>().join("; ")
}

/// Destination for state change events.
pub trait EventSink: Send {
    fn record(&mut self, event: &StateChangeEvent) -> Result<(), SinkError>;
}

impl<T: EventSink + ?Sized> EventSink for Box<T> {
    fn record(&mut self, event: &StateChangeEvent) -> Result<(), SinkError> {
        (**self).record(event)
    }
}

/// Delivers each event to every inner sink in order.
///
/// All sinks are attempted even if an earlier one fails.
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Box<dyn EventSink>>,
}

impl FanoutSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, sink: impl EventSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    pub fn len(&self) -> usize {
        self.sinks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.is_empty()
    }
}

impl EventSink for FanoutSink {
    fn record(&mut self, event: &StateChangeEvent) -> Result<(), SinkError> {
        let mut errors: Vec<SinkError> = self
            .sinks
            .iter_mut()
            .filter_map(|sink| sink.record(event).err())
            .collect();

        match errors.len() {
            0 => Ok(()),
            1 => Err(errors.remove(0)),
            _ => Err(SinkError::Multiple(errors)),
        }
    }
}
