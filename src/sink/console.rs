//! Operator-facing console output.

use std::io::{self, Write};

use super::{EventSink, SinkError};
use crate::tracker::StateChangeEvent;

/// Writes one human-readable line per event.
pub struct ConsoleSink<W: Write + Send = io::Stdout> {
    out: W,
}

impl ConsoleSink {
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write + Send> ConsoleSink<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> EventSink for ConsoleSink<W> {
    fn record(&mut self, event: &StateChangeEvent) -> Result<(), SinkError> {
        writeln!(self.out, "{}", event.console_line())
            .and_then(|_| self.out.flush())
            .map_err(|source| SinkError::Io { sink: "console", source })
    }
}
