//! Per-link debounce state.

use std::num::NonZeroU32;

use crate::probe::{ProbeOutcome, ProbeTarget};

/// Stable, debounced state of a link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkState {
    /// No threshold crossed yet since startup.
    #[default]
    Unknown,
    Up,
    Down,
}

/// Direction of a confirmed transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Up,
    Down,
}

impl Status {
    /// Wire representation used in the event log.
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Up => "UP",
            Status::Down => "DOWN",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UP" => Ok(Status::Up),
            "DOWN" => Ok(Status::Down),
            other => Err(format!("unknown status '{}'", other)),
        }
    }
}

impl From<Status> for LinkState {
    fn from(status: Status) -> Self {
        match status {
            Status::Up => LinkState::Up,
            Status::Down => LinkState::Down,
        }
    }
}

/// A monitored link.
#[derive(Debug, Clone)]
pub struct Link {
    name: String,
    target: ProbeTarget,
    state: LinkState,
    consecutive_successes: u32,
    consecutive_failures: u32,
}

impl Link {
    pub fn new(name: impl Into<String>, target: ProbeTarget) -> Self {
        Self {
            name: name.into(),
            target,
            state: LinkState::Unknown,
            consecutive_successes: 0,
            consecutive_failures: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> &ProbeTarget {
        &self.target
    }

    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn consecutive_successes(&self) -> u32 {
        self.consecutive_successes
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    /// Apply one outcome and return the new stable status if a threshold was
    /// crossed. The state is updated before returning.
    pub(crate) fn apply(&mut self, outcome: ProbeOutcome, threshold: NonZeroU32) -> Option<Status> {
        match outcome {
            ProbeOutcome::Success => {
                self.consecutive_successes = self.consecutive_successes.saturating_add(1);
                self.consecutive_failures = 0;
            }
            ProbeOutcome::Failure => {
                self.consecutive_failures = self.consecutive_failures.saturating_add(1);
                self.consecutive_successes = 0;
            }
        }

        let threshold = threshold.get();
        if self.consecutive_failures >= threshold && self.state != LinkState::Down {
            self.state = LinkState::Down;
            Some(Status::Down)
        } else if self.consecutive_successes >= threshold && self.state != LinkState::Up {
            self.state = LinkState::Up;
            Some(Status::Up)
        } else {
            None
        }
    }
}
