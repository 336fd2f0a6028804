//! The link state tracker.

use std::collections::HashMap;
use std::num::NonZeroU32;

use chrono::{DateTime, Local};

use crate::probe::{ProbeOutcome, ProbeTarget};
use crate::tracker::event::StateChangeEvent;
use crate::tracker::link::Link;

/// Handle to a link owned by a [`LinkTracker`].
///
/// Only a tracker hands these out. An id used with a different tracker
/// resolves to no link rather than to someone else's.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkId(usize);

impl LinkId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Converts per-cycle probe outcomes into debounced state changes.
#[derive(Debug)]
pub struct LinkTracker {
    links: Vec<Link>,
    by_name: HashMap<String, LinkId>,
    threshold: NonZeroU32,
}

impl LinkTracker {
    /// Create an empty tracker.
    pub fn new(threshold: NonZeroU32) -> Self {
        Self {
            links: Vec::new(),
            by_name: HashMap::new(),
            threshold,
        }
    }

    /// Register a link. Returns `None` if the name is already taken.
    pub fn add_link(&mut self, name: impl Into<String>, target: ProbeTarget) -> Option<LinkId> {
        let name = name.into();
        if self.by_name.contains_key(&name) {
            return None;
        }
        let id = LinkId(self.links.len());
        self.by_name.insert(name.clone(), id);
        self.links.push(Link::new(name, target));
        Some(id)
    }

    pub fn threshold(&self) -> NonZeroU32 {
        self.threshold
    }

    /// Look up a link by its configured name.
    pub fn link_id(&self, name: &str) -> Option<LinkId> {
        self.by_name.get(name).copied()
    }

    /// The link behind `id`, or `None` if the id came from another tracker.
    pub fn link(&self, id: LinkId) -> Option<&Link> {
        self.links.get(id.0)
    }

    /// All links in registration order.
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Ids of all links in registration order.
    pub fn ids(&self) -> impl Iterator<Item = LinkId> {
        (0..self.links.len()).map(LinkId)
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Record an outcome stamped with the current local time.
    pub fn record_outcome(&mut self, id: LinkId, outcome: ProbeOutcome) -> Option<StateChangeEvent> {
        self.record_outcome_at(id, outcome, Local::now())
    }

    /// Record an outcome and return the transition it caused, if any.
    ///
    /// The link's stable state is updated exactly when an event is returned.
    /// An id this tracker did not issue is ignored.
    pub fn record_outcome_at(
        &mut self,
        id: LinkId,
        outcome: ProbeOutcome,
        at: DateTime<Local>,
    ) -> Option<StateChangeEvent> {
        let registered = self.links.len();
        let Some(link) = self.links.get_mut(id.0) else {
            tracing::warn!(index = id.0, links = registered, "Outcome for unregistered link ignored");
            return None;
        };
        let status = link.apply(outcome, self.threshold)?;

        tracing::debug!(
            link = %link.name(),
            status = %status,
            successes = link.consecutive_successes(),
            failures = link.consecutive_failures(),
            "Threshold crossed"
        );

        Some(StateChangeEvent::new(link.name(), status, at))
    }
}
