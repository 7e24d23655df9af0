//! Trigger — the event pattern that makes a rule a candidate.

use serde::{Deserialize, Serialize};

use crate::event::Event;
use crate::rule::Condition;

/// Binds a rule to a business event type, guarded by ordered conditions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trigger {
    /// Business event type, e.g. `"ORDER_PLACED"`. Never empty.
    pub event_type: String,
    /// AND-combined guards evaluated against the event payload.
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

impl Trigger {
    /// A trigger with no conditions: fires on every event of this type.
    #[must_use]
    pub fn on(event_type: impl Into<String>) -> Self {
        Self {
            event_type: event_type.into(),
            conditions: Vec::new(),
        }
    }

    /// Append a condition.
    #[must_use]
    pub fn when(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Check whether this trigger's event type matches a given event.
    ///
    /// Conditions are evaluated separately by the dispatcher, so a
    /// malformed condition can be reported without hiding the match.
    #[must_use]
    pub fn matches_event(&self, event: &Event) -> bool {
        self.event_type == event.event_type
    }
}

impl std::fmt::Display for Trigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "on({}, {} conditions)", self.event_type, self.conditions.len())
    }
}
