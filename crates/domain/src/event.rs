//! Event — an immutable record of something that happened in the
//! surrounding platform (order placed, payment failed, …).
//!
//! Events are consumed, not owned, by the engine: producers assign the
//! id (used for dedup under at-least-once delivery), the type, and an
//! arbitrary JSON payload the conditions and templates read from.

use serde::{Deserialize, Serialize};

use crate::id::{EventId, TenantId};
use crate::time::Timestamp;

/// A domain event delivered to the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    /// Producer-assigned unique id; part of the dedup key.
    pub id: EventId,
    /// Business event type, e.g. `"ORDER_PLACED"`.
    pub event_type: String,
    /// Tenant the event belongs to; `None` for platform-level events.
    pub tenant_id: Option<TenantId>,
    /// Arbitrary JSON payload; field paths in conditions and templates
    /// resolve against this value.
    pub payload: serde_json::Value,
    /// When the event occurred at the producer.
    pub occurred_at: Timestamp,
}

impl Event {
    /// Create an event with a fresh id, stamped with the current time.
    #[must_use]
    pub fn new(
        event_type: impl Into<String>,
        tenant_id: Option<TenantId>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            id: EventId::new(),
            event_type: event_type.into(),
            tenant_id,
            payload,
            occurred_at: crate::time::now(),
        }
    }
}
