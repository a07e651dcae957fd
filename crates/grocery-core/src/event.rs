//! Item change notifications
//!
//! Every mutation of the list publishes an [`ItemEvent`] to an [`EventSink`].
//! Nothing in the service depends on an event being consumed.

use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EventId(pub Uuid);

impl EventId {
    /// Create a new random event ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What happened to an item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ItemEventKind {
    Added { quantity: u64 },
    Deleted,
    Updated { quantity: u64, status: Option<bool> },
    Renamed { from: String, quantity: u64 },
}

impl ItemEventKind {
    /// Topic name the event is published under
    pub fn topic(&self) -> &'static str {
        match self {
            ItemEventKind::Added { .. } => "item-added",
            ItemEventKind::Deleted => "item-deleted",
            ItemEventKind::Updated { .. } => "item-updated",
            ItemEventKind::Renamed { .. } => "item-renamed",
        }
    }
}

/// A change to one item on the list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemEvent {
    pub id: EventId,
    pub timestamp: DateTime<Utc>,
    /// Name of the affected item (the new name for renames)
    pub name: String,
    pub kind: ItemEventKind,
}

impl ItemEvent {
    pub fn new(name: impl Into<String>, kind: ItemEventKind) -> Self {
        Self {
            id: EventId::new(),
            timestamp: Utc::now(),
            name: name.into(),
            kind,
        }
    }

    pub fn topic(&self) -> &'static str {
        self.kind.topic()
    }
}

/// Destination for item events
pub trait EventSink: Send + Sync {
    fn publish(&self, event: ItemEvent);
}

/// Drops every event
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl EventSink for NoopSink {
    fn publish(&self, _event: ItemEvent) {}
}

/// Logs each event through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn publish(&self, event: ItemEvent) {
        tracing::info!(
            topic = event.topic(),
            event_id = %event.id,
            item = %event.name,
            "item event"
        );
    }
}

/// Keeps published events in memory
///
/// A publisher that panicked mid-push cannot leave the log half-written, so a
/// poisoned lock is recovered rather than dropping events.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<ItemEvent>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything published so far
    pub fn events(&self) -> Vec<ItemEvent> {
        self.lock().clone()
    }

    /// Topics of published events, in order
    pub fn topics(&self) -> Vec<&'static str> {
        self.events().iter().map(ItemEvent::topic).collect()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ItemEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EventSink for MemorySink {
    fn publish(&self, event: ItemEvent) {
        self.lock().push(event);
    }
}
