//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the central publish/subscribe hub for [`StoreEvent`]s.
//! It is shared via `Arc<EventBus>` across the application.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storehub_core::order::OrderStatus;
use storehub_core::types::{DbId, Money};
use tokio::sync::broadcast;

/// Published after an order and its items are committed.
pub const ORDER_PLACED: &str = "order.placed";

/// Published after an order's status changes.
pub const ORDER_STATUS_CHANGED: &str = "order.status_changed";

// ---------------------------------------------------------------------------
// StoreEvent
// ---------------------------------------------------------------------------

/// A domain event that occurred in a store.
///
/// Constructed via [`StoreEvent::new`] and enriched with the builder
/// methods [`with_source`](StoreEvent::with_source),
/// [`with_actor`](StoreEvent::with_actor), and
/// [`with_payload`](StoreEvent::with_payload).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreEvent {
    /// Dot-separated event name, e.g. `"order.placed"`.
    pub event_type: String,

    /// The store the event belongs to.
    pub store_id: DbId,

    /// Optional source entity kind (e.g. `"order"`).
    pub source_entity_type: Option<String>,

    /// Optional source entity database id.
    pub source_entity_id: Option<DbId>,

    /// Optional id of the user that triggered the event.
    pub actor_user_id: Option<DbId>,

    /// Free-form JSON payload carrying event-specific data.
    pub payload: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl StoreEvent {
    /// Create a new event for `store_id` with an empty payload.
    pub fn new(event_type: impl Into<String>, store_id: DbId) -> Self {
        Self {
            event_type: event_type.into(),
            store_id,
            source_entity_type: None,
            source_entity_id: None,
            actor_user_id: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Attach a source entity to the event.
    pub fn with_source(mut self, entity_type: impl Into<String>, entity_id: DbId) -> Self {
        self.source_entity_type = Some(entity_type.into());
        self.source_entity_id = Some(entity_id);
        self
    }

    /// Attach the acting user to the event.
    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    /// Set the JSON payload for the event.
    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// Build an order event carrying `notice` as its payload.
    pub fn order(event_type: &str, notice: &OrderNotice) -> Self {
        Self::new(event_type, notice.store_id)
            .with_source("order", notice.order_id)
            .with_payload(serde_json::to_value(notice).unwrap_or_default())
    }

    /// Decode the payload of an order event.
    pub fn order_notice(&self) -> Option<OrderNotice> {
        serde_json::from_value(self.payload.clone()).ok()
    }
}

/// Payload of `order.*` events.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderNotice {
    pub order_id: DbId,
    pub store_id: DbId,
    pub buyer_id: DbId,
    pub tracking_code: uuid::Uuid,
    pub total_amount: Money,
    pub status: OrderStatus,
    pub previous_status: Option<OrderStatus>,
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`StoreEvent`].
///
/// # Usage
///
/// ```rust
/// use storehub_events::bus::{EventBus, StoreEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(StoreEvent::new("order.placed", 1));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<StoreEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is dropped.
    pub fn publish(&self, event: StoreEvent) {
        // Ignore the SendError: it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
