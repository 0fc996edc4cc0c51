//! Event types for the ToMo event system
//!
//! Broadcast to SSE subscribers so open dashboards can re-render when the
//! submission list changes.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// ToMo event types
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum TomoEvent {
    /// A submission was appended to the store
    SubmissionAppended {
        id: i64,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl TomoEvent {
    /// SSE event name
    pub fn event_type(&self) -> &'static str {
        match self {
            TomoEvent::SubmissionAppended { .. } => "SubmissionAppended",
        }
    }
}

/// Broadcast channel for [`TomoEvent`]s
#[derive(Debug, Clone)]
pub struct EventBus {
    tx: broadcast::Sender<TomoEvent>,
    capacity: usize,
}

impl EventBus {
    /// Create a bus buffering up to `capacity` events per lagging receiver
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    pub fn subscribe(&self) -> broadcast::Receiver<TomoEvent> {
        self.tx.subscribe()
    }

    /// Emit an event, ignoring the case where nobody is listening
    pub fn emit_lossy(&self, event: TomoEvent) {
        let _ = self.tx.send(event);
    }

    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_event() {
        let bus = EventBus::new(10);
        let mut rx = bus.subscribe();
        assert_eq!(bus.subscriber_count(), 1);

        let event = TomoEvent::SubmissionAppended {
            id: 7,
            timestamp: chrono::Utc::now(),
        };
        bus.emit_lossy(event.clone());
        assert_eq!(rx.recv().await.unwrap(), event);
    }

    #[test]
    fn test_emit_without_subscribers_is_silent() {
        let bus = EventBus::new(4);
        bus.emit_lossy(TomoEvent::SubmissionAppended {
            id: 1,
            timestamp: chrono::Utc::now(),
        });
        assert_eq!(bus.capacity(), 4);
    }

    #[test]
    fn test_event_json_is_tagged() {
        let event = TomoEvent::SubmissionAppended {
            id: 9,
            timestamp: chrono::Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "SubmissionAppended");
        assert_eq!(json["id"], 9);
        assert_eq!(event.event_type(), "SubmissionAppended");
    }
}
