//! Change Notifier
//!
//! In-process fanout for ticket conversation updates, backing the SSE stream.
//! Slow subscribers may miss events; clients are expected to refetch on
//! reconnect.

use serde::Serialize;
use tokio::sync::broadcast;

/// A new message was posted to a ticket.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    pub ticket_id: String,
    pub message_id: String,
    pub sender_id: String,
    /// Staff-only notes are filtered out for applicant subscribers.
    pub is_internal: bool,
}

#[derive(Clone)]
pub struct ChangeNotifier {
    sender: broadcast::Sender<ChangeEvent>,
}

impl ChangeNotifier {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.sender.subscribe()
    }

    /// Publishing with no subscribers is not an error.
    pub fn publish(&self, event: ChangeEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for ChangeNotifier {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_receive_events() {
        let notifier = ChangeNotifier::new(8);
        let mut rx = notifier.subscribe();

        notifier.publish(ChangeEvent {
            ticket_id: "t1".to_string(),
            message_id: "m1".to_string(),
            sender_id: "s1".to_string(),
            is_internal: false,
        });

        let event = rx.recv().await.unwrap();
        assert_eq!(event.ticket_id, "t1");
        assert_eq!(event.message_id, "m1");
    }

    #[test]
    fn publish_without_subscribers_is_fine() {
        let notifier = ChangeNotifier::new(8);
        notifier.publish(ChangeEvent {
            ticket_id: "t1".to_string(),
            message_id: "m1".to_string(),
            sender_id: "s1".to_string(),
            is_internal: false,
        });
    }
}
