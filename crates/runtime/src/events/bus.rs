//! Topic-based event bus implementation.

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{ActionEvent, ProgressEvent};
use tower_core::LogEntry;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Combat log entries, in emission order
    Log,
    /// Floor, resource and currency snapshots after each resolved step
    Progress,
    /// Results of player actions
    Action,
}

impl Topic {
    pub const ALL: [Topic; 3] = [Topic::Log, Topic::Progress, Topic::Action];
}

/// Event wrapper that carries the topic and typed event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    Log(LogEntry),
    Progress(ProgressEvent),
    Action(ActionEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Log(_) => Topic::Log,
            Event::Progress(_) => Topic::Progress,
            Event::Action(_) => Topic::Action,
        }
    }
}

struct Channels {
    log: broadcast::Sender<Event>,
    progress: broadcast::Sender<Event>,
    action: broadcast::Sender<Event>,
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing never blocks; slow subscribers see
/// `RecvError::Lagged`.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(Channels {
                log: broadcast::channel(capacity).0,
                progress: broadcast::channel(capacity).0,
                action: broadcast::channel(capacity).0,
            }),
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Log => &self.channels.log,
            Topic::Progress => &self.channels.progress,
            Topic::Action => &self.channels.action,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to multiple topics
    pub fn subscribe_multiple(
        &self,
        topics: &[Topic],
    ) -> HashMap<Topic, broadcast::Receiver<Event>> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_core::LogKind;

    #[tokio::test]
    async fn subscribers_only_see_their_topic() {
        let bus = EventBus::with_capacity(8);
        let mut logs = bus.subscribe(Topic::Log);
        let mut actions = bus.subscribe(Topic::Action);

        bus.publish(Event::Log(LogEntry {
            kind: LogKind::Floor,
            message: "Entered floor 2".into(),
            timestamp: 0,
        }));

        match logs.recv().await.unwrap() {
            Event::Log(entry) => assert_eq!(entry.message, "Entered floor 2"),
            other => panic!("unexpected event {other:?}"),
        }
        assert!(actions.try_recv().is_err());
    }
}
