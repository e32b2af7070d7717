//! Broadcast bus with one channel per topic.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::types::{ActionEvent, NetworkEvent, OwnershipEvent, PhysicsEvent};

/// Event categories, one channel each.
#[derive(
    Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum Topic {
    /// World, hands, and container transitions
    Ownership,
    /// Started, ended, thrown, installed
    Action,
    /// Rest detection
    Physics,
    /// Rejected or undeliverable frames
    Network,
}

/// Any event the session publishes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    Ownership(OwnershipEvent),
    Action(ActionEvent),
    Physics(PhysicsEvent),
    Network(NetworkEvent),
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self {
            Event::Ownership(_) => Topic::Ownership,
            Event::Action(_) => Topic::Action,
            Event::Physics(_) => Topic::Physics,
            Event::Network(_) => Topic::Network,
        }
    }
}

struct Channels {
    ownership: broadcast::Sender<Event>,
    action: broadcast::Sender<Event>,
    physics: broadcast::Sender<Event>,
    network: broadcast::Sender<Event>,
}

/// Topic-routed event bus.
///
/// Consumers subscribe to the topics they care about. Publishing never
/// blocks; events without subscribers are dropped.
#[derive(Clone)]
pub struct EventBus {
    channels: Arc<Channels>,
}

impl EventBus {
    /// Bus with 100 slots per topic.
    pub fn new() -> Self {
        Self::with_capacity(100)
    }

    /// Bus with `capacity` slots per topic.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            channels: Arc::new(Channels {
                ownership: broadcast::channel(capacity).0,
                action: broadcast::channel(capacity).0,
                physics: broadcast::channel(capacity).0,
                network: broadcast::channel(capacity).0,
            }),
        }
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Ownership => &self.channels.ownership,
            Topic::Action => &self.channels.action,
            Topic::Physics => &self.channels.physics,
            Topic::Network => &self.channels.network,
        }
    }

    /// Sends `event` on its topic. Having no subscribers is not an error.
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            tracing::trace!(%topic, "no subscribers");
        }
    }

    /// Receiver for one topic.
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to several topics at once.
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> Vec<(Topic, broadcast::Receiver<Event>)> {
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
    use holdable_core::ObjectId;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn events_reach_only_their_topic() {
        let bus = EventBus::with_capacity(4);
        let mut physics = bus.subscribe(Topic::Physics);
        let mut action = bus.subscribe(Topic::Action);

        bus.publish(Event::Physics(PhysicsEvent::Settled { item: ObjectId(2) }));

        assert_eq!(
            physics.try_recv().unwrap(),
            Event::Physics(PhysicsEvent::Settled { item: ObjectId(2) })
        );
        assert!(action.try_recv().is_err());
    }

    #[test]
    fn every_topic_has_a_channel() {
        let bus = EventBus::new();
        for topic in Topic::iter() {
            let _ = bus.subscribe(topic);
        }
        bus.publish(Event::Network(NetworkEvent::SendFailed { item: ObjectId(1) }));
    }
}
