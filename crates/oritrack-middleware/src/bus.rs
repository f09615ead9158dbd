//! Topic-based publish/subscribe event bus.
//!
//! Built on [`tokio::sync::broadcast`] channels so every subscriber
//! receives every message without any single subscriber blocking the
//! others. Traffic is partitioned into three [`Topic`] lanes:
//!
//! | Topic | Typical traffic |
//! |---|---|
//! | [`Topic::Orientation`] | Per-sample orientation deltas (high frequency) |
//! | [`Topic::Control`] | Edge-triggered start/stop commands |
//! | [`Topic::SystemAlerts`] | Session lifecycle and delivery faults |

use oritrack_types::{Event, TrackError};
use tokio::sync::broadcast;
use tracing::warn;

/// Default per-topic channel capacity before old events are dropped for
/// slow subscribers.
const DEFAULT_CAPACITY: usize = 256;

/// First-class routing lanes on the event bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    /// Zero-referenced orientation deltas, one per smoothed sample.
    Orientation,
    /// Start/stop commands from the control surface.
    Control,
    /// Session lifecycle events and delivery faults.
    SystemAlerts,
}

/// Shared event bus. Clone it cheaply – all clones share the same
/// underlying broadcast channels.
#[derive(Clone, Debug)]
pub struct EventBus {
    orientation: broadcast::Sender<Event>,
    control: broadcast::Sender<Event>,
    system_alerts: broadcast::Sender<Event>,
}

impl EventBus {
    /// Create a new bus; `capacity` applies to every topic channel
    /// independently.
    pub fn new(capacity: usize) -> Self {
        let (orientation, _) = broadcast::channel(capacity);
        let (control, _) = broadcast::channel(capacity);
        let (system_alerts, _) = broadcast::channel(capacity);
        Self {
            orientation,
            control,
            system_alerts,
        }
    }

    /// Publish `event` to the given [`Topic`] lane.
    ///
    /// Returns the number of active receivers handed the event, or
    /// [`TrackError::Channel`] when nobody is listening. Publishers that
    /// do not care whether anyone listens should discard the result.
    pub fn publish_to(&self, topic: Topic, event: Event) -> Result<usize, TrackError> {
        self.topic_sender(topic).send(event).map_err(|_| {
            TrackError::Channel(format!("no subscribers for topic {topic:?}"))
        })
    }

    /// Subscribe to a single [`Topic`] lane.
    pub fn subscribe_to(&self, topic: Topic) -> TopicReceiver {
        TopicReceiver {
            topic,
            receiver: self.topic_sender(topic).subscribe(),
        }
    }

    fn topic_sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Orientation => &self.orientation,
            Topic::Control => &self.control,
            Topic::SystemAlerts => &self.system_alerts,
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

/// An async receiver bound to a single [`Topic`] lane.
///
/// Obtained via [`EventBus::subscribe_to`].
pub struct TopicReceiver {
    topic: Topic,
    receiver: broadcast::Receiver<Event>,
}

impl TopicReceiver {
    /// Wait for the next event on this topic.
    ///
    /// Returns:
    /// * `Ok(event)` – a successfully received event.
    /// * `Err(RecvError::Lagged(n))` – the subscriber fell behind and `n`
    ///   events were dropped. The caller decides whether to continue.
    /// * `Err(RecvError::Closed)` – the bus has shut down.
    pub async fn recv(&mut self) -> Result<Event, broadcast::error::RecvError> {
        self.receiver.recv().await
    }

    /// Non-blocking variant of [`TopicReceiver::recv`].
    pub fn try_recv(&mut self) -> Result<Event, broadcast::error::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Wait for the next event, silently skipping over lag.
    ///
    /// For subscribers that only care about the latest value (status
    /// displays); dropped events are logged and discarded. Returns `None`
    /// when the bus has shut down.
    pub async fn recv_lossy(&mut self) -> Option<Event> {
        loop {
            match self.receiver.recv().await {
                Ok(event) => return Some(event),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!(topic = ?self.topic, lagged_by = n, "subscriber lagged");
                    continue;
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// The [`Topic`] this receiver is bound to.
    pub fn topic(&self) -> Topic {
        self.topic
    }
}
