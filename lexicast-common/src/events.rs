//! Event types for the player event system
//!
//! Provides the event definitions and EventBus shared by the player core and
//! any attached surfaces (UI bindings, logging taps, test probes).

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use crate::playback::{AudioUrl, PlaybackPhase, PlaybackState};

/// Player event types
///
/// Events are broadcast via EventBus and can be serialized for transmission
/// to an attached surface. All events carry a UTC timestamp taken at emit
/// time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum PlayerEvent {
    /// Loaded track buffered enough to begin playback
    ///
    /// Emitted once per load; later returns to the ready status within the
    /// same load are suppressed.
    ///
    /// Triggers:
    /// - UI: enable the play control, dismiss the loading indicator
    Ready {
        /// URL of the track that became ready
        url: AudioUrl,
        /// When readiness was observed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Playback phase changed
    ///
    /// Triggers:
    /// - UI: swap the play/pause glyph
    StateChanged {
        /// Phase before the change
        previous: PlaybackPhase,
        /// Phase after the change
        current: PlaybackPhase,
        /// Full state snapshot after the change
        state: PlaybackState,
        /// When the phase changed
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Loaded track played to its end
    TrackFinished {
        /// URL of the track that finished
        url: AudioUrl,
        /// When the end was reached
        timestamp: chrono::DateTime<chrono::Utc>,
    },

    /// Playback or episode resolution failed
    ///
    /// The message is surfaced verbatim; the player has already logged it and
    /// settled back into a paused state, so this is notification, not a
    /// request for recovery.
    PlaybackError {
        /// Human-readable failure description
        message: String,
        /// When the failure was observed
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

impl PlayerEvent {
    /// Get event type as string for filtering
    pub fn event_type(&self) -> &str {
        match self {
            PlayerEvent::Ready { .. } => "Ready",
            PlayerEvent::StateChanged { .. } => "StateChanged",
            PlayerEvent::TrackFinished { .. } => "TrackFinished",
            PlayerEvent::PlaybackError { .. } => "PlaybackError",
        }
    }
}

/// Event bus for broadcasting player events to subscribers
///
/// Wraps a tokio broadcast channel: every subscriber sees every event emitted
/// after it subscribed, and slow subscribers lag rather than block the
/// emitter.
///
/// # Examples
///
/// ```
/// use lexicast_common::events::{EventBus, PlayerEvent};
/// use lexicast_common::playback::AudioUrl;
///
/// let event_bus = EventBus::new(64);
///
/// // Subscribe to events
/// let mut rx = event_bus.subscribe();
///
/// // Emit an event
/// event_bus.emit(PlayerEvent::Ready {
///     url: AudioUrl::from("https://example.org/ep.mp3"),
///     timestamp: chrono::Utc::now(),
/// }).ok();
/// ```
#[derive(Clone)]
pub struct EventBus {
    tx: broadcast::Sender<PlayerEvent>,
    capacity: usize,
}

impl EventBus {
    /// Creates a new EventBus with specified channel capacity
    ///
    /// # Arguments
    ///
    /// * `capacity` - Number of events to buffer before dropping old events
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx, capacity }
    }

    /// Subscribe to all future events
    ///
    /// Returns a receiver that will receive all events emitted after
    /// subscription. Events emitted before subscription are not received.
    pub fn subscribe(&self) -> broadcast::Receiver<PlayerEvent> {
        self.tx.subscribe()
    }

    /// Emit an event to all subscribers
    ///
    /// Returns `Ok(subscriber_count)` if at least one subscriber exists.
    /// Returns `Err` if no subscribers are listening.
    #[allow(clippy::result_large_err)]
    pub fn emit(
        &self,
        event: PlayerEvent,
    ) -> Result<usize, broadcast::error::SendError<PlayerEvent>> {
        self.tx.send(event)
    }

    /// Emit an event, ignoring if no subscribers are listening
    ///
    /// This is the normal emit path inside the player: events are
    /// notifications, and an idle bus is not an error.
    pub fn emit_lossy(&self, event: PlayerEvent) {
        let _ = self.tx.send(event);
    }

    /// Get the current number of active subscribers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }

    /// Get the configured channel capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
