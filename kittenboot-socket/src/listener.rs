//! Lifecycle listeners and their routing to system topics.

use crate::payload::Payload;
use crate::socket::KittenSocket;
use crate::topic::SystemTopic;
use std::fmt;
use std::sync::Arc;

/// Callback invoked with every decoded message on a topic.
pub type Listener = Arc<dyn Fn(Payload) + Send + Sync>;

/// Callback invoked once the system topics are live.
pub type OnConnect = Arc<dyn Fn(&KittenSocket) + Send + Sync>;

/// Wrap a closure as a [`Listener`].
pub fn listener<F>(f: F) -> Listener
where
    F: Fn(Payload) + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Listener used when none was configured for a topic.
///
/// Logs `[name] payload` unless `silent` is set.
pub fn default_listener(name: &'static str, silent: bool) -> Listener {
    Arc::new(move |payload: Payload| {
        if !silent {
            tracing::info!(listener = name, "[{}] {}", name, payload);
        }
    })
}

/// Optional listener for each named lifecycle event.
#[derive(Clone, Default)]
pub struct ListenerTable {
    /// `room_update`
    pub on_update: Option<Listener>,
    /// `queue_not_found`
    pub on_queue_not_found: Option<Listener>,
    /// `queue_created`
    pub on_queue_created: Option<Listener>,
    /// `joined_queue`
    pub on_joined_queue: Option<Listener>,
    /// `player_joined_queue`
    pub on_player_joined_queue: Option<Listener>,
    /// `player_left_room`, and `player_joined_room` unless overridden
    pub on_player_left_room: Option<Listener>,
    /// `player_left_queue`
    pub on_player_left_queue: Option<Listener>,
    /// `player_joined_room`; when unset the topic shares `on_player_left_room`
    pub on_player_joined_room: Option<Listener>,
}

impl ListenerTable {
    /// Create an empty table; every topic falls back to the default listener.
    pub fn new() -> Self {
        Self::default()
    }

    /// Name and configured listener for a system topic.
    ///
    /// `player_joined_room` is routed to `on_player_left_room` unless
    /// `on_player_joined_room` is set.
    pub fn route(&self, topic: SystemTopic) -> (&'static str, Option<&Listener>) {
        let configured = match topic {
            SystemTopic::QueueNotFound => self.on_queue_not_found.as_ref(),
            SystemTopic::QueueCreated => self.on_queue_created.as_ref(),
            SystemTopic::JoinedQueue => self.on_joined_queue.as_ref(),
            SystemTopic::PlayerJoinedQueue => self.on_player_joined_queue.as_ref(),
            SystemTopic::PlayerLeftQueue => self.on_player_left_queue.as_ref(),
            SystemTopic::RoomUpdate => self.on_update.as_ref(),
            SystemTopic::PlayerJoinedRoom => {
                if let Some(listener) = &self.on_player_joined_room {
                    return ("on_player_joined_room", Some(listener));
                }
                self.on_player_left_room.as_ref()
            }
            SystemTopic::PlayerLeftRoom => self.on_player_left_room.as_ref(),
        };
        (topic.listener_name(), configured)
    }

    /// Listener to install for a system topic, falling back to the default.
    pub fn resolve(&self, topic: SystemTopic, silent: bool) -> Listener {
        match self.route(topic) {
            (_, Some(listener)) => Arc::clone(listener),
            (name, None) => default_listener(name, silent),
        }
    }
}

impl fmt::Debug for ListenerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerTable")
            .field("on_update", &self.on_update.is_some())
            .field("on_queue_not_found", &self.on_queue_not_found.is_some())
            .field("on_queue_created", &self.on_queue_created.is_some())
            .field("on_joined_queue", &self.on_joined_queue.is_some())
            .field("on_player_joined_queue", &self.on_player_joined_queue.is_some())
            .field("on_player_left_room", &self.on_player_left_room.is_some())
            .field("on_player_left_queue", &self.on_player_left_queue.is_some())
            .field("on_player_joined_room", &self.on_player_joined_room.is_some())
            .finish()
    }
}
