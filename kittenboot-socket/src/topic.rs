//! Fixed topic and route names spoken by KittenBoot servers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which destination namespace a subscription lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Per-connection destination under `/user`
    Private,
    /// Broadcast destination shared by every client
    Public,
}

impl Scope {
    /// Destination prefix for this scope.
    pub fn prefix(&self) -> &'static str {
        match self {
            Scope::Private => "/user",
            Scope::Public => "",
        }
    }

    /// Map the boolean "is private" flag onto a scope.
    pub fn from_private(is_private: bool) -> Self {
        if is_private {
            Scope::Private
        } else {
            Scope::Public
        }
    }
}

/// Server-pushed topics subscribed automatically after the handshake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemTopic {
    /// The requested private queue does not exist
    QueueNotFound,
    /// A private queue was created for this player
    QueueCreated,
    /// This player joined a queue
    JoinedQueue,
    /// Another player joined the queue
    PlayerJoinedQueue,
    /// Another player left the queue
    PlayerLeftQueue,
    /// Room state update
    RoomUpdate,
    /// A player joined the room
    PlayerJoinedRoom,
    /// A player left the room
    PlayerLeftRoom,
}

impl SystemTopic {
    /// All system topics, in subscription order.
    pub const ALL: [SystemTopic; 8] = [
        SystemTopic::QueueNotFound,
        SystemTopic::QueueCreated,
        SystemTopic::JoinedQueue,
        SystemTopic::PlayerJoinedQueue,
        SystemTopic::PlayerLeftQueue,
        SystemTopic::RoomUpdate,
        SystemTopic::PlayerJoinedRoom,
        SystemTopic::PlayerLeftRoom,
    ];

    /// Topic path under the message broker prefix.
    pub fn path(&self) -> &'static str {
        match self {
            SystemTopic::QueueNotFound => "queue_not_found",
            SystemTopic::QueueCreated => "queue_created",
            SystemTopic::JoinedQueue => "joined_queue",
            SystemTopic::PlayerJoinedQueue => "player_joined_queue",
            SystemTopic::PlayerLeftQueue => "player_left_queue",
            SystemTopic::RoomUpdate => "room_update",
            SystemTopic::PlayerJoinedRoom => "player_joined_room",
            SystemTopic::PlayerLeftRoom => "player_left_room",
        }
    }

    /// Name of the listener this topic is routed to by default.
    ///
    /// `player_joined_room` shares the `player_left_room` listener.
    pub fn listener_name(&self) -> &'static str {
        match self {
            SystemTopic::QueueNotFound => "on_queue_not_found",
            SystemTopic::QueueCreated => "on_queue_created",
            SystemTopic::JoinedQueue => "on_joined_queue",
            SystemTopic::PlayerJoinedQueue => "on_player_joined_queue",
            SystemTopic::PlayerLeftQueue => "on_player_left_queue",
            SystemTopic::RoomUpdate => "on_update",
            SystemTopic::PlayerJoinedRoom | SystemTopic::PlayerLeftRoom => "on_player_left_room",
        }
    }
}

impl fmt::Display for SystemTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Client-to-server routes under the application destination prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientRoute {
    /// Enter the public matchmaking queue
    JoinPublicQueue,
    /// Push a room state update
    RoomUpdate,
    /// Join a private room by queue uuid
    JoinPrivateRoom,
    /// Start the private room owned by this player
    StartPrivateRoom,
}

impl ClientRoute {
    /// Route path under the application destination prefix.
    pub fn path(&self) -> &'static str {
        match self {
            ClientRoute::JoinPublicQueue => "join_public_queue",
            ClientRoute::RoomUpdate => "room_update",
            ClientRoute::JoinPrivateRoom => "join_private_room",
            ClientRoute::StartPrivateRoom => "start_private_room",
        }
    }
}
