//! The KittenBoot socket façade.

use crate::config::SocketConfig;
use crate::error::{SocketError, SocketResult};
use crate::listener::Listener;
use crate::payload::{empty_body, encode_body, Payload};
use crate::topic::{ClientRoute, Scope, SystemTopic};
use crate::transport::{
    ConnectedFrame, Connector, FrameHandler, Headers, InboundFrame, StompTransport,
    SubscriptionHandle,
};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Connection phase of a socket.
///
/// The only transition is `Unconnected` to `Connected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Waiting for the transport to finish the handshake
    Unconnected,
    /// Handshake done, system topics subscribed
    Connected,
}

/// A subscription installed through the socket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    /// Full destination, prefixes included
    pub destination: String,
    /// Private or public destination
    pub scope: Scope,
    /// Handle returned by the transport
    pub handle: SubscriptionHandle,
}

struct Inner {
    config: SocketConfig,
    connect_url: String,
    transport: Box<dyn StompTransport>,
    state: RwLock<ConnectionState>,
    subscriptions: Mutex<Vec<Subscription>>,
}

/// Client for a KittenBoot matchmaking server.
///
/// Cheap to clone; clones share one transport. Every operation returns the
/// socket again so calls can be chained:
///
/// ```rust,ignore
/// socket
///     .join_public_queue()?
///     .subscribe("broadcasted_message", Scope::Public, |msg| println!("{}", msg))?
///     .send("broadcast_message", "hello everyone")?;
/// ```
#[derive(Clone)]
pub struct KittenSocket {
    inner: Arc<Inner>,
}

impl KittenSocket {
    /// Open a connection with a validated configuration.
    ///
    /// The system topics are subscribed, and `on_connect` runs, once the
    /// transport reports a successful handshake.
    pub fn connect<C: Connector>(config: SocketConfig, connector: C) -> SocketResult<Self> {
        let socket = Self::create(config, connector)?;
        socket.open()?;
        Ok(socket)
    }

    /// Build the transport without starting the handshake.
    pub(crate) fn create<C: Connector>(config: SocketConfig, connector: C) -> SocketResult<Self> {
        let connect_url = config.connect_url();
        let transport = connector
            .client(&connect_url)
            .map_err(SocketError::Transport)?;
        transport.set_debug(config.is_debug());

        Ok(Self {
            inner: Arc::new(Inner {
                config,
                connect_url,
                transport: Box::new(transport),
                state: RwLock::new(ConnectionState::Unconnected),
                subscriptions: Mutex::new(Vec::new()),
            }),
        })
    }

    /// Start the handshake.
    pub(crate) fn open(&self) -> SocketResult<()> {
        tracing::debug!(url = %self.inner.connect_url, "Opening STOMP connection");

        // The transport keeps the callback; a strong reference here would
        // keep the socket alive through its own transport.
        let weak = Arc::downgrade(&self.inner);
        self.inner
            .transport
            .connect(
                Headers::new(),
                Box::new(move |frame| {
                    if let Some(inner) = weak.upgrade() {
                        KittenSocket { inner }.handle_connected(frame);
                    }
                }),
            )
            .map_err(SocketError::Transport)
    }

    fn handle_connected(&self, frame: ConnectedFrame) {
        {
            let mut state = self.inner.state.write();
            if *state == ConnectionState::Connected {
                tracing::warn!(url = %self.inner.connect_url, "Duplicate handshake ignored");
                return;
            }
            *state = ConnectionState::Connected;
        }
        tracing::info!(
            url = %self.inner.connect_url,
            version = frame.headers.get("version").map(String::as_str).unwrap_or("unknown"),
            "STOMP connection established"
        );

        let config = &self.inner.config;
        for topic in SystemTopic::ALL {
            let listener = config.listeners().resolve(topic, config.is_silent());
            if let Err(e) = self.subscribe_listener(topic.path(), Scope::Private, listener) {
                tracing::error!(topic = %topic, error = %e, "Failed to subscribe to system topic");
            }
        }

        if let Some(on_connect) = config.on_connect() {
            on_connect(self);
        }
    }

    /// Subscribe a closure to a topic under the message broker prefix.
    ///
    /// Bodies are decoded as JSON when possible and passed through as text
    /// otherwise.
    pub fn subscribe<F>(&self, path: &str, scope: Scope, listener: F) -> SocketResult<&Self>
    where
        F: Fn(Payload) + Send + Sync + 'static,
    {
        self.subscribe_listener(path, scope, Arc::new(listener))
    }

    /// Subscribe an already shared [`Listener`].
    pub fn subscribe_listener(
        &self,
        path: &str,
        scope: Scope,
        listener: Listener,
    ) -> SocketResult<&Self> {
        self.ensure_connected()?;
        validate_path(path)?;

        let destination = self.subscription_destination(path, scope);
        let handler: FrameHandler =
            Arc::new(move |frame: InboundFrame| listener(Payload::decode(&frame.body)));
        let handle = self
            .inner
            .transport
            .subscribe(&destination, handler)
            .map_err(SocketError::Transport)?;

        tracing::debug!(destination = %destination, subscription = %handle.id, "Subscribed");
        self.inner.subscriptions.lock().push(Subscription {
            destination,
            scope,
            handle,
        });
        Ok(self)
    }

    /// Send a JSON body to a route under the application destination prefix.
    ///
    /// JSON-falsy values are sent as `{}`.
    pub fn send<T: Serialize + ?Sized>(&self, path: &str, data: &T) -> SocketResult<&Self> {
        self.ensure_connected()?;
        validate_path(path)?;
        let body = encode_body(data)?;
        self.dispatch(path, &body)
    }

    /// Send `{}` to a route.
    pub fn send_empty(&self, path: &str) -> SocketResult<&Self> {
        self.ensure_connected()?;
        validate_path(path)?;
        self.dispatch(path, &empty_body())
    }

    fn dispatch(&self, path: &str, body: &str) -> SocketResult<&Self> {
        let destination = self.send_destination(path);
        self.inner
            .transport
            .send(&destination, &Headers::new(), body)
            .map_err(SocketError::Transport)?;
        tracing::trace!(destination = %destination, bytes = body.len(), "Sent");
        Ok(self)
    }

    /// Enter the public matchmaking queue.
    pub fn join_public_queue(&self) -> SocketResult<&Self> {
        self.send_empty(ClientRoute::JoinPublicQueue.path())
    }

    /// Push a room state update.
    pub fn send_update<T: Serialize + ?Sized>(&self, data: &T) -> SocketResult<&Self> {
        self.send(ClientRoute::RoomUpdate.path(), data)
    }

    /// Join a private room by the uuid of its queue.
    pub fn join_private_room(&self, queue_uuid: &str) -> SocketResult<&Self> {
        self.send(ClientRoute::JoinPrivateRoom.path(), queue_uuid)
    }

    /// Start the private room owned by this player.
    pub fn start_private_room(&self) -> SocketResult<&Self> {
        self.send_empty(ClientRoute::StartPrivateRoom.path())
    }

    /// Destination a subscription to `path` would use.
    pub fn subscription_destination(&self, path: &str, scope: Scope) -> String {
        format!(
            "{}/{}/{}",
            scope.prefix(),
            self.inner.config.message_broker_prefix(),
            path
        )
    }

    /// Destination a send to `path` would use.
    pub fn send_destination(&self, path: &str) -> String {
        format!(
            "/{}/{}",
            self.inner.config.application_destination_prefix(),
            path
        )
    }

    /// Current connection phase.
    pub fn state(&self) -> ConnectionState {
        *self.inner.state.read()
    }

    /// Check if the handshake has completed.
    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Url the transport was created for.
    pub fn connect_url(&self) -> &str {
        &self.inner.connect_url
    }

    /// Subscriptions installed so far, in installation order.
    pub fn subscriptions(&self) -> Vec<Subscription> {
        self.inner.subscriptions.lock().clone()
    }

    /// Configuration this socket was built from.
    pub fn config(&self) -> &SocketConfig {
        &self.inner.config
    }

    pub(crate) fn ptr_eq(&self, other: &KittenSocket) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn ensure_connected(&self) -> SocketResult<()> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(SocketError::NotConnected)
        }
    }
}

impl fmt::Debug for KittenSocket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KittenSocket")
            .field("connect_url", &self.inner.connect_url)
            .field("state", &self.state())
            .field("subscriptions", &self.inner.subscriptions.lock().len())
            .finish()
    }
}

fn validate_path(path: &str) -> SocketResult<()> {
    if path.is_empty() {
        return Err(SocketError::InvalidPath {
            path: path.to_string(),
            reason: "path can't be empty",
        });
    }
    if path.starts_with('/') {
        return Err(SocketError::InvalidPath {
            path: path.to_string(),
            reason: "path can't start with \"/\"",
        });
    }
    Ok(())
}
