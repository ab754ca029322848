//! Seam to the STOMP-over-WebSocket client that owns the wire.
//!
//! Framing, handshake, heartbeats and subscription multiplexing all live in
//! the implementation behind [`StompTransport`]. The façade only hands it
//! destinations, headers and JSON text.

use crate::error::TransportResult;
use std::collections::BTreeMap;
use std::sync::Arc;

/// STOMP frame headers.
pub type Headers = BTreeMap<String, String>;

/// Called once when the transport finishes the STOMP handshake.
pub type ConnectCallback = Box<dyn FnOnce(ConnectedFrame) + Send>;

/// Called for every MESSAGE frame on a subscribed destination.
pub type FrameHandler = Arc<dyn Fn(InboundFrame) + Send + Sync>;

/// The CONNECTED frame as reported by the transport.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConnectedFrame {
    /// Frame headers (`version`, `heart-beat`, `user-name`, ...)
    pub headers: Headers,
}

/// A MESSAGE frame delivered to a subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundFrame {
    /// Destination the message was published to
    pub destination: String,
    /// Frame headers
    pub headers: Headers,
    /// UTF-8 body text
    pub body: String,
}

impl InboundFrame {
    /// Create a frame with no headers.
    pub fn new<D: Into<String>, B: Into<String>>(destination: D, body: B) -> Self {
        Self {
            destination: destination.into(),
            headers: Headers::new(),
            body: body.into(),
        }
    }
}

/// Identifier the transport assigned to a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionHandle {
    /// Subscription id
    pub id: String,
}

impl SubscriptionHandle {
    /// Create a handle.
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self { id: id.into() }
    }
}

/// A STOMP client bound to one WebSocket endpoint.
///
/// Implementations may invoke callbacks from their own threads.
pub trait StompTransport: Send + Sync + 'static {
    /// Start the handshake; `on_connected` fires once it succeeds.
    fn connect(&self, headers: Headers, on_connected: ConnectCallback) -> TransportResult<()>;

    /// Register a handler for a destination.
    fn subscribe(
        &self,
        destination: &str,
        handler: FrameHandler,
    ) -> TransportResult<SubscriptionHandle>;

    /// Publish a body to a destination.
    fn send(&self, destination: &str, headers: &Headers, body: &str) -> TransportResult<()>;

    /// Toggle the client's own frame-level debug output.
    fn set_debug(&self, enabled: bool);
}

/// Creates a transport for an endpoint url.
pub trait Connector {
    /// Transport produced by this connector.
    type Transport: StompTransport;

    /// Build a client for `url`. No I/O is expected before
    /// [`StompTransport::connect`].
    fn client(&self, url: &str) -> TransportResult<Self::Transport>;
}

impl<F, T> Connector for F
where
    F: Fn(&str) -> TransportResult<T>,
    T: StompTransport,
{
    type Transport = T;

    fn client(&self, url: &str) -> TransportResult<T> {
        self(url)
    }
}
