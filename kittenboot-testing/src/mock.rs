// Mock STOMP transport for testing

use kittenboot_socket::{
    ConnectCallback, ConnectedFrame, Connector, FrameHandler, Headers, InboundFrame,
    StompTransport, SubscriptionHandle, TransportResult,
};
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

/// A subscription recorded by [`MockTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSubscription {
    /// Destination passed to `subscribe`
    pub destination: String,
    /// Handle handed back to the caller
    pub handle: SubscriptionHandle,
}

/// A frame recorded by [`MockTransport::send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentFrame {
    /// Destination passed to `send`
    pub destination: String,
    /// Headers passed to `send`
    pub headers: Headers,
    /// Body text
    pub body: String,
}

#[derive(Default)]
struct MockState {
    connect_headers: Option<Headers>,
    pending_connect: Option<ConnectCallback>,
    auto_connect: bool,
    subscriptions: Vec<(RecordedSubscription, FrameHandler)>,
    sent: Vec<SentFrame>,
    debug: Option<bool>,
    send_failure: Option<String>,
    subscribe_failure: Option<String>,
}

/// Transport double that records every call.
///
/// Clones share state, so a test can keep one clone while the socket owns
/// another. Callbacks are never invoked while internal state is locked.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    /// Create a transport that waits for [`complete_handshake`](Self::complete_handshake).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a transport that completes the handshake inside `connect`.
    pub fn auto_connecting() -> Self {
        let transport = Self::new();
        transport.state.lock().auto_connect = true;
        transport
    }

    /// Fire the pending connect callback with an empty CONNECTED frame.
    ///
    /// Returns `false` if `connect` was never called or already completed.
    pub fn complete_handshake(&self) -> bool {
        self.complete_handshake_with(ConnectedFrame::default())
    }

    /// Fire the pending connect callback with a specific frame.
    pub fn complete_handshake_with(&self, frame: ConnectedFrame) -> bool {
        let callback = self.state.lock().pending_connect.take();
        match callback {
            Some(callback) => {
                callback(frame);
                true
            }
            None => false,
        }
    }

    /// Check if `connect` was called.
    pub fn connect_requested(&self) -> bool {
        self.state.lock().connect_headers.is_some()
    }

    /// Headers passed to `connect`.
    pub fn connect_headers(&self) -> Option<Headers> {
        self.state.lock().connect_headers.clone()
    }

    /// Debug flag last set by the client.
    pub fn debug_enabled(&self) -> Option<bool> {
        self.state.lock().debug
    }

    /// All subscriptions, in order.
    pub fn subscriptions(&self) -> Vec<RecordedSubscription> {
        self.state
            .lock()
            .subscriptions
            .iter()
            .map(|(sub, _)| sub.clone())
            .collect()
    }

    /// Subscribed destinations, in order.
    pub fn destinations(&self) -> Vec<String> {
        self.state
            .lock()
            .subscriptions
            .iter()
            .map(|(sub, _)| sub.destination.clone())
            .collect()
    }

    /// All sent frames, in order.
    pub fn sent(&self) -> Vec<SentFrame> {
        self.state.lock().sent.clone()
    }

    /// The most recent sent frame.
    pub fn last_sent(&self) -> Option<SentFrame> {
        self.state.lock().sent.last().cloned()
    }

    /// Deliver a body to every handler subscribed to `destination`.
    ///
    /// Returns the number of handlers invoked.
    pub fn deliver(&self, destination: &str, body: &str) -> usize {
        let handlers: Vec<FrameHandler> = self
            .state
            .lock()
            .subscriptions
            .iter()
            .filter(|(sub, _)| sub.destination == destination)
            .map(|(_, handler)| Arc::clone(handler))
            .collect();

        for handler in &handlers {
            handler(InboundFrame::new(destination, body));
        }
        handlers.len()
    }

    /// Deliver the most recently sent body to `destination`, as a broker
    /// relaying it back would.
    pub fn echo_last_send_to(&self, destination: &str) -> usize {
        match self.last_sent() {
            Some(frame) => self.deliver(destination, &frame.body),
            None => 0,
        }
    }

    /// Make every later `send` fail with `message`.
    pub fn fail_sends<S: Into<String>>(&self, message: S) {
        self.state.lock().send_failure = Some(message.into());
    }

    /// Make every later `subscribe` fail with `message`.
    pub fn fail_subscribes<S: Into<String>>(&self, message: S) {
        self.state.lock().subscribe_failure = Some(message.into());
    }

    /// Clear injected failures.
    pub fn clear_failures(&self) {
        let mut state = self.state.lock();
        state.send_failure = None;
        state.subscribe_failure = None;
    }
}

impl StompTransport for MockTransport {
    fn connect(&self, headers: Headers, on_connected: ConnectCallback) -> TransportResult<()> {
        {
            let mut state = self.state.lock();
            state.connect_headers = Some(headers);
            if !state.auto_connect {
                state.pending_connect = Some(on_connected);
                return Ok(());
            }
        }

        on_connected(ConnectedFrame::default());
        Ok(())
    }

    fn subscribe(
        &self,
        destination: &str,
        handler: FrameHandler,
    ) -> TransportResult<SubscriptionHandle> {
        let mut state = self.state.lock();
        if let Some(message) = &state.subscribe_failure {
            return Err(message.clone().into());
        }

        let handle = SubscriptionHandle::new(format!("sub-{}", uuid::Uuid::new_v4()));
        state.subscriptions.push((
            RecordedSubscription {
                destination: destination.to_string(),
                handle: handle.clone(),
            },
            handler,
        ));
        Ok(handle)
    }

    fn send(&self, destination: &str, headers: &Headers, body: &str) -> TransportResult<()> {
        let mut state = self.state.lock();
        if let Some(message) = &state.send_failure {
            return Err(message.clone().into());
        }

        state.sent.push(SentFrame {
            destination: destination.to_string(),
            headers: headers.clone(),
            body: body.to_string(),
        });
        Ok(())
    }

    fn set_debug(&self, enabled: bool) {
        self.state.lock().debug = Some(enabled);
    }
}

impl fmt::Debug for MockTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MockTransport")
            .field("connect_requested", &state.connect_headers.is_some())
            .field("subscriptions", &state.subscriptions.len())
            .field("sent", &state.sent.len())
            .finish()
    }
}

/// Connector that hands out clones of one [`MockTransport`].
#[derive(Debug, Clone, Default)]
pub struct MockConnector {
    transport: MockTransport,
    urls: Arc<Mutex<Vec<String>>>,
    failure: Option<String>,
}

impl MockConnector {
    /// Create a connector around `transport`.
    pub fn new(transport: MockTransport) -> Self {
        Self {
            transport,
            urls: Arc::new(Mutex::new(Vec::new())),
            failure: None,
        }
    }

    /// Create a connector whose `client` always fails.
    pub fn failing<S: Into<String>>(message: S) -> Self {
        Self {
            failure: Some(message.into()),
            ..Self::default()
        }
    }

    /// The shared transport.
    pub fn transport(&self) -> &MockTransport {
        &self.transport
    }

    /// Urls requested so far.
    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().clone()
    }
}

impl Connector for MockConnector {
    type Transport = MockTransport;

    fn client(&self, url: &str) -> TransportResult<MockTransport> {
        self.urls.lock().push(url.to_string());
        match &self.failure {
            Some(message) => Err(message.clone().into()),
            None => Ok(self.transport.clone()),
        }
    }
}
