//! Testing utilities for KittenBoot socket clients.
//!
//! [`MockTransport`] stands in for the STOMP client: it records connects,
//! subscriptions and sends, and lets a test complete the handshake and push
//! message bodies at will.
//!
//! ```rust
//! use kittenboot_testing::{connected_socket, test_config};
//!
//! let (socket, transport) = connected_socket(test_config()).unwrap();
//! socket.join_public_queue().unwrap();
//!
//! let sent = transport.last_sent().unwrap();
//! assert_eq!(sent.destination, "/game_post/join_public_queue");
//! assert_eq!(sent.body, "{}");
//! ```

pub mod mock;

pub use mock::{MockConnector, MockTransport, RecordedSubscription, SentFrame};

use kittenboot_socket::{KittenSocket, SocketConfig, SocketConfigBuilder, SocketResult};

/// Broker prefix used by [`test_config`].
pub const TEST_BROKER_PREFIX: &str = "game_get";

/// Application prefix used by [`test_config`].
pub const TEST_APP_PREFIX: &str = "game_post";

/// Builder preloaded with a local url and the test prefixes.
///
/// Silent, so default listeners stay out of test output.
pub fn test_config() -> SocketConfigBuilder {
    SocketConfig::builder()
        .url("http://localhost:8080")
        .register_endpoint("register")
        .message_broker_prefix(TEST_BROKER_PREFIX)
        .application_destination_prefix(TEST_APP_PREFIX)
        .silent(true)
}

/// Build a socket on a fresh [`MockTransport`] without completing the handshake.
pub fn pending_socket(builder: SocketConfigBuilder) -> SocketResult<(KittenSocket, MockTransport)> {
    let transport = MockTransport::new();
    let socket = builder.connect(MockConnector::new(transport.clone()))?;
    Ok((socket, transport))
}

/// Build a socket on a fresh [`MockTransport`] and complete the handshake.
pub fn connected_socket(
    builder: SocketConfigBuilder,
) -> SocketResult<(KittenSocket, MockTransport)> {
    let (socket, transport) = pending_socket(builder)?;
    transport.complete_handshake();
    Ok((socket, transport))
}
