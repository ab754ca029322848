//! # KittenBoot Socket
//!
//! Client for KittenBoot matchmaking servers over STOMP-over-WebSocket.
//!
//! ## Features
//!
//! - Validated connection configuration (`http(s)://` coerced to `ws(s)://`)
//! - Automatic subscription to the eight matchmaking system topics
//! - Private (`/user`) and public topic subscriptions
//! - JSON bodies with raw-text fallback on decode
//! - Matchmaking shortcuts: public queue, private rooms, room updates
//! - Optional process-wide handle
//!
//! The STOMP client itself is supplied through [`StompTransport`] and
//! [`Connector`].
//!
//! ## Example
//!
//! ```rust,ignore
//! use kittenboot_socket::{Scope, SocketConfig};
//!
//! let socket = SocketConfig::builder()
//!     .url("http://localhost:8080")
//!     .register_endpoint("custom_register")
//!     .message_broker_prefix("custom_game_get")
//!     .application_destination_prefix("custom_game_post")
//!     .on_update(|update| println!("update {}", update))
//!     .on_connect(|socket| {
//!         let _ = socket
//!             .join_public_queue()
//!             .and_then(|s| s.subscribe("broadcasted_message", Scope::Public, |m| println!("{}", m)));
//!     })
//!     .connect(my_stomp_connector)?;
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod config;
mod error;
pub mod global;
mod listener;
mod payload;
mod settings;
mod socket;
mod topic;
mod transport;

pub use config::{normalize_url, validate_segment, SocketConfig, SocketConfigBuilder};
pub use error::{
    ConfigError, ConfigResult, SocketError, SocketResult, TransportError, TransportResult,
};
pub use listener::{default_listener, listener, Listener, ListenerTable, OnConnect};
pub use payload::{empty_body, encode_body, Payload};
pub use settings::{SocketSettings, ENV_PREFIX};
pub use socket::{ConnectionState, KittenSocket, Subscription};
pub use topic::{ClientRoute, Scope, SystemTopic};
pub use transport::{
    ConnectCallback, ConnectedFrame, Connector, FrameHandler, Headers, InboundFrame,
    StompTransport, SubscriptionHandle,
};
