// KittenBoot - client for KittenBoot matchmaking servers
//
// Connects to a STOMP-over-WebSocket broker, subscribes to the matchmaking
// system topics and exposes queue and private room shortcuts.

// Re-export the socket client
pub use kittenboot_socket::*;

// Re-export optional crates
#[cfg(feature = "log")]
pub use kittenboot_log;

#[cfg(feature = "testing")]
pub use kittenboot_testing;

// Prelude for common imports
pub mod prelude {
    pub use crate::{
        global, Connector, KittenSocket, Payload, Scope, SocketConfig, SocketError,
        SocketResult, StompTransport,
    };
}
