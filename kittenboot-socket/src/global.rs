//! Process-wide socket handle.
//!
//! For applications that want one socket reachable from anywhere. Code that
//! can pass a [`KittenSocket`] around should do that instead.

use crate::config::SocketConfig;
use crate::error::{SocketError, SocketResult};
use crate::socket::KittenSocket;
use crate::transport::Connector;
use once_cell::sync::Lazy;
use parking_lot::RwLock;

static GLOBAL: Lazy<RwLock<Option<KittenSocket>>> = Lazy::new(|| RwLock::new(None));

/// Create the process-wide socket and start connecting.
///
/// The handle is stored before the handshake starts, so [`instance`] already
/// returns it inside `on_connect`. Fails with
/// [`SocketError::AlreadyInitialized`] until [`reset`] is called.
///
/// The connector and transport run without the handle locked, so they may
/// call [`instance`] themselves.
pub fn init<C: Connector>(config: SocketConfig, connector: C) -> SocketResult<KittenSocket> {
    if GLOBAL.read().is_some() {
        return Err(SocketError::AlreadyInitialized);
    }
    let socket = KittenSocket::create(config, connector)?;

    {
        let mut slot = GLOBAL.write();
        // Another thread may have won while the transport was being built
        if slot.is_some() {
            return Err(SocketError::AlreadyInitialized);
        }
        *slot = Some(socket.clone());
    }

    if let Err(e) = socket.open() {
        let mut slot = GLOBAL.write();
        if slot.as_ref().is_some_and(|current| current.ptr_eq(&socket)) {
            *slot = None;
        }
        return Err(e);
    }

    Ok(socket)
}

/// The process-wide socket, if initialized.
pub fn instance() -> Option<KittenSocket> {
    GLOBAL.read().clone()
}

/// Drop the process-wide handle.
///
/// Clones already handed out keep working.
pub fn reset() -> Option<KittenSocket> {
    GLOBAL.write().take()
}
