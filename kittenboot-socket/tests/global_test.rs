//! Tests for the process-wide socket handle.
//!
//! Kept in one test function since the handle is shared by the whole binary.

use kittenboot_socket::global;
use kittenboot_socket::SocketError;
use kittenboot_testing::{test_config, MockConnector, MockTransport};
use parking_lot::Mutex;
use std::sync::Arc;

#[test]
fn test_global_handle_lifecycle() {
    assert!(global::instance().is_none());

    // A failed connector leaves the slot empty
    let result = global::init(
        test_config().build().unwrap(),
        MockConnector::failing("refused"),
    );
    assert!(matches!(result, Err(SocketError::Transport(_))));
    assert!(global::instance().is_none());

    let seen_inside_on_connect = Arc::new(Mutex::new(false));
    let seen = Arc::clone(&seen_inside_on_connect);
    let config = test_config()
        .on_connect(move |socket| {
            let found = global::instance().is_some_and(|global| {
                global.connect_url() == socket.connect_url()
            });
            *seen.lock() = found;
        })
        .build()
        .unwrap();

    let transport = MockTransport::new();
    let socket = global::init(config, MockConnector::new(transport.clone())).unwrap();
    assert!(global::instance().is_some());

    let again = global::init(
        test_config().build().unwrap(),
        MockConnector::new(MockTransport::new()),
    );
    assert!(matches!(again, Err(SocketError::AlreadyInitialized)));

    transport.complete_handshake();
    assert!(*seen_inside_on_connect.lock());
    assert!(global::instance().unwrap().is_connected());

    assert!(global::reset().is_some());
    assert!(global::instance().is_none());

    // Handed-out clones outlive the reset
    socket.join_public_queue().unwrap();
    assert_eq!(transport.sent().len(), 1);

    let fresh = global::init(
        test_config().build().unwrap(),
        MockConnector::new(MockTransport::new()),
    );
    assert!(fresh.is_ok());
    global::reset();
}
