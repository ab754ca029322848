//! Matchmaking walkthrough on an in-memory transport.
//!
//! Run with `cargo run --example matchmaking`. Set `KITTENBOOT_LOG_LEVEL=debug`
//! to see the socket's own events.

use kittenboot::prelude::*;
use kittenboot_testing::{MockConnector, MockTransport};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn main() -> SocketResult<()> {
    kittenboot_log::init();

    let transport = MockTransport::new();
    let update_counter = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&update_counter);

    let socket = SocketConfig::builder()
        .url("http://localhost:8080")
        .register_endpoint("custom_register")
        .message_broker_prefix("custom_game_get")
        .application_destination_prefix("custom_game_post")
        .on_update(move |data| {
            let n = counter.fetch_add(1, Ordering::SeqCst) + 1;
            if n % 100 == 1 {
                tracing::info!("Update number {}: {}", n, data);
            }
        })
        .on_connect(|socket| {
            let result = socket
                .join_public_queue()
                .and_then(|s| {
                    s.subscribe("broadcasted_message", Scope::Public, |message| {
                        tracing::info!("Broadcasted message received: {}", message)
                    })
                })
                .and_then(|s| s.subscribe("private_message", Scope::Private, |_| {}))
                .and_then(|s| {
                    s.send(
                        "broadcast_message",
                        "This is message sent from client to server, then from server to all clients",
                    )
                });
            if let Err(e) = result {
                tracing::error!("matchmaking setup failed: {}", e);
            }
        })
        .connect(MockConnector::new(transport.clone()))?;

    tracing::info!("connecting to {}", socket.connect_url());
    transport.complete_handshake();

    // Play the broker: relay the broadcast and push some room updates
    transport.echo_last_send_to("/custom_game_get/broadcasted_message");
    for tick in 0..250 {
        transport.deliver(
            "/user/custom_game_get/room_update",
            &format!(r#"{{"tick":{}}}"#, tick),
        );
    }
    transport.deliver("/user/custom_game_get/queue_created", r#"{"uuid":"q-1"}"#);

    tracing::info!(
        updates = update_counter.load(Ordering::SeqCst),
        sent = transport.sent().len(),
        "demo finished"
    );
    Ok(())
}
