//! Integration tests for subscribe, send and the matchmaking shortcuts.

use kittenboot_socket::*;
use kittenboot_testing::{connected_socket, test_config};
use parking_lot::Mutex;
use proptest::prelude::*;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

fn collector() -> (Arc<Mutex<Vec<Payload>>>, impl Fn(Payload) + Send + Sync + 'static) {
    let store = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&store);
    (store, move |payload| sink.lock().push(payload))
}

// =============================================================================
// Destinations
// =============================================================================

#[test]
fn test_private_and_public_subscription_destinations() {
    let (socket, transport) = connected_socket(test_config()).unwrap();

    socket
        .subscribe("room_update", Scope::Private, |_| {})
        .unwrap()
        .subscribe("broadcast", Scope::Public, |_| {})
        .unwrap();

    let destinations = transport.destinations();
    assert_eq!(destinations[8], "/user/game_get/room_update");
    assert_eq!(destinations[9], "/game_get/broadcast");
    assert_eq!(
        socket.subscription_destination("broadcast", Scope::from_private(false)),
        "/game_get/broadcast"
    );
}

#[test]
fn test_send_destination_and_headers() {
    let (socket, transport) = connected_socket(test_config()).unwrap();

    socket.send("custom_path", &json!({"move": "left"})).unwrap();

    let sent = transport.last_sent().unwrap();
    assert_eq!(sent.destination, "/game_post/custom_path");
    assert!(sent.headers.is_empty());
    assert_eq!(sent.body, r#"{"move":"left"}"#);
}

// =============================================================================
// Matchmaking shortcuts
// =============================================================================

#[test]
fn test_join_public_queue_sends_empty_object() {
    let (socket, transport) = connected_socket(test_config()).unwrap();
    socket.join_public_queue().unwrap();

    let sent = transport.last_sent().unwrap();
    assert_eq!(sent.destination, "/game_post/join_public_queue");
    assert_eq!(sent.body, "{}");
}

#[test]
fn test_send_update_serializes_struct() {
    #[derive(Serialize)]
    struct Update {
        x: i32,
        y: i32,
    }

    let (socket, transport) = connected_socket(test_config()).unwrap();
    socket.send_update(&Update { x: 3, y: -1 }).unwrap();

    let sent = transport.last_sent().unwrap();
    assert_eq!(sent.destination, "/game_post/room_update");
    assert_eq!(sent.body, r#"{"x":3,"y":-1}"#);
}

#[test]
fn test_join_private_room_sends_uuid_string() {
    let (socket, transport) = connected_socket(test_config()).unwrap();
    socket
        .join_private_room("6b0c3f2e-1d7a-4c59-9a3e-2f1f0a7c8d11")
        .unwrap();

    let sent = transport.last_sent().unwrap();
    assert_eq!(sent.destination, "/game_post/join_private_room");
    assert_eq!(sent.body, r#""6b0c3f2e-1d7a-4c59-9a3e-2f1f0a7c8d11""#);
}

#[test]
fn test_start_private_room_chains() {
    let (socket, transport) = connected_socket(test_config()).unwrap();
    socket
        .join_private_room("q-1")
        .unwrap()
        .start_private_room()
        .unwrap();

    let destinations: Vec<_> = transport.sent().into_iter().map(|f| f.destination).collect();
    assert_eq!(
        destinations,
        vec!["/game_post/join_private_room", "/game_post/start_private_room"]
    );
    assert_eq!(transport.last_sent().unwrap().body, "{}");
}

#[test]
fn test_falsy_bodies_become_empty_object() {
    let (socket, transport) = connected_socket(test_config()).unwrap();
    socket
        .send("a", &serde_json::Value::Null)
        .unwrap()
        .send("b", &0)
        .unwrap()
        .send("c", "")
        .unwrap()
        .send_empty("d")
        .unwrap();

    assert!(transport.sent().iter().all(|f| f.body == "{}"));
}

// =============================================================================
// Decoding laws
// =============================================================================

#[test]
fn test_json_round_trip() {
    let (socket, transport) = connected_socket(test_config()).unwrap();
    let (received, sink) = collector();
    socket.subscribe("echo", Scope::Public, sink).unwrap();

    socket.send("echo", &json!({"a": 1})).unwrap();
    assert_eq!(transport.echo_last_send_to("/game_get/echo"), 1);

    assert_eq!(*received.lock(), vec![Payload::Json(json!({"a": 1}))]);
}

#[test]
fn test_raw_text_fallback() {
    let (socket, transport) = connected_socket(test_config()).unwrap();
    let (received, sink) = collector();
    socket.subscribe("notices", Scope::Private, sink).unwrap();

    transport.deliver("/user/game_get/notices", "server restarting {soon");

    assert_eq!(
        *received.lock(),
        vec![Payload::Text("server restarting {soon".to_string())]
    );
}

proptest! {
    #[test]
    fn test_sent_values_come_back_as_json(
        fields in proptest::collection::btree_map("[a-z_]{1,10}", any::<i64>(), 1..6),
        label in any::<String>(),
    ) {
        let (socket, transport) = connected_socket(test_config()).unwrap();
        let (received, sink) = collector();
        socket.subscribe("echo", Scope::Public, sink).unwrap();

        let value = json!({ "fields": fields, "label": label });
        socket.send("echo", &value).unwrap();
        transport.echo_last_send_to("/game_get/echo");

        prop_assert_eq!(received.lock().clone(), vec![Payload::Json(value)]);
    }

    #[test]
    fn test_raw_bodies_reach_listener_unchanged(body in any::<String>()) {
        prop_assume!(serde_json::from_str::<serde_json::Value>(&body).is_err());
        let (socket, transport) = connected_socket(test_config()).unwrap();
        let (received, sink) = collector();
        socket.subscribe("notices", Scope::Private, sink).unwrap();

        transport.deliver("/user/game_get/notices", &body);

        prop_assert_eq!(received.lock().clone(), vec![Payload::Text(body)]);
    }
}

// =============================================================================
// Usage and transport errors
// =============================================================================

#[test]
fn test_invalid_paths_register_nothing() {
    let (socket, transport) = connected_socket(test_config()).unwrap();

    assert!(matches!(
        socket.subscribe("", Scope::Public, |_| {}),
        Err(SocketError::InvalidPath { .. })
    ));
    assert!(matches!(
        socket.subscribe("/room_update", Scope::Private, |_| {}),
        Err(SocketError::InvalidPath { .. })
    ));
    assert!(matches!(
        socket.send("/join_public_queue", &json!({})),
        Err(SocketError::InvalidPath { .. })
    ));

    assert_eq!(transport.subscriptions().len(), 8);
    assert!(transport.sent().is_empty());
    assert_eq!(socket.subscriptions().len(), 8);
}

#[test]
fn test_transport_send_error_is_passed_through() {
    let (socket, transport) = connected_socket(test_config()).unwrap();
    transport.fail_sends("broken pipe");

    match socket.join_public_queue() {
        Err(SocketError::Transport(source)) => assert_eq!(source.to_string(), "broken pipe"),
        other => panic!("expected transport error, got {:?}", other),
    }
}

#[test]
fn test_transport_subscribe_error_records_nothing() {
    let (socket, transport) = connected_socket(test_config()).unwrap();
    transport.fail_subscribes("too many subscriptions");

    assert!(matches!(
        socket.subscribe("extra", Scope::Public, |_| {}),
        Err(SocketError::Transport(_))
    ));
    assert_eq!(socket.subscriptions().len(), 8);
}

// =============================================================================
// Threading
// =============================================================================

#[tokio::test]
async fn test_delivery_from_transport_thread() {
    let (socket, transport) = connected_socket(test_config()).unwrap();
    let (received, sink) = collector();
    socket.subscribe("room_update", Scope::Public, sink).unwrap();

    let worker = transport.clone();
    let delivered = tokio::task::spawn_blocking(move || {
        (0..10)
            .map(|tick| worker.deliver("/game_get/room_update", &format!(r#"{{"tick":{}}}"#, tick)))
            .sum::<usize>()
    })
    .await
    .unwrap();

    assert_eq!(delivered, 10);
    let received = received.lock();
    assert_eq!(received.len(), 10);
    assert_eq!(received[9], Payload::Json(json!({"tick": 9})));
}

#[tokio::test]
async fn test_listener_can_send_from_delivery() {
    let (socket, transport) = connected_socket(test_config()).unwrap();
    let responder = socket.clone();
    socket
        .subscribe("ping", Scope::Private, move |payload| {
            responder.send("pong", &payload.into_value()).unwrap();
        })
        .unwrap();

    let worker = transport.clone();
    tokio::task::spawn_blocking(move || worker.deliver("/user/game_get/ping", r#"{"n":1}"#))
        .await
        .unwrap();

    let sent = transport.last_sent().unwrap();
    assert_eq!(sent.destination, "/game_post/pong");
    assert_eq!(sent.body, r#"{"n":1}"#);
}
