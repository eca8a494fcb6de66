//! Room membership over real connections.

use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{chat_message, TestApp};
use order_chat_relay::domain::LeaveAllPolicy;

#[tokio::test]
async fn test_order_status_reaches_store_and_order_rooms() {
    let app = TestApp::spawn().await;
    let mut agent = app.connect().await;
    let mut customer = app.connect().await;
    let mut outsider = app.connect().await;

    agent.join("S1").await;
    customer.join("O42").await;
    outsider.join("O7").await;

    let update = json!({
        "storeId": "S1",
        "orderNo": "O42",
        "body": {"status": "ACCEPTED", "reason": null, "eta": "15m"}
    });
    agent.send("update-order-status", update.clone()).await;

    for client in [&mut agent, &mut customer] {
        let frame = client.recv().await;
        assert_eq!(frame, json!({"event": "update-order-status", "data": update}));
    }
    outsider.expect_silence().await;
}

#[tokio::test]
async fn test_leave_rooms_stops_delivery() {
    let app = TestApp::spawn().await;
    let mut agent = app.connect().await;
    let mut customer = app.connect().await;

    agent.join("S1").await;
    agent.send("leave-rooms", serde_json::Value::Null).await;
    agent.sync().await;
    app.wait_for_room_gone("S1").await;

    customer
        .send("new-message", chat_message("S1", "O42", "anyone?", "PWA"))
        .await;
    customer.sync().await;
    agent.expect_silence().await;
}

#[tokio::test]
async fn test_disconnect_removes_membership() {
    let app = TestApp::spawn().await;
    let mut customer = app.connect().await;
    customer.join("O42").await;
    assert!(app.state.dispatcher.rooms().contains_room("O42"));

    customer.close().await;
    app.wait_for_room_gone("O42").await;
    assert_eq!(app.state.dispatcher.rooms().room_count(), 0);
}

#[tokio::test]
async fn test_disconnect_leaves_store_and_order_rooms() {
    let app = TestApp::spawn().await;
    let mut agent = app.connect().await;
    agent.join("S1").await;
    agent.join("O42").await;

    agent.close().await;
    app.wait_for_room_gone("S1").await;
    app.wait_for_room_gone("O42").await;
    assert_eq!(app.state.dispatcher.rooms().room_count(), 0);
}

#[tokio::test]
async fn test_every_room_policy_leaves_all_rooms() {
    let app = TestApp::spawn_with(|settings| {
        settings.rooms.leave_all_policy = LeaveAllPolicy::EveryRoom;
    })
    .await;
    let mut agent = app.connect().await;
    agent.join("S1").await;
    agent.join("O42").await;

    agent.send("leave-rooms", serde_json::Value::Null).await;
    agent.sync().await;

    assert_eq!(app.state.dispatcher.rooms().room_count(), 0);
}

#[tokio::test]
async fn test_first_match_policy_keeps_later_rooms() {
    let app = TestApp::spawn().await;
    let mut agent = app.connect().await;
    agent.join("S1").await;
    agent.join("O42").await;

    agent.send("leave-rooms", serde_json::Value::Null).await;
    agent.sync().await;

    let rooms = app.state.dispatcher.rooms();
    assert!(!rooms.contains_room("S1"));
    assert!(rooms.contains_room("O42"));
}
