//! Chat messages and conversation queries over real connections.

use pretty_assertions::assert_eq;
use serde_json::json;

use crate::common::{chat_message, TestApp};
use order_chat_relay::config::MessageIdStrategy;

#[tokio::test]
async fn test_new_message_is_broadcast_once_and_stored() {
    let app = TestApp::spawn().await;
    let mut agent = app.connect().await;
    let mut customer = app.connect().await;

    agent.join("S1").await;
    agent.join("O42").await;
    customer.join("O42").await;

    customer
        .send("new-message", chat_message("S1", "O42", "hi", "PWA"))
        .await;

    let frame = agent.recv().await;
    assert_eq!(frame["event"], "new-message");
    assert_eq!(frame["data"]["body"], "hi");
    assert_eq!(frame["data"]["sender"], json!({"type": "PWA", "name": "Tester"}));
    let id = frame["data"]["id"].as_str().expect("id assigned").to_string();

    // In both rooms, still one copy
    agent.expect_silence().await;

    let echoed = customer.recv().await;
    assert_eq!(echoed["data"]["id"], id.as_str());

    customer
        .send("get-order-conversation", json!({"orderNo": "O42", "storeId": "S1"}))
        .await;
    let reply = customer.recv().await;
    assert_eq!(reply["event"], "get-order-conversation");
    assert_eq!(reply["data"].as_array().unwrap().len(), 1);
    assert_eq!(reply["data"][0]["id"], id.as_str());
}

#[tokio::test]
async fn test_store_conversations_reply_goes_to_requester_only() {
    let app = TestApp::spawn().await;
    let mut agent = app.connect().await;
    let mut customer = app.connect().await;
    customer.join("S1").await;

    agent
        .send("new-message", chat_message("S1", "O42", "a", "OM"))
        .await;
    agent
        .send("new-message", chat_message("S1", "O7", "b", "OM"))
        .await;
    agent.sync().await;
    // Drain the two broadcasts the store room received
    customer.recv().await;
    customer.recv().await;

    agent
        .send("get-store-conversations", json!({"storeId": "S1"}))
        .await;
    let reply = agent.recv().await;
    assert_eq!(reply["event"], "get-store-conversations");
    let order_nos: Vec<&str> = reply["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["orderNo"].as_str().unwrap())
        .collect();
    assert_eq!(order_nos, vec!["O42", "O7"]);

    customer.expect_silence().await;
}

#[tokio::test]
async fn test_unwritten_conversation_is_empty() {
    let app = TestApp::spawn().await;
    let mut client = app.connect().await;

    client
        .send("get-order-conversation", json!({"orderNo": "O1", "storeId": "S9"}))
        .await;
    let reply = client.recv().await;
    assert_eq!(reply, json!({"event": "get-order-conversation", "data": []}));
}

#[tokio::test]
async fn test_malformed_payload_reports_error_and_keeps_connection() {
    let app = TestApp::spawn().await;
    let mut client = app.connect().await;

    client
        .send("new-message", json!({"storeId": "S1", "body": "no order"}))
        .await;
    let error = client.recv().await;
    assert_eq!(error["event"], "error");
    assert_eq!(error["data"]["code"], 10003);

    client.send_text("{not json".to_string()).await;
    assert_eq!(client.recv().await["data"]["code"], 10001);

    client.send("joinRoom", json!({"roomId": "S1"})).await;
    assert_eq!(client.recv().await["data"]["code"], 10002);

    client.sync().await;
    assert_eq!(app.state.dispatcher.conversations().stats().messages, 0);
}

#[tokio::test]
async fn test_timestamp_ids_when_configured() {
    let app = TestApp::spawn_with(|settings| {
        settings.conversations.message_id_strategy = MessageIdStrategy::Timestamp;
    })
    .await;
    let mut client = app.connect().await;
    client.join("O42").await;

    client
        .send("new-message", chat_message("S1", "O42", "hi", "PWA"))
        .await;
    let frame = client.recv().await;
    let id = frame["data"]["id"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(id).is_ok(), "id was {}", id);
}
