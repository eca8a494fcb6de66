//! WebSocket Connection Handler
//!
//! Handles individual WebSocket connections: reads event frames, hands them
//! to the dispatcher, and fans the resulting broadcasts out through the
//! gateway.

use std::time::Duration;

use axum::{
    extract::{
        ws::{Message, Utf8Bytes, WebSocket},
        State, WebSocketUpgrade,
    },
    response::Response,
};
use futures::{Sink, SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, timeout};
use uuid::Uuid;

use super::messages::ClientFrame;
use super::session::SessionState;
use crate::infrastructure::metrics;
use crate::shared::error::AppError;
use crate::startup::AppState;

/// How long a closing connection may spend flushing frames already queued
const WRITER_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// WebSocket upgrade handler
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let max_message_size = state.settings.websocket.max_message_size;
    let max_frame_size = state.settings.websocket.max_frame_size;
    ws.max_message_size(max_message_size)
        .max_frame_size(max_frame_size)
        .on_upgrade(move |socket| handle_socket(socket, state))
}

/// Handle individual WebSocket connection
async fn handle_socket(socket: WebSocket, state: AppState) {
    let connection_id = Uuid::new_v4().to_string();
    let mut session = SessionState::new();

    tracing::debug!(connection_id = %connection_id, "New WebSocket connection");

    // Split socket for concurrent read/write
    let (sender, mut receiver) = socket.split();

    // Outgoing frames are queued per connection and written by a separate task
    let (tx, rx) = mpsc::unbounded_channel::<Utf8Bytes>();
    state.gateway.register_session(&connection_id, tx);
    update_gauges(&state);

    let writer = tokio::spawn(write_frames(sender, rx));

    let idle_timeout = Duration::from_secs(state.settings.websocket.idle_timeout_secs);
    let mut idle_check = interval(idle_timeout.max(Duration::from_secs(1)));
    idle_check.tick().await; // Skip first immediate tick

    // Main message loop
    loop {
        tokio::select! {
            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        session.touch();
                        process_frame(&state, &connection_id, text.as_str());
                    }
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::debug!(connection_id = %connection_id, "Connection closed");
                        break;
                    }
                    Some(Ok(Message::Binary(_))) => {
                        session.touch();
                        state.gateway.send_error(
                            &connection_id,
                            &AppError::InvalidFrame("binary frames are not supported".into()),
                        );
                    }
                    Some(Ok(_)) => {
                        // Ping/Pong are handled automatically by axum
                        session.touch();
                    }
                    Some(Err(e)) => {
                        tracing::debug!(connection_id = %connection_id, error = %e, "WebSocket error");
                        break;
                    }
                }
            }

            _ = idle_check.tick() => {
                if session.is_idle(idle_timeout) {
                    tracing::info!(
                        connection_id = %connection_id,
                        "Idle timeout, closing connection"
                    );
                    break;
                }
            }
        }
    }

    // Cleanup: unregistering drops the queue's sender so the writer can finish
    let left = state.dispatcher.disconnect(&connection_id);
    state.gateway.unregister_session(&connection_id);
    update_gauges(&state);
    drain_writer(writer, WRITER_DRAIN_TIMEOUT).await;

    tracing::info!(
        connection_id = %connection_id,
        frames = session.frames_received,
        rooms_left = ?left,
        "Client disconnected"
    );
}

/// Forward queued frames to the socket until the queue closes or the socket fails.
async fn write_frames<S>(mut sink: S, mut rx: mpsc::UnboundedReceiver<Utf8Bytes>)
where
    S: Sink<Message> + Unpin,
{
    while let Some(text) = rx.recv().await {
        if sink.send(Message::Text(text)).await.is_err() {
            break;
        }
    }
}

/// Wait for the writer to flush, aborting it if it takes longer than `limit`.
async fn drain_writer(writer: JoinHandle<()>, limit: Duration) {
    let abort = writer.abort_handle();
    if timeout(limit, writer).await.is_err() {
        tracing::debug!("Writer did not drain in time, aborting");
        abort.abort();
    }
}

/// Decode one text frame, dispatch it, and deliver what comes back.
///
/// Errors are reported to the sender only; the connection stays open.
pub fn process_frame(state: &AppState, connection_id: &str, text: &str) {
    let outcome = serde_json::from_str::<ClientFrame>(text)
        .map_err(|e| AppError::InvalidFrame(e.to_string()))
        .and_then(|frame| {
            state
                .dispatcher
                .handle(connection_id, &frame.event, frame.data)
        });

    match outcome {
        Ok(broadcasts) => {
            for broadcast in &broadcasts {
                state.gateway.deliver(broadcast);
            }
            update_gauges(state);
        }
        Err(e) => {
            state.gateway.send_error(connection_id, &e);
        }
    }
}

fn update_gauges(state: &AppState) {
    metrics::set_gateway_gauges(
        state.gateway.session_count(),
        state.dispatcher.rooms().room_count(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use serde_json::{json, Value};

    fn state() -> AppState {
        AppState::new(Settings::defaults().unwrap())
    }

    fn connect(state: &AppState, id: &str) -> mpsc::UnboundedReceiver<Utf8Bytes> {
        let (tx, rx) = mpsc::unbounded_channel();
        state.gateway.register_session(id, tx);
        rx
    }

    fn next_frame(rx: &mut mpsc::UnboundedReceiver<Utf8Bytes>) -> Value {
        let text = rx.try_recv().expect("expected a queued frame");
        serde_json::from_str(text.as_str()).unwrap()
    }

    fn send(state: &AppState, id: &str, frame: Value) {
        process_frame(state, id, &frame.to_string());
    }

    #[test]
    fn test_new_message_reaches_both_rooms_once() {
        let state = state();
        let mut agent = connect(&state, "agent");
        let mut customer = connect(&state, "customer");

        send(&state, "agent", json!({"event": "join-room", "data": {"roomId": "S1"}}));
        send(&state, "agent", json!({"event": "join-room", "data": {"roomId": "O42"}}));
        send(&state, "customer", json!({"event": "join-room", "data": {"roomId": "O42"}}));

        send(
            &state,
            "customer",
            json!({"event": "new-message", "data": {
                "orderNo": "O42", "storeId": "S1", "body": "hi",
                "sender": {"type": "PWA", "name": "Alice"}
            }}),
        );

        let frame = next_frame(&mut agent);
        assert_eq!(frame["event"], "new-message");
        assert_eq!(frame["data"]["body"], "hi");
        assert!(agent.try_recv().is_err(), "agent must receive the message once");

        assert_eq!(next_frame(&mut customer)["data"]["sender"]["name"], "Alice");
    }

    #[tokio::test]
    async fn test_closing_connection_flushes_queued_frames() {
        let (tx, rx) = mpsc::unbounded_channel::<Utf8Bytes>();
        let (sink, written) = futures::channel::mpsc::unbounded::<Message>();

        for body in ["one", "two", "three"] {
            tx.send(Utf8Bytes::from(body.to_string())).unwrap();
        }
        let writer = tokio::spawn(write_frames(sink, rx));
        drop(tx);
        drain_writer(writer, Duration::from_secs(1)).await;

        // The writer owned the sink, so the stream ends once it has finished
        let bodies: Vec<String> = written
            .map(|message| match message {
                Message::Text(text) => text.as_str().to_string(),
                other => panic!("unexpected message: {:?}", other),
            })
            .collect()
            .await;
        assert_eq!(bodies, vec!["one", "two", "three"]);
    }

    #[tokio::test]
    async fn test_drain_gives_up_on_stuck_writer() {
        let (_tx, rx) = mpsc::unbounded_channel::<Utf8Bytes>();
        let (sink, _written) = futures::channel::mpsc::unbounded::<Message>();
        let writer = tokio::spawn(write_frames(sink, rx));

        // The queue never closes, so only the timeout ends the wait
        tokio::time::timeout(
            Duration::from_secs(2),
            drain_writer(writer, Duration::from_millis(20)),
        )
        .await
        .expect("drain must return once the limit passes");
    }

    #[test]
    fn test_invalid_json_gets_error_frame() {
        let state = state();
        let mut rx = connect(&state, "c1");

        process_frame(&state, "c1", "not json");

        let frame = next_frame(&mut rx);
        assert_eq!(frame["event"], "error");
        assert_eq!(frame["data"]["code"], 10001);
    }

    #[test]
    fn test_store_conversations_reply_is_unicast() {
        let state = state();
        let mut asker = connect(&state, "asker");
        let mut bystander = connect(&state, "bystander");
        send(&state, "bystander", json!({"event": "join-room", "data": {"roomId": "S1"}}));

        send(&state, "asker", json!({"event": "get-store-conversations", "data": {"storeId": "S1"}}));

        let frame = next_frame(&mut asker);
        assert_eq!(frame["event"], "get-store-conversations");
        assert_eq!(frame["data"], json!([]));
        assert!(bystander.try_recv().is_err());
    }
}
