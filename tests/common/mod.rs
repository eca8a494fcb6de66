//! Common Test Utilities
//!
//! Spawns the relay on a free port and drives it with WebSocket clients.

use std::net::SocketAddr;
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use order_chat_relay::config::Settings;
use order_chat_relay::startup::{AppState, Application};

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

const RECV_TIMEOUT: Duration = Duration::from_secs(2);

/// A relay server running in the background
pub struct TestApp {
    pub addr: SocketAddr,
    pub state: AppState,
}

impl TestApp {
    /// Spawn with default settings
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    /// Spawn with adjusted settings
    pub async fn spawn_with(configure: impl FnOnce(&mut Settings)) -> Self {
        let mut settings = Settings::defaults().expect("default settings");
        settings.server.host = "127.0.0.1".into();
        settings.server.port = 0;
        configure(&mut settings);

        let application = Application::build(settings).await.expect("build app");
        let addr = application.local_addr().expect("local addr");
        let state = application.state().clone();
        tokio::spawn(application.run_until_stopped());

        Self { addr, state }
    }

    /// Open a WebSocket connection to the gateway
    pub async fn connect(&self) -> TestClient {
        let url = format!("ws://{}{}", self.addr, self.state.settings.websocket.path);
        let (socket, _) = connect_async(url).await.expect("websocket connect");
        let (write, read) = socket.split();
        TestClient { write, read }
    }

    /// Wait until the server has no room with this id
    pub async fn wait_for_room_gone(&self, room_id: &str) {
        let rooms = self.state.dispatcher.rooms().clone();
        tokio::time::timeout(RECV_TIMEOUT, async {
            while rooms.contains_room(room_id) {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("room was not removed in time");
    }
}

/// One client connection
pub struct TestClient {
    write: SplitSink<Socket, Message>,
    read: SplitStream<Socket>,
}

impl TestClient {
    /// Send a raw text frame
    pub async fn send_text(&mut self, text: String) {
        self.write
            .send(Message::text(text))
            .await
            .expect("send frame");
    }

    /// Send an event frame
    pub async fn send(&mut self, event: &str, data: Value) {
        self.send_text(json!({"event": event, "data": data}).to_string())
            .await;
    }

    /// Next event frame from the server
    pub async fn recv(&mut self) -> Value {
        loop {
            let msg = tokio::time::timeout(RECV_TIMEOUT, self.read.next())
                .await
                .expect("timed out waiting for frame")
                .expect("stream ended")
                .expect("websocket error");
            if let Message::Text(text) = msg {
                return serde_json::from_str(text.as_str()).expect("frame is JSON");
            }
        }
    }

    /// Round-trip a ping so every earlier frame from this client is processed
    pub async fn sync(&mut self) {
        self.send("ping", Value::Null).await;
        let frame = self.recv().await;
        assert_eq!(frame["event"], "pong", "unexpected frame: {}", frame);
    }

    pub async fn join(&mut self, room_id: &str) {
        self.send("join-room", json!({"roomId": room_id})).await;
        self.sync().await;
    }

    /// Assert nothing arrives within a short window
    pub async fn expect_silence(&mut self) {
        let next = tokio::time::timeout(Duration::from_millis(200), self.read.next()).await;
        assert!(next.is_err(), "unexpected frame: {:?}", next);
    }

    pub async fn close(mut self) {
        let _ = self.write.send(Message::Close(None)).await;
    }
}

pub fn chat_message(store_id: &str, order_no: &str, body: &str, sender_type: &str) -> Value {
    json!({
        "orderNo": order_no,
        "storeId": store_id,
        "body": body,
        "sender": {"type": sender_type, "name": "Tester"}
    })
}
