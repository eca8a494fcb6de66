//! WebSocket Message Types
//!
//! Every frame is a JSON text message `{"event": <name>, "data": <payload>}`
//! in both directions.

use serde::{Deserialize, Serialize};

/// Incoming frame
#[derive(Debug, Deserialize)]
pub struct ClientFrame {
    pub event: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Outgoing frame
#[derive(Debug, Serialize)]
pub struct ServerFrame<'a, T: Serialize> {
    pub event: &'a str,
    pub data: &'a T,
}

impl<'a, T: Serialize> ServerFrame<'a, T> {
    pub fn new(event: &'a str, data: &'a T) -> Self {
        Self { event, data }
    }

    pub fn encode(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
