//! WebSocket Gateway
//!
//! Live connection table and broadcast fan-out. Delivery is best-effort: a
//! closed or missing recipient is skipped without affecting the others.

use axum::extract::ws::Utf8Bytes;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::mpsc;

use super::messages::ServerFrame;
use crate::application::dto::{events, Broadcast};
use crate::domain::ConnectionId;
use crate::infrastructure::metrics;
use crate::shared::error::AppError;

/// Connected session with its outbound queue
pub struct ConnectedSession {
    pub connected_at: DateTime<Utc>,
    pub sender: mpsc::UnboundedSender<Utf8Bytes>,
}

/// WebSocket gateway managing all connections
#[derive(Default)]
pub struct Gateway {
    /// Active sessions by connection id
    sessions: DashMap<ConnectionId, Arc<ConnectedSession>>,
}

impl Gateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a new connected session
    pub fn register_session(&self, connection_id: &str, sender: mpsc::UnboundedSender<Utf8Bytes>) {
        let session = Arc::new(ConnectedSession {
            connected_at: Utc::now(),
            sender,
        });
        self.sessions.insert(connection_id.to_string(), session);

        tracing::info!(connection_id = %connection_id, "Session registered");
    }

    /// Unregister a session
    pub fn unregister_session(&self, connection_id: &str) {
        if let Some((_, session)) = self.sessions.remove(connection_id) {
            let lifetime = Utc::now() - session.connected_at;
            tracing::info!(
                connection_id = %connection_id,
                connected_secs = lifetime.num_seconds(),
                "Session unregistered"
            );
        }
    }

    /// Deliver a broadcast to each of its recipients.
    ///
    /// The frame is encoded once and shared. Returns the number of
    /// recipients whose queue accepted it.
    pub fn deliver(&self, broadcast: &Broadcast) -> usize {
        let text = match ServerFrame::new(broadcast.event, &broadcast.payload).encode() {
            Ok(text) => Utf8Bytes::from(text),
            Err(e) => {
                tracing::error!(event = broadcast.event, error = %e, "Failed to encode frame");
                return 0;
            }
        };

        let mut delivered = 0;
        for recipient in &broadcast.recipients {
            let ok = self.send_to_session(recipient, text.clone());
            metrics::record_delivery(broadcast.event, ok);
            if ok {
                delivered += 1;
            } else {
                tracing::debug!(
                    connection_id = %recipient,
                    event = broadcast.event,
                    "Recipient gone, frame dropped"
                );
            }
        }
        delivered
    }

    /// Report a rejected event back to the connection that sent it
    pub fn send_error(&self, connection_id: &str, error: &AppError) -> bool {
        let response = error.to_response();
        match ServerFrame::new(events::ERROR, &response).encode() {
            Ok(text) => self.send_to_session(connection_id, text.into()),
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode error frame");
                false
            }
        }
    }

    /// Queue an encoded frame for one session
    pub fn send_to_session(&self, connection_id: &str, text: Utf8Bytes) -> bool {
        self.sessions
            .get(connection_id)
            .map(|session| session.sender.send(text).is_ok())
            .unwrap_or(false)
    }

    /// Get session count
    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}
