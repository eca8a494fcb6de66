//! Response DTOs
//!
//! Outbound instructions produced by the dispatcher. The transport decides
//! how to deliver them; the dispatcher only decides who gets what.

use std::collections::HashSet;

use serde::Serialize;

use crate::domain::ConnectionId;
use crate::shared::error::AppError;

/// Send `payload` as `event` to every connection in `recipients`.
#[derive(Debug, Clone, PartialEq)]
pub struct Broadcast {
    pub recipients: HashSet<ConnectionId>,
    pub event: &'static str,
    pub payload: serde_json::Value,
}

impl Broadcast {
    pub fn new<T: Serialize>(
        recipients: HashSet<ConnectionId>,
        event: &'static str,
        payload: &T,
    ) -> Result<Self, AppError> {
        let payload = serde_json::to_value(payload)
            .map_err(|e| AppError::Internal(format!("Failed to encode {}: {}", event, e)))?;
        Ok(Self {
            recipients,
            event,
            payload,
        })
    }

    /// Reply to a single connection
    pub fn unicast<T: Serialize>(
        conn_id: &str,
        event: &'static str,
        payload: &T,
    ) -> Result<Self, AppError> {
        Self::new(HashSet::from([conn_id.to_string()]), event, payload)
    }

    pub fn is_empty(&self) -> bool {
        self.recipients.is_empty()
    }
}
