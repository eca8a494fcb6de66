//! Conversation entity and store trait.
//!
//! A conversation is the message log of one order within one store. The
//! store trait is implemented in the infrastructure layer.

use serde::{Deserialize, Serialize};

use super::message::{Message, NewMessage};

/// All messages exchanged about one order, in arrival order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub order_no: String,
    pub messages: Vec<Message>,
}

impl Conversation {
    pub fn new(order_no: impl Into<String>) -> Self {
        Self {
            order_no: order_no.into(),
            messages: Vec::new(),
        }
    }
}

/// Size of the store, reported by the readiness probe.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StoreStats {
    pub stores: usize,
    pub conversations: usize,
    pub messages: usize,
}

/// Append-only message log partitioned by store id, then order number.
///
/// Reads never fail: unknown stores and orders read back as empty.
#[cfg_attr(test, mockall::automock)]
pub trait ConversationStore: Send + Sync {
    /// Append a message to the (store, order) conversation, creating the
    /// store partition and conversation as needed. Returns the stored message.
    fn append(&self, store_id: &str, order_no: &str, message: NewMessage) -> Message;

    /// Messages of one order, oldest first.
    fn conversation(&self, store_id: &str, order_no: &str) -> Vec<Message>;

    /// Conversations of one store, in order of their first message.
    fn conversations_of(&self, store_id: &str) -> Vec<Conversation>;

    fn stats(&self) -> StoreStats;
}
