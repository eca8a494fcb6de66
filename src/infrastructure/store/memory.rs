//! In-memory conversation store.
//!
//! Volatile: everything lives for the lifetime of the process.

use std::collections::HashMap;

use indexmap::IndexMap;
use parking_lot::RwLock;

use super::message_id::MessageIdGenerator;
use crate::domain::{Conversation, ConversationStore, Message, NewMessage, StoreStats};
use crate::infrastructure::metrics;

/// Conversations of one store, keyed by order number in first-message order.
type StorePartition = IndexMap<String, Conversation>;

/// [`ConversationStore`] backed by process memory.
#[derive(Debug, Default)]
pub struct InMemoryConversationStore {
    stores: RwLock<HashMap<String, StorePartition>>,
    ids: MessageIdGenerator,
}

impl InMemoryConversationStore {
    pub fn new(ids: MessageIdGenerator) -> Self {
        Self {
            stores: RwLock::new(HashMap::new()),
            ids,
        }
    }
}

impl ConversationStore for InMemoryConversationStore {
    fn append(&self, store_id: &str, order_no: &str, message: NewMessage) -> Message {
        let mut stores = self.stores.write();

        // Minted under the write lock so id order matches append order.
        let stored = Message::from_new(self.ids.next_id(), message);

        stores
            .entry(store_id.to_string())
            .or_default()
            .entry(order_no.to_string())
            .or_insert_with(|| Conversation::new(order_no))
            .messages
            .push(stored.clone());
        drop(stores);

        metrics::record_message_appended();
        tracing::debug!(
            store_id = %store_id,
            order_no = %order_no,
            message_id = %stored.id,
            "Message appended"
        );

        stored
    }

    fn conversation(&self, store_id: &str, order_no: &str) -> Vec<Message> {
        self.stores
            .read()
            .get(store_id)
            .and_then(|partition| partition.get(order_no))
            .map(|conversation| conversation.messages.clone())
            .unwrap_or_default()
    }

    fn conversations_of(&self, store_id: &str) -> Vec<Conversation> {
        self.stores
            .read()
            .get(store_id)
            .map(|partition| partition.values().cloned().collect())
            .unwrap_or_default()
    }

    fn stats(&self) -> StoreStats {
        let stores = self.stores.read();
        let mut stats = StoreStats {
            stores: stores.len(),
            ..StoreStats::default()
        };
        for partition in stores.values() {
            stats.conversations += partition.len();
            stats.messages += partition
                .values()
                .map(|conversation| conversation.messages.len())
                .sum::<usize>();
        }
        stats
    }
}
