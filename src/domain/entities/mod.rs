//! # Domain Entities
//!
//! Core domain entities of the order chat relay.
//!
//! - **Message**: a chat line with its sender, stamped with an id when stored
//! - **Conversation**: the ordered messages of one order within a store
//! - **OrderStatusUpdate**: a status change relayed to store and order rooms
//!
//! The `ConversationStore` trait defines the storage contract; the
//! infrastructure layer implements it.

mod conversation;
mod message;
mod order;

/// Opaque identifier of one live connection.
pub type ConnectionId = String;

/// Opaque room key. Store ids and order numbers share one namespace.
pub type RoomId = String;

pub use conversation::{Conversation, ConversationStore, StoreStats};
pub use message::{Message, NewMessage, Sender, SenderType};
pub use order::{OrderStatus, OrderStatusUpdate};

#[cfg(test)]
pub use conversation::MockConversationStore;
