//! Conversation Storage
//!
//! Implementations of the domain `ConversationStore` contract.

mod memory;
mod message_id;

pub use memory::InMemoryConversationStore;
pub use message_id::MessageIdGenerator;
