//! # Domain Layer
//!
//! The domain layer holds the state of the relay: who is in which room, and
//! what has been said about which order. It knows nothing about sockets,
//! frames or configuration files.
//!
//! ## Structure
//!
//! - **entities**: Messages, conversations, order status updates, and the
//!   `ConversationStore` contract
//! - **services**: The `RoomRegistry` membership table

pub mod entities;
pub mod services;

// Re-export commonly used types
pub use entities::*;
pub use services::*;
