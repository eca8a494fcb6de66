//! # Domain Services
//!
//! Stateful domain logic that does not belong to a single entity.

mod room_registry;

pub use room_registry::{LeaveAllPolicy, RoomRegistry};
