//! Data Transfer Objects
//!
//! Inbound event payloads and outbound broadcast instructions.

pub mod request;
pub mod response;

pub use request::*;
pub use response::*;

/// Gateway event names. These strings are part of the client contract.
pub mod events {
    pub const JOIN_ROOM: &str = "join-room";
    pub const LEAVE_ROOM: &str = "leave-room";
    pub const LEAVE_ROOMS: &str = "leave-rooms";
    pub const UPDATE_ORDER_STATUS: &str = "update-order-status";
    pub const NEW_MESSAGE: &str = "new-message";
    pub const GET_ORDER_CONVERSATION: &str = "get-order-conversation";
    pub const GET_STORE_CONVERSATIONS: &str = "get-store-conversations";
    pub const PING: &str = "ping";
    pub const PONG: &str = "pong";
    pub const ERROR: &str = "error";
}
