//! Request DTOs
//!
//! Payloads of inbound gateway events.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use validator::Validate;

use super::events;
use crate::domain::{NewMessage, OrderStatusUpdate, Sender};
use crate::shared::error::AppError;
use crate::shared::validation::validate;

/// `join-room` / `leave-room` payload. A missing or empty room id is a no-op.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomRequest {
    #[serde(default)]
    pub room_id: String,
}

/// `new-message` payload
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewMessageRequest {
    #[validate(length(min = 1, message = "orderNo must not be empty"))]
    pub order_no: String,

    #[validate(length(min = 1, message = "storeId must not be empty"))]
    pub store_id: String,

    #[validate(length(max = 4000, message = "Message body must be at most 4000 characters"))]
    pub body: String,

    #[validate(nested)]
    pub sender: Sender,
}

impl NewMessageRequest {
    pub fn into_message(self) -> (String, String, NewMessage) {
        (
            self.store_id,
            self.order_no,
            NewMessage::new(self.body, self.sender),
        )
    }
}

/// `get-order-conversation` payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderConversationQuery {
    pub order_no: String,
    pub store_id: String,
}

/// `get-store-conversations` payload
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreConversationsQuery {
    pub store_id: String,
}

/// A decoded inbound event.
#[derive(Debug, Clone)]
pub enum InboundEvent {
    JoinRoom(RoomRequest),
    LeaveRoom(RoomRequest),
    LeaveRooms,
    /// Checked `update`, relayed as the `raw` payload it was read from.
    UpdateOrderStatus {
        update: OrderStatusUpdate,
        raw: serde_json::Value,
    },
    NewMessage(NewMessageRequest),
    GetOrderConversation(OrderConversationQuery),
    GetStoreConversations(StoreConversationsQuery),
    Ping,
}

impl InboundEvent {
    /// Decode and validate the payload of a named event.
    ///
    /// A `null` payload is read as an empty object, so events whose fields
    /// are all optional may omit it.
    pub fn decode(event: &str, data: serde_json::Value) -> Result<Self, AppError> {
        let data = if data.is_null() {
            serde_json::Value::Object(Default::default())
        } else {
            data
        };

        let decoded = match event {
            events::JOIN_ROOM => Self::JoinRoom(parse(data)?),
            events::LEAVE_ROOM => Self::LeaveRoom(parse(data)?),
            events::LEAVE_ROOMS => Self::LeaveRooms,
            events::UPDATE_ORDER_STATUS => {
                let update: OrderStatusUpdate = parse(data.clone())?;
                validate(&update)?;
                Self::UpdateOrderStatus { update, raw: data }
            }
            events::NEW_MESSAGE => {
                let request: NewMessageRequest = parse(data)?;
                validate(&request)?;
                Self::NewMessage(request)
            }
            events::GET_ORDER_CONVERSATION => Self::GetOrderConversation(parse(data)?),
            events::GET_STORE_CONVERSATIONS => Self::GetStoreConversations(parse(data)?),
            events::PING => Self::Ping,
            other => return Err(AppError::UnknownEvent(other.to_string())),
        };

        Ok(decoded)
    }

}

fn parse<T: DeserializeOwned>(data: serde_json::Value) -> Result<T, AppError> {
    Ok(serde_json::from_value(data)?)
}
