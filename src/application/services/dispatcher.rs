//! Gateway Dispatcher
//!
//! Turns decoded inbound events into room registry and conversation store
//! calls, and computes who should receive what in return.

use std::sync::Arc;

use crate::application::dto::{
    events, Broadcast, InboundEvent, NewMessageRequest, OrderConversationQuery,
    StoreConversationsQuery,
};
use crate::domain::{ConversationStore, OrderStatusUpdate, RoomId, RoomRegistry};
use crate::infrastructure::metrics;
use crate::shared::error::AppError;

/// Routes inbound events for every connection.
pub struct GatewayDispatcher {
    rooms: Arc<RoomRegistry>,
    conversations: Arc<dyn ConversationStore>,
}

impl GatewayDispatcher {
    pub fn new(rooms: Arc<RoomRegistry>, conversations: Arc<dyn ConversationStore>) -> Self {
        Self {
            rooms,
            conversations,
        }
    }

    pub fn rooms(&self) -> &Arc<RoomRegistry> {
        &self.rooms
    }

    pub fn conversations(&self) -> &Arc<dyn ConversationStore> {
        &self.conversations
    }

    /// Decode a raw named event and dispatch it.
    pub fn handle(
        &self,
        conn_id: &str,
        event: &str,
        data: serde_json::Value,
    ) -> Result<Vec<Broadcast>, AppError> {
        let result = InboundEvent::decode(event, data).and_then(|decoded| self.dispatch(conn_id, decoded));

        metrics::record_gateway_event(metric_label(event), result.is_ok());
        if let Err(e) = &result {
            tracing::debug!(connection_id = %conn_id, event = %event, error = %e, "Event rejected");
        }
        result
    }

    /// Apply one event on behalf of a connection.
    ///
    /// Broadcasts with no recipients are left out of the result.
    pub fn dispatch(&self, conn_id: &str, event: InboundEvent) -> Result<Vec<Broadcast>, AppError> {
        let broadcasts = match event {
            InboundEvent::JoinRoom(request) => {
                self.rooms.join(&request.room_id, conn_id);
                Vec::new()
            }
            InboundEvent::LeaveRoom(request) => {
                self.rooms.leave(&request.room_id, conn_id);
                Vec::new()
            }
            InboundEvent::LeaveRooms => {
                self.rooms.leave_all(conn_id);
                Vec::new()
            }
            InboundEvent::UpdateOrderStatus { update, raw } => {
                self.update_order_status(&update, &raw)?
            }
            InboundEvent::NewMessage(request) => self.new_message(request)?,
            InboundEvent::GetOrderConversation(query) => {
                vec![self.order_conversation(conn_id, &query)?]
            }
            InboundEvent::GetStoreConversations(query) => {
                vec![self.store_conversations(conn_id, &query)?]
            }
            InboundEvent::Ping => vec![Broadcast::unicast(
                conn_id,
                events::PONG,
                &serde_json::Value::Null,
            )?],
        };

        Ok(broadcasts.into_iter().filter(|b| !b.is_empty()).collect())
    }

    /// Connection closed: drop it from every room it joined.
    pub fn disconnect(&self, conn_id: &str) -> Vec<RoomId> {
        self.rooms.remove_connection(conn_id)
    }

    fn update_order_status(
        &self,
        update: &OrderStatusUpdate,
        raw: &serde_json::Value,
    ) -> Result<Vec<Broadcast>, AppError> {
        let recipients = self
            .rooms
            .recipients([update.store_id.as_str(), update.order_no.as_str()]);

        tracing::info!(
            store_id = %update.store_id,
            order_no = %update.order_no,
            status = %update.body.status,
            recipients = recipients.len(),
            "Order status update"
        );

        Ok(vec![Broadcast::new(
            recipients,
            events::UPDATE_ORDER_STATUS,
            raw,
        )?])
    }

    fn new_message(&self, request: NewMessageRequest) -> Result<Vec<Broadcast>, AppError> {
        let (store_id, order_no, message) = request.into_message();
        let stored = self.conversations.append(&store_id, &order_no, message);
        let recipients = self
            .rooms
            .recipients([store_id.as_str(), order_no.as_str()]);

        tracing::info!(
            store_id = %store_id,
            order_no = %order_no,
            message_id = %stored.id,
            sender_type = %stored.sender.sender_type,
            recipients = recipients.len(),
            "New message"
        );

        Ok(vec![Broadcast::new(recipients, events::NEW_MESSAGE, &stored)?])
    }

    fn order_conversation(
        &self,
        conn_id: &str,
        query: &OrderConversationQuery,
    ) -> Result<Broadcast, AppError> {
        let messages = self
            .conversations
            .conversation(&query.store_id, &query.order_no);
        Broadcast::unicast(conn_id, events::GET_ORDER_CONVERSATION, &messages)
    }

    fn store_conversations(
        &self,
        conn_id: &str,
        query: &StoreConversationsQuery,
    ) -> Result<Broadcast, AppError> {
        let conversations = self.conversations.conversations_of(&query.store_id);
        Broadcast::unicast(conn_id, events::GET_STORE_CONVERSATIONS, &conversations)
    }
}

/// Keep metric label cardinality bounded: unknown names share one label.
fn metric_label(event: &str) -> &str {
    match event {
        events::JOIN_ROOM
        | events::LEAVE_ROOM
        | events::LEAVE_ROOMS
        | events::UPDATE_ORDER_STATUS
        | events::NEW_MESSAGE
        | events::GET_ORDER_CONVERSATION
        | events::GET_STORE_CONVERSATIONS
        | events::PING => event,
        _ => "unknown",
    }
}
