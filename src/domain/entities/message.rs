//! Chat message entity.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Which side of the order a message came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SenderType {
    /// Operations-management agent
    #[serde(rename = "OM")]
    Om,
    /// Customer-facing progressive web app
    #[serde(rename = "PWA")]
    Pwa,
}

impl SenderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Om => "OM",
            Self::Pwa => "PWA",
        }
    }
}

impl std::fmt::Display for SenderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Author of a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct Sender {
    #[serde(rename = "type")]
    pub sender_type: SenderType,

    #[validate(length(min = 1, max = 100, message = "Sender name must be 1-100 characters"))]
    pub name: String,
}

impl Sender {
    pub fn new(sender_type: SenderType, name: impl Into<String>) -> Self {
        Self {
            sender_type,
            name: name.into(),
        }
    }
}

/// A message that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewMessage {
    pub body: String,
    pub sender: Sender,
}

impl NewMessage {
    pub fn new(body: impl Into<String>, sender: Sender) -> Self {
        Self {
            body: body.into(),
            sender,
        }
    }
}

/// A stored chat message. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Assigned by the conversation store at append time
    pub id: String,

    pub body: String,

    pub sender: Sender,
}

impl Message {
    /// Stamp a pending message with its id.
    pub fn from_new(id: String, new: NewMessage) -> Self {
        Self {
            id,
            body: new.body,
            sender: new.sender,
        }
    }
}
