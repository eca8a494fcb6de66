//! Message ID Assignment

use chrono::{SecondsFormat, Utc};

use crate::config::{ConversationSettings, MessageIdStrategy};
use crate::shared::snowflake::SnowflakeGenerator;

/// Mints the id stamped on each message when it is appended.
#[derive(Debug)]
pub enum MessageIdGenerator {
    /// Unique, increasing snowflake ids
    Snowflake(SnowflakeGenerator),
    /// ISO-8601 UTC instant with millisecond precision
    Timestamp,
}

impl MessageIdGenerator {
    pub fn from_settings(settings: &ConversationSettings) -> Self {
        match settings.message_id_strategy {
            MessageIdStrategy::Snowflake => {
                Self::Snowflake(SnowflakeGenerator::new(settings.machine_id as u64, 0))
            }
            MessageIdStrategy::Timestamp => Self::Timestamp,
        }
    }

    pub fn next_id(&self) -> String {
        match self {
            Self::Snowflake(generator) => generator.generate().to_string(),
            Self::Timestamp => Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }
}

impl Default for MessageIdGenerator {
    fn default() -> Self {
        Self::Snowflake(SnowflakeGenerator::new(1, 0))
    }
}
