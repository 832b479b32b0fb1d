// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use chatsync_utils::id_string;

use crate::domain::shared::models::SessionId;

use super::{classify_content, MessageContent, MessageId};

id_string!(Emoji);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    pub name: String,
    #[serde(default)]
    pub pic: String,
}

/// Denormalized snapshot of the message that was replied to, taken at reply time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplyTo {
    pub id: MessageId,
    pub text: String,
    /// Display name of the sender of the original message.
    pub sender: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub timestamp: DateTime<Utc>,
    pub sender: Sender,
    pub session_id: SessionId,
    /// Emojis in the order they were added. The same emoji may appear multiple times.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reactions: Vec<Emoji>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<ReplyTo>,
}

impl Message {
    pub fn is_sent_by(&self, session_id: &SessionId) -> bool {
        &self.session_id == session_id
    }

    pub fn content(&self) -> MessageContent {
        classify_content(&self.text)
    }

    /// Builds the snapshot that is stored in a reply to this message.
    pub fn reply_snapshot(&self) -> ReplyTo {
        ReplyTo {
            id: self.id.clone(),
            text: self.text.clone(),
            sender: self.sender.name.clone(),
        }
    }
}

/// A message as it is handed to the transport, i.e. without `id` and `timestamp` which are
/// assigned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutboundMessage {
    pub text: String,
    pub sender: Sender,
    pub session_id: SessionId,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub reactions: Vec<Emoji>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<ReplyTo>,
}

impl OutboundMessage {
    pub fn into_message(self, id: MessageId, timestamp: DateTime<Utc>) -> Message {
        Message {
            id,
            text: self.text,
            timestamp,
            sender: self.sender,
            session_id: self.session_id,
            reactions: self.reactions,
            reply_to: self.reply_to,
        }
    }
}

impl From<&Message> for OutboundMessage {
    fn from(message: &Message) -> Self {
        OutboundMessage {
            text: message.text.clone(),
            sender: message.sender.clone(),
            session_id: message.session_id.clone(),
            reactions: message.reactions.clone(),
            reply_to: message.reply_to.clone(),
        }
    }
}
