// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::ops::Deref;

use chrono::{DateTime, Utc};

use super::{Message, MessageId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryState {
    /// The message was applied optimistically, the write is still in flight.
    Pending,
    /// The transport accepted the write but the message wasn't echoed back yet.
    Sent,
    /// The write failed. The message stays in the view so that it can be retried.
    Failed,
    /// The message is known to the backend.
    Delivered,
}

/// An entry of the conversation view.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewMessage {
    pub message: Message,
    pub delivery: DeliveryState,
}

impl ViewMessage {
    pub fn delivered(message: Message) -> Self {
        Self {
            message,
            delivery: DeliveryState::Delivered,
        }
    }

    pub fn pending(message: Message) -> Self {
        Self {
            message,
            delivery: DeliveryState::Pending,
        }
    }

    /// Returns true for messages that only exist locally and haven't been replaced by their
    /// authoritative copy yet.
    pub fn is_optimistic(&self) -> bool {
        self.message.id.is_local()
    }

    pub fn is_failed(&self) -> bool {
        self.delivery == DeliveryState::Failed
    }

    pub(crate) fn sort_key(&self) -> (&DateTime<Utc>, &MessageId) {
        (&self.message.timestamp, &self.message.id)
    }
}

impl Deref for ViewMessage {
    type Target = Message;

    fn deref(&self) -> &Self::Target {
        &self.message
    }
}
