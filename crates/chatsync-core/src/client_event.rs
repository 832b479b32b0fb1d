// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use crate::domain::messaging::models::MessageId;

#[derive(Debug, Clone, PartialEq)]
pub enum ClientEvent {
    /// One or many messages were either received or sent.
    MessagesAppended { message_ids: Vec<MessageId> },

    /// One or many messages changed in place (e.g. a reaction or a delivery state).
    MessagesUpdated { message_ids: Vec<MessageId> },

    /// One or many messages were removed from the view.
    MessagesDeleted { message_ids: Vec<MessageId> },

    /// An optimistic message was replaced by its authoritative copy.
    PendingMessageConfirmed {
        local_id: MessageId,
        message_id: MessageId,
    },

    /// The set of online users has changed.
    OnlineUsersChanged,

    /// A user started or stopped typing.
    TypingUsersChanged,
}
