// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use crate::domain::messaging::models::{Emoji, Message, MessageId};
use crate::domain::presence::models::{OnlineUser, TypingUser};
use crate::domain::shared::models::SessionId;

/// A change notification pushed by the transport.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    /// The complete list of messages of the conversation.
    Messages(Vec<Message>),
    /// Messages that were added or changed since the last notification.
    MessagesChanged(Vec<Message>),
    MessageDeleted(MessageId),
    ReactionAdded {
        message_id: MessageId,
        emoji: Emoji,
        from: SessionId,
    },
    /// The complete list of online users.
    OnlineUsers(Vec<OnlineUser>),
    /// A single session signalling that it is still online.
    Heartbeat(OnlineUser),
    /// The complete list of typing users.
    TypingUsers(Vec<TypingUser>),
    Typing { user: TypingUser, is_typing: bool },
}
