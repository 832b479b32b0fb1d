// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use message::{Emoji, Message, OutboundMessage, ReplyTo, Sender};
pub use message_content::{classify_content, MessageContent, TextSegment};
pub use message_id::MessageId;
pub use view_message::{DeliveryState, ViewMessage};

mod message;
mod message_content;
mod message_id;
mod view_message;
