// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use mime::Mime;

pub use crate::app::deps::ChatConfig;
pub use crate::domain::{
    conversation::{
        models::{ConflictIgnored, ConversationView, ReconcileOutcome},
        services::{StateChange, StateListener, Subscription},
    },
    messaging::models::{
        classify_content, DeliveryState, Emoji, Message, MessageContent, MessageId,
        OutboundMessage, ReplyTo, Sender, TextSegment, ViewMessage,
    },
    presence::models::{OnlineUser, TypingUser},
    shared::models::{ChatError, SessionId, UserProfile, ValidationError},
    transport::models::{ImageFile, TransportCapabilities, TransportError, TransportEvent},
};
