// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::messaging::models::{Emoji, MessageId, OutboundMessage};
use crate::domain::shared::models::UserProfile;
use crate::domain::transport::models::{
    ImageFile, TransportCapabilities, TransportError, TransportEvent,
};

/// Receives the change notifications of a transport.
///
/// Events must be pushed in the order in which the backend produced them.
#[cfg_attr(any(test, feature = "test"), mockall::automock)]
pub trait TransportEventSink: Send + Sync {
    fn push(&self, event: TransportEvent);
}

/// The capabilities the engine expects from a real-time backend.
#[async_trait]
#[cfg_attr(any(test, feature = "test"), mockall::automock)]
pub trait ChatTransport: Send + Sync {
    /// Optional operations supported by the transport. Read once when the engine is built.
    fn capabilities(&self) -> TransportCapabilities;

    /// Registers the sink that receives messages, online users and typing users.
    /// Called once per session.
    fn init(&self, sink: Arc<dyn TransportEventSink>);

    async fn send_message(&self, message: OutboundMessage) -> Result<(), TransportError>;

    async fn delete_message(&self, message_id: &MessageId) -> Result<(), TransportError>;

    async fn add_reaction(&self, message_id: &MessageId, emoji: &Emoji)
        -> Result<(), TransportError>;

    /// Uploads the file and returns the URL under which it can be downloaded.
    async fn upload_image(&self, file: ImageFile) -> Result<String, TransportError>;

    fn set_typing_status(&self, user: &UserProfile, is_typing: bool);

    /// Registers the local session as online.
    fn setup_presence(&self, user: &UserProfile);

    /// Releases all subscriptions and timers. Must be idempotent.
    fn cleanup(&self);
}
