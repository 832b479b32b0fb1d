// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use tracing::{debug, info, warn};

use crate::app::deps::{
    AppDependencies, DynAppContext, DynChatTransport, DynPresenceCoordinator, DynReconciler,
    DynTimeProvider,
};
use crate::domain::conversation::services::PendingHandle;
use crate::domain::messaging::models::{Emoji, MessageId, OutboundMessage, ReplyTo};
use crate::domain::shared::models::{ChatError, ValidationError};
use crate::domain::transport::models::ImageFile;

/// Turns user intents into optimistic changes and transport writes.
///
/// Validation and upload failures are returned to the caller. A failed write is reflected in
/// the conversation view instead, either as a failed message or by rolling back the change.
pub struct ConversationService {
    ctx: DynAppContext,
    presence: DynPresenceCoordinator,
    reconciler: DynReconciler,
    time_provider: DynTimeProvider,
    transport: DynChatTransport,
}

impl From<&AppDependencies> for ConversationService {
    fn from(deps: &AppDependencies) -> Self {
        Self {
            ctx: deps.ctx.clone(),
            presence: deps.presence.clone(),
            reconciler: deps.reconciler.clone(),
            time_provider: deps.time_provider.clone(),
            transport: deps.transport.clone(),
        }
    }
}

impl ConversationService {
    /// Sends `text` and returns the temporary id of the optimistic message.
    pub async fn send_text(&self, text: impl Into<String>) -> Result<MessageId, ChatError> {
        let text = text.into();
        Self::validate_text(&text)?;
        Ok(self.send(self.outbound_message(text, None)).await)
    }

    /// Sends `text` as a reply to the message with `target_id`.
    pub async fn send_reply(
        &self,
        text: impl Into<String>,
        target_id: &MessageId,
    ) -> Result<MessageId, ChatError> {
        let text = text.into();
        Self::validate_text(&text)?;

        let reply_to = self.reply_snapshot(target_id)?;
        Ok(self.send(self.outbound_message(text, Some(reply_to))).await)
    }

    /// Uploads `file` and sends its URL as a message.
    pub async fn send_image(&self, file: ImageFile) -> Result<MessageId, ChatError> {
        if !file.is_image() {
            return Err(ValidationError::NotAnImage {
                file_name: file.file_name.clone(),
                media_type: file.media_type().to_string(),
            }
            .into());
        }

        let max_upload_size = self.ctx.config.max_upload_size;
        if file.size() > max_upload_size {
            return Err(ValidationError::FileTooLarge {
                size: file.size(),
                max: max_upload_size,
            }
            .into());
        }

        info!("Uploading image '{}'…", file.file_name);
        let url = self
            .transport
            .upload_image(file)
            .await
            .map_err(ChatError::Upload)?;

        Ok(self.send(self.outbound_message(url, None)).await)
    }

    /// Sends a message that failed to send once more.
    pub async fn retry_send(&self, id: &MessageId) -> Result<(), ChatError> {
        let Some((handle, message)) = self.reconciler.retry(id) else {
            return Err(ValidationError::NotRetryable(id.clone()).into());
        };
        self.write_message(&handle, message).await;
        Ok(())
    }

    /// Deletes a message of the local session.
    ///
    /// The message disappears immediately and reappears if the transport rejects the deletion.
    pub async fn delete_message(&self, id: &MessageId) -> Result<(), ChatError> {
        if !self.ctx.capabilities.delete_message {
            debug!("Transport does not support deleting messages. Ignoring request.");
            return Ok(());
        }

        let state = self.reconciler.store().get_state();
        let Some(entry) = state.message(id) else {
            return Err(ValidationError::UnknownMessage(id.clone()).into());
        };

        if !entry.is_sent_by(&self.ctx.user.session_id) {
            return Err(ValidationError::NotMessageOwner(id.clone()).into());
        }

        if entry.is_optimistic() {
            if !entry.is_failed() {
                return Err(ValidationError::MessageNotSynced(id.clone()).into());
            }
            // The backend never saw this message.
            self.reconciler.take(id);
            return Ok(());
        }

        let Some(removed) = self.reconciler.take(id) else {
            return Ok(());
        };

        if let Err(err) = self.transport.delete_message(id).await {
            warn!("Failed to delete message {id}. Restoring it. {err}");
            self.reconciler.restore(removed);
        }

        Ok(())
    }

    /// Appends `emoji` to the reactions of the message with `id`. A failed write is not
    /// rolled back.
    pub async fn add_reaction(&self, id: &MessageId, emoji: Emoji) -> Result<(), ChatError> {
        if emoji.as_ref().trim().is_empty() {
            return Err(ValidationError::EmptyEmoji.into());
        }

        if !self.ctx.capabilities.add_reaction {
            debug!("Transport does not support reactions. Ignoring request.");
            return Ok(());
        }

        {
            let state = self.reconciler.store().get_state();
            let Some(entry) = state.message(id) else {
                return Err(ValidationError::UnknownMessage(id.clone()).into());
            };
            if entry.is_optimistic() {
                return Err(ValidationError::MessageNotSynced(id.clone()).into());
            }
        }

        self.reconciler.apply_optimistic_reaction(id, &emoji);

        if let Err(err) = self.transport.add_reaction(id, &emoji).await {
            warn!("Failed to add reaction to message {id}. {err}");
        }

        Ok(())
    }

    /// Reports a keypress (`true`) or a cleared input (`false`). Keypresses are debounced.
    pub fn set_typing(&self, is_typing: bool) {
        let Some(emission) = self
            .presence
            .set_local_typing(is_typing, self.time_provider.now())
        else {
            return;
        };
        self.transport
            .set_typing_status(&self.ctx.user, emission.is_typing());
    }
}

impl ConversationService {
    async fn send(&self, message: OutboundMessage) -> MessageId {
        // Sending a message ends the current typing burst.
        self.set_typing(false);

        let handle = self.reconciler.apply_optimistic(message.clone());
        self.write_message(&handle, message).await;
        handle.id().clone()
    }

    async fn write_message(&self, handle: &PendingHandle, message: OutboundMessage) {
        match self.transport.send_message(message).await {
            Ok(()) => {
                self.reconciler.mark_sent(handle);
            }
            Err(err) => {
                warn!("Failed to send message {}. {err}", handle.id());
                self.reconciler.mark_failed(handle);
            }
        }
    }

    fn outbound_message(&self, text: String, reply_to: Option<ReplyTo>) -> OutboundMessage {
        OutboundMessage {
            text,
            sender: self.ctx.user.sender(),
            session_id: self.ctx.user.session_id.clone(),
            reactions: vec![],
            reply_to,
        }
    }

    fn reply_snapshot(&self, target_id: &MessageId) -> Result<ReplyTo, ValidationError> {
        self.reconciler
            .store()
            .get_state()
            .message(target_id)
            .map(|entry| entry.reply_snapshot())
            .ok_or_else(|| ValidationError::UnknownReplyTarget(target_id.clone()))
    }

    fn validate_text(text: &str) -> Result<(), ValidationError> {
        if text.trim().is_empty() {
            return Err(ValidationError::EmptyMessage);
        }
        Ok(())
    }
}
