// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use crate::domain::messaging::models::MessageId;
use crate::domain::transport::models::TransportError;

/// Local input that was rejected before any transport call was made.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Message text must not be empty.")]
    EmptyMessage,
    #[error("Reaction must not be empty.")]
    EmptyEmoji,
    #[error("Unknown message '{0}'.")]
    UnknownMessage(MessageId),
    #[error("Cannot reply to unknown message '{0}'.")]
    UnknownReplyTarget(MessageId),
    #[error("Message '{0}' was not sent from this session.")]
    NotMessageOwner(MessageId),
    #[error("Message '{0}' has not been confirmed by the server yet.")]
    MessageNotSynced(MessageId),
    #[error("Message '{0}' did not fail to send and cannot be retried.")]
    NotRetryable(MessageId),
    #[error("File '{file_name}' is not an image ({media_type}).")]
    NotAnImage {
        file_name: String,
        media_type: String,
    },
    #[error("File exceeds maximum upload size of {max} bytes ({size} bytes).")]
    FileTooLarge { size: u64, max: u64 },
}

/// Errors surfaced to the caller of a user intent.
///
/// Failed message writes are not part of this enum. They show up as a failed marker on the
/// affected message (or as a rollback for deletions) in the conversation view.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ChatError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Image upload failed: {0}")]
    Upload(TransportError),
}

impl ChatError {
    pub fn is_validation_err(&self) -> bool {
        matches!(self, Self::Validation(_))
    }
}
