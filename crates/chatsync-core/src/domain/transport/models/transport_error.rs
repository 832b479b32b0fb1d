// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    /// The write was rejected or timed out.
    #[error("Network error: {0}")]
    Network(String),
    #[error("Upload failed: {0}")]
    Upload(String),
    #[error("The transport does not support this operation.")]
    Unsupported,
}
