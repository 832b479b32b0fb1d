// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use serde::{Deserialize, Serialize};

use crate::domain::messaging::models::Sender;

use super::SessionId;

/// The local user. Created once per session and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    /// URL of the avatar or an empty string.
    #[serde(default)]
    pub pic: String,
    pub session_id: SessionId,
}

impl UserProfile {
    pub fn new(name: impl Into<String>, pic: impl Into<String>, session_id: SessionId) -> Self {
        Self {
            name: name.into(),
            pic: pic.into(),
            session_id,
        }
    }

    pub fn is_self(&self, session_id: &SessionId) -> bool {
        &self.session_id == session_id
    }

    pub fn sender(&self) -> Sender {
        Sender {
            name: self.name.clone(),
            pic: self.pic.clone(),
        }
    }
}
