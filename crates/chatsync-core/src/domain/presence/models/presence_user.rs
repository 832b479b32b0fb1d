// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use serde::{Deserialize, Serialize};

use crate::domain::shared::models::{SessionId, UserProfile};

/// A session that is currently online. Being part of the online set is the state itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OnlineUser {
    pub name: String,
    pub session_id: SessionId,
}

/// A session that is currently typing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingUser {
    pub name: String,
    pub session_id: SessionId,
}

impl OnlineUser {
    pub fn new(name: impl Into<String>, session_id: impl Into<SessionId>) -> Self {
        Self {
            name: name.into(),
            session_id: session_id.into(),
        }
    }
}

impl TypingUser {
    pub fn new(name: impl Into<String>, session_id: impl Into<SessionId>) -> Self {
        Self {
            name: name.into(),
            session_id: session_id.into(),
        }
    }
}

impl From<&UserProfile> for OnlineUser {
    fn from(user: &UserProfile) -> Self {
        OnlineUser::new(user.name.clone(), user.session_id.clone())
    }
}

impl From<&UserProfile> for TypingUser {
    fn from(user: &UserProfile) -> Self {
        TypingUser::new(user.name.clone(), user.session_id.clone())
    }
}

impl From<TypingUser> for OnlineUser {
    fn from(user: TypingUser) -> Self {
        OnlineUser {
            name: user.name,
            session_id: user.session_id,
        }
    }
}
