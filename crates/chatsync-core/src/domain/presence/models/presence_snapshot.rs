// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use super::{OnlineUser, TypingUser};

/// The online and typing sets as they should be shown to the user, ordered by session id.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresenceSnapshot {
    pub online: Vec<OnlineUser>,
    pub typing: Vec<TypingUser>,
}
