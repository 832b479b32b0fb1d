// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use chat_error::{ChatError, ValidationError};
pub use session_id::SessionId;
pub use user_profile::UserProfile;

mod chat_error;
mod session_id;
mod user_profile;
