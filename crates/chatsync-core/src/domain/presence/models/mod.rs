// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use presence_snapshot::PresenceSnapshot;
pub use presence_user::{OnlineUser, TypingUser};
pub use typing_emission::TypingEmission;

mod presence_snapshot;
mod presence_user;
mod typing_emission;
