// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use presence_coordinator::{PresenceCoordinator, PresenceTimeouts};

mod presence_coordinator;
