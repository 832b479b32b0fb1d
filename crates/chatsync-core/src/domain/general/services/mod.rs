// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use id_provider::IDProvider;
pub use time_provider::TimeProvider;

mod id_provider;
mod time_provider;
