// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use app_context::{AppContext, ChatConfig};
pub use app_dependencies::*;

mod app_context;
mod app_dependencies;
