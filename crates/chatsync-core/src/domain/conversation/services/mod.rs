// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use conversation_store::{ConversationStore, StateChange, StateListener, Subscription};
pub use reconciler::{PendingHandle, Reconciler};

mod conversation_store;
mod reconciler;
