// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use conversation_view::ConversationView;
pub use reconcile_outcome::{ConflictIgnored, ReconcileOutcome};

mod conversation_view;
mod reconcile_outcome;
