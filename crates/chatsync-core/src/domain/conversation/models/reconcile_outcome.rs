// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use crate::domain::messaging::models::MessageId;

/// The result of applying an update to the conversation view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileOutcome {
    Applied,
    Ignored(ConflictIgnored),
}

/// Why an update didn't change the view. None of these are errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConflictIgnored {
    /// The update targets a message that isn't in the view.
    UnknownMessage(MessageId),
    /// The update carried nothing new.
    Unchanged,
    /// The update confirms an optimistic change that was already applied.
    AlreadyApplied,
}

impl ReconcileOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, ReconcileOutcome::Applied)
    }
}
