// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use anyhow::{ensure, Result};
use tracing::debug;

use crate::app::deps::{AppDependencies, DynReconciler};
use crate::app::event_handlers::TransportEventHandler;
use crate::domain::transport::models::TransportEvent;

/// Applies message, deletion and reaction events to the conversation view.
pub struct MessagesEventHandler {
    reconciler: DynReconciler,
}

impl From<&AppDependencies> for MessagesEventHandler {
    fn from(deps: &AppDependencies) -> Self {
        Self {
            reconciler: deps.reconciler.clone(),
        }
    }
}

impl TransportEventHandler for MessagesEventHandler {
    fn name(&self) -> &'static str {
        "messages"
    }

    fn handle_event(&self, event: TransportEvent) -> Result<Option<TransportEvent>> {
        match event {
            TransportEvent::Messages(messages) => {
                debug!("Received snapshot of {} message(s).", messages.len());
                self.reconciler.apply_remote_full(messages);
            }
            TransportEvent::MessagesChanged(messages) => {
                self.reconciler.apply_remote(messages);
            }
            TransportEvent::MessageDeleted(message_id) => {
                ensure!(!message_id.is_empty(), "Received deletion without message id.");
                self.reconciler.apply_delete(&message_id);
            }
            TransportEvent::ReactionAdded {
                message_id,
                emoji,
                from,
            } => {
                ensure!(!emoji.is_empty(), "Received empty reaction to {message_id}.");
                self.reconciler
                    .apply_remote_reaction(&message_id, &emoji, &from);
            }
            _ => return Ok(Some(event)),
        }
        Ok(None)
    }
}
