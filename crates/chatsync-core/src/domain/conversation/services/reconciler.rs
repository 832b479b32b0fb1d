// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::collections::HashSet;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::domain::conversation::models::{ConflictIgnored, ConversationView, ReconcileOutcome};
use crate::domain::general::services::TimeProvider;
use crate::domain::messaging::models::{
    DeliveryState, Emoji, Message, MessageId, OutboundMessage, ViewMessage,
};
use crate::domain::messaging::services::MessageIdProvider;
use crate::domain::presence::models::PresenceSnapshot;
use crate::domain::shared::models::SessionId;
use crate::ClientEvent;

use super::ConversationStore;

/// Refers to an optimistically applied message until its write was resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingHandle {
    id: MessageId,
}

impl PendingHandle {
    pub fn id(&self) -> &MessageId {
        &self.id
    }
}

/// The single writer of the conversation view.
///
/// Merges locally originated changes with changes pushed by the transport. None of the
/// operations fail. Updates that reference unknown messages are logged and ignored.
pub struct Reconciler {
    store: ConversationStore,
    time_provider: Arc<dyn TimeProvider>,
    message_id_provider: Arc<dyn MessageIdProvider>,
    local_session: SessionId,
    /// Reactions of the local session that were applied but not echoed yet.
    pending_reactions: Mutex<Vec<(MessageId, Emoji)>>,
}

impl Reconciler {
    pub fn new(
        store: ConversationStore,
        time_provider: Arc<dyn TimeProvider>,
        message_id_provider: Arc<dyn MessageIdProvider>,
        local_session: SessionId,
    ) -> Self {
        Self {
            store,
            time_provider,
            message_id_provider,
            local_session,
            pending_reactions: Default::default(),
        }
    }

    pub fn store(&self) -> &ConversationStore {
        &self.store
    }
}

impl Reconciler {
    /// Inserts `message` with a temporary id and the current local time.
    pub fn apply_optimistic(&self, message: OutboundMessage) -> PendingHandle {
        let id = self.message_id_provider.new_id();
        let message = message.into_message(id.clone(), self.time_provider.now());

        self.store.commit(|view, events| {
            view.insert(ViewMessage::pending(message));
            events.push(ClientEvent::MessagesAppended {
                message_ids: vec![id.clone()],
            });
        });

        PendingHandle { id }
    }

    pub fn mark_sent(&self, handle: &PendingHandle) -> ReconcileOutcome {
        self.set_delivery(&handle.id, DeliveryState::Pending, DeliveryState::Sent)
    }

    pub fn mark_failed(&self, handle: &PendingHandle) -> ReconcileOutcome {
        self.set_delivery(&handle.id, DeliveryState::Pending, DeliveryState::Failed)
    }

    /// Moves a failed optimistic message back to `Pending` and returns what needs to be sent
    /// again. Returns `None` if `id` doesn't refer to a failed optimistic message.
    pub fn retry(&self, id: &MessageId) -> Option<(PendingHandle, OutboundMessage)> {
        self.store.commit(|view, events| {
            let entry = view.message_mut(id)?;
            if !entry.is_optimistic() || !entry.is_failed() {
                return None;
            }
            entry.delivery = DeliveryState::Pending;
            let outbound = OutboundMessage::from(&entry.message);
            events.push(ClientEvent::MessagesUpdated {
                message_ids: vec![id.clone()],
            });
            Some((PendingHandle { id: id.clone() }, outbound))
        })
    }

    /// Merges a partial list of authoritative messages into the view.
    pub fn apply_remote(&self, messages: Vec<Message>) -> ReconcileOutcome {
        self.store.commit(|view, events| {
            self.merge(view, events, messages);
            Self::outcome(events)
        })
    }

    /// Merges the complete list of authoritative messages into the view. Delivered messages
    /// that are missing from `messages` are removed. Optimistic messages are kept.
    pub fn apply_remote_full(&self, messages: Vec<Message>) -> ReconcileOutcome {
        self.store.commit(|view, events| {
            let known_ids = messages
                .iter()
                .map(|message| message.id.clone())
                .collect::<HashSet<_>>();

            self.merge(view, events, messages);

            let removed_ids =
                view.retain(|entry| entry.is_optimistic() || known_ids.contains(&entry.message.id));
            if !removed_ids.is_empty() {
                debug!("Pruning {} message(s) missing from snapshot.", removed_ids.len());
                events.push(ClientEvent::MessagesDeleted {
                    message_ids: removed_ids,
                });
            }

            Self::outcome(events)
        })
    }

    pub fn apply_delete(&self, id: &MessageId) -> ReconcileOutcome {
        self.store.commit(|view, events| {
            if view.remove(id).is_none() {
                info!("Ignoring deletion of unknown message {id}.");
                return ReconcileOutcome::Ignored(ConflictIgnored::UnknownMessage(id.clone()));
            }
            events.push(ClientEvent::MessagesDeleted {
                message_ids: vec![id.clone()],
            });
            ReconcileOutcome::Applied
        })
    }

    /// Appends `emoji` to the reactions of the message with `id`.
    pub fn apply_reaction(&self, id: &MessageId, emoji: &Emoji) -> ReconcileOutcome {
        self.store
            .commit(|view, events| Self::append_reaction(view, events, id, emoji))
    }

    /// Appends a reaction of the local session and remembers it so that its echo isn't
    /// applied a second time.
    pub fn apply_optimistic_reaction(&self, id: &MessageId, emoji: &Emoji) -> ReconcileOutcome {
        self.store.commit(|view, events| {
            let outcome = Self::append_reaction(view, events, id, emoji);
            if outcome.is_applied() {
                self.pending_reactions
                    .lock()
                    .push((id.clone(), emoji.clone()));
            }
            outcome
        })
    }

    /// Applies a reaction pushed by the transport.
    pub fn apply_remote_reaction(
        &self,
        id: &MessageId,
        emoji: &Emoji,
        from: &SessionId,
    ) -> ReconcileOutcome {
        self.store.commit(|view, events| {
            if from == &self.local_session {
                let mut pending_reactions = self.pending_reactions.lock();
                if let Some(idx) = pending_reactions
                    .iter()
                    .position(|(pending_id, pending_emoji)| {
                        pending_id == id && pending_emoji == emoji
                    })
                {
                    pending_reactions.remove(idx);
                    return ReconcileOutcome::Ignored(ConflictIgnored::AlreadyApplied);
                }
            }
            Self::append_reaction(view, events, id, emoji)
        })
    }

    /// Removes the message with `id` and returns it so that it can be restored later.
    pub fn take(&self, id: &MessageId) -> Option<ViewMessage> {
        self.store.commit(|view, events| {
            let entry = view.remove(id)?;
            events.push(ClientEvent::MessagesDeleted {
                message_ids: vec![id.clone()],
            });
            Some(entry)
        })
    }

    /// Re-inserts a message that was removed via `take`.
    pub fn restore(&self, entry: ViewMessage) -> ReconcileOutcome {
        self.store.commit(|view, events| {
            if view.position(&entry.message.id).is_some() {
                return ReconcileOutcome::Ignored(ConflictIgnored::AlreadyApplied);
            }
            events.push(ClientEvent::MessagesAppended {
                message_ids: vec![entry.message.id.clone()],
            });
            view.insert(entry);
            ReconcileOutcome::Applied
        })
    }

    pub fn apply_presence(&self, snapshot: PresenceSnapshot) -> ReconcileOutcome {
        self.apply_presence_with(|| snapshot)
    }

    /// Like `apply_presence`, but computes the snapshot while holding the commit lock so that
    /// concurrent presence updates are committed in the order they were computed.
    pub fn apply_presence_with(
        &self,
        snapshot: impl FnOnce() -> PresenceSnapshot,
    ) -> ReconcileOutcome {
        self.store.commit(|view, events| {
            let snapshot = snapshot();
            if view.set_online_users(snapshot.online) {
                events.push(ClientEvent::OnlineUsersChanged);
            }
            if view.set_typing_users(snapshot.typing) {
                events.push(ClientEvent::TypingUsersChanged);
            }
            Self::outcome(events)
        })
    }
}

impl Reconciler {
    fn merge(
        &self,
        view: &mut ConversationView,
        events: &mut Vec<ClientEvent>,
        messages: Vec<Message>,
    ) {
        let mut appended_ids = vec![];
        let mut updated_ids = vec![];
        let mut refreshed_ids = vec![];

        for message in messages {
            if message.id.is_local() {
                warn!("Ignoring remote message with reserved id {}.", message.id);
                continue;
            }

            refreshed_ids.push(message.id.clone());

            if let Some(idx) = view.position(&message.id) {
                if view.messages()[idx].message == message {
                    continue;
                }
                updated_ids.push(message.id.clone());
                view.replace_at(idx, ViewMessage::delivered(message));
                continue;
            }

            if let Some(idx) = view.position_of_optimistic_match(&message) {
                let local_id = view.messages()[idx].message.id.clone();
                debug!("Confirming optimistic message {local_id} as {}.", message.id);
                events.push(ClientEvent::PendingMessageConfirmed {
                    local_id,
                    message_id: message.id.clone(),
                });
                view.replace_at(idx, ViewMessage::delivered(message));
                continue;
            }

            appended_ids.push(message.id.clone());
            view.insert(ViewMessage::delivered(message));
        }

        // The authoritative reactions replace whatever was applied optimistically.
        self.pending_reactions
            .lock()
            .retain(|(id, _)| !refreshed_ids.contains(id));

        if !appended_ids.is_empty() {
            events.push(ClientEvent::MessagesAppended {
                message_ids: appended_ids,
            });
        }
        if !updated_ids.is_empty() {
            events.push(ClientEvent::MessagesUpdated {
                message_ids: updated_ids,
            });
        }
    }

    fn set_delivery(
        &self,
        id: &MessageId,
        from: DeliveryState,
        to: DeliveryState,
    ) -> ReconcileOutcome {
        self.store.commit(|view, events| {
            let Some(entry) = view.message_mut(id) else {
                // The echo arrived before the write resolved.
                debug!("Optimistic message {id} was already confirmed.");
                return ReconcileOutcome::Ignored(ConflictIgnored::AlreadyApplied);
            };
            if entry.delivery != from {
                return ReconcileOutcome::Ignored(ConflictIgnored::Unchanged);
            }
            entry.delivery = to;
            events.push(ClientEvent::MessagesUpdated {
                message_ids: vec![id.clone()],
            });
            ReconcileOutcome::Applied
        })
    }

    fn append_reaction(
        view: &mut ConversationView,
        events: &mut Vec<ClientEvent>,
        id: &MessageId,
        emoji: &Emoji,
    ) -> ReconcileOutcome {
        let Some(entry) = view.message_mut(id) else {
            info!("Ignoring reaction to unknown message {id}.");
            return ReconcileOutcome::Ignored(ConflictIgnored::UnknownMessage(id.clone()));
        };
        entry.message.reactions.push(emoji.clone());
        events.push(ClientEvent::MessagesUpdated {
            message_ids: vec![id.clone()],
        });
        ReconcileOutcome::Applied
    }

    fn outcome(events: &[ClientEvent]) -> ReconcileOutcome {
        if events.is_empty() {
            ReconcileOutcome::Ignored(ConflictIgnored::Unchanged)
        } else {
            ReconcileOutcome::Applied
        }
    }
}
