// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use parking_lot::{Mutex, RwLock};
use tracing::trace;

use crate::domain::conversation::models::ConversationView;
use crate::ClientEvent;

/// A committed change of the conversation view.
#[derive(Debug, Clone)]
pub struct StateChange {
    /// Increments by one with every commit.
    pub revision: u64,
    /// The view after the change was applied.
    pub view: Arc<ConversationView>,
    pub events: Vec<ClientEvent>,
}

/// Receives every committed change of a `ConversationStore`.
pub trait StateListener: Send + Sync {
    fn handle_change(&self, change: &StateChange);
}

impl<F> StateListener for F
where
    F: Fn(&StateChange) + Send + Sync,
{
    fn handle_change(&self, change: &StateChange) {
        self(change)
    }
}

/// Holds the single authoritative conversation view.
///
/// Readers receive immutable snapshots via `get_state`, so a render never observes a view that
/// is halfway through a change. Writes are serialized and every listener is notified exactly
/// once per commit, in commit order.
#[derive(Clone, Default)]
pub struct ConversationStore {
    inner: Arc<StoreInner>,
}

#[derive(Default)]
struct StoreInner {
    state: RwLock<Arc<ConversationView>>,
    revision: AtomicU64,
    /// Held from mutation until the last listener returned, so notifications follow commit
    /// order.
    commit_lock: Mutex<()>,
    listeners: RwLock<Listeners>,
}

#[derive(Default)]
struct Listeners {
    next_id: u64,
    entries: Vec<(u64, Arc<dyn StateListener>)>,
}

/// Keeps a listener registered until it is dropped or `unsubscribe` is called.
#[must_use = "The listener is removed when the subscription is dropped"]
pub struct Subscription {
    store: Weak<StoreInner>,
    id: u64,
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current view. The snapshot is immutable and stays valid after subsequent
    /// changes.
    pub fn get_state(&self) -> Arc<ConversationView> {
        self.inner.state.read().clone()
    }

    pub fn revision(&self) -> u64 {
        self.inner.revision.load(Ordering::SeqCst)
    }

    pub fn subscribe(&self, listener: impl StateListener + 'static) -> Subscription {
        let mut listeners = self.inner.listeners.write();
        let id = listeners.next_id;
        listeners.next_id += 1;
        listeners.entries.push((id, Arc::new(listener)));

        Subscription {
            store: Arc::downgrade(&self.inner),
            id,
        }
    }

    /// Applies `mutation` to the view and notifies all listeners with the events it produced.
    ///
    /// Commits are serialized. When `mutation` doesn't record any event the change is
    /// considered a no-op, the revision stays the same and no listener is called.
    ///
    /// Listeners run synchronously after the write lock was released. They may read the state
    /// and the revision but must not commit to the same store from within `handle_change`.
    pub(crate) fn commit<T>(
        &self,
        mutation: impl FnOnce(&mut ConversationView, &mut Vec<ClientEvent>) -> T,
    ) -> T {
        let _commit = self.inner.commit_lock.lock();
        let mut events = vec![];

        let (result, view) = {
            let mut state = self.inner.state.write();
            let mut view = ConversationView::clone(&state);
            let result = mutation(&mut view, &mut events);

            if events.is_empty() {
                return result;
            }

            let view = Arc::new(view);
            *state = view.clone();
            (result, view)
        };

        let revision = self.inner.revision.fetch_add(1, Ordering::SeqCst) + 1;

        let change = StateChange {
            revision,
            view,
            events,
        };

        trace!(
            revision = change.revision,
            "Committing {} event(s)…",
            change.events.len()
        );

        let listeners = self
            .inner
            .listeners
            .read()
            .entries
            .iter()
            .map(|(_, listener)| listener.clone())
            .collect::<Vec<_>>();

        for listener in listeners {
            listener.handle_change(&change);
        }

        result
    }
}

impl Subscription {
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let Some(store) = self.store.upgrade() else {
            return;
        };
        store
            .listeners
            .write()
            .entries
            .retain(|(id, _)| *id != self.id);
    }
}
