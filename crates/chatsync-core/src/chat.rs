// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::ops::Deref;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::app::deps::{
    DynAppContext, DynChatTransport, DynPresenceCoordinator, DynReconciler, DynTimeProvider,
};
use crate::app::services::ConversationService;
use crate::chat_builder::{ChatBuilder, UndefinedTransport, UndefinedUser};
use crate::domain::conversation::models::ConversationView;
use crate::domain::conversation::services::{
    ConversationStore, StateListener, Subscription,
};
use crate::domain::shared::models::UserProfile;

/// A chat session.
///
/// Owns the conversation store, the reconciler, the presence coordinator and the outbound
/// pipeline (`conversation`). Dropping the last clone releases the transport subscription.
#[derive(Clone)]
pub struct Chat {
    inner: Arc<ChatInner>,
}

pub struct ChatInner {
    pub conversation: ConversationService,
    pub(crate) ctx: DynAppContext,
    pub(crate) presence: DynPresenceCoordinator,
    pub(crate) reconciler: DynReconciler,
    pub(crate) store: ConversationStore,
    pub(crate) time_provider: DynTimeProvider,
    pub(crate) transport: DynChatTransport,
    pub(crate) is_shut_down: AtomicBool,
}

impl Chat {
    pub fn builder() -> ChatBuilder<UndefinedTransport, UndefinedUser> {
        ChatBuilder::new()
    }
}

impl From<Arc<ChatInner>> for Chat {
    fn from(inner: Arc<ChatInner>) -> Self {
        Chat { inner }
    }
}

impl Deref for Chat {
    type Target = ChatInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Chat {
    /// The current conversation view.
    pub fn state(&self) -> Arc<ConversationView> {
        self.store.get_state()
    }

    /// Registers `listener` for every committed change of the conversation view.
    pub fn subscribe(&self, listener: impl StateListener + 'static) -> Subscription {
        self.store.subscribe(listener)
    }

    pub fn user(&self) -> &UserProfile {
        &self.ctx.user
    }

    /// Expires stale presence and typing states and stops the local typing state after the
    /// idle timeout.
    pub fn tick(&self) {
        self.inner.tick()
    }

    /// Spawns a task that calls `tick` in the configured interval until the chat is shut down
    /// or dropped. Must be called from within a Tokio runtime.
    pub fn run_timers(&self) -> JoinHandle<()> {
        let inner = Arc::downgrade(&self.inner);
        let period = self.ctx.config.presence_tick_interval();
        tokio::spawn(run_timers(inner, period))
    }

    /// Releases the transport subscription. Calling this more than once has no effect.
    pub fn shutdown(&self) {
        self.inner.shutdown()
    }

    pub fn is_shut_down(&self) -> bool {
        self.is_shut_down.load(Ordering::SeqCst)
    }
}

impl ChatInner {
    fn tick(&self) {
        if self.is_shut_down.load(Ordering::SeqCst) {
            return;
        }

        let now = self.time_provider.now();
        let mut emission = None;

        self.reconciler.apply_presence_with(|| {
            let (snapshot, local_emission) = self.presence.tick(now);
            emission = local_emission;
            snapshot
        });

        if let Some(emission) = emission {
            debug!("Local user stopped typing.");
            self.transport
                .set_typing_status(&self.ctx.user, emission.is_typing());
        }
    }

    fn shutdown(&self) {
        if self.is_shut_down.swap(true, Ordering::SeqCst) {
            return;
        }
        info!("Shutting down chat session {}…", self.ctx.user.session_id);
        self.transport.cleanup();
    }
}

impl Drop for ChatInner {
    fn drop(&mut self) {
        self.shutdown()
    }
}

async fn run_timers(inner: Weak<ChatInner>, period: std::time::Duration) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        interval.tick().await;

        let Some(inner) = inner.upgrade() else {
            return;
        };
        if inner.is_shut_down.load(Ordering::SeqCst) {
            return;
        }
        inner.tick();
    }
}
