// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use anyhow::Result;

use crate::app::deps::{AppDependencies, DynPresenceCoordinator, DynReconciler, DynTimeProvider};
use crate::app::event_handlers::TransportEventHandler;
use crate::domain::transport::models::TransportEvent;

/// Feeds heartbeats and typing notifications into the presence coordinator.
pub struct PresenceEventHandler {
    presence: DynPresenceCoordinator,
    reconciler: DynReconciler,
    time_provider: DynTimeProvider,
}

impl From<&AppDependencies> for PresenceEventHandler {
    fn from(deps: &AppDependencies) -> Self {
        Self {
            presence: deps.presence.clone(),
            reconciler: deps.reconciler.clone(),
            time_provider: deps.time_provider.clone(),
        }
    }
}

impl TransportEventHandler for PresenceEventHandler {
    fn name(&self) -> &'static str {
        "presence"
    }

    fn handle_event(&self, event: TransportEvent) -> Result<Option<TransportEvent>> {
        let now = self.time_provider.now();
        let presence = &self.presence;

        match event {
            TransportEvent::OnlineUsers(users) => {
                self.reconciler
                    .apply_presence_with(|| presence.handle_online_users(users, now));
            }
            TransportEvent::Heartbeat(user) => {
                self.reconciler
                    .apply_presence_with(|| presence.handle_heartbeat(user, now));
            }
            TransportEvent::TypingUsers(users) => {
                self.reconciler
                    .apply_presence_with(|| presence.handle_typing_users(users, now));
            }
            TransportEvent::Typing { user, is_typing } => {
                self.reconciler
                    .apply_presence_with(|| presence.handle_typing(user, is_typing, now));
            }
            _ => return Ok(Some(event)),
        }
        Ok(None)
    }
}
