// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::sync::Arc;

use crate::app::deps::AppContext;
use crate::domain::conversation::services::{ConversationStore, Reconciler};
use crate::domain::general::services::TimeProvider;
use crate::domain::messaging::services::MessageIdProvider;
use crate::domain::presence::services::PresenceCoordinator;
use crate::domain::transport::services::ChatTransport;

pub type DynAppContext = Arc<AppContext>;
pub type DynChatTransport = Arc<dyn ChatTransport>;
pub type DynMessageIdProvider = Arc<dyn MessageIdProvider>;
pub type DynPresenceCoordinator = Arc<PresenceCoordinator>;
pub type DynReconciler = Arc<Reconciler>;
pub type DynTimeProvider = Arc<dyn TimeProvider>;

pub struct AppDependencies {
    pub ctx: DynAppContext,
    pub message_id_provider: DynMessageIdProvider,
    pub presence: DynPresenceCoordinator,
    pub reconciler: DynReconciler,
    pub store: ConversationStore,
    pub time_provider: DynTimeProvider,
    pub transport: DynChatTransport,
}

impl AppDependencies {
    pub fn new(
        ctx: AppContext,
        transport: DynChatTransport,
        time_provider: DynTimeProvider,
        message_id_provider: DynMessageIdProvider,
    ) -> Self {
        let store = ConversationStore::new();
        let local_session = ctx.user.session_id.clone();

        let reconciler = Arc::new(Reconciler::new(
            store.clone(),
            time_provider.clone(),
            message_id_provider.clone(),
            local_session.clone(),
        ));
        let presence = Arc::new(PresenceCoordinator::new(
            local_session,
            ctx.config.presence_timeouts(),
        ));

        Self {
            ctx: Arc::new(ctx),
            message_id_provider,
            presence,
            reconciler,
            store,
            time_provider,
            transport,
        }
    }
}
