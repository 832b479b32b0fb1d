// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::sync::Arc;

use tracing::info;

use crate::app::deps::{
    AppContext, AppDependencies, ChatConfig, DynChatTransport, DynMessageIdProvider,
    DynTimeProvider,
};
use crate::app::event_handlers::{
    MessagesEventHandler, PresenceEventHandler, TransportEventHandlerQueue,
};
use crate::app::services::ConversationService;
use crate::chat::ChatInner;
use crate::domain::general::services::TimeProvider;
use crate::domain::messaging::services::{MessageIdProvider, WrappingMessageIdProvider};
use crate::domain::shared::models::UserProfile;
use crate::domain::transport::services::ChatTransport;
use crate::infra::general::SystemTimeProvider;
use crate::Chat;

pub struct UndefinedTransport;
pub struct UndefinedUser;

pub struct ChatBuilder<T, U> {
    config: ChatConfig,
    message_id_provider: DynMessageIdProvider,
    time_provider: DynTimeProvider,
    transport: T,
    user: U,
}

impl ChatBuilder<UndefinedTransport, UndefinedUser> {
    pub(crate) fn new() -> Self {
        ChatBuilder {
            config: Default::default(),
            message_id_provider: Arc::new(WrappingMessageIdProvider::uuid()),
            time_provider: Arc::new(SystemTimeProvider::default()),
            transport: UndefinedTransport,
            user: UndefinedUser,
        }
    }
}

impl<U> ChatBuilder<UndefinedTransport, U> {
    pub fn set_transport<T: ChatTransport + 'static>(
        self,
        transport: T,
    ) -> ChatBuilder<DynChatTransport, U> {
        ChatBuilder {
            config: self.config,
            message_id_provider: self.message_id_provider,
            time_provider: self.time_provider,
            transport: Arc::new(transport),
            user: self.user,
        }
    }
}

impl<T> ChatBuilder<T, UndefinedUser> {
    pub fn set_user(self, user: UserProfile) -> ChatBuilder<T, UserProfile> {
        ChatBuilder {
            config: self.config,
            message_id_provider: self.message_id_provider,
            time_provider: self.time_provider,
            transport: self.transport,
            user,
        }
    }
}

impl<T, U> ChatBuilder<T, U> {
    pub fn set_config(mut self, config: ChatConfig) -> Self {
        self.config = config;
        self
    }

    pub fn set_message_id_provider<P: MessageIdProvider + 'static>(
        mut self,
        id_provider: P,
    ) -> Self {
        self.message_id_provider = Arc::new(id_provider);
        self
    }

    pub fn set_time_provider<P: TimeProvider + 'static>(mut self, time_provider: P) -> Self {
        self.time_provider = Arc::new(time_provider);
        self
    }
}

impl ChatBuilder<DynChatTransport, UserProfile> {
    pub fn build(self) -> Chat {
        let capabilities = self.transport.capabilities();
        info!(
            "Starting chat session {} (delete: {}, reactions: {})…",
            self.user.session_id, capabilities.delete_message, capabilities.add_reaction
        );

        let dependencies = AppDependencies::new(
            AppContext::new(self.user, capabilities, self.config),
            self.transport,
            self.time_provider,
            self.message_id_provider,
        );

        let event_handler_queue = Arc::new(TransportEventHandlerQueue::new(vec![
            Box::new(MessagesEventHandler::from(&dependencies)),
            Box::new(PresenceEventHandler::from(&dependencies)),
        ]));

        let chat_inner = Arc::new(ChatInner {
            conversation: ConversationService::from(&dependencies),
            ctx: dependencies.ctx.clone(),
            presence: dependencies.presence.clone(),
            reconciler: dependencies.reconciler.clone(),
            store: dependencies.store.clone(),
            time_provider: dependencies.time_provider.clone(),
            transport: dependencies.transport.clone(),
            is_shut_down: Default::default(),
        });

        dependencies.transport.init(event_handler_queue);
        dependencies.transport.setup_presence(&dependencies.ctx.user);

        Chat::from(chat_inner)
    }
}
