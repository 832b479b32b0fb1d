// chatsync/chatsync-core-integration-tests
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::ops::Deref;
use std::sync::Arc;

use parking_lot::Mutex;

use chatsync_core::domain::messaging::services::WrappingMessageIdProvider;
use chatsync_core::dtos::*;
use chatsync_core::infra::transport::LoopbackServer;
use chatsync_core::test::{mock_data, ConstantTimeProvider};
use chatsync_core::{Chat, ClientEvent};

/// A loopback server and the clock shared by the server and every session connected to it.
pub struct TestServer {
    pub server: LoopbackServer,
    pub clock: ConstantTimeProvider,
}

/// A connected chat session that records every event it emits.
pub struct TestSession {
    chat: Chat,
    events: Arc<Mutex<Vec<ClientEvent>>>,
    _subscription: Subscription,
}

impl TestServer {
    pub fn new() -> Self {
        let clock = ConstantTimeProvider::new(mock_data::reference_date());
        Self {
            server: LoopbackServer::new(Arc::new(clock.clone())),
            clock,
        }
    }

    pub fn connect(&self, name: &str, session_id: &str) -> TestSession {
        self.connect_with_capabilities(name, session_id, TransportCapabilities::all())
    }

    pub fn connect_with_capabilities(
        &self,
        name: &str,
        session_id: &str,
        capabilities: TransportCapabilities,
    ) -> TestSession {
        let events = Arc::new(Mutex::new(vec![]));

        let chat = Chat::builder()
            .set_transport(
                self.server
                    .connect_with_capabilities(session_id, capabilities),
            )
            .set_user(UserProfile::new(name, "", SessionId::from(session_id)))
            .set_time_provider(self.clock.clone())
            .set_message_id_provider(WrappingMessageIdProvider::incrementing(session_id))
            .build();

        let subscription = chat.subscribe({
            let events = events.clone();
            move |change: &StateChange| events.lock().extend(change.events.iter().cloned())
        });

        TestSession {
            chat,
            events,
            _subscription: subscription,
        }
    }
}

impl TestSession {
    /// Returns and clears the events recorded so far.
    pub fn take_events(&self) -> Vec<ClientEvent> {
        std::mem::take(&mut *self.events.lock())
    }

    pub fn texts(&self) -> Vec<String> {
        self.state()
            .messages()
            .iter()
            .map(|entry| entry.message.text.clone())
            .collect()
    }

    pub fn message(&self, id: &MessageId) -> Option<ViewMessage> {
        self.state().message(id).cloned()
    }

    /// The id of the last entry in the view.
    pub fn last_message_id(&self) -> MessageId {
        self.state()
            .messages()
            .last()
            .map(|entry| entry.message.id.clone())
            .expect("Conversation is empty")
    }

    pub fn online_sessions(&self) -> Vec<SessionId> {
        self.state()
            .online_users()
            .into_iter()
            .map(|user| user.session_id.clone())
            .collect()
    }

    pub fn typing_sessions(&self) -> Vec<SessionId> {
        self.state()
            .typing_users()
            .into_iter()
            .map(|user| user.session_id.clone())
            .collect()
    }
}

impl Deref for TestSession {
    type Target = Chat;

    fn deref(&self) -> &Self::Target {
        &self.chat
    }
}
