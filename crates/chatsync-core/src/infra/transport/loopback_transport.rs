// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::domain::general::services::TimeProvider;
use crate::domain::messaging::models::{Emoji, Message, MessageId, OutboundMessage};
use crate::domain::presence::models::{OnlineUser, TypingUser};
use crate::domain::shared::models::{SessionId, UserProfile};
use crate::domain::transport::models::{
    ImageFile, TransportCapabilities, TransportError, TransportEvent,
};
use crate::domain::transport::services::{ChatTransport, TransportEventSink};
use crate::infra::general::SystemTimeProvider;

/// An in-memory backend that several sessions can connect to.
///
/// The server assigns ids and timestamps and pushes every change to every connected session,
/// including the one that made it. Failures can be injected per operation.
#[derive(Clone)]
pub struct LoopbackServer {
    inner: Arc<ServerInner>,
}

struct ServerInner {
    time_provider: Arc<dyn TimeProvider>,
    state: Mutex<ServerState>,
    /// Held while a change is applied and pushed so that every session observes the same order.
    delivery: Mutex<()>,
}

#[derive(Default)]
struct ServerState {
    messages: Vec<Message>,
    last_message_id: u64,
    last_upload_id: u64,
    last_connection_id: u64,
    subscribers: Vec<(u64, Arc<dyn TransportEventSink>)>,
    online_users: BTreeMap<SessionId, OnlineUser>,
    typing_users: BTreeMap<SessionId, TypingUser>,
    failures: Failures,
}

#[derive(Default, Clone, Copy)]
struct Failures {
    send: bool,
    delete: bool,
    reaction: bool,
    upload: bool,
}

/// A single session's connection to a `LoopbackServer`.
pub struct LoopbackTransport {
    server: LoopbackServer,
    connection_id: u64,
    session_id: SessionId,
    capabilities: TransportCapabilities,
    is_closed: AtomicBool,
}

impl Default for LoopbackServer {
    fn default() -> Self {
        Self::new(Arc::new(SystemTimeProvider::default()))
    }
}

impl LoopbackServer {
    pub fn new(time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            inner: Arc::new(ServerInner {
                time_provider,
                state: Default::default(),
                delivery: Default::default(),
            }),
        }
    }

    pub fn connect(&self, session_id: impl Into<SessionId>) -> LoopbackTransport {
        self.connect_with_capabilities(session_id, TransportCapabilities::all())
    }

    pub fn connect_with_capabilities(
        &self,
        session_id: impl Into<SessionId>,
        capabilities: TransportCapabilities,
    ) -> LoopbackTransport {
        let connection_id = {
            let mut state = self.inner.state.lock();
            state.last_connection_id += 1;
            state.last_connection_id
        };

        LoopbackTransport {
            server: self.clone(),
            connection_id,
            session_id: session_id.into(),
            capabilities,
            is_closed: AtomicBool::new(false),
        }
    }

    /// The authoritative message list.
    pub fn messages(&self) -> Vec<Message> {
        self.inner.state.lock().messages.clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.state.lock().subscribers.len()
    }

    pub fn fail_sends(&self, fail: bool) {
        self.inner.state.lock().failures.send = fail;
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.inner.state.lock().failures.delete = fail;
    }

    pub fn fail_reactions(&self, fail: bool) {
        self.inner.state.lock().failures.reaction = fail;
    }

    pub fn fail_uploads(&self, fail: bool) {
        self.inner.state.lock().failures.upload = fail;
    }

    /// Pushes a heartbeat of `user` to all sessions.
    pub fn heartbeat(&self, user: OnlineUser) {
        self.apply(|state| {
            state
                .online_users
                .insert(user.session_id.clone(), user.clone());
            Ok(vec![TransportEvent::Heartbeat(user)])
        })
        .unwrap_or_default();
    }

    /// Pushes `event` to all sessions without changing the server state.
    pub fn broadcast(&self, event: TransportEvent) {
        self.apply(|_| Ok(vec![event])).unwrap_or_default();
    }
}

impl LoopbackServer {
    /// Applies `change` and pushes the events it returns to all subscribers.
    fn apply(
        &self,
        change: impl FnOnce(&mut ServerState) -> Result<Vec<TransportEvent>, TransportError>,
    ) -> Result<(), TransportError> {
        let _delivery = self.inner.delivery.lock();

        let (events, subscribers) = {
            let mut state = self.inner.state.lock();
            let events = change(&mut *state)?;
            let subscribers = state
                .subscribers
                .iter()
                .map(|(_, sink)| sink.clone())
                .collect::<Vec<_>>();
            (events, subscribers)
        };

        for event in events {
            for subscriber in subscribers.iter() {
                subscriber.push(event.clone());
            }
        }

        Ok(())
    }

    fn now(&self) -> DateTime<Utc> {
        self.inner.time_provider.now()
    }
}

impl ServerState {
    fn online_users(&self) -> TransportEvent {
        TransportEvent::OnlineUsers(self.online_users.values().cloned().collect())
    }

    fn typing_users(&self) -> TransportEvent {
        TransportEvent::TypingUsers(self.typing_users.values().cloned().collect())
    }
}

#[async_trait]
impl ChatTransport for LoopbackTransport {
    fn capabilities(&self) -> TransportCapabilities {
        self.capabilities
    }

    fn init(&self, sink: Arc<dyn TransportEventSink>) {
        let _delivery = self.server.inner.delivery.lock();

        let initial_events = {
            let mut state = self.server.inner.state.lock();
            state.subscribers.push((self.connection_id, sink.clone()));
            [
                TransportEvent::Messages(state.messages.clone()),
                state.online_users(),
                state.typing_users(),
            ]
        };

        for event in initial_events {
            sink.push(event);
        }
    }

    async fn send_message(&self, message: OutboundMessage) -> Result<(), TransportError> {
        let timestamp = self.server.now();

        self.server.apply(|state| {
            if state.failures.send {
                return Err(TransportError::Network("Injected send failure".to_string()));
            }

            state.last_message_id += 1;
            let id = MessageId::from(format!("m{}", state.last_message_id));
            debug!("Storing message {id}.");
            state.messages.push(message.into_message(id, timestamp));

            Ok(vec![TransportEvent::Messages(state.messages.clone())])
        })
    }

    async fn delete_message(&self, message_id: &MessageId) -> Result<(), TransportError> {
        if !self.capabilities.delete_message {
            return Err(TransportError::Unsupported);
        }

        self.server.apply(|state| {
            if state.failures.delete {
                return Err(TransportError::Network(
                    "Injected delete failure".to_string(),
                ));
            }

            let count = state.messages.len();
            state.messages.retain(|message| &message.id != message_id);
            if state.messages.len() == count {
                return Ok(vec![]);
            }

            Ok(vec![TransportEvent::MessageDeleted(message_id.clone())])
        })
    }

    async fn add_reaction(
        &self,
        message_id: &MessageId,
        emoji: &Emoji,
    ) -> Result<(), TransportError> {
        if !self.capabilities.add_reaction {
            return Err(TransportError::Unsupported);
        }

        self.server.apply(|state| {
            if state.failures.reaction {
                return Err(TransportError::Network(
                    "Injected reaction failure".to_string(),
                ));
            }

            let Some(message) = state
                .messages
                .iter_mut()
                .find(|message| &message.id == message_id)
            else {
                return Err(TransportError::Network(format!(
                    "Unknown message {message_id}"
                )));
            };
            message.reactions.push(emoji.clone());

            Ok(vec![TransportEvent::ReactionAdded {
                message_id: message_id.clone(),
                emoji: emoji.clone(),
                from: self.session_id.clone(),
            }])
        })
    }

    async fn upload_image(&self, file: ImageFile) -> Result<String, TransportError> {
        let mut state = self.server.inner.state.lock();
        if state.failures.upload {
            return Err(TransportError::Upload("Injected upload failure".to_string()));
        }

        state.last_upload_id += 1;
        let url = format!(
            "https://uploads.loopback.invalid/{}/{}",
            state.last_upload_id, file.file_name
        );
        info!("Stored {} bytes at {url}.", file.size());
        Ok(url)
    }

    fn set_typing_status(&self, user: &UserProfile, is_typing: bool) {
        self.server
            .apply(|state| {
                if is_typing {
                    state
                        .typing_users
                        .insert(user.session_id.clone(), TypingUser::from(user));
                } else if state.typing_users.remove(&user.session_id).is_none() {
                    return Ok(vec![]);
                }
                Ok(vec![state.typing_users()])
            })
            .unwrap_or_default()
    }

    fn setup_presence(&self, user: &UserProfile) {
        self.server
            .apply(|state| {
                state
                    .online_users
                    .insert(user.session_id.clone(), OnlineUser::from(user));
                Ok(vec![state.online_users()])
            })
            .unwrap_or_default()
    }

    fn cleanup(&self) {
        if self.is_closed.swap(true, Ordering::SeqCst) {
            return;
        }

        info!("Closing loopback connection of session {}.", self.session_id);

        self.server
            .apply(|state| {
                state
                    .subscribers
                    .retain(|(id, _)| *id != self.connection_id);

                let mut events = vec![];
                if state.online_users.remove(&self.session_id).is_some() {
                    events.push(state.online_users());
                }
                if state.typing_users.remove(&self.session_id).is_some() {
                    events.push(state.typing_users());
                }
                Ok(events)
            })
            .unwrap_or_default()
    }
}

impl Drop for LoopbackTransport {
    fn drop(&mut self) {
        self.cleanup()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use crate::domain::transport::services::mocks::MockTransportEventSink;
    use crate::test::{ConstantTimeProvider, MessageBuilder};

    use super::*;

    fn server() -> (LoopbackServer, Arc<ConstantTimeProvider>) {
        let time_provider = Arc::new(ConstantTimeProvider::new(
            Utc.timestamp_millis_opt(100).unwrap(),
        ));
        (LoopbackServer::new(time_provider.clone()), time_provider)
    }

    struct RecordingSink(Mutex<Vec<TransportEvent>>);

    impl TransportEventSink for RecordingSink {
        fn push(&self, event: TransportEvent) {
            self.0.lock().push(event)
        }
    }

    #[tokio::test]
    async fn test_assigns_ids_and_timestamps() -> anyhow::Result<()> {
        let (server, time_provider) = server();
        let transport = server.connect("A");

        transport
            .send_message(MessageBuilder::new_with_index(1).build_outbound())
            .await?;
        time_provider.advance(TimeDelta::milliseconds(5));
        transport
            .send_message(MessageBuilder::new_with_index(2).build_outbound())
            .await?;

        let messages = server.messages();
        assert_eq!(
            messages
                .iter()
                .map(|message| (message.id.to_string(), message.timestamp.timestamp_millis()))
                .collect::<Vec<_>>(),
            vec![("m1".to_string(), 100), ("m2".to_string(), 105)]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_pushes_changes_to_all_sessions() -> anyhow::Result<()> {
        let (server, _) = server();
        let a = server.connect("A");
        let b = server.connect("B");

        let sink = Arc::new(RecordingSink(Mutex::new(vec![])));
        b.init(sink.clone());
        sink.0.lock().clear();

        a.send_message(MessageBuilder::new_with_index(1).build_outbound())
            .await?;
        a.add_reaction(&"m1".into(), &"👍".into()).await?;
        a.delete_message(&"m1".into()).await?;

        let events = sink.0.lock().clone();
        assert_eq!(events.len(), 3);
        assert!(matches!(&events[0], TransportEvent::Messages(messages) if messages.len() == 1));
        assert_eq!(
            events[1],
            TransportEvent::ReactionAdded {
                message_id: "m1".into(),
                emoji: "👍".into(),
                from: "A".into(),
            }
        );
        assert_eq!(events[2], TransportEvent::MessageDeleted("m1".into()));
        Ok(())
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let (server, _) = server();
        let transport = server.connect("A");

        server.fail_sends(true);
        server.fail_uploads(true);

        assert!(matches!(
            transport
                .send_message(MessageBuilder::new_with_index(1).build_outbound())
                .await,
            Err(TransportError::Network(_))
        ));
        assert!(matches!(
            transport
                .upload_image(ImageFile::new("cat.png", vec![]))
                .await,
            Err(TransportError::Upload(_))
        ));
        assert!(server.messages().is_empty());

        let limited = server.connect_with_capabilities("B", TransportCapabilities::none());
        assert!(matches!(
            limited.delete_message(&"m1".into()).await,
            Err(TransportError::Unsupported)
        ));
        assert!(matches!(
            limited.add_reaction(&"m1".into(), &"👍".into()).await,
            Err(TransportError::Unsupported)
        ));
    }

    #[test]
    fn test_cleanup_is_idempotent() {
        let (server, _) = server();
        let transport = server.connect("A");

        let mut sink = MockTransportEventSink::new();
        sink.expect_push().times(3).return_const(());
        transport.init(Arc::new(sink));
        assert_eq!(server.subscriber_count(), 1);

        transport.cleanup();
        transport.cleanup();
        drop(transport);

        assert_eq!(server.subscriber_count(), 0);
    }
}
