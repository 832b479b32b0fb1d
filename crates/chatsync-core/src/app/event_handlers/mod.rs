// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use anyhow::Result;

pub use event_handler_queue::TransportEventHandlerQueue;
pub use messages_event_handler::MessagesEventHandler;
pub use presence_event_handler::PresenceEventHandler;

use crate::domain::transport::models::TransportEvent;

mod event_handler_queue;
mod messages_event_handler;
mod presence_event_handler;

/// `TransportEventHandler` is a trait representing a handler for events pushed by the transport.
///
/// If the handler returns `None`, the event has been consumed and no further processing should
/// be done. If it returns `Some(event)`, the event is passed on to the next handler.
pub trait TransportEventHandler: Send + Sync {
    fn name(&self) -> &'static str;
    fn handle_event(&self, event: TransportEvent) -> Result<Option<TransportEvent>>;
}
