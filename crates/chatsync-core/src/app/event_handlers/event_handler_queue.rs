// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use parking_lot::Mutex;
use tracing::{error, warn};

use crate::app::event_handlers::TransportEventHandler;
use crate::domain::transport::models::TransportEvent;
use crate::domain::transport::services::TransportEventSink;

/// Passes every pushed event through its handlers, one event at a time.
pub struct TransportEventHandlerQueue {
    handlers: Vec<Box<dyn TransportEventHandler>>,
    dispatch_lock: Mutex<()>,
}

impl TransportEventHandlerQueue {
    pub fn new(handlers: Vec<Box<dyn TransportEventHandler>>) -> Self {
        Self {
            handlers,
            dispatch_lock: Default::default(),
        }
    }

    pub fn handle_event(&self, event: TransportEvent) {
        let _guard = self.dispatch_lock.lock();
        let mut event = event;

        for handler in self.handlers.iter() {
            match handler.handle_event(event) {
                Ok(None) => return,
                Ok(Some(e)) => event = e,
                Err(err) => {
                    error!(
                        "Event handler '{}' aborted with error: {}",
                        handler.name(),
                        err.to_string()
                    );
                    return;
                }
            }
        }

        warn!("Received unhandled event {:?}", event);
    }
}

impl TransportEventSink for TransportEventHandlerQueue {
    fn push(&self, event: TransportEvent) {
        self.handle_event(event)
    }
}
