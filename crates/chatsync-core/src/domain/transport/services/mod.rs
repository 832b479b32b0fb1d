// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use chat_transport::{ChatTransport, TransportEventSink};

mod chat_transport;

#[cfg(any(test, feature = "test"))]
pub mod mocks {
    pub use super::chat_transport::{MockChatTransport, MockTransportEventSink};
}
