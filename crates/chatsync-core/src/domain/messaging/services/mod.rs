// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use message_id_provider::{MessageIdProvider, WrappingMessageIdProvider};

mod message_id_provider;
