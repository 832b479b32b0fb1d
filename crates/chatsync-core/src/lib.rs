// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use app::dtos;
pub use chat::{Chat, ChatInner};
pub use chat_builder::{ChatBuilder, UndefinedTransport, UndefinedUser};
pub use client_event::ClientEvent;

#[cfg(any(test, feature = "test"))]
pub mod test;

pub mod app;
mod chat;
mod chat_builder;
mod client_event;
pub mod domain;
pub mod infra;
