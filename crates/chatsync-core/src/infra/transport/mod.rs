// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

pub use loopback_transport::{LoopbackServer, LoopbackTransport};

mod loopback_transport;
