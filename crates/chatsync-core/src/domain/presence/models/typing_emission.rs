// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

/// A change of the local typing state that should be forwarded to the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingEmission {
    Started,
    Stopped,
}

impl TypingEmission {
    pub fn is_typing(&self) -> bool {
        matches!(self, Self::Started)
    }
}
