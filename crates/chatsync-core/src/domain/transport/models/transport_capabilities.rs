// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

/// Declares which optional operations a transport supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransportCapabilities {
    pub delete_message: bool,
    pub add_reaction: bool,
}

impl TransportCapabilities {
    pub fn all() -> Self {
        Self {
            delete_message: true,
            add_reaction: true,
        }
    }

    pub fn none() -> Self {
        Self {
            delete_message: false,
            add_reaction: false,
        }
    }
}

impl Default for TransportCapabilities {
    fn default() -> Self {
        Self::none()
    }
}
