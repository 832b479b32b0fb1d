// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use chatsync_utils::id_string;

id_string!(
    /// Identifies a message. Either assigned by the server or, for optimistic messages that
    /// haven't been echoed back yet, generated locally inside the reserved `local-` namespace.
    MessageId
);

const LOCAL_ID_PREFIX: &str = "local-";

impl MessageId {
    /// Builds an id inside the local namespace.
    pub fn local(suffix: impl AsRef<str>) -> Self {
        MessageId(format!("{}{}", LOCAL_ID_PREFIX, suffix.as_ref()))
    }

    /// Returns true if the id was generated locally for an optimistic message.
    pub fn is_local(&self) -> bool {
        self.0.starts_with(LOCAL_ID_PREFIX)
    }
}
