// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use chatsync_utils::id_string;

id_string!(
    /// Identifies a browser session. Stable for the lifetime of a session and used to decide
    /// whether a message or presence entry belongs to "self".
    SessionId
);
