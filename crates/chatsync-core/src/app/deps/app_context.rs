// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use chrono::TimeDelta;
use serde::Deserialize;

use crate::domain::presence::services::PresenceTimeouts;
use crate::domain::shared::models::UserProfile;
use crate::domain::transport::models::TransportCapabilities;

/// Tunables of a chat session. All durations are in milliseconds.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChatConfig {
    /// A remote session without heartbeat for longer than this is considered offline.
    pub liveness_window_ms: u64,
    /// The local user is considered to have stopped typing after this idle time.
    pub typing_idle_timeout_ms: u64,
    /// A remote typing state that wasn't refreshed for longer than this is dropped.
    pub typing_expiry_ms: u64,
    /// Interval of the timer that drives presence expiry.
    pub presence_tick_interval_ms: u64,
    /// Maximum size of an uploaded image in bytes.
    pub max_upload_size: u64,
}

pub struct AppContext {
    pub user: UserProfile,
    pub capabilities: TransportCapabilities,
    pub config: ChatConfig,
}

impl AppContext {
    pub fn new(
        user: UserProfile,
        capabilities: TransportCapabilities,
        config: ChatConfig,
    ) -> Self {
        Self {
            user,
            capabilities,
            config,
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            liveness_window_ms: 30_000,
            typing_idle_timeout_ms: 3_000,
            typing_expiry_ms: 10_000,
            presence_tick_interval_ms: 1_000,
            max_upload_size: 10 * 1024 * 1024,
        }
    }
}

impl ChatConfig {
    pub fn liveness_window(&self) -> TimeDelta {
        Self::millis(self.liveness_window_ms)
    }

    pub fn typing_idle_timeout(&self) -> TimeDelta {
        Self::millis(self.typing_idle_timeout_ms)
    }

    pub fn typing_expiry(&self) -> TimeDelta {
        Self::millis(self.typing_expiry_ms)
    }

    pub fn presence_tick_interval(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.presence_tick_interval_ms.max(1))
    }

    pub fn presence_timeouts(&self) -> PresenceTimeouts {
        PresenceTimeouts {
            liveness_window: self.liveness_window(),
            typing_idle_timeout: self.typing_idle_timeout(),
            typing_expiry: self.typing_expiry(),
        }
    }

    fn millis(value: u64) -> TimeDelta {
        i64::try_from(value)
            .ok()
            .and_then(TimeDelta::try_milliseconds)
            .unwrap_or(TimeDelta::MAX)
    }
}
