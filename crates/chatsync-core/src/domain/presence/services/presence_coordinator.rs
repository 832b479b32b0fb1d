// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;
use tracing::{debug, info};

use crate::domain::presence::models::{OnlineUser, PresenceSnapshot, TypingEmission, TypingUser};
use crate::domain::shared::models::SessionId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PresenceTimeouts {
    /// Maximum silence before a remote session is considered offline.
    pub liveness_window: TimeDelta,
    /// Time without keypresses after which the local user stops typing.
    pub typing_idle_timeout: TimeDelta,
    /// Maximum age of a remote typing state that wasn't refreshed.
    pub typing_expiry: TimeDelta,
}

/// Tracks who is online and who is typing.
///
/// Remote sessions move through `Absent -> Online -> Typing -> Online -> Absent`. The local
/// session is tracked separately and is never part of a snapshot.
pub struct PresenceCoordinator {
    local_session: SessionId,
    timeouts: PresenceTimeouts,
    state: Mutex<PresenceState>,
}

#[derive(Default)]
struct PresenceState {
    sessions: BTreeMap<SessionId, RemoteSession>,
    local_typing: LocalTyping,
}

struct RemoteSession {
    name: String,
    last_seen: DateTime<Utc>,
    typing_updated: Option<DateTime<Utc>>,
}

#[derive(Default)]
enum LocalTyping {
    #[default]
    Idle,
    Typing {
        last_keypress: DateTime<Utc>,
    },
}

impl PresenceCoordinator {
    pub fn new(local_session: SessionId, timeouts: PresenceTimeouts) -> Self {
        Self {
            local_session,
            timeouts,
            state: Default::default(),
        }
    }

    pub fn snapshot(&self) -> PresenceSnapshot {
        self.state.lock().snapshot()
    }

    /// Records that `user` is alive.
    pub fn handle_heartbeat(&self, user: OnlineUser, now: DateTime<Utc>) -> PresenceSnapshot {
        let mut state = self.state.lock();
        if user.session_id != self.local_session {
            state.touch(user.session_id, user.name, now);
        }
        state.snapshot()
    }

    /// Treats `users` as the complete set of online sessions.
    pub fn handle_online_users(
        &self,
        users: Vec<OnlineUser>,
        now: DateTime<Utc>,
    ) -> PresenceSnapshot {
        let mut state = self.state.lock();

        let listed = users
            .iter()
            .map(|user| user.session_id.clone())
            .collect::<HashSet<_>>();
        state
            .sessions
            .retain(|session_id, _| listed.contains(session_id));

        for user in users {
            if user.session_id == self.local_session {
                continue;
            }
            state.touch(user.session_id, user.name, now);
        }

        state.snapshot()
    }

    /// A typing event counts as a heartbeat as well.
    pub fn handle_typing(
        &self,
        user: TypingUser,
        is_typing: bool,
        now: DateTime<Utc>,
    ) -> PresenceSnapshot {
        let mut state = self.state.lock();
        if user.session_id != self.local_session {
            let session = state.touch(user.session_id, user.name, now);
            session.typing_updated = is_typing.then_some(now);
        }
        state.snapshot()
    }

    /// Treats `users` as the complete set of typing sessions.
    pub fn handle_typing_users(
        &self,
        users: Vec<TypingUser>,
        now: DateTime<Utc>,
    ) -> PresenceSnapshot {
        let mut state = self.state.lock();

        for session in state.sessions.values_mut() {
            session.typing_updated = None;
        }

        for user in users {
            if user.session_id == self.local_session {
                continue;
            }
            let session = state.touch(user.session_id, user.name, now);
            session.typing_updated = Some(now);
        }

        state.snapshot()
    }

    /// Debounces local keypresses. Returns an emission only if the local typing state changed.
    pub fn set_local_typing(&self, is_typing: bool, now: DateTime<Utc>) -> Option<TypingEmission> {
        let mut state = self.state.lock();

        let was_typing = matches!(state.local_typing, LocalTyping::Typing { .. });

        match (was_typing, is_typing) {
            (false, true) => {
                state.local_typing = LocalTyping::Typing { last_keypress: now };
                Some(TypingEmission::Started)
            }
            (true, true) => {
                state.local_typing = LocalTyping::Typing { last_keypress: now };
                None
            }
            (true, false) => {
                state.local_typing = LocalTyping::Idle;
                Some(TypingEmission::Stopped)
            }
            (false, false) => None,
        }
    }

    pub fn is_local_user_typing(&self) -> bool {
        matches!(self.state.lock().local_typing, LocalTyping::Typing { .. })
    }

    /// Expires everything that went stale until `now`.
    pub fn tick(&self, now: DateTime<Utc>) -> (PresenceSnapshot, Option<TypingEmission>) {
        let mut state = self.state.lock();
        let timeouts = self.timeouts;

        state.sessions.retain(|session_id, session| {
            let is_alive = now - session.last_seen <= timeouts.liveness_window;
            if !is_alive {
                info!("Session '{session_id}' missed its heartbeat. Marking it as offline.");
            }
            is_alive
        });

        for (session_id, session) in state.sessions.iter_mut() {
            let Some(typing_updated) = session.typing_updated else {
                continue;
            };
            if now - typing_updated > timeouts.typing_expiry {
                debug!("Typing state of session '{session_id}' expired.");
                session.typing_updated = None;
            }
        }

        let mut emission = None;
        if let LocalTyping::Typing { last_keypress } = state.local_typing {
            if now - last_keypress >= timeouts.typing_idle_timeout {
                state.local_typing = LocalTyping::Idle;
                emission = Some(TypingEmission::Stopped);
            }
        }

        (state.snapshot(), emission)
    }
}

impl PresenceState {
    fn touch(
        &mut self,
        session_id: SessionId,
        name: String,
        now: DateTime<Utc>,
    ) -> &mut RemoteSession {
        let session = self.sessions.entry(session_id).or_insert_with(|| RemoteSession {
            name: name.clone(),
            last_seen: now,
            typing_updated: None,
        });
        session.name = name;
        session.last_seen = now;
        session
    }

    fn snapshot(&self) -> PresenceSnapshot {
        let mut snapshot = PresenceSnapshot::default();

        for (session_id, session) in self.sessions.iter() {
            snapshot.online.push(OnlineUser {
                name: session.name.clone(),
                session_id: session_id.clone(),
            });
            if session.typing_updated.is_some() {
                snapshot.typing.push(TypingUser {
                    name: session.name.clone(),
                    session_id: session_id.clone(),
                });
            }
        }

        snapshot
    }
}
