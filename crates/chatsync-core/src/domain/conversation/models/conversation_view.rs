// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use std::collections::BTreeMap;

use crate::domain::messaging::models::{Message, MessageId, ViewMessage};
use crate::domain::presence::models::{OnlineUser, TypingUser};
use crate::domain::shared::models::SessionId;

/// The reconciled state of a conversation.
///
/// Messages are ordered by `(timestamp, id)` ascending. Online and typing users are keyed by
/// their session id.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConversationView {
    messages: Vec<ViewMessage>,
    online_users: BTreeMap<SessionId, OnlineUser>,
    typing_users: BTreeMap<SessionId, TypingUser>,
}

impl ConversationView {
    pub fn messages(&self) -> &[ViewMessage] {
        &self.messages
    }

    pub fn message(&self, id: &MessageId) -> Option<&ViewMessage> {
        self.messages.iter().find(|entry| &entry.message.id == id)
    }

    pub fn online_users(&self) -> Vec<&OnlineUser> {
        self.online_users.values().collect()
    }

    pub fn typing_users(&self) -> Vec<&TypingUser> {
        self.typing_users.values().collect()
    }

    pub fn is_online(&self, session_id: &SessionId) -> bool {
        self.online_users.contains_key(session_id)
    }

    pub fn is_typing(&self, session_id: &SessionId) -> bool {
        self.typing_users.contains_key(session_id)
    }

    pub fn is_sorted(&self) -> bool {
        self.messages
            .windows(2)
            .all(|pair| pair[0].sort_key() <= pair[1].sort_key())
    }
}

impl ConversationView {
    pub(crate) fn position(&self, id: &MessageId) -> Option<usize> {
        self.messages.iter().position(|entry| &entry.message.id == id)
    }

    /// Finds the oldest optimistic message that `message` is an echo of. Messages that are
    /// still in flight are preferred over failed ones.
    pub(crate) fn position_of_optimistic_match(&self, message: &Message) -> Option<usize> {
        let is_match = |entry: &ViewMessage| {
            entry.is_optimistic()
                && entry.message.session_id == message.session_id
                && entry.message.text == message.text
        };

        self.messages
            .iter()
            .position(|entry| is_match(entry) && !entry.is_failed())
            .or_else(|| self.messages.iter().position(is_match))
    }

    pub(crate) fn message_mut(&mut self, id: &MessageId) -> Option<&mut ViewMessage> {
        self.messages
            .iter_mut()
            .find(|entry| &entry.message.id == id)
    }

    /// Inserts `entry` at its sorted position and returns the index.
    pub(crate) fn insert(&mut self, entry: ViewMessage) -> usize {
        let idx = self
            .messages
            .partition_point(|existing| existing.sort_key() <= entry.sort_key());
        self.messages.insert(idx, entry);
        idx
    }

    pub(crate) fn remove(&mut self, id: &MessageId) -> Option<ViewMessage> {
        let idx = self.position(id)?;
        Some(self.messages.remove(idx))
    }

    /// Replaces the entry at `idx`. The entry keeps its position unless the new sort key
    /// requires it to move.
    pub(crate) fn replace_at(&mut self, idx: usize, entry: ViewMessage) {
        let fits_previous = idx == 0 || self.messages[idx - 1].sort_key() <= entry.sort_key();
        let fits_next = idx + 1 >= self.messages.len()
            || entry.sort_key() <= self.messages[idx + 1].sort_key();

        if fits_previous && fits_next {
            self.messages[idx] = entry;
            return;
        }

        self.messages.remove(idx);
        self.insert(entry);
    }

    /// Removes all entries for which `keep` returns false and returns their ids.
    pub(crate) fn retain(&mut self, mut keep: impl FnMut(&ViewMessage) -> bool) -> Vec<MessageId> {
        let mut removed = vec![];
        self.messages.retain(|entry| {
            if keep(entry) {
                return true;
            }
            removed.push(entry.message.id.clone());
            false
        });
        removed
    }

    /// Returns true if the set changed.
    pub(crate) fn set_online_users(&mut self, users: Vec<OnlineUser>) -> bool {
        let users = users
            .into_iter()
            .map(|user| (user.session_id.clone(), user))
            .collect::<BTreeMap<_, _>>();
        if users == self.online_users {
            return false;
        }
        self.online_users = users;
        true
    }

    /// Returns true if the set changed.
    pub(crate) fn set_typing_users(&mut self, users: Vec<TypingUser>) -> bool {
        let users = users
            .into_iter()
            .map(|user| (user.session_id.clone(), user))
            .collect::<BTreeMap<_, _>>();
        if users == self.typing_users {
            return false;
        }
        self.typing_users = users;
        true
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeDelta, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use crate::test::MessageBuilder;

    use super::*;

    fn ids(view: &ConversationView) -> Vec<&str> {
        view.messages()
            .iter()
            .map(|entry| entry.message.id.as_ref())
            .collect()
    }

    #[test]
    fn test_inserts_in_timestamp_order() {
        let mut view = ConversationView::default();

        view.insert(ViewMessage::delivered(MessageBuilder::new_with_index(3).build_message()));
        view.insert(ViewMessage::delivered(MessageBuilder::new_with_index(1).build_message()));
        view.insert(ViewMessage::delivered(MessageBuilder::new_with_index(2).build_message()));

        assert_eq!(ids(&view), vec!["msg-1", "msg-2", "msg-3"]);
        assert!(view.is_sorted());
    }

    #[test]
    fn test_breaks_timestamp_ties_by_id() {
        let mut view = ConversationView::default();
        let timestamp = Utc.timestamp_millis_opt(100).unwrap();

        for id in ["m3", "m1", "m2"] {
            view.insert(ViewMessage::delivered(
                MessageBuilder::new_with_id(id)
                    .set_timestamp(timestamp)
                    .build_message(),
            ));
        }

        assert_eq!(ids(&view), vec!["m1", "m2", "m3"]);
    }

    #[test]
    fn test_replace_moves_entry_if_needed() {
        let mut view = ConversationView::default();
        for idx in 1..=3 {
            view.insert(ViewMessage::delivered(
                MessageBuilder::new_with_index(idx).build_message(),
            ));
        }

        let moved = MessageBuilder::new_with_id("msg-0")
            .set_timestamp(MessageBuilder::timestamp_for_index(4) + TimeDelta::seconds(1))
            .build_message();
        view.replace_at(0, ViewMessage::delivered(moved));

        assert_eq!(ids(&view), vec!["msg-2", "msg-3", "msg-0"]);
        assert!(view.is_sorted());

        let in_place = MessageBuilder::new_with_index(2).set_text("Edited").build_message();
        view.replace_at(0, ViewMessage::delivered(in_place));
        assert_eq!(ids(&view), vec!["msg-2", "msg-3", "msg-0"]);
        assert_eq!(view.messages()[0].message.text, "Edited");
    }

    #[test]
    fn test_presence_sets_report_changes() {
        let mut view = ConversationView::default();

        assert!(view.set_online_users(vec![OnlineUser::new("Bob", "B")]));
        assert!(!view.set_online_users(vec![OnlineUser::new("Bob", "B")]));
        assert!(view.is_online(&"B".into()));

        assert!(!view.set_typing_users(vec![]));
        assert!(view.set_typing_users(vec![TypingUser::new("Bob", "B")]));
        assert!(view.is_typing(&"B".into()));
    }
}
