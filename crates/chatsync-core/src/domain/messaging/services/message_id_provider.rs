// chatsync/chatsync-core
//
// Copyright: 2024, Marc Bauer <mb@nesium.com>
// License: Mozilla Public License v2.0 (MPL v2.0)

use crate::domain::general::services::IDProvider;
use crate::domain::messaging::models::MessageId;
use crate::infra::general::UUIDProvider;

/// Generates temporary ids for optimistic messages.
pub trait MessageIdProvider: Send + Sync {
    fn new_id(&self) -> MessageId;
}

pub struct WrappingMessageIdProvider<T: IDProvider> {
    id_provider: T,
}

impl<T: IDProvider> WrappingMessageIdProvider<T> {
    pub fn new(id_provider: T) -> Self {
        Self { id_provider }
    }
}

impl WrappingMessageIdProvider<UUIDProvider> {
    pub fn uuid() -> Self {
        Self {
            id_provider: UUIDProvider::new(),
        }
    }
}

#[cfg(any(test, feature = "test"))]
impl WrappingMessageIdProvider<crate::test::IncrementingIDProvider> {
    pub fn incrementing(prefix: &str) -> Self {
        Self {
            id_provider: crate::test::IncrementingIDProvider::new(prefix),
        }
    }
}

impl<T: IDProvider> MessageIdProvider for WrappingMessageIdProvider<T> {
    fn new_id(&self) -> MessageId {
        MessageId::local(self.id_provider.new_id())
    }
}
