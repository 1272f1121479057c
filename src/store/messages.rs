use std::sync::Arc;

use crate::common::Message;

/// Global message list in insertion order across all chatrooms.
///
/// Same copy-on-write scheme as the chatroom store: readers keep an `Arc`
/// to the version they saw, and the store only clones when it is shared.
#[derive(Debug, Default)]
pub struct MessageStore {
    messages: Arc<Vec<Message>>,
}

impl MessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> &Arc<Vec<Message>> {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn replace_all(&mut self, messages: Vec<Message>) {
        log::debug!("messages: replace_all ({} entries)", messages.len());
        self.messages = Arc::new(messages);
    }

    pub fn append(&mut self, message: Message) {
        log::debug!("messages: append {} to {}", message.id, message.chatroom_id);
        Arc::make_mut(&mut self.messages).push(message);
    }

    /// Splices `batch` before every existing entry, keeping its order.
    pub fn prepend(&mut self, batch: Vec<Message>) {
        if batch.is_empty() {
            return;
        }
        log::debug!("messages: prepend {} entries", batch.len());
        let messages = Arc::make_mut(&mut self.messages);
        messages.splice(0..0, batch);
    }

    /// Drops every message owned by `chatroom_id`; returns how many went.
    pub fn remove_chatroom(&mut self, chatroom_id: &str) -> usize {
        let owned = self
            .messages
            .iter()
            .filter(|m| m.chatroom_id == chatroom_id)
            .count();
        if owned > 0 {
            log::debug!("messages: drop {owned} entries of {chatroom_id}");
            Arc::make_mut(&mut self.messages).retain(|m| m.chatroom_id != chatroom_id);
        }
        owned
    }

    /// Earliest timestamp among the messages of one chatroom.
    pub fn earliest_timestamp(&self, chatroom_id: &str) -> Option<i64> {
        self.messages
            .iter()
            .filter(|m| m.chatroom_id == chatroom_id)
            .map(|m| m.timestamp)
            .min()
    }
}
