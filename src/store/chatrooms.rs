use std::sync::Arc;

use crate::common::Chatroom;

/// Ordered chatroom collection, newest first.
///
/// The collection sits behind an `Arc` and every mutation yields a new
/// allocation whenever a reader still holds the previous one, so identity
/// comparison (`Arc::ptr_eq`) tells observers whether anything changed.
#[derive(Debug, Default)]
pub struct ChatroomStore {
    chatrooms: Arc<Vec<Chatroom>>,
}

impl ChatroomStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn chatrooms(&self) -> &Arc<Vec<Chatroom>> {
        &self.chatrooms
    }

    pub fn len(&self) -> usize {
        self.chatrooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chatrooms.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Chatroom> {
        self.chatrooms.iter().find(|room| room.id == id)
    }

    /// Bulk replace, used once when hydrating from storage.
    pub fn replace_all(&mut self, chatrooms: Vec<Chatroom>) {
        log::debug!("chatrooms: replace_all ({} entries)", chatrooms.len());
        self.chatrooms = Arc::new(chatrooms);
    }

    /// Inserts at the front. The caller supplies a fresh id.
    pub fn create(&mut self, room: Chatroom) {
        log::debug!("chatrooms: create {}", room.id);
        Arc::make_mut(&mut self.chatrooms).insert(0, room);
    }

    /// Removes every entry with `id`. Returns whether anything was removed;
    /// an unknown id is a no-op.
    pub fn delete(&mut self, id: &str) -> bool {
        if !self.chatrooms.iter().any(|room| room.id == id) {
            return false;
        }
        log::debug!("chatrooms: delete {id}");
        Arc::make_mut(&mut self.chatrooms).retain(|room| room.id != id);
        true
    }

    /// Case-insensitive title filter for the dashboard search box.
    pub fn search(&self, query: &str) -> Vec<&Chatroom> {
        let query = query.trim().to_lowercase();
        self.chatrooms
            .iter()
            .filter(|room| query.is_empty() || room.title.to_lowercase().contains(&query))
            .collect()
    }
}
