use std::sync::Arc;

use crate::common::Message;

/// Memoized "messages of one chatroom" projection.
///
/// The result is recomputed only when the source collection identity or the
/// requested chatroom id differs from the previous call; otherwise the same
/// `Arc` is handed back, so `Arc::ptr_eq` holds between the two results.
#[derive(Debug, Default)]
pub struct ChatroomMessages {
    cache: Option<Cached>,
}

#[derive(Debug)]
struct Cached {
    // Holding the source keeps its allocation alive, so a pointer match
    // cannot come from a freed-and-reused address.
    source: Arc<Vec<Message>>,
    chatroom_id: String,
    output: Arc<Vec<Message>>,
}

impl ChatroomMessages {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, source: &Arc<Vec<Message>>, chatroom_id: &str) -> Arc<Vec<Message>> {
        if let Some(cached) = &self.cache {
            if Arc::ptr_eq(&cached.source, source) && cached.chatroom_id == chatroom_id {
                return Arc::clone(&cached.output);
            }
        }

        let output = Arc::new(project(source, chatroom_id));
        self.cache = Some(Cached {
            source: Arc::clone(source),
            chatroom_id: chatroom_id.to_string(),
            output: Arc::clone(&output),
        });
        output
    }
}

/// Messages owned by `chatroom_id`, in their original relative order.
pub fn project(messages: &[Message], chatroom_id: &str) -> Vec<Message> {
    messages
        .iter()
        .filter(|m| m.chatroom_id == chatroom_id)
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Sender;
    use crate::store::MessageStore;

    fn msg(id: &str, chatroom: &str) -> Message {
        Message {
            id: id.to_string(),
            chatroom_id: chatroom.to_string(),
            sender: Sender::Ai,
            content: String::new(),
            timestamp: 0,
            image: None,
        }
    }

    fn ids(messages: &[Message]) -> Vec<&str> {
        messages.iter().map(|m| m.id.as_str()).collect()
    }

    #[test]
    fn same_source_and_id_returns_same_reference() {
        let mut store = MessageStore::new();
        store.append(msg("1", "a"));
        let mut selector = ChatroomMessages::new();

        let first = selector.select(store.messages(), "a");
        let second = selector.select(store.messages(), "a");
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn changed_id_or_source_recomputes() {
        let mut store = MessageStore::new();
        store.append(msg("1", "a"));
        store.append(msg("2", "b"));
        let mut selector = ChatroomMessages::new();

        let a = selector.select(store.messages(), "a");
        let b = selector.select(store.messages(), "b");
        assert_eq!(ids(&a), ["1"]);
        assert_eq!(ids(&b), ["2"]);

        store.append(msg("3", "b"));
        let b_again = selector.select(store.messages(), "b");
        assert!(!Arc::ptr_eq(&b, &b_again));
        assert_eq!(ids(&b_again), ["2", "3"]);
    }

    #[test]
    fn append_lands_at_end_of_owner_projection_only() {
        let mut store = MessageStore::new();
        store.append(msg("1", "a"));
        store.append(msg("2", "b"));
        let before_b = project(store.messages(), "b");

        store.append(msg("3", "a"));
        assert_eq!(ids(&project(store.messages(), "a")), ["1", "3"]);
        assert_eq!(project(store.messages(), "b"), before_b);
    }

    #[test]
    fn prepend_projects_as_batch_then_previous() {
        let mut store = MessageStore::new();
        store.append(msg("3", "a"));
        store.append(msg("x", "b"));
        let previous = project(store.messages(), "a");

        let batch = vec![msg("1", "a"), msg("2", "a")];
        store.prepend(batch.clone());

        let mut expected = batch;
        expected.extend(previous);
        assert_eq!(project(store.messages(), "a"), expected);
    }

    #[test]
    fn unknown_chatroom_projects_empty() {
        let mut store = MessageStore::new();
        store.append(msg("1", "a"));
        assert!(project(store.messages(), "nope").is_empty());
    }
}
