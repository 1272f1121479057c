use std::collections::HashMap;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::common::{AppEvent, Message, Sender};

const MINUTE_MS: i64 = 60_000;

/// Builds `count` synthetic messages older than `before`, oldest first,
/// one minute apart and alternating sender.
pub fn older_batch(chatroom_id: &str, before: i64, count: usize) -> Vec<Message> {
    (0..count)
        .map(|i| {
            let steps_back = (count - i) as i64;
            let sender = if i % 2 == 0 { Sender::User } else { Sender::Ai };
            let content = match sender {
                Sender::User => format!("Earlier message #{}", i + 1),
                Sender::Ai => format!("Gemini: Earlier reply #{}", i + 1),
            };
            Message {
                id: Uuid::new_v4().to_string(),
                chatroom_id: chatroom_id.to_string(),
                sender,
                content,
                timestamp: before - steps_back * MINUTE_MS,
                image: None,
            }
        })
        .collect()
}

/// Loads older history in the background, one request per chatroom.
///
/// The cursor is the earliest timestamp currently loaded for the chatroom,
/// so a batch always lands strictly before what is on screen.
pub struct HistoryLoader {
    runtime: Handle,
    events: mpsc::Sender<AppEvent>,
    delay: Duration,
    batch_size: usize,
    pending: HashMap<String, JoinHandle<()>>,
}

impl HistoryLoader {
    pub fn new(
        runtime: Handle,
        events: mpsc::Sender<AppEvent>,
        delay: Duration,
        batch_size: usize,
    ) -> Self {
        Self {
            runtime,
            events,
            delay,
            batch_size,
            pending: HashMap::new(),
        }
    }

    /// Starts loading unless a load for this chatroom is already running.
    pub fn request(&mut self, chatroom_id: &str, cursor: i64) -> bool {
        if self.is_loading(chatroom_id) {
            return false;
        }

        let chatroom_id = chatroom_id.to_string();
        let events = self.events.clone();
        let delay = self.delay;
        let batch_size = self.batch_size;
        log::debug!("Loading {batch_size} older messages for {chatroom_id} before {cursor}");

        let task = self.runtime.spawn({
            let chatroom_id = chatroom_id.clone();
            async move {
                tokio::time::sleep(delay).await;
                let batch = older_batch(&chatroom_id, cursor, batch_size);
                if let Err(err) = events
                    .send(AppEvent::HistoryLoaded { chatroom_id, batch })
                    .await
                {
                    log::warn!("Failed to deliver older messages: {err}");
                }
            }
        });
        self.pending.insert(chatroom_id, task);
        true
    }

    pub fn is_loading(&self, chatroom_id: &str) -> bool {
        self.pending.contains_key(chatroom_id)
    }

    /// Marks the load of `chatroom_id` as delivered. Returns `false` when no
    /// load was outstanding (e.g. cancelled before delivery).
    pub fn finish(&mut self, chatroom_id: &str) -> bool {
        self.pending.remove(chatroom_id).is_some()
    }

    /// Aborts the load of one chatroom. Returns whether one was running.
    pub fn cancel(&mut self, chatroom_id: &str) -> bool {
        match self.pending.remove(chatroom_id) {
            Some(task) => {
                log::debug!("Cancelled history load for {chatroom_id}");
                task.abort();
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&mut self) {
        for (_, task) in self.pending.drain() {
            task.abort();
        }
    }
}

impl Drop for HistoryLoader {
    fn drop(&mut self) {
        self.cancel_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn batch_is_ascending_and_before_cursor() {
        let batch = older_batch("room", 1_000_000, 4);
        assert_eq!(batch.len(), 4);
        assert!(batch.iter().all(|m| m.chatroom_id == "room"));
        assert!(batch.iter().all(|m| m.timestamp < 1_000_000));
        assert!(batch.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        assert_eq!(batch[3].timestamp, 1_000_000 - MINUTE_MS);
        assert_eq!(batch[0].sender, Sender::User);
        assert_eq!(batch[1].sender, Sender::Ai);
    }

    #[test]
    fn empty_batch() {
        assert!(older_batch("room", 0, 0).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn one_load_per_chatroom_at_a_time() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut loader = HistoryLoader::new(Handle::current(), tx, Duration::from_millis(1000), 3);

        assert!(loader.request("room", 10 * MINUTE_MS));
        assert!(!loader.request("room", 10 * MINUTE_MS));
        assert!(loader.is_loading("room"));

        let Some(AppEvent::HistoryLoaded { chatroom_id, batch }) = rx.recv().await else {
            panic!("expected a batch");
        };
        assert_eq!(chatroom_id, "room");
        assert_eq!(batch.len(), 3);
        assert!(loader.finish("room"));
        assert!(!loader.is_loading("room"));
        assert!(!loader.finish("room"));
    }

    #[tokio::test(start_paused = true)]
    async fn cancelled_load_never_arrives() {
        let (tx, mut rx) = mpsc::channel(4);
        let mut loader = HistoryLoader::new(Handle::current(), tx, Duration::from_millis(1000), 3);

        assert!(loader.request("room", 10 * MINUTE_MS));
        assert!(loader.cancel("room"));
        assert!(!loader.cancel("room"));
        assert!(!loader.is_loading("room"));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(rx.try_recv().is_err());
        assert!(loader.request("room", 10 * MINUTE_MS));
    }
}
