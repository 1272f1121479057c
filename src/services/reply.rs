use std::collections::HashMap;
use std::ops::Range;
use std::time::Duration;

use rand::Rng;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::common::{AppEvent, Message, Sender, now_millis};

pub const REPLY_PREFIX: &str = "Gemini: ";

/// Canned replies; the last one echoes the user's text.
pub fn reply_pool(user_text: &str) -> [String; 6] {
    [
        "That's interesting! Tell me more.".to_string(),
        "How can I assist you further?".to_string(),
        "Can you elaborate on that?".to_string(),
        "I'm here to help!".to_string(),
        "Let's talk about something else.".to_string(),
        format!("You said: \"{user_text}\""),
    ]
}

/// Picks one reply uniformly from the pool.
pub fn fake_reply<R: Rng>(rng: &mut R, user_text: &str) -> String {
    let pool = reply_pool(user_text);
    let index = rng.random_range(0..pool.len());
    format!("{REPLY_PREFIX}{}", pool[index])
}

struct PendingReply {
    ticket: u64,
    task: JoinHandle<()>,
}

/// Schedules mock AI replies, at most one pending per chatroom.
///
/// Scheduling again for the same chatroom, or cancelling, aborts the earlier
/// task. A reply that was already queued when its task got aborted still
/// carries its ticket, and [`ReplyScheduler::accept`] rejects it.
pub struct ReplyScheduler {
    runtime: Handle,
    events: mpsc::Sender<AppEvent>,
    delay_ms: Range<u64>,
    next_ticket: u64,
    pending: HashMap<String, PendingReply>,
}

impl ReplyScheduler {
    pub fn new(runtime: Handle, events: mpsc::Sender<AppEvent>, delay_ms: Range<u64>) -> Self {
        Self {
            runtime,
            events,
            delay_ms,
            next_ticket: 0,
            pending: HashMap::new(),
        }
    }

    /// Schedules a reply to `prompt` and returns its ticket.
    pub fn schedule(&mut self, prompt: &Message) -> u64 {
        self.cancel(&prompt.chatroom_id);

        self.next_ticket += 1;
        let ticket = self.next_ticket;

        // ThreadRng is not Send; draw everything before spawning.
        let mut rng = rand::rng();
        let delay = Duration::from_millis(rng.random_range(self.delay_ms.clone()));
        let content = fake_reply(&mut rng, &prompt.content);

        let chatroom_id = prompt.chatroom_id.clone();
        let events = self.events.clone();
        log::debug!("Reply #{ticket} for {chatroom_id} in {}ms", delay.as_millis());

        let task = self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            let message = Message {
                id: Uuid::new_v4().to_string(),
                chatroom_id,
                sender: Sender::Ai,
                content,
                timestamp: now_millis(),
                image: None,
            };
            if let Err(err) = events.send(AppEvent::ReplyReady { ticket, message }).await {
                log::warn!("Failed to deliver reply #{ticket}: {err}");
            }
        });

        self.pending
            .insert(prompt.chatroom_id.clone(), PendingReply { ticket, task });
        ticket
    }

    /// Aborts the pending reply of one chatroom. Returns whether one existed.
    pub fn cancel(&mut self, chatroom_id: &str) -> bool {
        match self.pending.remove(chatroom_id) {
            Some(pending) => {
                log::debug!("Cancelled reply #{} for {chatroom_id}", pending.ticket);
                pending.task.abort();
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&mut self) {
        for (_, pending) in self.pending.drain() {
            pending.task.abort();
        }
    }

    pub fn is_pending(&self, chatroom_id: &str) -> bool {
        self.pending.contains_key(chatroom_id)
    }

    /// Consumes a delivered reply. Returns `false` for a reply whose
    /// schedule was cancelled or superseded; the caller drops it.
    pub fn accept(&mut self, ticket: u64, message: &Message) -> bool {
        let current = self
            .pending
            .get(&message.chatroom_id)
            .is_some_and(|pending| pending.ticket == ticket);
        if current {
            self.pending.remove(&message.chatroom_id);
        } else {
            log::debug!("Dropping stale reply #{ticket} for {}", message.chatroom_id);
        }
        current
    }
}

impl Drop for ReplyScheduler {
    fn drop(&mut self) {
        self.cancel_all();
    }
}
