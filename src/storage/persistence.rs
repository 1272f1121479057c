use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::common::Chatroom;
use crate::error::StorageError;
use crate::store::ChatroomStore;

use super::local_storage::LocalStorage;

pub const CHATROOMS_KEY: &str = "chatrooms";
pub const DARK_MODE_KEY: &str = "darkMode";

/// One-way mirror of the chatroom collection into local storage.
///
/// Changes are detected by collection identity and coalesced: a snapshot is
/// written once the collection has stayed unchanged for the debounce
/// window, or immediately on [`PersistenceBridge::flush`].
pub struct PersistenceBridge {
    storage: LocalStorage,
    debounce: Duration,
    observed: Option<Arc<Vec<Chatroom>>>,
    dirty_since: Option<Instant>,
    writes: usize,
}

impl PersistenceBridge {
    pub fn new(storage: LocalStorage, debounce: Duration) -> Self {
        Self {
            storage,
            debounce,
            observed: None,
            dirty_since: None,
            writes: 0,
        }
    }

    /// Reads the stored snapshot. Absent, unreadable or malformed data all
    /// yield `None`; the caller treats that as an empty collection.
    pub fn read_snapshot(&self) -> Option<Vec<Chatroom>> {
        let raw = match self.storage.get_item(CHATROOMS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                log::warn!("Failed to read chatroom snapshot: {err}");
                return None;
            }
        };
        match serde_json::from_str::<Vec<Chatroom>>(&raw) {
            Ok(chatrooms) => Some(chatrooms),
            Err(err) => {
                log::warn!("Discarding malformed chatroom snapshot: {err}");
                None
            }
        }
    }

    /// One-time startup load into `store`.
    pub fn hydrate(&mut self, store: &mut ChatroomStore) {
        let snapshot = self.read_snapshot();
        let loaded = snapshot.is_some();
        store.replace_all(snapshot.unwrap_or_default());
        log::info!("Hydrated {} chatrooms from local storage", store.len());

        self.observed = Some(Arc::clone(store.chatrooms()));
        // A corrupted snapshot gets replaced by the (empty) in-memory state.
        self.dirty_since = if loaded { None } else { Some(Instant::now()) };
    }

    /// Notes the current collection; a new identity marks the bridge dirty.
    pub fn observe(&mut self, chatrooms: &Arc<Vec<Chatroom>>, now: Instant) {
        let unchanged = self
            .observed
            .as_ref()
            .is_some_and(|seen| Arc::ptr_eq(seen, chatrooms));
        if unchanged {
            return;
        }
        self.observed = Some(Arc::clone(chatrooms));
        self.dirty_since = Some(now);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty_since.is_some()
    }

    /// Writes the pending snapshot once the debounce window has elapsed.
    pub fn tick(&mut self, now: Instant) {
        let Some(since) = self.dirty_since else {
            return;
        };
        if now.saturating_duration_since(since) >= self.debounce {
            self.flush();
        }
    }

    /// Writes the pending snapshot now, if any.
    pub fn flush(&mut self) {
        if self.dirty_since.take().is_none() {
            return;
        }
        let Some(chatrooms) = self.observed.as_ref() else {
            return;
        };
        match self.write_snapshot(chatrooms) {
            Ok(()) => {
                self.writes += 1;
                log::debug!("Persisted {} chatrooms", chatrooms.len());
            }
            Err(err) => log::warn!("Failed to persist chatrooms: {err}"),
        }
    }

    fn write_snapshot(&self, chatrooms: &[Chatroom]) -> Result<(), StorageError> {
        let json = serde_json::to_string(chatrooms)?;
        self.storage.set_item(CHATROOMS_KEY, &json)?;
        Ok(())
    }

    /// Number of snapshots written so far.
    pub fn writes(&self) -> usize {
        self.writes
    }

    pub fn load_dark_mode(&self) -> bool {
        match self.storage.get_item(DARK_MODE_KEY) {
            Ok(Some(value)) => value == "true",
            Ok(None) => false,
            Err(err) => {
                log::warn!("Failed to read dark mode flag: {err}");
                false
            }
        }
    }

    pub fn save_dark_mode(&self, enabled: bool) {
        let value = if enabled { "true" } else { "false" };
        if let Err(err) = self.storage.set_item(DARK_MODE_KEY, value) {
            log::warn!("Failed to persist dark mode flag: {err}");
        }
    }

    pub fn storage(&self) -> &LocalStorage {
        &self.storage
    }
}
