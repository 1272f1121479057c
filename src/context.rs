use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::runtime::Handle;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::common::{AppEvent, Chatroom, Country, Message, Sender, now_millis};
use crate::config::AppConfig;
use crate::error::ValidationError;
use crate::services::{HistoryLoader, OtpVerifier, ReplyScheduler, spawn_country_fetch};
use crate::storage::{LocalStorage, PersistenceBridge};
use crate::store::{AppStore, ChatroomMessages};
use crate::validation;

const EVENT_CHANNEL_CAPACITY: usize = 100;

/// What changed after applying one background event; the view turns these
/// into notifications or navigation.
#[derive(Debug, Clone, PartialEq)]
pub enum Update {
    ReplyDelivered { chatroom_id: String },
    HistoryLoaded { chatroom_id: String, count: usize },
    OtpSent,
    OtpAccepted,
    OtpRejected,
    CountriesLoaded { countries: Vec<Country>, fallback: bool },
}

/// Owns the stores, the persistence bridge and every background task.
///
/// Built once with [`AppContext::create`] and handed to the view; torn down
/// with [`AppContext::dispose`], which cancels pending tasks and flushes the
/// chatroom snapshot.
pub struct AppContext {
    config: AppConfig,
    runtime: Handle,
    store: AppStore,
    selector: ChatroomMessages,
    persistence: PersistenceBridge,
    replies: ReplyScheduler,
    history: HistoryLoader,
    otp: OtpVerifier,
    event_sender: mpsc::Sender<AppEvent>,
    event_receiver: mpsc::Receiver<AppEvent>,
}

impl AppContext {
    pub fn create(config: AppConfig, storage: LocalStorage, runtime: Handle) -> Self {
        let (event_sender, event_receiver) = mpsc::channel(EVENT_CHANNEL_CAPACITY);

        let mut store = AppStore::new();
        let mut persistence = PersistenceBridge::new(storage, config.persist_debounce());
        persistence.hydrate(&mut store.chatrooms);

        let replies = ReplyScheduler::new(
            runtime.clone(),
            event_sender.clone(),
            config.reply_delay_range(),
        );
        let history = HistoryLoader::new(
            runtime.clone(),
            event_sender.clone(),
            Duration::from_millis(config.history_delay_ms),
            config.page_size(),
        );
        let otp = OtpVerifier::new(
            runtime.clone(),
            event_sender.clone(),
            config.mock_otp_code.clone(),
            Duration::from_millis(config.otp_send_delay_ms),
            Duration::from_millis(config.otp_delay_ms),
        );

        log::info!("App context created");
        Self {
            config,
            runtime,
            store,
            selector: ChatroomMessages::new(),
            persistence,
            replies,
            history,
            otp,
            event_sender,
            event_receiver,
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn store(&self) -> &AppStore {
        &self.store
    }

    // ========== Auth ==========

    /// Validates step one, records country and phone, and "sends" the code.
    pub fn submit_login(&mut self, country: &str, phone: &str) -> Result<(), ValidationError> {
        validation::validate_login(country, phone)?;
        self.store.auth.set_country(country);
        self.store.auth.set_phone(phone.trim());
        self.otp.send_code();
        Ok(())
    }

    /// Validates the code format, records it, and starts verification.
    pub fn submit_otp(&mut self, code: &str) -> Result<(), ValidationError> {
        validation::validate_otp(code)?;
        let code = code.trim();
        self.store.auth.set_otp(code);
        self.otp.verify(code);
        Ok(())
    }

    pub fn is_otp_busy(&self) -> bool {
        self.otp.is_busy()
    }

    pub fn logout(&mut self) {
        self.otp.cancel();
        self.replies.cancel_all();
        self.history.cancel_all();
        self.store.auth.reset();
        log::info!("Logged out");
    }

    pub fn fetch_countries(&self) {
        spawn_country_fetch(
            &self.runtime,
            self.event_sender.clone(),
            self.config.countries_url.clone(),
        );
    }

    // ========== Chatrooms ==========

    pub fn create_chatroom(&mut self, title: &str) -> Result<Chatroom, ValidationError> {
        let title = validation::validate_title(title)?;
        let room = Chatroom {
            id: Uuid::new_v4().to_string(),
            title: title.to_string(),
            created_at: now_millis(),
        };
        self.store.chatrooms.create(room.clone());
        self.persistence
            .observe(self.store.chatrooms.chatrooms(), Instant::now());
        log::info!("Created chatroom {} ({})", room.id, room.title);
        Ok(room)
    }

    /// Deletes a chatroom. Its messages stay in the message store unless
    /// `cascade_delete_messages` is set.
    pub fn delete_chatroom(&mut self, id: &str) -> bool {
        if !self.store.chatrooms.delete(id) {
            return false;
        }
        self.replies.cancel(id);
        self.history.cancel(id);
        if self.config.cascade_delete_messages {
            let dropped = self.store.messages.remove_chatroom(id);
            log::info!("Deleted chatroom {id} and {dropped} messages");
        } else {
            log::info!("Deleted chatroom {id}");
        }
        self.persistence
            .observe(self.store.chatrooms.chatrooms(), Instant::now());
        true
    }

    // ========== Messages ==========

    /// Appends the user's message and schedules the mock reply.
    pub fn send_message(
        &mut self,
        chatroom_id: &str,
        text: &str,
        image: Option<String>,
    ) -> Result<Message, ValidationError> {
        validation::validate_message(text, image.is_some())?;
        let message = Message {
            id: Uuid::new_v4().to_string(),
            chatroom_id: chatroom_id.to_string(),
            sender: Sender::User,
            content: text.to_string(),
            timestamp: now_millis(),
            image,
        };
        self.store.messages.append(message.clone());
        self.replies.schedule(&message);
        Ok(message)
    }

    pub fn is_reply_pending(&self, chatroom_id: &str) -> bool {
        self.replies.is_pending(chatroom_id)
    }

    pub fn cancel_reply(&mut self, chatroom_id: &str) -> bool {
        self.replies.cancel(chatroom_id)
    }

    /// Memoized projection of one chatroom's messages.
    pub fn messages_for(&mut self, chatroom_id: &str) -> Arc<Vec<Message>> {
        self.selector
            .select(self.store.messages.messages(), chatroom_id)
    }

    /// Starts loading an older batch before the earliest loaded message.
    pub fn request_older(&mut self, chatroom_id: &str) -> bool {
        let cursor = self
            .store
            .messages
            .earliest_timestamp(chatroom_id)
            .unwrap_or_else(now_millis);
        self.history.request(chatroom_id, cursor)
    }

    pub fn is_loading_history(&self, chatroom_id: &str) -> bool {
        self.history.is_loading(chatroom_id)
    }

    // ========== Preferences ==========

    pub fn dark_mode(&self) -> bool {
        self.persistence.load_dark_mode()
    }

    pub fn set_dark_mode(&self, enabled: bool) {
        self.persistence.save_dark_mode(enabled);
    }

    // ========== Events ==========

    /// Applies every event that is ready, then gives the persistence bridge
    /// a chance to write. Never blocks.
    pub fn pump_events(&mut self) -> Vec<Update> {
        let mut updates = Vec::new();
        while let Ok(event) = self.event_receiver.try_recv() {
            if let Some(update) = self.apply(event) {
                updates.push(update);
            }
        }
        self.persistence.tick(Instant::now());
        updates
    }

    /// Waits for the next event that produces an update and applies it.
    pub async fn next_update(&mut self) -> Option<Update> {
        while let Some(event) = self.event_receiver.recv().await {
            if let Some(update) = self.apply(event) {
                return Some(update);
            }
        }
        None
    }

    fn apply(&mut self, event: AppEvent) -> Option<Update> {
        match event {
            AppEvent::ReplyReady { ticket, message } => {
                if !self.replies.accept(ticket, &message) {
                    return None;
                }
                let chatroom_id = message.chatroom_id.clone();
                self.store.messages.append(message);
                Some(Update::ReplyDelivered { chatroom_id })
            }
            AppEvent::HistoryLoaded { chatroom_id, batch } => {
                if !self.history.finish(&chatroom_id) {
                    return None;
                }
                let count = batch.len();
                self.store.messages.prepend(batch);
                Some(Update::HistoryLoaded { chatroom_id, count })
            }
            AppEvent::OtpSent => Some(Update::OtpSent),
            AppEvent::OtpChecked { accepted: true } => {
                self.store.auth.set_authenticated(true);
                Some(Update::OtpAccepted)
            }
            AppEvent::OtpChecked { accepted: false } => Some(Update::OtpRejected),
            AppEvent::CountriesLoaded {
                countries,
                fallback,
            } => Some(Update::CountriesLoaded {
                countries,
                fallback,
            }),
        }
    }

    /// Cancels pending work and writes the latest chatroom snapshot.
    pub fn dispose(mut self) {
        self.replies.cancel_all();
        self.history.cancel_all();
        self.otp.cancel();
        self.persistence
            .observe(self.store.chatrooms.chatrooms(), Instant::now());
        self.persistence.flush();
        log::info!(
            "App context disposed ({} snapshot writes)",
            self.persistence.writes()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context(config: AppConfig) -> AppContext {
        AppContext::create(config, LocalStorage::in_memory().unwrap(), Handle::current())
    }

    #[tokio::test(start_paused = true)]
    async fn login_flow_authenticates_on_matching_code() {
        let mut ctx = context(AppConfig::default());

        assert_eq!(
            ctx.submit_login("", "0912345678"),
            Err(ValidationError::CountryRequired)
        );
        ctx.submit_login("VN", "0912345678").unwrap();
        assert_eq!(ctx.store().auth.state().country, "VN");
        assert_eq!(ctx.next_update().await, Some(Update::OtpSent));

        ctx.submit_otp("654321").unwrap();
        assert_eq!(ctx.next_update().await, Some(Update::OtpRejected));
        assert!(!ctx.store().auth.is_authenticated());

        ctx.submit_otp("123456").unwrap();
        assert_eq!(ctx.next_update().await, Some(Update::OtpAccepted));
        assert!(ctx.store().auth.is_authenticated());

        ctx.logout();
        assert!(!ctx.store().auth.is_authenticated());
        assert!(ctx.store().auth.state().phone.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn invalid_title_creates_nothing() {
        let mut ctx = context(AppConfig::default());
        assert_eq!(ctx.create_chatroom("x"), Err(ValidationError::TitleTooShort));
        assert!(ctx.store().chatrooms.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn delete_cancels_pending_reply() {
        let mut ctx = context(AppConfig::default());
        let room = ctx.create_chatroom("Trip Planning").unwrap();
        ctx.send_message(&room.id, "Hello", None).unwrap();
        assert!(ctx.is_reply_pending(&room.id));

        assert!(ctx.delete_chatroom(&room.id));
        assert!(!ctx.is_reply_pending(&room.id));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(ctx.pump_events().is_empty());
        assert_eq!(ctx.store().messages.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn cascade_delete_drops_messages() {
        let config = AppConfig {
            cascade_delete_messages: true,
            ..AppConfig::default()
        };
        let mut ctx = context(config);
        let keep = ctx.create_chatroom("Keep").unwrap();
        let gone = ctx.create_chatroom("Gone").unwrap();
        ctx.send_message(&keep.id, "stay", None).unwrap();
        ctx.send_message(&gone.id, "bye", None).unwrap();

        ctx.delete_chatroom(&gone.id);
        assert!(ctx.messages_for(&gone.id).is_empty());
        assert_eq!(ctx.messages_for(&keep.id).len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn delete_cancels_pending_history_load() {
        let config = AppConfig {
            cascade_delete_messages: true,
            page_size: 5,
            ..AppConfig::default()
        };
        let mut ctx = context(config);
        let room = ctx.create_chatroom("Gone").unwrap();
        assert!(ctx.request_older(&room.id));

        assert!(ctx.delete_chatroom(&room.id));
        assert!(!ctx.is_loading_history(&room.id));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(ctx.pump_events().is_empty());
        assert!(ctx.messages_for(&room.id).is_empty());
        assert!(ctx.store().messages.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn logout_cancels_pending_history_load() {
        let mut ctx = context(AppConfig::default());
        let room = ctx.create_chatroom("Later").unwrap();
        assert!(ctx.request_older(&room.id));

        ctx.logout();
        assert!(!ctx.is_loading_history(&room.id));

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert!(ctx.pump_events().is_empty());
        assert!(ctx.store().messages.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn older_history_is_prepended_before_loaded_messages() {
        let config = AppConfig {
            page_size: 5,
            ..AppConfig::default()
        };
        let mut ctx = context(config);
        let room = ctx.create_chatroom("History").unwrap();
        let sent = ctx.send_message(&room.id, "latest", None).unwrap();
        ctx.cancel_reply(&room.id);

        assert!(ctx.request_older(&room.id));
        assert!(ctx.is_loading_history(&room.id));
        assert_eq!(
            ctx.next_update().await,
            Some(Update::HistoryLoaded {
                chatroom_id: room.id.clone(),
                count: 5
            })
        );
        assert!(!ctx.is_loading_history(&room.id));

        let messages = ctx.messages_for(&room.id);
        assert_eq!(messages.len(), 6);
        assert_eq!(messages[5].id, sent.id);
        assert!(messages[..5].iter().all(|m| m.timestamp < sent.timestamp));
    }

    #[tokio::test(start_paused = true)]
    async fn image_only_message_is_accepted() {
        let mut ctx = context(AppConfig::default());
        let room = ctx.create_chatroom("Pics").unwrap();
        assert_eq!(
            ctx.send_message(&room.id, "", None),
            Err(ValidationError::EmptyMessage)
        );
        let message = ctx
            .send_message(&room.id, "", Some("data:image/png;base64,AAAA".into()))
            .unwrap();
        assert!(message.image.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn dispose_flushes_pending_snapshot() {
        let path = std::env::temp_dir()
            .join(format!("rust_chatroom_{}", Uuid::new_v4()))
            .join("client.db");
        let config = AppConfig {
            persist_debounce_ms: 60_000,
            ..AppConfig::default()
        };

        let mut ctx = AppContext::create(
            config.clone(),
            LocalStorage::with_path(&path).unwrap(),
            Handle::current(),
        );
        ctx.create_chatroom("Unsaved").unwrap();
        ctx.pump_events();
        assert!(ctx.persistence.read_snapshot().is_none());
        ctx.dispose();

        let reopened = AppContext::create(
            config,
            LocalStorage::with_path(&path).unwrap(),
            Handle::current(),
        );
        let titles: Vec<_> = reopened
            .store()
            .chatrooms
            .chatrooms()
            .iter()
            .map(|room| room.title.as_str())
            .collect();
        assert_eq!(titles, ["Unsaved"]);
    }
}
