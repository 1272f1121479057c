use std::time::{Duration, Instant};

use crate::common::Country;
use crate::store::Pagination;

const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Màn hình hiện tại của ứng dụng.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Login,
    Otp,
    Dashboard,
    Chatroom(String),
}

impl Screen {
    pub fn requires_auth(&self) -> bool {
        matches!(self, Screen::Dashboard | Screen::Chatroom(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub kind: NoticeKind,
    pub text: String,
    pub created_at: Instant,
}

/// Transient toasts, dropped after a fixed lifetime or when dismissed.
#[derive(Debug)]
pub struct Notifications {
    items: Vec<Notification>,
    ttl: Duration,
}

impl Default for Notifications {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            ttl: NOTIFICATION_TTL,
        }
    }
}

impl Notifications {
    pub fn success(&mut self, text: impl Into<String>, now: Instant) {
        self.push(NoticeKind::Success, text.into(), now);
    }

    pub fn error(&mut self, text: impl Into<String>, now: Instant) {
        self.push(NoticeKind::Error, text.into(), now);
    }

    fn push(&mut self, kind: NoticeKind, text: String, now: Instant) {
        self.items.push(Notification {
            kind,
            text,
            created_at: now,
        });
    }

    pub fn prune(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.items
            .retain(|item| now.saturating_duration_since(item.created_at) < ttl);
    }

    pub fn dismiss(&mut self, index: usize) {
        if index < self.items.len() {
            self.items.remove(index);
        }
    }

    pub fn items(&self) -> &[Notification] {
        &self.items
    }
}

#[derive(Debug, Default)]
pub struct LoginForm {
    pub country: String,
    pub phone: String,
    pub error: Option<String>,
    pub sending: bool,
}

#[derive(Debug, Default)]
pub struct OtpForm {
    pub code: String,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
pub struct DashboardForm {
    pub title: String,
    pub error: Option<String>,
    pub search: String,
}

/// Input state of the open chatroom; discarded when leaving it.
#[derive(Debug)]
pub struct ChatroomView {
    pub chatroom_id: String,
    pub input_text: String,
    pub image_path: String,
    /// Encoded attachment waiting to be sent.
    pub image: Option<String>,
    pub pagination: Pagination,
}

impl ChatroomView {
    pub fn new(chatroom_id: String, page_size: usize) -> Self {
        Self {
            chatroom_id,
            input_text: String::new(),
            image_path: String::new(),
            image: None,
            pagination: Pagination::new(page_size),
        }
    }
}

/// Trạng thái cục bộ của UI.
pub struct ViewState {
    pub screen: Screen,
    pub countries: Vec<Country>,
    pub countries_loading: bool,
    pub login: LoginForm,
    pub otp: OtpForm,
    pub dashboard: DashboardForm,
    pub chatroom: Option<ChatroomView>,
    pub notifications: Notifications,
    pub dark_mode: bool,
}

impl ViewState {
    pub fn new(dark_mode: bool) -> Self {
        Self {
            screen: Screen::Login,
            countries: Vec::new(),
            countries_loading: true,
            login: LoginForm::default(),
            otp: OtpForm::default(),
            dashboard: DashboardForm::default(),
            chatroom: None,
            notifications: Notifications::default(),
            dark_mode,
        }
    }

    /// Keeps unauthenticated viewers on the entry flow and sends
    /// authenticated ones past it.
    pub fn guard(&mut self, authenticated: bool) {
        if !authenticated && self.screen.requires_auth() {
            log::debug!("Redirecting unauthenticated viewer to login");
            self.navigate(Screen::Login, 1);
        } else if authenticated && matches!(self.screen, Screen::Login | Screen::Otp) {
            self.navigate(Screen::Dashboard, 1);
        }
    }

    pub fn navigate(&mut self, screen: Screen, page_size: usize) {
        self.chatroom = match &screen {
            Screen::Chatroom(id) => Some(ChatroomView::new(id.clone(), page_size)),
            _ => None,
        };
        self.screen = screen;
    }
}
