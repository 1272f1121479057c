use chrono::Utc;
use serde::{Deserialize, Serialize};

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Một phòng chat do người dùng tạo trên dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chatroom {
    pub id: String,
    pub title: String,
    /// Epoch milliseconds.
    pub created_at: i64,
}

/// Who authored a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Ai,
}

impl Sender {
    pub fn is_user(self) -> bool {
        matches!(self, Sender::User)
    }
}

/// Domain model đại diện một tin nhắn chat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub chatroom_id: String,
    pub sender: Sender,
    pub content: String,
    pub timestamp: i64,
    /// Encoded image payload (`data:` URL), opaque to the stores.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Country record consumed by the login screen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub name: String,
    pub code: String,
    pub dial_code: String,
    pub flag: String,
}

impl Country {
    pub fn label(&self) -> String {
        format!("{} ({})", self.name, self.dial_code)
    }
}
