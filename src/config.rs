use std::fs;
use std::ops::Range;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub const DEFAULT_CONFIG_PATH: &str = "config/chatroom.json";
pub const DEFAULT_COUNTRIES_URL: &str =
    "https://restcountries.com/v3.1/all?fields=name,cca2,idd,flags";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// SQLite file backing local storage.
    pub storage_path: String,
    /// Messages per pagination page.
    pub page_size: usize,
    /// Mock reply delay bounds in milliseconds, `[start, end)`.
    pub reply_delay_ms: [u64; 2],
    pub history_delay_ms: u64,
    pub otp_delay_ms: u64,
    pub otp_send_delay_ms: u64,
    pub mock_otp_code: String,
    pub persist_debounce_ms: u64,
    /// Remove a chatroom's messages together with the chatroom.
    pub cascade_delete_messages: bool,
    pub countries_url: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            storage_path: "data/client.db".to_string(),
            page_size: 20,
            reply_delay_ms: [1200, 2200],
            history_delay_ms: 1000,
            otp_delay_ms: 1000,
            otp_send_delay_ms: 800,
            mock_otp_code: "123456".to_string(),
            persist_debounce_ms: 300,
            cascade_delete_messages: false,
            countries_url: DEFAULT_COUNTRIES_URL.to_string(),
        }
    }
}

impl AppConfig {
    pub fn reply_delay_range(&self) -> Range<u64> {
        let [start, end] = self.reply_delay_ms;
        // An inverted or empty range collapses to a fixed delay.
        if end > start { start..end } else { start..start + 1 }
    }

    pub fn persist_debounce(&self) -> Duration {
        Duration::from_millis(self.persist_debounce_ms)
    }

    pub fn page_size(&self) -> usize {
        self.page_size.max(1)
    }
}

pub fn load_config(path: &str) -> AppConfig {
    let path = Path::new(path);
    match fs::read_to_string(path) {
        Ok(content) => match serde_json::from_str::<AppConfig>(&content) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Failed to parse config file {}: {err}", path.display());
                AppConfig::default()
            }
        },
        Err(err) => {
            log::info!(
                "Config file {} not found ({err}); using defaults",
                path.display()
            );
            AppConfig::default()
        }
    }
}
