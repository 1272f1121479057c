pub mod countries;
pub mod history;
pub mod otp;
pub mod reply;

pub use countries::{fallback_countries, spawn_country_fetch};
pub use history::HistoryLoader;
pub use otp::OtpVerifier;
pub use reply::ReplyScheduler;
