pub mod chat_area;
pub mod dashboard;
pub mod input_bar;
pub mod login;
pub mod notifications;
pub mod otp;
