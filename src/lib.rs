//! Mock-authenticated chat client: chatroom and message stores with a
//! memoized per-room projection, a debounced local-storage mirror of the
//! chatroom list, and cancellable simulated AI replies, behind an egui
//! front end.

pub mod common;
pub mod config;
pub mod context;
pub mod error;
pub mod services;
pub mod storage;
pub mod store;
pub mod ui;
pub mod validation;

pub use context::{AppContext, Update};
