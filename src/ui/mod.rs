pub mod app;
pub mod attachment;
pub mod components;
pub mod state;

pub use app::ChatApp;
