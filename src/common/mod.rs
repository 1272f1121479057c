pub mod events;
pub mod types;

pub use events::AppEvent;
pub use types::{Chatroom, Country, Message, Sender, now_millis};
