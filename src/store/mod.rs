pub mod auth;
pub mod chatrooms;
pub mod messages;
pub mod pagination;
pub mod selector;

pub use auth::{AuthState, AuthStore};
pub use chatrooms::ChatroomStore;
pub use messages::MessageStore;
pub use pagination::Pagination;
pub use selector::ChatroomMessages;

/// The three entity stores. Each owns its collection; only its own
/// operations mutate it.
#[derive(Debug, Default)]
pub struct AppStore {
    pub auth: AuthStore,
    pub chatrooms: ChatroomStore,
    pub messages: MessageStore,
}

impl AppStore {
    pub fn new() -> Self {
        Self::default()
    }
}
