pub mod database;
pub mod local_storage;
pub mod persistence;

pub use local_storage::LocalStorage;
pub use persistence::{CHATROOMS_KEY, DARK_MODE_KEY, PersistenceBridge};
