//! Session persistence adapters

mod json_store;

pub use json_store::{JsonSessionStore, SESSION_FILE_NAME};
