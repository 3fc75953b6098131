//! Port interfaces (traits) for external systems
//!
//! These traits define the boundaries between the application
//! and infrastructure layers.

pub mod config;
pub mod media;
pub mod session;
pub mod transcriber;

// Re-export common types
pub use config::ConfigStore;
pub use media::{MediaError, MediaToolkit};
pub use session::{SessionError, SessionStore};
pub use transcriber::{Transcriber, TranscriptionError};
