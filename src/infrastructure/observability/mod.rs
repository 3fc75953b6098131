//! Logging setup

mod init_tracing;

pub use init_tracing::{default_filter, init_tracing};
