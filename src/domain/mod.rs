//! Domain layer - Core business logic
//!
//! Contains value objects, segment planning, transcript assembly and
//! domain errors. This layer has no dependencies on external systems.

pub mod config;
pub mod error;
pub mod media;
pub mod provider;
pub mod segmentation;
pub mod transcript;

// Re-export common types
pub use config::AppConfig;
pub use error::*;
pub use media::{AudioData, AudioEncoding, AudioMimeType, Duration};
pub use provider::ProviderId;
pub use segmentation::{Segment, SegmentPlan};
pub use transcript::{BatchStatus, SegmentFailure, SegmentOutcome, TranscriptionSession};
