//! SegmentScribe - transcription of long recordings in size-bounded segments
//!
//! This crate extracts the audio track of a media file, splits it into
//! segments that fit a speech-to-text provider's upload limit, transcribes
//! each segment with bounded retries, and assembles the results. Segments
//! that keep failing are reported, not fatal: their files are retained and
//! a session is saved so only those segments can be retried later.
//!
//! # Architecture
//!
//! The crate follows hexagonal (ports & adapters) architecture:
//!
//! - **Domain**: Segment planning, transcript assembly, config and sessions
//! - **Application**: The transcription use case, retry policy and port traits
//! - **Infrastructure**: Adapters (FFmpeg, Groq, AssemblyAI, Gemini, XDG config, JSON sessions)
//! - **CLI**: Command-line interface, argument parsing and output formatting

pub mod application;
pub mod cli;
pub mod domain;
pub mod infrastructure;
