//! Media infrastructure module

mod ffmpeg;

pub use ffmpeg::FfmpegToolkit;
