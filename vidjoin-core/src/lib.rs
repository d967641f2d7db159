//! Core library for concatenating video files using ffmpeg and ffprobe.
//!
//! This crate opens an ordered list of clips, normalizes their resolution
//! and audio, joins them into one timeline, optionally resamples the frame
//! rate, and encodes the result to a single H.264/AAC file.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use vidjoin_core::{ConcatConfig, concatenate_videos, default_output_path};
//! use vidjoin_core::external::{CrateFfprobeExecutor, SidecarFfmpegSpawner};
//! use std::path::PathBuf;
//!
//! let config = ConcatConfig::from_sentinels(true, 1280, 720, 0.0);
//! config.validate().unwrap();
//!
//! let inputs = vec![PathBuf::from("intro.mp4"), PathBuf::from("main.mov")];
//! let output = concatenate_videos(
//!     &SidecarFfmpegSpawner,
//!     &CrateFfprobeExecutor::new(),
//!     &inputs,
//!     &config,
//!     &default_output_path(),
//! ).unwrap();
//! ```

pub mod clip;
pub mod config;
pub mod encoding;
pub mod error;
pub mod external;
pub mod output;
pub mod pipeline;
pub mod progress_reporting;
pub mod utils;

// Re-exports for public API
pub use clip::{ClipProperties, Timeline, VideoClip};
pub use config::{ConcatConfig, default_output_path};
pub use error::{CoreError, CoreResult};
pub use external::{
    CrateFfprobeExecutor, FfprobeExecutor, SidecarFfmpegSpawner, check_media_tools,
};
pub use pipeline::{ConcatResult, concatenate_videos, run_concat, validate_request};
pub use utils::{format_bytes, format_duration, format_fps};
