//! Encoding of a concatenated timeline.
//!
//! `filters` builds the ffmpeg filter graph that normalizes and joins the
//! clips; `concat` wraps it into a full ffmpeg command and runs it.

pub mod concat;
pub mod filters;

pub use concat::{ConcatPlan, build_concat_command, run_concat_encode};
pub use filters::ConcatFilterGraph;
