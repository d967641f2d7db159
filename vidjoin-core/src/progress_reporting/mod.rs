//! Progress Reporting API
//!
//! This module provides a minimal API for the core library to report progress
//! and output messages without depending on CLI-specific formatting. The CLI
//! installs a reporter with [`set_progress_reporter`]; without one, every
//! call is a no-op and only the `log` facade records what happened.

pub mod ffmpeg_handler;

use std::path::Path;
use std::sync::{LazyLock, Mutex};

/// Represents different levels of output for structured reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputLevel {
    /// Major workflow phases (===== SECTION =====)
    Section,
    /// Processing steps (» Processing)
    Processing,
    /// Success messages (✓ Success)
    Success,
    /// Error messages
    Error,
    /// Warning messages
    Warning,
    /// Debug information
    Debug,
    /// General information
    Info,
}

/// Trait implemented by user-facing output layers.
pub trait ProgressReporter: Send + Sync {
    /// Output a message at a specific level
    fn output(&self, level: OutputLevel, text: &str);

    /// Output a key-value status pair
    fn output_status(&self, label: &str, value: &str, highlight: bool);

    /// Report progress with a progress bar
    fn progress_bar(&self, percent: f32, elapsed_secs: f64, total_secs: f64);

    /// Clear any active progress bar
    fn clear_progress_bar(&self);

    /// Output raw `FFmpeg` command for debugging
    fn ffmpeg_command(&self, cmd_data: &str);
}

static PROGRESS_REPORTER: LazyLock<Mutex<Option<Box<dyn ProgressReporter>>>> =
    LazyLock::new(|| Mutex::new(None));

/// Set the global progress reporter
pub fn set_progress_reporter(reporter: Box<dyn ProgressReporter>) {
    if let Ok(mut r) = PROGRESS_REPORTER.lock() {
        *r = Some(reporter);
    }
}

/// Execute a function with the progress reporter if available
#[inline]
pub fn with_reporter<F>(f: F)
where
    F: FnOnce(&dyn ProgressReporter),
{
    if let Ok(guard) = PROGRESS_REPORTER.lock() {
        if let Some(reporter) = guard.as_ref() {
            f(reporter.as_ref());
        }
    }
}

/// Output a section header
pub fn section(title: &str) {
    with_reporter(|r| r.output(OutputLevel::Section, title));
}

/// Output a processing step
pub fn processing(message: &str) {
    with_reporter(|r| r.output(OutputLevel::Processing, message));
}

/// Output a status line
pub fn status(label: &str, value: &str, highlight: bool) {
    with_reporter(|r| r.output_status(label, value, highlight));
}

/// Output a success message
pub fn success(message: &str) {
    with_reporter(|r| r.output(OutputLevel::Success, message));
}

/// Output an error message
pub fn error(message: &str) {
    with_reporter(|r| r.output(OutputLevel::Error, message));
}

/// Output a warning message
pub fn warning(message: &str) {
    with_reporter(|r| r.output(OutputLevel::Warning, message));
}

/// Output debug information
pub fn debug(message: &str) {
    with_reporter(|r| r.output(OutputLevel::Debug, message));
}

/// Output general information
pub fn info(message: &str) {
    with_reporter(|r| r.output(OutputLevel::Info, message));
}

/// Report progress
pub fn progress(percent: f32, elapsed_secs: f64, total_secs: f64) {
    with_reporter(|r| r.progress_bar(percent, elapsed_secs, total_secs));
}

/// Clear progress bar
pub fn clear_progress() {
    with_reporter(|r| r.clear_progress_bar());
}

/// Report `FFmpeg` command
pub fn ffmpeg_command(cmd_data: &str) {
    with_reporter(|r| r.ffmpeg_command(cmd_data));
}

/// Report the properties of an opened clip
pub fn clip_opened(index: usize, path: &Path, width: u32, height: u32, fps: f64, has_audio: bool) {
    let filename = crate::utils::get_filename_safe(path).unwrap_or_else(|_| path.display().to_string());
    status(
        &format!("Clip {}", index + 1),
        &format!(
            "{filename} ({width}x{height} @ {} fps, {})",
            crate::utils::format_fps(fps),
            if has_audio { "audio" } else { "no audio" }
        ),
        false,
    );
}

/// Report encode start
pub fn encode_start(clip_count: usize, output_path: &Path) {
    processing(&format!("Concatenating {clip_count} clips"));
    debug(&format!("Output: {}", output_path.display()));
}
