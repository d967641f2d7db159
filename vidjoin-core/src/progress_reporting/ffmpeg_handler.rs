//! `FFmpeg` progress handler
//!
//! Turns the event stream of a running ffmpeg process into progress reports
//! and log records, and keeps the stderr text for error messages.

use crate::error::CoreResult;
use crate::utils::{format_duration, parse_ffmpeg_time};
use ffmpeg_sidecar::event::{FfmpegEvent, FfmpegProgress, LogLevel as FfmpegLogLevel};
use std::time::Instant;

/// Minimum percentage step between two progress reports.
const PROGRESS_STEP_PERCENT: f64 = 3.0;

/// Handler for `FFmpeg` progress events
pub struct FfmpegProgressHandler {
    duration: Option<f64>,
    start_time: Instant,
    last_progress_percent: f64,
    last_logged_percent_threshold: i32,
    stderr_buffer: String,
}

impl FfmpegProgressHandler {
    /// Creates a new handler; `duration` is the expected output length in seconds.
    #[must_use]
    pub fn new(duration: Option<f64>) -> Self {
        Self {
            duration: duration.filter(|&d| d > 0.0),
            start_time: Instant::now(),
            last_progress_percent: -PROGRESS_STEP_PERCENT,
            last_logged_percent_threshold: -1,
            stderr_buffer: String::new(),
        }
    }

    /// Handles an `FFmpeg` event
    pub fn handle_event(&mut self, event: FfmpegEvent) -> CoreResult<()> {
        match event {
            FfmpegEvent::Progress(progress) => self.handle_progress(&progress),
            FfmpegEvent::Log(level, message) => self.handle_log(&level, &message),
            FfmpegEvent::Error(error) => self.handle_error(&error),
            _ => {}
        }
        Ok(())
    }

    /// Gets the accumulated stderr buffer
    #[must_use]
    pub fn stderr_buffer(&self) -> &str {
        &self.stderr_buffer
    }

    /// Percentage of the expected duration covered by `current_secs`, capped at 100.
    fn percent_of(&self, current_secs: f64) -> f64 {
        self.duration
            .map_or(0.0, |d| (current_secs / d * 100.0).min(100.0))
    }

    fn handle_progress(&mut self, progress: &FfmpegProgress) {
        let current_secs = parse_ffmpeg_time(&progress.time).unwrap_or(0.0);
        let percent = self.percent_of(current_secs);

        if percent >= self.last_progress_percent + PROGRESS_STEP_PERCENT
            || (percent >= 100.0 && self.last_progress_percent < 100.0)
        {
            crate::progress_reporting::progress(
                percent as f32,
                current_secs,
                self.duration.unwrap_or(0.0),
            );
            self.log_progress_if_needed(percent, current_secs, progress);
            self.last_progress_percent = percent;
        }
    }

    fn handle_log(&mut self, level: &FfmpegLogLevel, message: &str) {
        let log_level = map_ffmpeg_log_level(level);
        if matches!(level, FfmpegLogLevel::Error | FfmpegLogLevel::Fatal) {
            self.stderr_buffer.push_str(message);
            self.stderr_buffer.push('\n');
        }
        if log_level == log::Level::Info {
            log::debug!(target: "ffmpeg_log", "{message}");
        } else {
            log::log!(target: "ffmpeg_log", log_level, "{message}");
        }
    }

    fn handle_error(&mut self, error: &str) {
        if is_non_critical_ffmpeg_error(error) {
            log::debug!("ffmpeg non-critical message: {error}");
        } else {
            log::error!(target: "ffmpeg_log", "ffmpeg stderr error: {error}");
        }
        self.stderr_buffer.push_str(error);
        self.stderr_buffer.push('\n');
    }

    /// Logs progress every 10 percent so non-interactive runs leave a trail.
    fn log_progress_if_needed(&mut self, percent: f64, current_secs: f64, progress: &FfmpegProgress) {
        let current_threshold = (percent as i32 / 10) * 10;
        if current_threshold <= self.last_logged_percent_threshold && percent < 100.0 {
            return;
        }

        let elapsed = self.start_time.elapsed().as_secs_f64();
        let eta = match self.duration {
            Some(total) if progress.speed > 0.01 && total > current_secs => {
                (total - current_secs) / f64::from(progress.speed)
            }
            _ => 0.0,
        };

        log::info!(
            target: "vidjoin::progress",
            "Encoding progress: {:.1}% complete | Time: {} / {} | Speed: {:.2}x | Elapsed: {} | ETA: {}",
            percent,
            format_duration(current_secs),
            format_duration(self.duration.unwrap_or(0.0)),
            progress.speed,
            format_duration(elapsed),
            format_duration(eta)
        );
        self.last_logged_percent_threshold = current_threshold;
    }
}

/// Maps `FFmpeg` log level to Rust log level
fn map_ffmpeg_log_level(level: &FfmpegLogLevel) -> log::Level {
    match level {
        FfmpegLogLevel::Fatal | FfmpegLogLevel::Error => log::Level::Error,
        FfmpegLogLevel::Warning => log::Level::Warn,
        FfmpegLogLevel::Info => log::Level::Info,
        _ => log::Level::Trace,
    }
}

/// Determines if an `FFmpeg` error message is non-critical.
///
/// These are `FFmpeg` messages that appear in stderr but don't indicate actual problems.
fn is_non_critical_ffmpeg_error(error: &str) -> bool {
    error.contains("deprecated pixel format")
        || error.contains("No accelerated colorspace conversion")
        || error.contains("automatically inserted filter")
        || error.contains("Timestamps are unset")
        || error.contains("Queue input is backward")
        || error.contains("first frame is no keyframe")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress_at(time: &str) -> FfmpegEvent {
        FfmpegEvent::Progress(FfmpegProgress {
            frame: 100,
            fps: 30.0,
            q: 0.0,
            size_kb: 1024,
            time: time.to_string(),
            bitrate_kbps: 2457.6,
            speed: 1.0,
            raw_log_message: String::new(),
        })
    }

    #[test]
    fn test_percent_of_duration() {
        let handler = FfmpegProgressHandler::new(Some(20.0));
        assert_eq!(handler.percent_of(5.0), 25.0);
        assert_eq!(handler.percent_of(40.0), 100.0);

        let unknown = FfmpegProgressHandler::new(Some(0.0));
        assert_eq!(unknown.percent_of(5.0), 0.0);
    }

    #[test]
    fn test_progress_updates_last_percent() {
        let mut handler = FfmpegProgressHandler::new(Some(10.0));
        handler.handle_event(progress_at("00:00:05.00")).unwrap();
        assert_eq!(handler.last_progress_percent, 50.0);
        // Below the reporting step: ignored
        handler.handle_event(progress_at("00:00:05.10")).unwrap();
        assert_eq!(handler.last_progress_percent, 50.0);
        handler.handle_event(progress_at("00:00:10.00")).unwrap();
        assert_eq!(handler.last_progress_percent, 100.0);
    }

    #[test]
    fn test_errors_are_buffered() {
        let mut handler = FfmpegProgressHandler::new(None);
        handler
            .handle_event(FfmpegEvent::Error("Invalid data found when processing input".to_string()))
            .unwrap();
        handler
            .handle_event(FfmpegEvent::Log(FfmpegLogLevel::Info, "Stream mapping:".to_string()))
            .unwrap();
        assert_eq!(
            handler.stderr_buffer(),
            "Invalid data found when processing input\n"
        );
    }

    #[test]
    fn test_non_critical_errors() {
        assert!(is_non_critical_ffmpeg_error("deprecated pixel format used"));
        assert!(!is_non_critical_ffmpeg_error("Conversion failed!"));
    }
}
