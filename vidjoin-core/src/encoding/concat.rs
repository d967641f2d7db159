//! FFmpeg command building and execution for the concatenation encode
//!
//! This module turns a [`ConcatPlan`] into a single ffmpeg invocation
//! (inputs, filter graph, codecs, frame rate, output) and runs it through an
//! [`FfmpegSpawner`], reporting progress along the way.

use crate::clip::Timeline;
use crate::config::{
    DEFAULT_AUDIO_CODEC, DEFAULT_PIXEL_FORMAT, DEFAULT_PRESET, DEFAULT_VIDEO_CODEC,
};
use crate::encoding::filters::{AUDIO_OUTPUT_LABEL, ConcatFilterGraph, VIDEO_OUTPUT_LABEL};
use crate::error::{CoreError, CoreResult, command_failed_error};
use crate::external::{FfmpegProcess, FfmpegSpawner, format_command};
use crate::progress_reporting::{self, ffmpeg_handler::FfmpegProgressHandler};

use ffmpeg_sidecar::command::FfmpegCommand;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// Everything needed to encode one timeline.
#[derive(Debug)]
pub struct ConcatPlan {
    pub timeline: Timeline,
    /// Effective output width
    pub width: u32,
    /// Effective output height
    pub height: u32,
    /// Frame rate the output is encoded at
    pub fps: f64,
    pub output_path: PathBuf,
}

impl ConcatPlan {
    /// Whether the output will contain an audio stream.
    #[must_use]
    pub fn has_audio(&self) -> bool {
        self.timeline.has_audio()
    }
}

/// Builds the ffmpeg command for `plan`.
///
/// The output path is always the last argument.
#[must_use]
pub fn build_concat_command(plan: &ConcatPlan) -> FfmpegCommand {
    let graph = ConcatFilterGraph::for_timeline(&plan.timeline);

    let mut cmd = FfmpegCommand::new();
    for clip in plan.timeline.clips() {
        cmd.input(clip.path().to_string_lossy().as_ref());
    }

    cmd.args(["-filter_complex", &graph.build()]);
    cmd.args(["-map", VIDEO_OUTPUT_LABEL]);

    cmd.args(["-c:v", DEFAULT_VIDEO_CODEC]);
    cmd.args(["-preset", DEFAULT_PRESET]);
    cmd.args(["-pix_fmt", DEFAULT_PIXEL_FORMAT]);
    cmd.args(["-r", &plan.fps.to_string()]);

    if graph.has_audio() {
        cmd.args(["-map", AUDIO_OUTPUT_LABEL]);
        cmd.args(["-c:a", DEFAULT_AUDIO_CODEC]);
    } else {
        cmd.arg("-an");
    }

    cmd.args(["-movflags", "+faststart"]);
    cmd.arg("-y");
    cmd.output(plan.output_path.to_string_lossy().as_ref());

    cmd
}

/// Runs the concatenation encode for `plan` and waits for it to finish.
pub fn run_concat_encode<S: FfmpegSpawner>(spawner: &S, plan: &ConcatPlan) -> CoreResult<()> {
    progress_reporting::encode_start(plan.timeline.clips().len(), &plan.output_path);
    info!(
        target: "vidjoin::progress",
        "Starting encode of {} clip(s) -> {}",
        plan.timeline.clips().len(),
        plan.output_path.display()
    );

    let mut cmd = build_concat_command(plan);
    let cmd_string = format_command(&mut cmd);
    debug!("FFmpeg command: {cmd_string}");
    progress_reporting::ffmpeg_command(&cmd_string);

    let mut process = spawner.spawn(cmd)?;

    let duration = plan.timeline.duration_secs();
    if duration <= 0.0 {
        log::warn!("Timeline duration is zero; progress percentage will not be accurate.");
        progress_reporting::warning("Clip durations are unknown; encode progress is not shown");
    }
    let mut progress_handler = FfmpegProgressHandler::new(Some(duration));
    process.handle_events(|event| progress_handler.handle_event(event))?;

    let status = process.wait()?;
    progress_reporting::clear_progress();

    if status.success() {
        info!("Encode finished successfully: {}", plan.output_path.display());
        return Ok(());
    }

    let stderr = progress_handler.stderr_buffer().trim();
    progress_reporting::error(&format!("FFmpeg exited with {status}"));
    if stderr.contains("No streams found") {
        return Err(CoreError::NoStreamsFound(output_label(&plan.output_path)));
    }
    Err(command_failed_error(
        "ffmpeg (concat)",
        status,
        format!("FFmpeg process exited with non-zero status ({status}). Stderr output:\n{stderr}"),
    ))
}

fn output_label(path: &Path) -> String {
    crate::utils::get_filename_safe(path).unwrap_or_else(|_| path.display().to_string())
}
