// ============================================================================
// vidjoin-core/src/pipeline.rs
// ============================================================================
//
// CONCATENATION PIPELINE: Main Workflow
//
// This module ties the pieces together: validate the request, open (probe)
// every input in order, normalize each clip against the effective targets,
// join them into a timeline, retarget its frame rate if requested, clear the
// output location and run the single encode.
//
// WORKFLOW:
// 1. Reject fewer than two inputs before anything is opened
// 2. Probe inputs in order; the first clip fills any unset target
// 3. Resize mismatched clips, strip audio if requested
// 4. Concatenate and optionally retarget fps (beyond FPS_TOLERANCE)
// 5. Remove the previous output, encode, report the result
//
// Opened clips are owned by the local Vec and then by the Timeline inside the
// plan, so every exit path releases them through Drop.

use crate::clip::{Timeline, VideoClip};
use crate::config::ConcatConfig;
use crate::encoding::{ConcatPlan, run_concat_encode};
use crate::error::{CoreError, CoreResult};
use crate::external::{FfmpegSpawner, FfprobeExecutor};
use crate::output::{ensure_output_not_input, output_size, prepare_output_path};
use crate::progress_reporting;
use crate::utils::{format_bytes, format_duration, format_fps};

use log::{debug, info};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Summary of a successful concatenation.
#[derive(Debug, Clone, Serialize)]
pub struct ConcatResult {
    pub output_path: PathBuf,
    pub clip_count: usize,
    pub width: u32,
    pub height: u32,
    pub fps: f64,
    pub has_audio: bool,
    /// Combined duration of all clips in seconds
    pub duration_secs: f64,
    /// Wall-clock time spent in the pipeline in seconds
    pub elapsed_secs: f64,
    pub output_size: u64,
}

/// Concatenates `video_files` into `output_path` and returns the output path.
///
/// # Errors
///
/// * `CoreError::InsufficientInput` if fewer than two files are given; nothing
///   is probed and the output location is left untouched.
/// * `CoreError::InvalidConfig` if the configuration is invalid or
///   `output_path` is one of the inputs; nothing is opened or removed.
/// * Any probe or encode failure, unrecovered.
///
/// # Examples
///
/// ```rust,no_run
/// use vidjoin_core::{ConcatConfig, concatenate_videos};
/// use vidjoin_core::external::{CrateFfprobeExecutor, SidecarFfmpegSpawner};
/// use std::path::{Path, PathBuf};
///
/// let inputs = vec![PathBuf::from("a.mp4"), PathBuf::from("b.mp4")];
/// let output = concatenate_videos(
///     &SidecarFfmpegSpawner,
///     &CrateFfprobeExecutor::new(),
///     &inputs,
///     &ConcatConfig::default(),
///     Path::new("/tmp/output/output.mp4"),
/// ).unwrap();
/// println!("wrote {}", output.display());
/// ```
pub fn concatenate_videos<S: FfmpegSpawner, P: FfprobeExecutor>(
    spawner: &S,
    prober: &P,
    video_files: &[PathBuf],
    config: &ConcatConfig,
    output_path: &Path,
) -> CoreResult<PathBuf> {
    run_concat(spawner, prober, video_files, config, output_path).map(|result| result.output_path)
}

/// Runs the full pipeline and returns a [`ConcatResult`] summary.
pub fn run_concat<S: FfmpegSpawner, P: FfprobeExecutor>(
    spawner: &S,
    prober: &P,
    video_files: &[PathBuf],
    config: &ConcatConfig,
    output_path: &Path,
) -> CoreResult<ConcatResult> {
    let start_time = Instant::now();
    validate_request(video_files, config, output_path)?;

    progress_reporting::section("Opening clips");
    let (clips, width, height, fps) = open_clips(prober, video_files, config)?;

    let Some(mut timeline) = Timeline::concatenate(clips) else {
        return Err(CoreError::InsufficientInput { count: 0 });
    };
    debug!(
        "Timeline: {} clip(s), native {:.3} fps, {:.2}s, audio={}",
        timeline.clips().len(),
        timeline.fps(),
        timeline.duration_secs(),
        timeline.has_audio()
    );

    if let Some(target_fps) = config.fps {
        if timeline.retarget_fps(target_fps) {
            progress_reporting::info(&format!(
                "Resampling timeline to {} fps",
                format_fps(target_fps)
            ));
        }
    }

    if prepare_output_path(output_path)? {
        info!("Replaced previous output at {}", output_path.display());
    }

    progress_reporting::section("Encoding");
    let plan = ConcatPlan {
        timeline,
        width,
        height,
        fps,
        output_path: output_path.to_path_buf(),
    };
    run_concat_encode(spawner, &plan)?;

    let result = ConcatResult {
        output_path: plan.output_path.clone(),
        clip_count: plan.timeline.clips().len(),
        width,
        height,
        fps,
        has_audio: plan.has_audio(),
        duration_secs: plan.timeline.duration_secs(),
        elapsed_secs: start_time.elapsed().as_secs_f64(),
        output_size: output_size(&plan.output_path)?,
    };
    report_summary(&result);
    Ok(result)
}

/// Checks the preconditions of a run without touching any file.
///
/// Rejects fewer than two inputs, an invalid configuration, and an output
/// path that names one of the inputs.
pub fn validate_request(
    video_files: &[PathBuf],
    config: &ConcatConfig,
    output_path: &Path,
) -> CoreResult<()> {
    if video_files.len() < 2 {
        return Err(CoreError::InsufficientInput {
            count: video_files.len(),
        });
    }
    config.validate()?;
    ensure_output_not_input(output_path, video_files)
}

/// Opens every input in order and normalizes it against the effective targets.
///
/// Unset targets are taken from the first clip opened. Returns the clips and
/// the effective width, height and fps.
fn open_clips<P: FfprobeExecutor>(
    prober: &P,
    video_files: &[PathBuf],
    config: &ConcatConfig,
) -> CoreResult<(Vec<VideoClip>, u32, u32, f64)> {
    let mut target_width = config.width;
    let mut target_height = config.height;
    let mut target_fps = config.fps;
    let mut clips = Vec::with_capacity(video_files.len());

    for (index, path) in video_files.iter().enumerate() {
        let properties = prober.probe_clip(path)?;
        let width = *target_width.get_or_insert(properties.width);
        let height = *target_height.get_or_insert(properties.height);
        target_fps.get_or_insert(properties.fps);

        progress_reporting::clip_opened(
            index,
            path,
            properties.width,
            properties.height,
            properties.fps,
            properties.has_audio,
        );

        let mut clip = VideoClip::open(path.clone(), index, properties);
        if clip.width() != width || clip.height() != height {
            debug!(
                "Resizing clip #{index} from {}x{} to {width}x{height}",
                clip.width(),
                clip.height()
            );
            clip = clip.resized(width, height);
        }
        if !config.keep_audio {
            clip = clip.without_audio();
        }
        clips.push(clip);
    }

    // Every target is set once the first clip has been opened.
    match (target_width, target_height, target_fps) {
        (Some(width), Some(height), Some(fps)) => Ok((clips, width, height, fps)),
        _ => Err(CoreError::InsufficientInput { count: clips.len() }),
    }
}

fn report_summary(result: &ConcatResult) {
    progress_reporting::success("Concatenation complete");
    progress_reporting::status("Output", &result.output_path.display().to_string(), true);
    progress_reporting::status("Clips", &result.clip_count.to_string(), false);
    progress_reporting::status(
        "Resolution",
        &format!("{}x{}", result.width, result.height),
        false,
    );
    progress_reporting::status("Frame rate", &format!("{} fps", format_fps(result.fps)), false);
    progress_reporting::status("Audio", if result.has_audio { "aac" } else { "none" }, false);
    progress_reporting::status("Duration", &format_duration(result.duration_secs), false);
    progress_reporting::status("Size", &format_bytes(result.output_size), false);
    progress_reporting::status("Elapsed", &format_duration(result.elapsed_secs), false);
}
