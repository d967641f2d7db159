//! FFprobe integration for clip inspection
//!
//! This module provides the "open a clip" half of the media capability:
//! executing ffprobe against an input and extracting the properties the
//! pipeline needs (dimensions, frame rate, duration, audio presence).
use crate::clip::ClipProperties;
use crate::error::{CoreError, CoreResult, command_failed_error, command_start_error};
use crate::utils::parse_frame_rate;
use ffprobe::{FfProbe, FfProbeError, ffprobe};
use std::path::Path;

/// Trait for probing media files.
pub trait FfprobeExecutor {
    /// Gets the properties of the primary video stream and audio presence of `input_path`.
    fn probe_clip(&self, input_path: &Path) -> CoreResult<ClipProperties>;
}

/// Concrete implementation of `FfprobeExecutor` using the `ffprobe` crate.
#[derive(Debug, Clone, Default)]
pub struct CrateFfprobeExecutor;

impl CrateFfprobeExecutor {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl FfprobeExecutor for CrateFfprobeExecutor {
    fn probe_clip(&self, input_path: &Path) -> CoreResult<ClipProperties> {
        log::debug!(
            "Running ffprobe (via crate) for clip properties on: {}",
            input_path.display()
        );
        match ffprobe(input_path) {
            Ok(metadata) => clip_properties_from_metadata(&metadata, input_path),
            Err(err) => {
                log::error!(
                    "ffprobe failed for clip properties on {}: {:?}",
                    input_path.display(),
                    err
                );
                Err(map_ffprobe_error(err, "clip properties"))
            }
        }
    }
}

fn clip_properties_from_metadata(metadata: &FfProbe, input_path: &Path) -> CoreResult<ClipProperties> {
    let video_stream = metadata
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("video"))
        .ok_or_else(|| {
            CoreError::VideoInfoError(format!("No video stream found in {}", input_path.display()))
        })?;

    let width = video_stream.width.ok_or_else(|| {
        CoreError::VideoInfoError(format!("Video stream missing width in {}", input_path.display()))
    })?;
    let height = video_stream.height.ok_or_else(|| {
        CoreError::VideoInfoError(format!("Video stream missing height in {}", input_path.display()))
    })?;
    let (width, height) = checked_dimensions(width, height).ok_or_else(|| {
        CoreError::VideoInfoError(format!(
            "Invalid dimensions found in {}: width={width}, height={height}",
            input_path.display()
        ))
    })?;

    let fps = parse_frame_rate(&video_stream.avg_frame_rate)
        .or_else(|| parse_frame_rate(&video_stream.r_frame_rate))
        .ok_or_else(|| {
            CoreError::VideoInfoError(format!(
                "Could not determine frame rate for {} (avg={}, r={})",
                input_path.display(),
                video_stream.avg_frame_rate,
                video_stream.r_frame_rate
            ))
        })?;

    let duration_secs = clip_duration(
        metadata.format.duration.as_deref(),
        video_stream.duration.as_deref(),
    )
    .ok_or_else(|| {
        CoreError::FfprobeParse(format!("Failed to parse duration for {}", input_path.display()))
    })?;

    let audio_stream = metadata
        .streams
        .iter()
        .find(|s| s.codec_type.as_deref() == Some("audio"));

    Ok(ClipProperties {
        width,
        height,
        fps,
        duration_secs: duration_secs.max(0.0),
        has_audio: audio_stream.is_some(),
        video_codec: video_stream.codec_name.clone(),
        audio_codec: audio_stream.and_then(|s| s.codec_name.clone()),
    })
}

/// Container duration, falling back to the video stream's when the
/// container value is missing or unparsable.
fn clip_duration(format: Option<&str>, stream: Option<&str>) -> Option<f64> {
    parse_duration(format).or_else(|| parse_duration(stream))
}

/// Parses an ffprobe duration field; "N/A" and other junk yield `None`.
fn parse_duration(value: Option<&str>) -> Option<f64> {
    value
        .and_then(|d| d.trim().parse::<f64>().ok())
        .filter(|d| d.is_finite())
}

/// Converts ffprobe's signed dimensions, rejecting zero and negative values.
fn checked_dimensions(width: i64, height: i64) -> Option<(u32, u32)> {
    let width = u32::try_from(width).ok().filter(|&w| w > 0)?;
    let height = u32::try_from(height).ok().filter(|&h| h > 0)?;
    Some((width, height))
}

fn map_ffprobe_error(err: FfProbeError, context: &str) -> CoreError {
    match err {
        FfProbeError::Io(io_err) => command_start_error(format!("ffprobe ({context})"), io_err),
        FfProbeError::Status(output) => {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            command_failed_error(format!("ffprobe ({context})"), output.status, stderr)
        }
        FfProbeError::Deserialize(err) => {
            CoreError::JsonParseError(format!("ffprobe {context} output deserialization: {err}"))
        }
        #[allow(unreachable_patterns)]
        _ => CoreError::FfprobeParse(format!("Unknown ffprobe error during {context}: {err:?}")),
    }
}
