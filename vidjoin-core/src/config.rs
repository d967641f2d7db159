// ============================================================================
// vidjoin-core/src/config.rs
// ============================================================================
//
// CONFIGURATION: Concatenation Settings and Defaults
//
// This module defines the per-invocation configuration of the concatenation
// pipeline together with the fixed encoder defaults.
//
// KEY COMPONENTS:
// - ConcatConfig: keep-audio flag and optional width/height/fps targets
// - Default constants: codec, preset, audio format and output location
//
// USAGE:
// Consumers (like vidjoin-cli) build a ConcatConfig, usually through
// `ConcatConfig::from_sentinels` where 0 means "inherit from the first clip",
// and pass it to `pipeline::concatenate_videos`.

use crate::error::{CoreError, CoreResult};
use std::path::PathBuf;

// ============================================================================
// DEFAULT CONSTANTS
// ============================================================================

/// Video codec used for every output file.
pub const DEFAULT_VIDEO_CODEC: &str = "libx264";

/// Audio codec used when the timeline carries audio.
pub const DEFAULT_AUDIO_CODEC: &str = "aac";

/// x264 preset passed to the encoder.
pub const DEFAULT_PRESET: &str = "medium";

/// Pixel format forced on the output for broad player compatibility.
pub const DEFAULT_PIXEL_FORMAT: &str = "yuv420p";

/// Sample rate every audio segment is resampled to before concatenation.
pub const DEFAULT_AUDIO_SAMPLE_RATE: u32 = 44_100;

/// Channel layout every audio segment is converted to before concatenation.
pub const DEFAULT_AUDIO_CHANNEL_LAYOUT: &str = "stereo";

/// Frame rate differences at or below this value never trigger resampling.
pub const FPS_TOLERANCE: f64 = 0.01;

/// Name of the directory (under the system temp dir) used by default for output.
pub const DEFAULT_OUTPUT_DIR_NAME: &str = "output";

/// File name of the default output artifact.
pub const DEFAULT_OUTPUT_FILENAME: &str = "output.mp4";

/// Returns the default output location: `<temp dir>/output/output.mp4`.
#[must_use]
pub fn default_output_path() -> PathBuf {
    std::env::temp_dir()
        .join(DEFAULT_OUTPUT_DIR_NAME)
        .join(DEFAULT_OUTPUT_FILENAME)
}

// ============================================================================
// CONCATENATION CONFIGURATION
// ============================================================================

/// Configuration for one concatenation run.
///
/// Unset targets are derived from the first clip that is opened. The value
/// is immutable for the duration of a run.
///
/// # Examples
///
/// ```rust
/// use vidjoin_core::ConcatConfig;
///
/// // 0 means "inherit from the first clip"
/// let config = ConcatConfig::from_sentinels(true, 1280, 0, 0.0);
/// assert_eq!(config.width, Some(1280));
/// assert_eq!(config.height, None);
/// assert_eq!(config.fps, None);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ConcatConfig {
    /// Keep audio tracks in the output. When false, audio is stripped from every clip.
    pub keep_audio: bool,

    /// Target width in pixels; `None` inherits the first clip's width.
    pub width: Option<u32>,

    /// Target height in pixels; `None` inherits the first clip's height.
    pub height: Option<u32>,

    /// Target frame rate; `None` inherits the first clip's frame rate.
    pub fps: Option<f64>,
}

impl Default for ConcatConfig {
    fn default() -> Self {
        Self {
            keep_audio: true,
            width: None,
            height: None,
            fps: None,
        }
    }
}

impl ConcatConfig {
    /// Builds a configuration from sentinel-encoded values, where a value
    /// equal to zero means "derive from the first clip".
    #[must_use]
    pub fn from_sentinels(keep_audio: bool, width: u32, height: u32, fps: f64) -> Self {
        Self {
            keep_audio,
            width: (width != 0).then_some(width),
            height: (height != 0).then_some(height),
            fps: (fps != 0.0).then_some(fps),
        }
    }

    /// Checks that the configured targets describe a producible video.
    pub fn validate(&self) -> CoreResult<()> {
        if let Some(fps) = self.fps {
            if !fps.is_finite() || fps <= 0.0 {
                return Err(CoreError::InvalidConfig(format!(
                    "frame rate must be a positive number, got {fps}"
                )));
            }
        }
        for (name, value) in [("width", self.width), ("height", self.height)] {
            if value == Some(0) {
                return Err(CoreError::InvalidConfig(format!(
                    "{name} must be greater than zero when set"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_keeps_audio_and_inherits_everything() {
        let config = ConcatConfig::default();
        assert!(config.keep_audio);
        assert_eq!(config.width, None);
        assert_eq!(config.height, None);
        assert_eq!(config.fps, None);
    }

    #[test]
    fn test_from_sentinels_maps_zero_to_unset() {
        let config = ConcatConfig::from_sentinels(false, 0, 720, 0.0);
        assert!(!config.keep_audio);
        assert_eq!(config.width, None);
        assert_eq!(config.height, Some(720));
        assert_eq!(config.fps, None);

        let config = ConcatConfig::from_sentinels(true, 1920, 1080, 24.0);
        assert_eq!(config.width, Some(1920));
        assert_eq!(config.fps, Some(24.0));
    }

    #[test]
    fn test_validate_rejects_bad_fps() {
        let mut config = ConcatConfig::default();
        assert!(config.validate().is_ok());

        config.fps = Some(-5.0);
        assert!(matches!(config.validate(), Err(CoreError::InvalidConfig(_))));

        config.fps = Some(f64::NAN);
        assert!(matches!(config.validate(), Err(CoreError::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_explicit_zero_dimension() {
        let config = ConcatConfig {
            width: Some(0),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_output_path_layout() {
        let path = default_output_path();
        assert!(path.ends_with("output/output.mp4"));
    }
}
