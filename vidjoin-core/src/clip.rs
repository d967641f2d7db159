// ============================================================================
// vidjoin-core/src/clip.rs
// ============================================================================
//
// CLIPS AND TIMELINE: In-memory model of the concatenation
//
// A VideoClip is an opened input: its probed properties plus the
// normalization applied to it (resize target, audio stripped). A Timeline
// owns the normalized clips in order and derives the joined stream's
// properties from them.
//
// Clips hold no OS resources themselves; the encoder consumes them by
// reference. Release happens when the owning Timeline (or the Vec of clips,
// on an early error) is dropped, on every exit path.

use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::FPS_TOLERANCE;

/// Properties of a media file as reported by the probe capability.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClipProperties {
    /// Width of the primary video stream in pixels
    pub width: u32,
    /// Height of the primary video stream in pixels
    pub height: u32,
    /// Frame rate of the primary video stream
    pub fps: f64,
    /// Duration in seconds
    pub duration_secs: f64,
    /// Whether the file has at least one audio stream
    pub has_audio: bool,
    /// Codec name of the primary video stream
    pub video_codec: Option<String>,
    /// Codec name of the first audio stream
    pub audio_codec: Option<String>,
}

impl Default for ClipProperties {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
            fps: 30.0,
            duration_secs: 0.0,
            has_audio: true,
            video_codec: None,
            audio_codec: None,
        }
    }
}

/// An opened input clip and the normalization applied to it.
#[derive(Debug)]
pub struct VideoClip {
    path: PathBuf,
    index: usize,
    properties: ClipProperties,
    resize_to: Option<(u32, u32)>,
    audio_stripped: bool,
}

impl VideoClip {
    /// Wraps the probed properties of the input at position `index`.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>, index: usize, properties: ClipProperties) -> Self {
        let path = path.into();
        log::debug!(
            "Opened clip #{index} {}: {}x{} @ {:.3} fps, {:.2}s, audio={}",
            path.display(),
            properties.width,
            properties.height,
            properties.fps,
            properties.duration_secs,
            properties.has_audio
        );
        Self {
            path,
            index,
            properties,
            resize_to: None,
            audio_stripped: false,
        }
    }

    /// Forces the clip to exactly `width`x`height`. Aspect ratio is not preserved.
    #[must_use]
    pub fn resized(mut self, width: u32, height: u32) -> Self {
        self.resize_to = Some((width, height));
        self
    }

    /// Drops the clip's audio track.
    #[must_use]
    pub fn without_audio(mut self) -> Self {
        self.audio_stripped = true;
        self
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Position of the clip's file among the encoder inputs.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Properties of the source file, before normalization.
    #[must_use]
    pub fn source(&self) -> &ClipProperties {
        &self.properties
    }

    #[must_use]
    pub fn resize_target(&self) -> Option<(u32, u32)> {
        self.resize_to
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.resize_to.map_or(self.properties.width, |(w, _)| w)
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.resize_to.map_or(self.properties.height, |(_, h)| h)
    }

    #[must_use]
    pub fn fps(&self) -> f64 {
        self.properties.fps
    }

    #[must_use]
    pub fn duration_secs(&self) -> f64 {
        self.properties.duration_secs
    }

    /// Whether the clip still carries audio after normalization.
    #[must_use]
    pub fn has_audio(&self) -> bool {
        self.properties.has_audio && !self.audio_stripped
    }
}

impl Drop for VideoClip {
    fn drop(&mut self) {
        log::trace!("Released clip #{} {}", self.index, self.path.display());
    }
}

/// The ordered join of normalized clips.
#[derive(Debug)]
pub struct Timeline {
    clips: Vec<VideoClip>,
    fps: f64,
    retargeted: bool,
}

impl Timeline {
    /// Joins `clips` in order.
    ///
    /// The native frame rate of the join is the highest frame rate among
    /// its clips. Returns None when `clips` is empty.
    #[must_use]
    pub fn concatenate(clips: Vec<VideoClip>) -> Option<Self> {
        let fps = clips.iter().map(VideoClip::fps).reduce(f64::max)?;
        Some(Self {
            clips,
            fps,
            retargeted: false,
        })
    }

    /// Retargets the timeline to `fps` unless it is already within
    /// [`FPS_TOLERANCE`]. Returns true when a retarget happened.
    pub fn retarget_fps(&mut self, fps: f64) -> bool {
        if (self.fps - fps).abs() > FPS_TOLERANCE {
            log::debug!("Retargeting timeline from {:.3} fps to {fps:.3} fps", self.fps);
            self.fps = fps;
            self.retargeted = true;
            true
        } else {
            false
        }
    }

    #[must_use]
    pub fn clips(&self) -> &[VideoClip] {
        &self.clips
    }

    #[must_use]
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Whether frame resampling to [`Timeline::fps`] is required.
    #[must_use]
    pub fn is_retargeted(&self) -> bool {
        self.retargeted
    }

    /// The timeline carries audio iff at least one clip retained audio.
    #[must_use]
    pub fn has_audio(&self) -> bool {
        self.clips.iter().any(VideoClip::has_audio)
    }

    #[must_use]
    pub fn duration_secs(&self) -> f64 {
        self.clips.iter().map(VideoClip::duration_secs).sum()
    }
}

impl Drop for Timeline {
    fn drop(&mut self) {
        log::debug!("Releasing timeline with {} clip(s)", self.clips.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(width: u32, height: u32, fps: f64, has_audio: bool) -> ClipProperties {
        ClipProperties {
            width,
            height,
            fps,
            duration_secs: 10.0,
            has_audio,
            ..Default::default()
        }
    }

    #[test]
    fn test_resized_forces_exact_dimensions() {
        let clip = VideoClip::open("b.mp4", 1, props(1280, 720, 30.0, true)).resized(1920, 1080);
        assert_eq!(clip.width(), 1920);
        assert_eq!(clip.height(), 1080);
        assert_eq!(clip.source().width, 1280);
    }

    #[test]
    fn test_without_audio() {
        let clip = VideoClip::open("a.mp4", 0, props(640, 480, 25.0, true)).without_audio();
        assert!(!clip.has_audio());
    }

    #[test]
    fn test_timeline_properties() {
        let timeline = Timeline::concatenate(vec![
            VideoClip::open("a.mp4", 0, props(640, 480, 24.0, false)),
            VideoClip::open("b.mp4", 1, props(640, 480, 30.0, true)),
        ])
        .unwrap();
        assert_eq!(timeline.fps(), 30.0);
        assert!(timeline.has_audio());
        assert_eq!(timeline.duration_secs(), 20.0);
        assert_eq!(timeline.clips().len(), 2);
    }

    #[test]
    fn test_timeline_without_any_audio() {
        let timeline = Timeline::concatenate(vec![
            VideoClip::open("a.mp4", 0, props(640, 480, 24.0, true)).without_audio(),
            VideoClip::open("b.mp4", 1, props(640, 480, 24.0, false)),
        ])
        .unwrap();
        assert!(!timeline.has_audio());
    }

    #[test]
    fn test_empty_timeline_is_none() {
        assert!(Timeline::concatenate(Vec::new()).is_none());
    }

    #[test]
    fn test_retarget_respects_tolerance() {
        let mut timeline =
            Timeline::concatenate(vec![VideoClip::open("a.mp4", 0, props(640, 480, 30.0, true))])
                .unwrap();

        assert!(!timeline.retarget_fps(30.005));
        assert!(!timeline.is_retargeted());
        assert_eq!(timeline.fps(), 30.0);

        assert!(timeline.retarget_fps(24.0));
        assert!(timeline.is_retargeted());
        assert_eq!(timeline.fps(), 24.0);
    }
}
