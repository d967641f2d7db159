//! Filter graph construction for concatenation.
//!
//! Every clip contributes one video segment and, when the timeline carries
//! audio, one audio segment. Segments are normalized so that ffmpeg's concat
//! filter receives identical dimensions, sample aspect ratio, sample rate and
//! channel layout, then joined in input order.

use crate::clip::{Timeline, VideoClip};
use crate::config::{DEFAULT_AUDIO_CHANNEL_LAYOUT, DEFAULT_AUDIO_SAMPLE_RATE};

/// Label of the final video stream produced by the graph.
pub const VIDEO_OUTPUT_LABEL: &str = "[vout]";

/// Label of the final audio stream produced by the graph.
pub const AUDIO_OUTPUT_LABEL: &str = "[aout]";

/// A complete `-filter_complex` graph for one timeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcatFilterGraph {
    chains: Vec<String>,
    has_audio: bool,
}

impl ConcatFilterGraph {
    /// Builds the graph joining all clips of `timeline`.
    #[must_use]
    pub fn for_timeline(timeline: &Timeline) -> Self {
        let has_audio = timeline.has_audio();
        let mut chains = Vec::with_capacity(timeline.clips().len() * 2 + 2);
        let mut concat_inputs = String::new();

        for clip in timeline.clips() {
            let i = clip.index();
            chains.push(video_segment(clip));
            concat_inputs.push_str(&format!("[v{i}]"));
            if has_audio {
                chains.push(audio_segment(clip));
                concat_inputs.push_str(&format!("[a{i}]"));
            }
        }

        let segment_count = timeline.clips().len();
        let audio_flag = u8::from(has_audio);
        let video_label = if timeline.is_retargeted() {
            "[vcat]"
        } else {
            VIDEO_OUTPUT_LABEL
        };
        let audio_label = if has_audio { AUDIO_OUTPUT_LABEL } else { "" };
        chains.push(format!(
            "{concat_inputs}concat=n={segment_count}:v=1:a={audio_flag}{video_label}{audio_label}"
        ));

        if timeline.is_retargeted() {
            chains.push(format!("[vcat]fps={}{VIDEO_OUTPUT_LABEL}", timeline.fps()));
        }

        Self { chains, has_audio }
    }

    /// Whether the graph produces an audio output.
    #[must_use]
    pub fn has_audio(&self) -> bool {
        self.has_audio
    }

    /// The graph in `-filter_complex` syntax.
    #[must_use]
    pub fn build(&self) -> String {
        self.chains.join(";")
    }
}

fn video_segment(clip: &VideoClip) -> String {
    let i = clip.index();
    let scale = clip
        .resize_target()
        .map(|(w, h)| format!("scale={w}:{h},"))
        .unwrap_or_default();
    format!("[{i}:v:0]{scale}setsar=1[v{i}]")
}

fn audio_segment(clip: &VideoClip) -> String {
    let i = clip.index();
    if clip.has_audio() {
        format!(
            "[{i}:a:0]aresample={DEFAULT_AUDIO_SAMPLE_RATE},aformat=sample_fmts=fltp:channel_layouts={DEFAULT_AUDIO_CHANNEL_LAYOUT}[a{i}]"
        )
    } else {
        // Silence keeps the audio track continuous across clips that have none.
        format!(
            "anullsrc=r={DEFAULT_AUDIO_SAMPLE_RATE}:cl={DEFAULT_AUDIO_CHANNEL_LAYOUT},atrim=duration={:.3}[a{i}]",
            clip.duration_secs()
        )
    }
}
