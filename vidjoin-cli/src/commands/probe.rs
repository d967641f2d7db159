//! Implementation of the 'probe' subcommand.
//!
//! Prints each file's properties exactly as the concatenation pipeline would
//! see them, which makes it easy to predict which clips will be rescaled.

use crate::cli::ProbeArgs;
use crate::error::{CliResult, to_pretty_json};

use vidjoin_core::external::{FfprobeExecutor, check_dependency};
use vidjoin_core::progress_reporting;
use vidjoin_core::utils::get_filename_safe;
use vidjoin_core::{ClipProperties, CrateFfprobeExecutor, format_duration, format_fps};

use serde_json::json;
use std::path::{Path, PathBuf};

/// Probes every file in order. The first failure aborts the command.
pub fn probe_files<P: FfprobeExecutor>(
    prober: &P,
    video_files: &[PathBuf],
) -> CliResult<Vec<(PathBuf, ClipProperties)>> {
    video_files
        .iter()
        .map(|path| Ok((path.clone(), prober.probe_clip(path)?)))
        .collect()
}

/// Renders probe results as a JSON array of `{ "path", "properties" }` objects.
pub fn probe_results_json(results: &[(PathBuf, ClipProperties)]) -> serde_json::Value {
    let entries: Vec<serde_json::Value> = results
        .iter()
        .map(|(path, props)| {
            json!({
                "path": path.display().to_string(),
                "properties": props,
            })
        })
        .collect();
    serde_json::Value::Array(entries)
}

fn report_clip(path: &Path, props: &ClipProperties) {
    let name = get_filename_safe(path).unwrap_or_else(|_| path.display().to_string());
    progress_reporting::section(&name);
    progress_reporting::status("Resolution", &format!("{}x{}", props.width, props.height), false);
    progress_reporting::status("Frame rate", &format!("{} fps", format_fps(props.fps)), false);
    progress_reporting::status("Duration", &format_duration(props.duration_secs), false);
    progress_reporting::status(
        "Video codec",
        props.video_codec.as_deref().unwrap_or("unknown"),
        false,
    );
    progress_reporting::status(
        "Audio",
        props.audio_codec.as_deref().unwrap_or(if props.has_audio { "yes" } else { "none" }),
        false,
    );
}

/// Entry point for `vidjoin probe`.
pub fn run_probe_command(args: ProbeArgs) -> CliResult<()> {
    check_dependency("ffprobe")?;
    let results = probe_files(&CrateFfprobeExecutor::new(), &args.video_files)?;

    if args.json {
        println!("{}", to_pretty_json(&probe_results_json(&results))?);
    } else {
        for (path, props) in &results {
            report_clip(path, props);
            println!(
                "{}\t{}x{}\t{} fps\t{}",
                path.display(),
                props.width,
                props.height,
                format_fps(props.fps),
                if props.has_audio { "audio" } else { "no audio" }
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vidjoin_core::external::mocks::MockFfprobeExecutor;

    #[test]
    fn test_probe_files_in_order() {
        let prober = MockFfprobeExecutor::new();
        let first = PathBuf::from("first.mp4");
        let second = PathBuf::from("second.mov");
        prober.expect_clip(&first, Ok(ClipProperties::default()));
        prober.expect_clip(
            &second,
            Ok(ClipProperties {
                width: 640,
                height: 480,
                fps: 24.0,
                has_audio: false,
                audio_codec: None,
                ..ClipProperties::default()
            }),
        );

        let results = probe_files(&prober, &[first.clone(), second.clone()]).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[1].1.width, 640);
        assert_eq!(prober.probed_paths(), vec![first, second]);

        let value = probe_results_json(&results);
        assert_eq!(value[0]["path"], "first.mp4");
        assert_eq!(value[1]["properties"]["height"], 480);
        assert_eq!(value[1]["properties"]["has_audio"], false);
    }

    #[test]
    fn test_probe_failure_stops() {
        let prober = MockFfprobeExecutor::new();
        let result = probe_files(&prober, &[PathBuf::from("missing.mp4")]);
        assert!(result.is_err());
    }
}
