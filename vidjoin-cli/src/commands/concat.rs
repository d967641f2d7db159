//! Implementation of the 'concat' subcommand.
//!
//! Builds the core configuration from the command-line sentinels, checks the
//! request and the ffmpeg/ffprobe dependencies, and hands the ordered input
//! list to vidjoin-core. The produced output path (or a JSON summary) is the
//! only thing written to stdout.

use crate::cli::ConcatArgs;
use crate::error::{CliResult, to_pretty_json};

use vidjoin_core::external::{FfmpegSpawner, FfprobeExecutor};
use vidjoin_core::progress_reporting;
use vidjoin_core::{
    ConcatConfig, ConcatResult, CrateFfprobeExecutor, SidecarFfmpegSpawner, check_media_tools,
    default_output_path, run_concat, validate_request,
};

use log::{debug, info};
use std::path::{Path, PathBuf};

/// Maps the 0-means-inherit flags onto a validated core configuration.
pub fn create_concat_config(args: &ConcatArgs) -> CliResult<ConcatConfig> {
    let config = ConcatConfig::from_sentinels(!args.no_audio, args.width, args.height, args.fps);
    config.validate()?;
    Ok(config)
}

/// The explicit `--output` path, or the default location under the temp dir.
pub fn resolve_output_path(args: &ConcatArgs) -> PathBuf {
    args.output.clone().unwrap_or_else(default_output_path)
}

/// Runs the pipeline with the given process backends.
pub fn execute_concat<S: FfmpegSpawner, P: FfprobeExecutor>(
    spawner: &S,
    prober: &P,
    video_files: &[PathBuf],
    config: &ConcatConfig,
    output_path: &Path,
) -> CliResult<ConcatResult> {
    debug!("Concat config: {config:?}");
    debug!("Output path: {}", output_path.display());
    debug!("Run started: {}", crate::logging::get_timestamp());

    progress_reporting::section("Vidjoin");
    progress_reporting::status("Inputs", &video_files.len().to_string(), false);
    progress_reporting::status("Output", &output_path.display().to_string(), false);

    let result = run_concat(spawner, prober, video_files, config, output_path)?;
    info!(
        "Concatenated {} clips into {}",
        result.clip_count,
        result.output_path.display()
    );
    Ok(result)
}

/// Entry point for `vidjoin concat`.
pub fn run_concat_command(args: ConcatArgs) -> CliResult<()> {
    let config = create_concat_config(&args)?;
    let output_path = resolve_output_path(&args);
    // Input count, flags and output location are checked before looking for ffmpeg.
    validate_request(&args.video_files, &config, &output_path)?;
    check_media_tools()?;

    let result = execute_concat(
        &SidecarFfmpegSpawner,
        &CrateFfprobeExecutor::new(),
        &args.video_files,
        &config,
        &output_path,
    )?;

    if args.json {
        println!("{}", to_pretty_json(&result)?);
    } else {
        println!("{}", result.output_path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use vidjoin_core::external::mocks::{MockFfmpegSpawner, MockFfprobeExecutor};
    use vidjoin_core::{ClipProperties, CoreError};

    fn args(files: &[&str]) -> ConcatArgs {
        ConcatArgs {
            video_files: files.iter().map(PathBuf::from).collect(),
            no_audio: false,
            width: 0,
            height: 0,
            fps: 0.0,
            output: None,
            json: false,
        }
    }

    #[test]
    fn test_sentinels_map_to_inherit() {
        let config = create_concat_config(&args(&["a.mp4", "b.mp4"])).unwrap();
        assert!(config.keep_audio);
        assert_eq!(config.width, None);
        assert_eq!(config.height, None);
        assert_eq!(config.fps, None);
    }

    #[test]
    fn test_flags_map_to_overrides() {
        let mut a = args(&["a.mp4", "b.mp4"]);
        a.no_audio = true;
        a.width = 640;
        a.fps = 25.0;
        let config = create_concat_config(&a).unwrap();
        assert!(!config.keep_audio);
        assert_eq!(config.width, Some(640));
        assert_eq!(config.height, None);
        assert_eq!(config.fps, Some(25.0));
    }

    #[test]
    fn test_negative_fps_is_invalid() {
        let mut a = args(&["a.mp4", "b.mp4"]);
        a.fps = -1.0;
        assert!(matches!(create_concat_config(&a), Err(CoreError::InvalidConfig(_))));
    }

    #[test]
    fn test_default_output_path_used_without_flag() {
        assert_eq!(resolve_output_path(&args(&[])), default_output_path());
        let mut a = args(&[]);
        a.output = Some(PathBuf::from("/tmp/joined.mp4"));
        assert_eq!(resolve_output_path(&a), PathBuf::from("/tmp/joined.mp4"));
    }

    #[test]
    fn test_execute_concat_with_mocks() {
        let dir = tempdir().unwrap();
        let output = dir.path().join("joined.mp4");

        let prober = MockFfprobeExecutor::new();
        let clip = ClipProperties {
            width: 1280,
            height: 720,
            fps: 25.0,
            duration_secs: 3.0,
            has_audio: false,
            video_codec: Some("h264".to_string()),
            audio_codec: None,
        };
        prober.expect_clip(&PathBuf::from("a.mp4"), Ok(clip.clone()));
        prober.expect_clip(&PathBuf::from("b.mp4"), Ok(clip));

        let spawner = MockFfmpegSpawner::new();
        spawner.add_success_expectation("libx264", vec![], true);

        let a = args(&["a.mp4", "b.mp4"]);
        let config = create_concat_config(&a).unwrap();
        let result = execute_concat(&spawner, &prober, &a.video_files, &config, &output).unwrap();

        assert_eq!(result.output_path, output);
        assert_eq!((result.width, result.height), (1280, 720));
        assert!(!result.has_audio);
        assert!(output.exists());
    }
}
