// vidjoin-cli/src/cli.rs
//
// Defines the command-line argument structures using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "vidjoin: Video concatenation tool",
    long_about = "Joins video files end to end using ffmpeg via the vidjoin-core library."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Concatenates video files, in order, into one output video
    Concat(ConcatArgs),
    /// Prints the properties of video files as the pipeline sees them
    Probe(ProbeArgs),
}

#[derive(Args, Debug)]
pub struct ConcatArgs {
    /// Video files to concatenate, in order (at least two)
    #[arg(value_name = "VIDEO_FILES")]
    pub video_files: Vec<PathBuf>,

    /// Drop audio from every clip
    #[arg(long, default_value_t = false)]
    pub no_audio: bool,

    /// Output width in pixels; 0 uses the first video's width
    #[arg(long, value_name = "PIXELS", default_value_t = 0)]
    pub width: u32,

    /// Output height in pixels; 0 uses the first video's height
    #[arg(long, value_name = "PIXELS", default_value_t = 0)]
    pub height: u32,

    /// Output frame rate; 0 uses the first video's frame rate
    #[arg(long, value_name = "FPS", default_value_t = 0.0)]
    pub fps: f64,

    /// Output file (defaults to <temp dir>/output/output.mp4)
    #[arg(short, long, value_name = "OUTPUT_FILE")]
    pub output: Option<PathBuf>,

    /// Print the result summary as JSON on stdout
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct ProbeArgs {
    /// Video files to inspect
    #[arg(required = true, value_name = "VIDEO_FILES")]
    pub video_files: Vec<PathBuf>,

    /// Print the properties as JSON on stdout
    #[arg(long, default_value_t = false)]
    pub json: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concat_defaults_are_sentinels() {
        let cli = Cli::try_parse_from(["vidjoin", "concat", "a.mp4", "b.mp4"]).unwrap();
        let Commands::Concat(args) = cli.command else {
            panic!("expected concat command");
        };
        assert_eq!(args.video_files, vec![PathBuf::from("a.mp4"), PathBuf::from("b.mp4")]);
        assert!(!args.no_audio);
        assert_eq!(args.width, 0);
        assert_eq!(args.height, 0);
        assert_eq!(args.fps, 0.0);
        assert!(args.output.is_none());
    }

    #[test]
    fn test_concat_overrides() {
        let cli = Cli::try_parse_from([
            "vidjoin", "-v", "concat", "a.mp4", "b.mp4", "--no-audio", "--width", "1280",
            "--height", "720", "--fps", "24", "-o", "out.mp4",
        ])
        .unwrap();
        assert!(cli.verbose);
        let Commands::Concat(args) = cli.command else {
            panic!("expected concat command");
        };
        assert!(args.no_audio);
        assert_eq!((args.width, args.height), (1280, 720));
        assert_eq!(args.fps, 24.0);
        assert_eq!(args.output, Some(PathBuf::from("out.mp4")));
    }

    #[test]
    fn test_probe_requires_files() {
        assert!(Cli::try_parse_from(["vidjoin", "probe"]).is_err());
    }

    #[test]
    fn test_negative_width_rejected() {
        assert!(Cli::try_parse_from(["vidjoin", "concat", "a.mp4", "b.mp4", "--width", "-5"]).is_err());
    }
}
