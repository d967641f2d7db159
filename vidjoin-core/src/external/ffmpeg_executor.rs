// ============================================================================
// vidjoin-core/src/external/ffmpeg_executor.rs
// ============================================================================
//
// FFMPEG EXECUTOR: Running the concatenation encode
//
// The encode is a single long-running ffmpeg child. The pipeline drives it
// through the FfmpegSpawner/FfmpegProcess seam so tests can substitute the
// recording mocks from `external::mocks`.
//
// KEY COMPONENTS:
// - FfmpegProcess: An encode in flight (event stream + exit status)
// - FfmpegSpawner: Starts an encode from a built FfmpegCommand
// - SidecarFfmpegSpawner / SidecarFfmpegProcess: ffmpeg-sidecar backed
// - command_args / format_command: Argument views shared by logging and mocks
//
// LIFECYCLE:
// A SidecarFfmpegProcess that is dropped while ffmpeg is still running (the
// event handler returned an error, or the caller unwound) kills and reaps
// the child, so an aborted run never leaves an encoder writing the output.

use crate::error::{CoreResult, command_failed_error, command_start_error, command_wait_error};
use ffmpeg_sidecar::child::FfmpegChild;
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use std::process::ExitStatus;

/// An ffmpeg encode that has been started.
pub trait FfmpegProcess {
    /// Feeds every event of the run to `handler`, stopping at its first error.
    fn handle_events<F>(&mut self, handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>;

    /// Waits for ffmpeg to exit.
    fn wait(&mut self) -> CoreResult<ExitStatus>;
}

/// Starts ffmpeg encodes.
pub trait FfmpegSpawner {
    type Process: FfmpegProcess;

    fn spawn(&self, cmd: FfmpegCommand) -> CoreResult<Self::Process>;
}

/// Arguments of `cmd` in order, lossily converted to UTF-8.
pub fn command_args(cmd: &mut FfmpegCommand) -> Vec<String> {
    cmd.as_inner()
        .get_args()
        .map(|a| a.to_string_lossy().into_owned())
        .collect()
}

/// Renders `cmd` as a single shell-like line for logs and verbose output.
pub fn format_command(cmd: &mut FfmpegCommand) -> String {
    let args = command_args(cmd);
    let mut line = String::from("ffmpeg");
    for arg in &args {
        line.push(' ');
        if arg.contains(char::is_whitespace) || arg.contains(';') {
            line.push('"');
            line.push_str(arg);
            line.push('"');
        } else {
            line.push_str(arg);
        }
    }
    line
}

/// `FfmpegProcess` over an `ffmpeg_sidecar` child.
pub struct SidecarFfmpegProcess(FfmpegChild);

impl FfmpegProcess for SidecarFfmpegProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let iterator = self.0.iter().map_err(|e| {
            log::error!("Failed to read ffmpeg events: {e}");
            command_failed_error("ffmpeg (concat events)", ExitStatus::default(), e.to_string())
        })?;
        for event in iterator {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        self.0
            .wait()
            .map_err(|e| command_wait_error("ffmpeg (concat)", e))
    }
}

impl Drop for SidecarFfmpegProcess {
    fn drop(&mut self) {
        if let Ok(None) = self.0.as_inner_mut().try_wait() {
            log::debug!("Stopping unfinished ffmpeg encode");
            let _ = self.0.kill();
            let _ = self.0.wait();
        }
    }
}

/// Spawns ffmpeg through `ffmpeg-sidecar`.
#[derive(Debug, Clone, Default)]
pub struct SidecarFfmpegSpawner;

impl FfmpegSpawner for SidecarFfmpegSpawner {
    type Process = SidecarFfmpegProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        cmd.spawn()
            .map(SidecarFfmpegProcess)
            .map_err(|e| command_start_error("ffmpeg (concat)", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_args_keep_order() {
        let mut cmd = FfmpegCommand::new();
        cmd.input("a.mp4").input("b.mp4").output("out.mp4");

        let args = command_args(&mut cmd);
        let a = args.iter().position(|x| x == "a.mp4").unwrap();
        let b = args.iter().position(|x| x == "b.mp4").unwrap();
        assert!(a < b);
        assert_eq!(args.last().map(String::as_str), Some("out.mp4"));
    }

    #[test]
    fn test_format_command_quotes_filter_graph() {
        let mut cmd = FfmpegCommand::new();
        cmd.args(["-filter_complex", "[0:v:0]setsar=1[v0];[v0]concat=n=1:v=1:a=0[vout]"]);
        cmd.output("/tmp/my output.mp4");

        let line = format_command(&mut cmd);
        assert!(line.starts_with("ffmpeg "));
        assert!(line.contains("\"[0:v:0]setsar=1[v0];[v0]concat=n=1:v=1:a=0[vout]\""));
        assert!(line.ends_with("\"/tmp/my output.mp4\""));
    }
}
