// vidjoin-core/src/external/mocks.rs

// --- Mocking Infrastructure (for testing) ---

// Compiled for unit tests, and for downstream crates via the "test-mocks" feature.

use super::{FfmpegProcess, FfmpegSpawner, FfprobeExecutor, command_args};
use crate::clip::ClipProperties;
use crate::error::{CoreError, CoreResult};
use ffmpeg_sidecar::command::FfmpegCommand;
use ffmpeg_sidecar::event::FfmpegEvent;
use std::cell::RefCell;
use std::collections::HashMap;
use std::os::unix::process::ExitStatusExt;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use std::rc::Rc;

/// Mock implementation of FfmpegProcess.
#[derive(Clone)]
pub struct MockFfmpegProcess {
    /// Events to emit when handle_events is called.
    pub events_to_emit: Rc<RefCell<Vec<FfmpegEvent>>>,
    /// Exit status to return when wait is called.
    pub exit_status: ExitStatus,
}

impl FfmpegProcess for MockFfmpegProcess {
    fn handle_events<F>(&mut self, mut handler: F) -> CoreResult<()>
    where
        F: FnMut(FfmpegEvent) -> CoreResult<()>,
    {
        let events = self.events_to_emit.borrow().clone();
        for event in events {
            handler(event)?;
        }
        Ok(())
    }

    fn wait(&mut self) -> CoreResult<ExitStatus> {
        Ok(self.exit_status)
    }
}

/// Represents an expected ffmpeg command call and its mock result.
pub struct MockFfmpegExpectation {
    pub arg_pattern: String,
    pub result: CoreResult<MockFfmpegProcess>,
    pub create_dummy_output: bool,
}

/// Mock implementation of FfmpegSpawner supporting multiple expectations.
///
/// Each spawned command is matched against the first expectation whose
/// pattern is a substring of any argument. Matched expectations are consumed.
#[derive(Clone, Default)]
pub struct MockFfmpegSpawner {
    expectations: Rc<RefCell<Vec<MockFfmpegExpectation>>>,
    received_calls: Rc<RefCell<Vec<Vec<String>>>>,
}

impl MockFfmpegSpawner {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_expectation(
        &self,
        arg_pattern: &str,
        result: CoreResult<MockFfmpegProcess>,
        create_dummy_output: bool,
    ) {
        self.expectations.borrow_mut().push(MockFfmpegExpectation {
            arg_pattern: arg_pattern.to_string(),
            result,
            create_dummy_output,
        });
    }

    pub fn add_success_expectation(
        &self,
        arg_pattern: &str,
        events: Vec<FfmpegEvent>,
        create_dummy_output: bool,
    ) {
        let process = MockFfmpegProcess {
            events_to_emit: Rc::new(RefCell::new(events)),
            exit_status: ExitStatus::from_raw(0),
        };
        self.add_expectation(arg_pattern, Ok(process), create_dummy_output);
    }

    pub fn add_spawn_error_expectation(&self, arg_pattern: &str, error: CoreError) {
        self.add_expectation(arg_pattern, Err(error), false);
    }

    pub fn add_exit_error_expectation(&self, arg_pattern: &str, events: Vec<FfmpegEvent>, exit_code: i32) {
        let process = MockFfmpegProcess {
            events_to_emit: Rc::new(RefCell::new(events)),
            exit_status: ExitStatus::from_raw(exit_code << 8),
        };
        self.add_expectation(arg_pattern, Ok(process), false);
    }

    #[must_use]
    pub fn get_received_calls(&self) -> Vec<Vec<String>> {
        self.received_calls.borrow().clone()
    }
}

impl FfmpegSpawner for MockFfmpegSpawner {
    type Process = MockFfmpegProcess;

    fn spawn(&self, mut cmd: FfmpegCommand) -> CoreResult<Self::Process> {
        let args = command_args(&mut cmd);
        self.received_calls.borrow_mut().push(args.clone());

        let mut expectations = self.expectations.borrow_mut();
        let found_index = expectations
            .iter()
            .position(|exp| args.iter().any(|arg| arg.contains(&exp.arg_pattern)));

        let Some(index) = found_index else {
            log::error!("MockFfmpegSpawner: No expectation found for command args: {args:?}");
            panic!("MockFfmpegSpawner: No expectation found for command args: {args:?}");
        };

        let expectation = expectations.remove(index);
        log::info!(
            "MockFfmpegSpawner: Matched expectation with pattern '{}'",
            expectation.arg_pattern
        );

        match expectation.result {
            Ok(process) => {
                if expectation.create_dummy_output {
                    create_dummy_output(&args);
                }
                Ok(process)
            }
            Err(err) => {
                log::warn!(
                    "MockFfmpegSpawner simulating spawn error for pattern '{}': {err:?}",
                    expectation.arg_pattern
                );
                Err(err)
            }
        }
    }
}

/// Writes a small file at the command's output path (its last argument).
fn create_dummy_output(args: &[String]) {
    let Some(output_path_str) = args.last() else {
        log::warn!("MockFfmpegSpawner couldn't find output path in args to create dummy file.");
        return;
    };
    let output_path = PathBuf::from(output_path_str);
    if let Some(parent) = output_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            log::error!("MockFfmpegSpawner failed to create parent dir {parent:?}: {e}");
        }
    }
    match std::fs::write(&output_path, b"mock video") {
        Ok(()) => log::info!("MockFfmpegSpawner created dummy output file: {output_path:?}"),
        Err(e) => log::error!("MockFfmpegSpawner failed to create dummy output file {output_path:?}: {e}"),
    }
}

/// Mock implementation of FfprobeExecutor.
#[derive(Clone, Default)]
pub struct MockFfprobeExecutor {
    clip_results: Rc<RefCell<HashMap<PathBuf, CoreResult<ClipProperties>>>>,
    probed_paths: Rc<RefCell<Vec<PathBuf>>>,
}

impl MockFfprobeExecutor {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an expected result for probe_clip for a specific input path.
    pub fn expect_clip(&self, input_path: &Path, result: CoreResult<ClipProperties>) {
        self.clip_results
            .borrow_mut()
            .insert(input_path.to_path_buf(), result);
    }

    /// Paths passed to probe_clip, in call order.
    #[must_use]
    pub fn probed_paths(&self) -> Vec<PathBuf> {
        self.probed_paths.borrow().clone()
    }
}

impl FfprobeExecutor for MockFfprobeExecutor {
    fn probe_clip(&self, input_path: &Path) -> CoreResult<ClipProperties> {
        log::info!("MockFfprobeExecutor::probe_clip called for: {}", input_path.display());
        self.probed_paths.borrow_mut().push(input_path.to_path_buf());
        match self.clip_results.borrow().get(input_path) {
            Some(Ok(props)) => Ok(props.clone()),
            // CoreError is not Clone, so the stored error is rebuilt from its message
            Some(Err(err)) => Err(CoreError::VideoInfoError(format!(
                "Mock ffprobe error for {}: {err}",
                input_path.display()
            ))),
            None => {
                log::error!(
                    "MockFfprobeExecutor: No expectation set for probe_clip on path: {}",
                    input_path.display()
                );
                Err(CoreError::VideoInfoError(format!(
                    "MockFfprobeExecutor: No expectation set for path {}",
                    input_path.display()
                )))
            }
        }
    }
}
