use assert_cmd::Command;
use predicates::str::contains;
use std::error::Error;
use tempfile::tempdir;

// Helper function to get the path to the compiled binary
fn vidjoin_cmd() -> Command {
    Command::cargo_bin("vidjoin").expect("Failed to find vidjoin binary")
}

#[test]
fn test_help_lists_commands() {
    vidjoin_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("concat"))
        .stdout(contains("probe"));
}

#[test]
fn test_concat_single_file_is_rejected() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let input = dir.path().join("only.mp4");
    std::fs::write(&input, "dummy content")?;
    let output = dir.path().join("out").join("output.mp4");

    vidjoin_cmd()
        .arg("concat")
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .failure()
        .stderr(contains("At least two video files"));

    // Nothing is created for a rejected request
    assert!(!output.parent().unwrap().exists());
    Ok(())
}

#[test]
fn test_concat_output_equal_to_input_is_rejected() -> Result<(), Box<dyn Error>> {
    let dir = tempdir()?;
    let first = dir.path().join("a.mp4");
    let second = dir.path().join("b.mp4");
    std::fs::write(&first, "first clip")?;
    std::fs::write(&second, "second clip")?;

    vidjoin_cmd()
        .arg("concat")
        .arg(&first)
        .arg(&second)
        .arg("-o")
        .arg(&first)
        .assert()
        .failure()
        .stderr(contains("is also input #1"));

    assert_eq!(std::fs::read_to_string(&first)?, "first clip");
    Ok(())
}

#[test]
fn test_concat_without_files_is_rejected() {
    vidjoin_cmd()
        .arg("concat")
        .assert()
        .failure()
        .stderr(contains("At least two video files"));
}

#[test]
fn test_concat_invalid_width_value() {
    vidjoin_cmd()
        .args(["concat", "a.mp4", "b.mp4", "--width", "wide"])
        .assert()
        .failure()
        .stderr(contains("--width"));
}

#[test]
fn test_concat_negative_fps_is_invalid_config() {
    vidjoin_cmd()
        .args(["concat", "a.mp4", "b.mp4", "--fps=-2"])
        .assert()
        .failure()
        .stderr(contains("Invalid configuration"));
}

#[test]
fn test_probe_requires_files() {
    vidjoin_cmd().arg("probe").assert().failure();
}
