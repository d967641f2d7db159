//! Command implementations for the CLI.
//!
//! Each submodule contains the implementation of a specific command.

/// Joins video files into one output video.
pub mod concat;
/// Prints probed clip properties.
pub mod probe;
