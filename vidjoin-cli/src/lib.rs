// vidjoin-cli/src/lib.rs
//
// Library portion of the vidjoin CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod terminal;

// Re-export items needed by the binary or integration tests
pub use cli::{Cli, Commands, ConcatArgs, ProbeArgs};
pub use commands::concat::run_concat_command;
pub use commands::probe::run_probe_command;
