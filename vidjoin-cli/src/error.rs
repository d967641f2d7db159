// ============================================================================
// vidjoin-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Result alias and output-serialization errors

use vidjoin_core::{CoreError, CoreResult};

/// Type alias for CLI results using CoreError.
pub type CliResult<T> = CoreResult<T>;

/// Serializes a value as pretty JSON for stdout.
pub fn to_pretty_json<T: serde::Serialize>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value).map_err(CoreError::from)
}
