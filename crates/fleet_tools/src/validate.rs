//! Fleet validation against a content registry.

use std::path::Path;

use fleet_core::data::Registry;
use fleet_core::error::Result;
use fleet_core::validate::{validate_game_state, ValidationReport};

use crate::files::{load_state, save_state};

/// Check a saved fleet; with `fix`, write the repaired fleet back in place.
///
/// # Errors
///
/// Returns an error if the fleet cannot be read or written.
pub fn validate_fleet_file(
    path: &Path,
    registry: &Registry,
    fix: bool,
) -> Result<ValidationReport> {
    let mut state = load_state(path)?;
    let report = validate_game_state(&mut state, registry);

    for error in report.errors() {
        tracing::warn!(path = %path.display(), "{error}");
    }
    if fix && !report.is_clean() {
        save_state(path, &state)?;
        tracing::info!(path = %path.display(), "wrote repaired fleet");
    }
    Ok(report)
}
