//! Loading and saving RON data files.

use std::path::Path;

use fleet_core::config::SimConfig;
use fleet_core::data::Registry;
use fleet_core::error::{Result, SimError};
use fleet_core::game_state::GameState;

fn read(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| SimError::DataParseError {
        what: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Load a content registry.
pub fn load_registry(path: &Path) -> Result<Registry> {
    let registry = Registry::from_ron(&read(path)?)?;
    tracing::debug!(path = %path.display(), "loaded registry");
    Ok(registry)
}

/// Load a saved fleet.
pub fn load_state(path: &Path) -> Result<GameState> {
    let state = GameState::from_ron(&read(path)?)?;
    tracing::debug!(path = %path.display(), tiles = state.tiles.len(), "loaded fleet");
    Ok(state)
}

/// Load a config, or the defaults when no path is given.
pub fn load_config(path: Option<&Path>) -> Result<SimConfig> {
    match path {
        Some(path) => SimConfig::from_ron(&read(path)?),
        None => Ok(SimConfig::default()),
    }
}

/// Write a fleet back out as pretty RON.
pub fn save_state(path: &Path, state: &GameState) -> Result<()> {
    let text = state.to_ron()?;
    std::fs::write(path, text)
        .map_err(|e| SimError::Serialization(format!("Failed to write {}: {e}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fleet_test_utils::fixtures::{battle_fleet, test_registry};

    #[test]
    fn test_state_roundtrip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fleet.ron");

        save_state(&path, &battle_fleet()).unwrap();
        assert_eq!(load_state(&path).unwrap(), battle_fleet());
    }

    #[test]
    fn test_registry_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("content.ron");
        std::fs::write(&path, test_registry().to_ron().unwrap()).unwrap();

        assert_eq!(load_registry(&path).unwrap(), *test_registry());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_state(&dir.path().join("missing.ron")).unwrap_err();
        assert!(matches!(err, SimError::DataParseError { .. }));
    }

    #[test]
    fn test_default_config_without_path() {
        assert_eq!(load_config(None).unwrap(), SimConfig::default());
    }
}
