//! Content validation and save migration.
//!
//! Saves outlive content: a building, tech or element can disappear from
//! the registry between releases. [`validate_game_state`] repairs a state in
//! place so a runtime can load it; [`check_game_state`] only reports the
//! first problem, for tooling that must reject bad data instead.

use serde::{Deserialize, Serialize};

use crate::data::{BuildingTypeId, ElementId, Registry, TechId};
use crate::error::{Result, SimError};
use crate::game_state::GameState;
use crate::grid::Tile;

/// What [`validate_game_state`] changed.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Tiles removed because their building is unknown.
    pub dropped_tiles: Vec<(Tile, BuildingTypeId)>,
    /// Unknown techs removed.
    pub dropped_techs: Vec<TechId>,
    /// Unknown elements removed (from either inventory).
    pub dropped_elements: Vec<ElementId>,
    /// Tiles whose level or capacity was clamped.
    pub clamped_tiles: Vec<Tile>,
}

impl ValidationReport {
    /// Whether the state needed no repair.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.dropped_tiles.is_empty()
            && self.dropped_techs.is_empty()
            && self.dropped_elements.is_empty()
            && self.clamped_tiles.is_empty()
    }

    /// The repairs expressed as errors.
    #[must_use]
    pub fn errors(&self) -> Vec<SimError> {
        let mut errors: Vec<SimError> = self
            .dropped_tiles
            .iter()
            .map(|(_, building)| SimError::UnknownBuilding(*building))
            .collect();
        errors.extend(self.dropped_techs.iter().map(|t| SimError::UnknownTech(*t)));
        errors.extend(self.dropped_elements.iter().map(|e| SimError::UnknownElement(*e)));
        errors.extend(self.clamped_tiles.iter().map(|tile| {
            SimError::InvalidState(format!("tile {tile:?} had an out-of-range level or capacity"))
        }));
        errors
    }
}

/// Repair `state` against `registry`.
///
/// Drops tiles, techs and elements the registry does not define, clamps
/// levels to at least 1 and capacities to `[0, 1]`.
pub fn validate_game_state(state: &mut GameState, registry: &Registry) -> ValidationReport {
    let mut report = ValidationReport::default();

    state.tiles.retain(|tile, data| {
        if registry.building(data.building).is_none() {
            report.dropped_tiles.push((*tile, data.building));
            return false;
        }
        let capacity = if data.capacity.is_nan() {
            1.0
        } else {
            data.capacity.clamp(0.0, 1.0)
        };
        if data.level == 0 || capacity != data.capacity {
            data.level = data.level.max(1);
            data.capacity = capacity;
            report.clamped_tiles.push(*tile);
        }
        true
    });

    state.unlocked_techs.retain(|tech| {
        let known = registry.tech(*tech).is_some();
        if !known {
            report.dropped_techs.push(*tech);
        }
        known
    });

    for inventory in [&mut state.elements, &mut state.permanent_elements] {
        inventory.retain(|element, _| {
            let known = registry.element(*element).is_some();
            if !known && !report.dropped_elements.contains(element) {
                report.dropped_elements.push(*element);
            }
            known
        });
    }

    if !report.is_clean() {
        tracing::warn!(
            tiles = report.dropped_tiles.len(),
            techs = report.dropped_techs.len(),
            elements = report.dropped_elements.len(),
            clamped = report.clamped_tiles.len(),
            "repaired game state"
        );
    }
    report
}

/// Fail on the first reference `registry` cannot resolve.
pub fn check_game_state(state: &GameState, registry: &Registry) -> Result<()> {
    if let Some(data) = state
        .tiles
        .values()
        .find(|d| registry.building(d.building).is_none())
    {
        return Err(SimError::UnknownBuilding(data.building));
    }
    if let Some(tech) = state
        .unlocked_techs
        .iter()
        .find(|t| registry.tech(**t).is_none())
    {
        return Err(SimError::UnknownTech(*tech));
    }
    if let Some(element) = state
        .elements
        .keys()
        .chain(state.permanent_elements.keys())
        .find(|e| registry.element(**e).is_none())
    {
        return Err(SimError::UnknownElement(*element));
    }
    Ok(())
}
