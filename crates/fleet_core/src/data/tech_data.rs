//! Technology and element definitions.

use serde::{Deserialize, Serialize};

use crate::data::building_data::BuildingTypeId;

/// Unique identifier for technologies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TechId(pub u32);

impl TechId {
    /// Create a new tech ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Unique identifier for elements (collectible boosts tied to buildings).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ElementId(pub u32);

impl ElementId {
    /// Create a new element ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

/// Production bonus granted by an unlocked tech to one building type.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TechMultiplier {
    /// Building type boosted.
    pub building: BuildingTypeId,
    /// Added to the production multiplier.
    pub production: f64,
}

/// Data-driven tech definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechData {
    /// Unique identifier.
    pub id: TechId,
    /// Display name (debugging only).
    pub name: String,
    /// Production multipliers granted while unlocked.
    #[serde(default)]
    pub multipliers: Vec<TechMultiplier>,
}

impl TechData {
    /// A tech with no effects.
    #[must_use]
    pub fn new(id: TechId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            multipliers: Vec::new(),
        }
    }

    /// Builder: boost a building type's production.
    #[must_use]
    pub fn with_multiplier(mut self, building: BuildingTypeId, production: f64) -> Self {
        self.multipliers.push(TechMultiplier {
            building,
            production,
        });
        self
    }

    /// Total production bonus this tech gives a building type.
    #[must_use]
    pub fn production_bonus(&self, building: BuildingTypeId) -> f64 {
        self.multipliers
            .iter()
            .filter(|m| m.building == building)
            .map(|m| m.production)
            .sum()
    }
}

/// Data-driven element definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementData {
    /// Unique identifier.
    pub id: ElementId,
    /// Display name (debugging only).
    pub name: String,
    /// Production multiplier per unit held this run.
    #[serde(default = "default_bonus")]
    pub production_per_unit: f64,
    /// XP multiplier per unit held permanently.
    #[serde(default = "default_bonus")]
    pub xp_per_unit: f64,
}

const fn default_bonus() -> f64 {
    1.0
}

impl ElementData {
    /// An element with unit bonuses.
    #[must_use]
    pub fn new(id: ElementId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            production_per_unit: 1.0,
            xp_per_unit: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_production_bonus_sums_matching() {
        let tech = TechData::new(TechId::new(1), "Smelting")
            .with_multiplier(BuildingTypeId::new(4), 0.5)
            .with_multiplier(BuildingTypeId::new(4), 0.25)
            .with_multiplier(BuildingTypeId::new(5), 1.0);
        assert_eq!(tech.production_bonus(BuildingTypeId::new(4)), 0.75);
        assert_eq!(tech.production_bonus(BuildingTypeId::new(9)), 0.0);
    }
}
