//! Persistent half of one fleet.
//!
//! A [`GameState`] is what a save file holds for one side: the placed
//! buildings, the resource ledger and ship-level bookkeeping. Runtimes deep
//! copy their input states, so a simulation never mutates the durable save.

use std::collections::hash_map::DefaultHasher;
use std::collections::{BTreeMap, BTreeSet};
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::data::{BuildingTypeId, ElementId, TechId};
use crate::economy::ResourceLedger;
use crate::error::{Result, SimError};
use crate::grid::{Side, Tile};

/// One placed building.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileData {
    /// Building type.
    pub building: BuildingTypeId,
    /// Level (1-based).
    pub level: u32,
    /// Production order; higher runs first.
    #[serde(default)]
    pub priority: i32,
    /// Share of the building's recipe that runs, in `[0, 1]`.
    #[serde(default = "full_capacity")]
    pub capacity: f64,
}

const fn full_capacity() -> f64 {
    1.0
}

impl TileData {
    /// A building at full capacity and default priority.
    #[must_use]
    pub const fn new(building: BuildingTypeId, level: u32) -> Self {
        Self {
            building,
            level,
            priority: 0,
            capacity: 1.0,
        }
    }

    /// Builder: production priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Builder: capacity.
    #[must_use]
    pub const fn with_capacity(mut self, capacity: f64) -> Self {
        self.capacity = capacity;
        self
    }
}

/// Battle bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BattleCounters {
    /// Bounded battles finished.
    pub battles: u32,
    /// Battles won.
    pub wins: u32,
    /// Battles lost.
    pub losses: u32,
    /// Peace-mode waves spawned.
    pub waves: u32,
}

/// Serializable state of one fleet.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GameState {
    /// Placed buildings.
    #[serde(default)]
    pub tiles: BTreeMap<Tile, TileData>,
    /// Resource stockpile.
    #[serde(default)]
    pub resources: ResourceLedger,
    /// Researched techs.
    #[serde(default)]
    pub unlocked_techs: BTreeSet<TechId>,
    /// Element inventory for this run.
    #[serde(default)]
    pub elements: BTreeMap<ElementId, f64>,
    /// Element inventory kept across runs.
    #[serde(default)]
    pub permanent_elements: BTreeMap<ElementId, f64>,
    /// Battle counters.
    #[serde(default)]
    pub battle_counters: BattleCounters,
    /// Production ticks run so far.
    #[serde(default)]
    pub production_ticks: u64,
}

impl GameState {
    /// Empty fleet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: place a building.
    #[must_use]
    pub fn with_tile(mut self, tile: Tile, data: TileData) -> Self {
        self.tiles.insert(tile, data);
        self
    }

    /// Builder: unlock a tech.
    #[must_use]
    pub fn with_tech(mut self, tech: TechId) -> Self {
        self.unlocked_techs.insert(tech);
        self
    }

    /// Builder: hold some of an element.
    #[must_use]
    pub fn with_element(mut self, element: ElementId, amount: f64) -> Self {
        self.elements.insert(element, amount);
        self
    }

    /// Place (or replace) a building.
    pub fn place(&mut self, tile: Tile, data: TileData) -> Option<TileData> {
        self.tiles.insert(tile, data)
    }

    /// Clear a tile.
    pub fn remove(&mut self, tile: Tile) -> Option<TileData> {
        self.tiles.remove(&tile)
    }

    /// Building at `tile`, if any.
    #[must_use]
    pub fn get(&self, tile: Tile) -> Option<&TileData> {
        self.tiles.get(&tile)
    }

    /// Whether any tile lies on `side`.
    #[must_use]
    pub fn occupies(&self, side: Side) -> bool {
        self.tiles.keys().any(|t| t.side() == side)
    }

    /// The same fleet reflected onto the other half of the grid.
    #[must_use]
    pub fn mirrored(&self) -> Self {
        let mut mirrored = self.clone();
        mirrored.tiles = self
            .tiles
            .iter()
            .map(|(tile, data)| (tile.mirrored(), *data))
            .collect();
        mirrored
    }

    /// Tiles in production order: highest priority first, then tile key.
    #[must_use]
    pub fn production_order(&self) -> Vec<Tile> {
        let mut order: Vec<(i32, Tile)> = self
            .tiles
            .iter()
            .map(|(tile, data)| (data.priority, *tile))
            .collect();
        order.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
        order.into_iter().map(|(_, tile)| tile).collect()
    }

    /// Order-independent hash of tiles, techs and elements.
    ///
    /// Resources and counters are left out: two fleets with the same layout
    /// and unlocks hash the same regardless of how much they have stockpiled.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();

        self.tiles.len().hash(&mut hasher);
        for (tile, data) in &self.tiles {
            tile.hash(&mut hasher);
            data.building.hash(&mut hasher);
            data.level.hash(&mut hasher);
            data.priority.hash(&mut hasher);
            data.capacity.to_bits().hash(&mut hasher);
        }

        self.unlocked_techs.len().hash(&mut hasher);
        for tech in &self.unlocked_techs {
            tech.hash(&mut hasher);
        }

        for elements in [&self.elements, &self.permanent_elements] {
            elements.len().hash(&mut hasher);
            for (element, amount) in elements {
                element.hash(&mut hasher);
                amount.to_bits().hash(&mut hasher);
            }
        }

        hasher.finish()
    }

    /// Hash of two states that does not depend on argument order.
    #[must_use]
    pub fn hash_pair(a: &Self, b: &Self) -> u64 {
        let (ha, hb) = (a.state_hash(), b.state_hash());
        let (lo, hi) = if ha <= hb { (ha, hb) } else { (hb, ha) };
        let mut hasher = DefaultHasher::new();
        lo.hash(&mut hasher);
        hi.hash(&mut hasher);
        hasher.finish()
    }

    /// Serialize to bytes (bincode).
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        bincode::serialize(self)
            .map_err(|e| SimError::Serialization(format!("Failed to serialize game state: {e}")))
    }

    /// Deserialize from bytes (bincode).
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        bincode::deserialize(data)
            .map_err(|e| SimError::Serialization(format!("Failed to deserialize game state: {e}")))
    }

    /// Serialize to pretty RON.
    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| SimError::Serialization(e.to_string()))
    }

    /// Parse from RON.
    pub fn from_ron(src: &str) -> Result<Self> {
        ron::from_str(src).map_err(|e| SimError::DataParseError {
            what: "game state".to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::economy::ResourceKind;

    fn sample() -> GameState {
        GameState::new()
            .with_tile(Tile::new(1, 1), TileData::new(BuildingTypeId::new(1), 2))
            .with_tile(
                Tile::new(3, 4),
                TileData::new(BuildingTypeId::new(2), 1).with_priority(5),
            )
            .with_tech(TechId::new(9))
            .with_element(ElementId::new(1), 3.0)
    }

    #[test]
    fn test_hash_ignores_insertion_order() {
        let a = sample();
        let mut b = GameState::new()
            .with_element(ElementId::new(1), 3.0)
            .with_tech(TechId::new(9));
        b.place(
            Tile::new(3, 4),
            TileData::new(BuildingTypeId::new(2), 1).with_priority(5),
        );
        b.place(Tile::new(1, 1), TileData::new(BuildingTypeId::new(1), 2));
        assert_eq!(a.state_hash(), b.state_hash());
    }

    #[test]
    fn test_hash_sensitive_to_level_and_priority() {
        let base = sample();
        let mut levelled = base.clone();
        levelled.tiles.get_mut(&Tile::new(1, 1)).unwrap().level = 3;
        assert_ne!(base.state_hash(), levelled.state_hash());

        let mut prioritised = base.clone();
        prioritised.tiles.get_mut(&Tile::new(1, 1)).unwrap().priority = 1;
        assert_ne!(base.state_hash(), prioritised.state_hash());
    }

    #[test]
    fn test_hash_ignores_resources() {
        let base = sample();
        let mut rich = base.clone();
        rich.resources.add(ResourceKind::Ore, 100.0);
        assert_eq!(base.state_hash(), rich.state_hash());
    }

    #[test]
    fn test_hash_pair_symmetric() {
        let a = sample();
        let b = a.mirrored();
        assert_eq!(GameState::hash_pair(&a, &b), GameState::hash_pair(&b, &a));
    }

    #[test]
    fn test_production_order() {
        let state = sample().with_tile(
            Tile::new(0, 9),
            TileData::new(BuildingTypeId::new(1), 1).with_priority(5),
        );
        assert_eq!(
            state.production_order(),
            vec![Tile::new(0, 9), Tile::new(3, 4), Tile::new(1, 1)]
        );
    }

    #[test]
    fn test_mirrored_moves_to_right_half() {
        let mirrored = sample().mirrored();
        assert!(mirrored.tiles.keys().all(|t| t.side() == Side::Right));
        assert_eq!(mirrored.mirrored(), sample());
    }

    #[test]
    fn test_bytes_roundtrip() {
        let mut state = sample();
        state.resources.set(ResourceKind::Ore, 12_345.0);
        let bytes = state.to_bytes().unwrap();
        let back = GameState::from_bytes(&bytes).unwrap();
        assert_eq!(back, state);
        assert_eq!(back.resources.get(ResourceKind::Ore), 12_345.0);
    }

    #[test]
    fn test_ron_roundtrip() {
        let state = sample();
        let text = state.to_ron().unwrap();
        assert_eq!(GameState::from_ron(&text).unwrap(), state);
    }
}
