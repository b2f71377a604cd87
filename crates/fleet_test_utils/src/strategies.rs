//! Proptest strategies.
//!
//! These generate random but reproducible inputs for property-based tests
//! of the grid, the damage formulas and whole battles.

use proptest::prelude::*;

use fleet_core::combat::{DamageType, Defense};
use fleet_core::data::BuildingTypeId;
use fleet_core::game_state::{GameState, TileData};
use fleet_core::grid::{Tile, GRID_HEIGHT, GRID_WIDTH, HALF_WIDTH};

use crate::fixtures::{GUN, LASER, PLATE, REACTOR, TARGETING};

/// Any on-grid tile.
pub fn arb_tile() -> impl Strategy<Value = Tile> {
    (0..GRID_WIDTH, 0..GRID_HEIGHT).prop_map(|(x, y)| Tile::new(x, y))
}

/// A tile on the left fleet's half.
pub fn arb_left_tile() -> impl Strategy<Value = Tile> {
    (0..HALF_WIDTH, 0..GRID_HEIGHT).prop_map(|(x, y)| Tile::new(x, y))
}

/// Any damage type.
pub fn arb_damage_type() -> impl Strategy<Value = DamageType> {
    prop_oneof![
        Just(DamageType::Kinetic),
        Just(DamageType::Explosive),
        Just(DamageType::Energy),
        Just(DamageType::Pure),
    ]
}

/// Non-negative defensive stats.
pub fn arb_defense() -> impl Strategy<Value = Defense> {
    (0.0..500.0f64, 0.0..500.0f64, 0.0..500.0f64, 0.0..500.0f64).prop_map(
        |(armor, shield, deflection, evasion)| Defense {
            armor,
            shield,
            deflection,
            evasion,
        },
    )
}

/// Damage amounts (0.1-10000).
pub fn arb_damage() -> impl Strategy<Value = f64> {
    0.1..10_000.0f64
}

/// Levels (1-10).
pub fn arb_level() -> impl Strategy<Value = u32> {
    1u32..=10
}

/// A building from the fixture content that needs no ammo.
pub fn arb_building() -> impl Strategy<Value = BuildingTypeId> {
    prop_oneof![
        3 => Just(PLATE),
        3 => Just(GUN),
        1 => Just(LASER),
        1 => Just(REACTOR),
        1 => Just(TARGETING),
    ]
}

/// A left-half fleet of up to `max_tiles` fixture buildings.
pub fn arb_fleet(max_tiles: usize) -> impl Strategy<Value = GameState> {
    proptest::collection::btree_map(
        arb_left_tile(),
        (arb_building(), arb_level()),
        1..max_tiles.max(2),
    )
    .prop_map(|tiles| {
        tiles
            .into_iter()
            .fold(GameState::new(), |state, (tile, (building, level))| {
                state.with_tile(tile, TileData::new(building, level))
            })
    })
}
