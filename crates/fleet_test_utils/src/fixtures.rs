//! Test fixtures and helpers.
//!
//! A small but complete content set (armour, every weapon family, an
//! economy chain and boosters) plus builders for the fleets the integration
//! tests fight with.

use std::sync::Arc;

use fleet_core::combat::{CriticalDamage, Defense, DamageType, ProjectileFlags};
use fleet_core::config::SimConfig;
use fleet_core::data::{
    AbilityData, AbilityEffect, AbilityTiming, AbilityValue, BoosterData, BoosterEffect,
    BuildingData, BuildingTypeId, ElementData, ElementId, Registry, TechData, TechId, WeaponData,
};
use fleet_core::economy::ResourceKind;
use fleet_core::game_state::{GameState, TileData};
use fleet_core::grid::{Tile, TileRange};
use fleet_core::rng::ScriptedRandom;
use fleet_core::runtime::Runtime;
use fleet_core::status_effect::StatusEffectKind;

/// Armour plate: HP only.
pub const PLATE: BuildingTypeId = BuildingTypeId::new(1);
/// Kinetic autocannon, no ammo.
pub const GUN: BuildingTypeId = BuildingTypeId::new(2);
/// Energy laser that pierces.
pub const LASER: BuildingTypeId = BuildingTypeId::new(3);
/// Explosive launcher firing shells, with a burning hit.
pub const LAUNCHER: BuildingTypeId = BuildingTypeId::new(4);
/// Drone bay.
pub const DRONE_BAY: BuildingTypeId = BuildingTypeId::new(5);
/// Power generator.
pub const REACTOR: BuildingTypeId = BuildingTypeId::new(6);
/// Ore mine.
pub const MINE: BuildingTypeId = BuildingTypeId::new(7);
/// Turns ore and power into shells.
pub const FOUNDRY: BuildingTypeId = BuildingTypeId::new(8);
/// Damage aura.
pub const TARGETING: BuildingTypeId = BuildingTypeId::new(9);
/// Heals neighbours.
pub const REPAIR_DOCK: BuildingTypeId = BuildingTypeId::new(10);
/// Stops lasers.
pub const BULKHEAD: BuildingTypeId = BuildingTypeId::new(11);

/// Tech that speeds up mines.
pub const DEEP_MINING: TechId = TechId::new(1);
/// Element boosting mines.
pub const IRIDIUM: ElementId = ElementId::new(1);

/// The shared test content.
#[must_use]
pub fn test_registry() -> Arc<Registry> {
    Arc::new(
        Registry::new()
            .with_building(BuildingData::new(PLATE, "Armour plate", 100.0).with_defense(Defense {
                armor: 10.0,
                ..Defense::default()
            }))
            .with_building(
                BuildingData::new(GUN, "Autocannon", 40.0)
                    .with_weapon(
                        WeaponData::new(6.0, 0.5, 20.0)
                            .with_critical(CriticalDamage::new(0.1, 2.0)),
                    ),
            )
            .with_building(
                BuildingData::new(LASER, "Lance", 30.0).with_weapon(
                    WeaponData::new(12.0, 2.0, 40.0)
                        .with_damage_type(DamageType::Energy)
                        .with_flags(ProjectileFlags {
                            laser: true,
                            ..ProjectileFlags::default()
                        }),
                ),
            )
            .with_building(
                BuildingData::new(LAUNCHER, "Launcher", 50.0)
                    .with_input(ResourceKind::Shell, 1.0)
                    .with_weapon(
                        WeaponData::new(20.0, 1.5, 10.0)
                            .with_damage_type(DamageType::Explosive)
                            .with_projectiles(2)
                            .with_ability(AbilityData::new(
                                AbilityTiming::OnHit,
                                TileRange::Single,
                                AbilityEffect::ApplyStatus {
                                    kind: StatusEffectKind::Burn,
                                    value: AbilityValue::DamagePct(0.1),
                                    duration: 3.0,
                                },
                            )),
                    ),
            )
            .with_building(
                BuildingData::new(DRONE_BAY, "Drone bay", 40.0).with_weapon(
                    WeaponData::new(5.0, 1.0, 8.0)
                        .with_flags(ProjectileFlags {
                            drone: true,
                            no_evasion: true,
                            ..ProjectileFlags::default()
                        })
                        .with_magnitude(1.5),
                ),
            )
            .with_building(
                BuildingData::new(REACTOR, "Reactor", 60.0).with_output(ResourceKind::Power, 4.0),
            )
            .with_building(
                BuildingData::new(MINE, "Mine", 60.0)
                    .with_output(ResourceKind::Ore, 2.0)
                    .with_element(IRIDIUM),
            )
            .with_building(
                BuildingData::new(FOUNDRY, "Foundry", 60.0)
                    .with_input(ResourceKind::Ore, 2.0)
                    .with_input(ResourceKind::Power, 2.0)
                    .with_output(ResourceKind::Shell, 2.0),
            )
            .with_building(BuildingData::new(TARGETING, "Targeting array", 40.0).with_booster(
                BoosterData::new(TileRange::Range1, BoosterEffect::DamageBoost(0.25)),
            ))
            .with_building(BuildingData::new(REPAIR_DOCK, "Repair dock", 40.0).with_booster(
                BoosterData::new(TileRange::Adjacent, BoosterEffect::Repair(2.0)),
            ))
            .with_building(BuildingData::new(BULKHEAD, "Bulkhead", 150.0).blocking_lasers())
            .with_tech(TechData::new(DEEP_MINING, "Deep mining").with_multiplier(MINE, 0.5))
            .with_element(ElementData::new(IRIDIUM, "Iridium"))
            .with_resource_value(ResourceKind::Shell, 2.0),
    )
}

/// Default config with the peace-mode wave building set to [`PLATE`].
#[must_use]
pub fn test_config() -> SimConfig {
    SimConfig {
        peace_basic_building: PLATE,
        ..SimConfig::default()
    }
}

/// Fleet from `(x, y, building, level)` entries.
#[must_use]
pub fn fleet(tiles: &[(u16, u16, BuildingTypeId, u32)]) -> GameState {
    tiles
        .iter()
        .fold(GameState::new(), |state, &(x, y, building, level)| {
            state.with_tile(Tile::new(x, y), TileData::new(building, level))
        })
}

/// A mixed fleet: armour in front, guns and a laser behind, an ammo chain
/// feeding a launcher, and a targeting array boosting the guns.
#[must_use]
pub fn battle_fleet() -> GameState {
    fleet(&[
        (44, 8, PLATE, 2),
        (44, 9, PLATE, 2),
        (44, 10, PLATE, 2),
        (44, 11, PLATE, 2),
        (43, 9, GUN, 1),
        (43, 10, GUN, 1),
        (42, 9, TARGETING, 1),
        (43, 11, LASER, 1),
        (43, 8, LAUNCHER, 1),
        (41, 8, FOUNDRY, 1),
        (40, 8, MINE, 1),
        (40, 9, REACTOR, 1),
        (42, 10, REPAIR_DOCK, 1),
        (42, 11, DRONE_BAY, 1),
    ])
}

/// A lone column of guns, weaker than [`battle_fleet`].
#[must_use]
pub fn gun_line(count: u16) -> GameState {
    let tiles: Vec<_> = (0..count).map(|y| (45, 8 + y, GUN, 1)).collect();
    fleet(&tiles)
}

/// Runtime over the test content with the config's seeded random source.
///
/// # Panics
///
/// Panics if the test config is invalid.
#[must_use]
pub fn runtime(left: &GameState, right: &GameState) -> Runtime {
    Runtime::new(left, right, test_registry(), test_config()).expect("test config is valid")
}

/// Runtime whose every random draw is `value`.
///
/// # Panics
///
/// Panics if the test config is invalid.
#[must_use]
pub fn scripted_runtime(left: &GameState, right: &GameState, value: f64) -> Runtime {
    Runtime::with_rng(
        left,
        right,
        test_registry(),
        test_config(),
        Box::new(ScriptedRandom::constant(value)),
    )
    .expect("test config is valid")
}
