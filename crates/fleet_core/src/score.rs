//! Fleet strength estimate.
//!
//! The score is measured, not derived: the fleet fights a passive copy of
//! itself for a fixed number of battle ticks and its raw damage output is
//! combined with its durability as `sqrt(max_hp × dps)`.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::data::Registry;
use crate::error::Result;
use crate::game_state::GameState;
use crate::grid::Side;
use crate::math::to_f64;
use crate::runtime::{BattleMode, Runtime};

/// Result of [`estimate_fleet_score`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FleetScore {
    /// Max HP of the fleet (multipliers included).
    pub max_hp: f64,
    /// Raw damage per second against the mirror.
    pub dps: f64,
    /// `sqrt(max_hp × dps)`.
    pub score: f64,
}

/// Estimate a fleet's strength.
///
/// Deterministic for a given state, registry and config: the random source
/// is seeded from `config.rng_seed` and the mirror never fires or dies.
pub fn estimate_fleet_score(
    state: &GameState,
    registry: Arc<Registry>,
    config: &SimConfig,
) -> Result<FleetScore> {
    let mut runtime = Runtime::new(state, state, registry, config.clone())?
        .with_mode(BattleMode::Bounded)
        .without_events();
    runtime.set_passive(Side::Right, true);
    runtime.run_battle(config.score_battle_ticks);

    let stats = runtime.stats(Side::Left);
    let max_hp = if stats.previous_hp.is_some() {
        stats.max_hp
    } else {
        runtime
            .state(Side::Left)
            .tiles
            .keys()
            .filter_map(|&tile| runtime.tile(tile))
            .map(|rt| rt.props.hp)
            .sum()
    };

    let seconds = to_f64(runtime.elapsed());
    let dps = if seconds > 0.0 {
        stats.damage_dealt.total_raw() / seconds
    } else {
        0.0
    };
    let score = (max_hp * dps).max(0.0).sqrt();

    tracing::debug!(max_hp, dps, score, "estimated fleet score");
    Ok(FleetScore { max_hp, dps, score })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{BuildingData, BuildingTypeId, WeaponData};
    use crate::game_state::TileData;
    use crate::grid::Tile;

    const PLATE: BuildingTypeId = BuildingTypeId::new(1);
    const GUN: BuildingTypeId = BuildingTypeId::new(2);

    fn registry() -> Arc<Registry> {
        Arc::new(
            Registry::new()
                .with_building(BuildingData::new(PLATE, "Plate", 100.0))
                .with_building(
                    BuildingData::new(GUN, "Gun", 50.0)
                        .with_weapon(WeaponData::new(10.0, 0.5, 40.0)),
                ),
        )
    }

    fn config() -> SimConfig {
        SimConfig {
            score_battle_ticks: 200,
            ..SimConfig::default()
        }
    }

    #[test]
    fn test_unarmed_fleet_scores_zero() {
        let state = GameState::new().with_tile(Tile::new(40, 10), TileData::new(PLATE, 1));
        let score = estimate_fleet_score(&state, registry(), &config()).unwrap();
        assert_eq!(score.max_hp, 100.0);
        assert_eq!(score.dps, 0.0);
        assert_eq!(score.score, 0.0);
    }

    #[test]
    fn test_armed_fleet_scores_positive_and_repeatably() {
        let state = GameState::new()
            .with_tile(Tile::new(40, 10), TileData::new(PLATE, 1))
            .with_tile(Tile::new(45, 10), TileData::new(GUN, 1));
        let first = estimate_fleet_score(&state, registry(), &config()).unwrap();
        let second = estimate_fleet_score(&state, registry(), &config()).unwrap();

        assert_eq!(first.max_hp, 150.0);
        assert!(first.dps > 0.0);
        assert!((first.score - (first.max_hp * first.dps).sqrt()).abs() < 1e-9);
        assert_eq!(first, second);
    }

    #[test]
    fn test_more_guns_score_higher() {
        let one = GameState::new().with_tile(Tile::new(45, 10), TileData::new(GUN, 1));
        let two = one.clone().with_tile(Tile::new(45, 11), TileData::new(GUN, 1));
        let a = estimate_fleet_score(&one, registry(), &config()).unwrap();
        let b = estimate_fleet_score(&two, registry(), &config()).unwrap();
        assert!(b.score > a.score);
    }
}
