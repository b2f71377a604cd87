//! End-to-end scenarios over the shared fixture content.
//!
//! Each module drives a full [`Runtime`] through its public API and checks
//! the observable outcome: ledgers, tile HP, events and battle status.

use fleet_core::combat::{DamageFlags, DamageType};
use fleet_core::config::SimConfig;
use fleet_core::data::BuildingTypeId;
use fleet_core::economy::{ResourceKind, ResourceLedger};
use fleet_core::events::{EventLog, SimEvent};
use fleet_core::game_state::{GameState, TileData};
use fleet_core::grid::{Side, Tile};
use fleet_core::math::{millis, seconds};
use fleet_core::runtime::{BattleMode, BattleStatus, Runtime, SpeedContext};
use fleet_core::score::estimate_fleet_score;
use fleet_core::status_effect::StatusEffectKind;
use fleet_core::validate::{check_game_state, validate_game_state};
use fleet_test_utils::determinism::{run_parallel_battles, verify_battle_determinism};
use fleet_test_utils::fixtures::*;
use fleet_test_utils::strategies::arb_fleet;
use proptest::prelude::*;

fn without_seed_ammo() -> SimConfig {
    SimConfig {
        battle_start_ammo_cycles: 0,
        ..test_config()
    }
}

fn fired(runtime: &Runtime, from: Tile) -> bool {
    runtime
        .events()
        .events()
        .iter()
        .any(|e| matches!(e, SimEvent::WeaponFired { from: f, .. } if *f == from))
}

// =============================================================================
// Production economy
// =============================================================================

mod economy {
    use super::*;

    #[test]
    fn test_consumption_is_all_or_nothing() {
        let mut left = fleet(&[(20, 10, FOUNDRY, 1)]);
        left.resources = ResourceLedger::new().with(ResourceKind::Ore, 5.0);
        let right = fleet(&[(60, 10, PLATE, 1)]);
        let mut rt = Runtime::new(&left, &right, test_registry(), without_seed_ammo()).unwrap();

        rt.production_step();

        let foundry = Tile::new(20, 10);
        assert!(rt.tile(foundry).unwrap().insufficient);
        let state = rt.state(Side::Left);
        assert_eq!(state.resources.get(ResourceKind::Ore), 5.0);
        assert_eq!(state.resources.get(ResourceKind::Shell), 0.0);

        let flow = &rt.stats(Side::Left).resources;
        assert_eq!(flow.consumed(ResourceKind::Ore), 0.0);
        assert_eq!(flow.consumed(ResourceKind::Power), 2.0);
    }

    #[test]
    fn test_supply_chain_starts_one_tick_late() {
        let left = fleet(&[(40, 8, MINE, 1), (40, 9, REACTOR, 1), (41, 8, FOUNDRY, 1)]);
        let right = fleet(&[(60, 10, PLATE, 1)]);
        let mut rt = Runtime::new(&left, &right, test_registry(), without_seed_ammo()).unwrap();

        rt.production_step();
        let ledger = &rt.state(Side::Left).resources;
        assert_eq!(ledger.get(ResourceKind::Ore), 2.0);
        assert_eq!(ledger.get(ResourceKind::Power), 4.0);
        assert_eq!(ledger.get(ResourceKind::Shell), 0.0);

        rt.production_step();
        let ledger = &rt.state(Side::Left).resources;
        assert_eq!(ledger.get(ResourceKind::Ore), 2.0);
        assert_eq!(ledger.get(ResourceKind::Power), 4.0);
        assert_eq!(ledger.get(ResourceKind::Shell), 2.0);
        assert!(!rt.tile(Tile::new(41, 8)).unwrap().insufficient);
    }

    #[test]
    fn test_starved_building_resumes_once_supplied() {
        let foundry = Tile::new(20, 10);
        let mut left = fleet(&[(20, 10, FOUNDRY, 1)]);
        left.resources = ResourceLedger::new().with(ResourceKind::Ore, 10.0);
        let right = fleet(&[(60, 10, PLATE, 1)]);
        let mut rt = Runtime::new(&left, &right, test_registry(), without_seed_ammo()).unwrap();

        for tick in 0..3 {
            rt.production_step();
            assert!(rt.tile(foundry).unwrap().insufficient, "tick {tick}");
            let state = rt.state(Side::Left);
            assert_eq!(state.resources.get(ResourceKind::Shell), 0.0, "tick {tick}");
            assert_eq!(state.resources.get(ResourceKind::Ore), 10.0, "tick {tick}");
            assert_eq!(rt.stats(Side::Left).resources.produced(ResourceKind::Shell), 0.0);
        }

        // power only reaches the pool at the end of the reactor's first tick
        rt.place_tile(Tile::new(19, 10), TileData::new(REACTOR, 1));
        rt.production_step();
        assert!(rt.tile(foundry).unwrap().insufficient);
        assert_eq!(rt.state(Side::Left).resources.get(ResourceKind::Power), 4.0);

        rt.production_step();
        assert!(!rt.tile(foundry).unwrap().insufficient);
        let state = rt.state(Side::Left);
        assert_eq!(state.resources.get(ResourceKind::Shell), 2.0);
        assert_eq!(state.resources.get(ResourceKind::Ore), 8.0);
        assert_eq!(rt.stats(Side::Left).resources.produced(ResourceKind::Shell), 2.0);
    }

    #[test]
    fn test_starved_launcher_never_fires() {
        let launcher = Tile::new(44, 10);
        let left = fleet(&[(44, 10, LAUNCHER, 1)]);
        let right = fleet(&[(55, 10, PLATE, 1)]);
        let mut rt = Runtime::new(&left, &right, test_registry(), without_seed_ammo()).unwrap();

        rt.production_step();
        for _ in 0..60 {
            rt.battle_step();
        }

        assert!(rt.tile(launcher).unwrap().insufficient);
        assert!(!fired(&rt, launcher));
        assert_eq!(rt.tile(Tile::new(55, 10)).unwrap().damage_taken, 0.0);
    }

    #[test]
    fn test_seed_ammo_lets_launcher_open_fire() {
        let launcher = Tile::new(44, 10);
        let left = fleet(&[(44, 10, LAUNCHER, 1)]);
        let right = fleet(&[(55, 10, PLATE, 1)]);
        let mut rt = runtime(&left, &right);

        rt.production_step();
        assert_eq!(rt.state(Side::Left).resources.get(ResourceKind::Shell), 4.0);

        for _ in 0..40 {
            rt.battle_step();
        }
        assert!(fired(&rt, launcher));
    }
}

// =============================================================================
// Status effects
// =============================================================================

mod status_effects {
    use super::*;

    #[test]
    fn test_burn_ticks_twice_then_expires() {
        let plate = Tile::new(10, 10);
        let left = fleet(&[(10, 10, PLATE, 1)]);
        let right = fleet(&[(60, 10, PLATE, 1)]);
        let mut rt = runtime(&left, &right);

        let mut out = Vec::new();
        let mut events = EventLog::new();
        rt.get(plate).unwrap().add_status_effect(
            StatusEffectKind::Burn,
            Tile::new(60, 10),
            PLATE,
            1.0,
            seconds(2.0),
            &mut out,
            &mut events,
        );

        rt.production_step();
        assert_eq!(rt.tile(plate).unwrap().damage_taken, 1.0);
        rt.production_step();
        assert_eq!(rt.tile(plate).unwrap().damage_taken, 2.0);
        assert_eq!(rt.tile(plate).unwrap().status_effects.len(), 1);

        rt.production_step();
        let tile = rt.tile(plate).unwrap();
        assert_eq!(tile.damage_taken, 2.0);
        assert!(tile.status_effects.is_empty());
    }
}

// =============================================================================
// Battles
// =============================================================================

mod battles {
    use super::*;

    #[test]
    fn test_destroying_last_tile_ends_battle() {
        let target = Tile::new(60, 10);
        let left = fleet(&[(10, 10, PLATE, 1)]);
        let right = fleet(&[(60, 10, PLATE, 1)]);
        let mut rt = runtime(&left, &right);

        rt.damage_tile(target, 1_000.0, DamageType::Pure, DamageFlags::TRUE_DAMAGE, GUN);
        assert!(rt.tile(target).is_none());
        assert!(rt.state(Side::Right).tiles.is_empty());
        assert_eq!(rt.stats(Side::Left).destroyed_hp, 100.0);
        assert_eq!(rt.stats(Side::Right).lost_hp, 100.0);

        assert_eq!(rt.update_battle_status(), BattleStatus::LeftWon);
        assert!(rt.events().events().iter().any(|e| matches!(
            e,
            SimEvent::BattleStatusChanged {
                from: BattleStatus::InProgress,
                to: BattleStatus::LeftWon,
            }
        )));
        assert!(rt
            .events()
            .events()
            .iter()
            .any(|e| matches!(e, SimEvent::TileDestroyed { tile, .. } if *tile == target)));
        assert_eq!(rt.state(Side::Left).battle_counters.wins, 1);
        assert_eq!(rt.state(Side::Right).battle_counters.losses, 1);
    }

    #[test]
    fn test_stronger_fleet_wins() {
        let mut rt = runtime(&battle_fleet(), &gun_line(2));
        let status = rt.run_battle(4_000);

        assert_eq!(status, BattleStatus::LeftWon);
        assert!(rt.state(Side::Right).tiles.is_empty());
        assert_eq!(rt.stats(Side::Left).destroyed_hp, 80.0);
        assert_eq!(rt.state(Side::Left).battle_counters.wins, 1);
        assert!(rt.stats(Side::Left).damage_dealt.total_actual() >= 80.0);
    }

    #[test]
    fn test_run_battle_stops_when_decided() {
        let mut rt = runtime(&battle_fleet(), &gun_line(2));
        rt.run_battle(4_000);
        let elapsed = rt.elapsed();

        rt.run_battle(10);
        assert!(rt.elapsed() > elapsed);
        assert_eq!(rt.status(), BattleStatus::LeftWon);
    }

    #[test]
    fn test_peace_mode_spawns_harder_waves() {
        let mut rt = runtime(&gun_line(2), &GameState::new()).with_mode(BattleMode::Peace);
        rt.run_battle(2_000);

        assert!(rt.state(Side::Left).battle_counters.waves >= 3);
        let levels: Vec<u32> = rt
            .events()
            .events()
            .iter()
            .filter_map(|e| match e {
                SimEvent::WaveSpawned { level, .. } => Some(*level),
                _ => None,
            })
            .collect();
        assert!(levels.len() >= 3);
        assert!(levels.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(rt.status(), BattleStatus::InProgress);
    }

    #[test]
    fn test_one_second_tick_drains_both_clocks() {
        let mut rt = runtime(&gun_line(1), &gun_line(1));
        let mut speed = SpeedContext::default();
        rt.tick(millis(1000), &mut speed);

        assert_eq!(rt.elapsed(), millis(1000));
        assert_eq!(rt.state(Side::Left).production_ticks, 1);
        assert_eq!(rt.state(Side::Right).production_ticks, 1);
        assert!(fired(&rt, Tile::new(45, 8)));
    }
}

// =============================================================================
// Time warp
// =============================================================================

mod time_warp {
    use super::*;

    #[test]
    fn test_warp_is_spent_for_speed() {
        let mut left = gun_line(1);
        left.resources = ResourceLedger::new().with(ResourceKind::Warp, 10.0);
        let mut rt = runtime(&left, &fleet(&[(60, 10, PLATE, 1)]));

        let mut speed = SpeedContext::new(2);
        rt.tick(millis(1000), &mut speed);

        assert_eq!(speed.speed, 2);
        assert_eq!(rt.state(Side::Left).resources.get(ResourceKind::Warp), 9.5);
    }

    #[test]
    fn test_speed_resets_without_warp() {
        let mut rt = runtime(&gun_line(1), &fleet(&[(60, 10, PLATE, 1)]));

        let mut speed = SpeedContext::new(4);
        rt.tick(millis(1000), &mut speed);

        assert_eq!(speed.speed, 1);
        assert!(rt
            .events()
            .events()
            .iter()
            .any(|e| matches!(e, SimEvent::SpeedReset { side: Side::Left })));
    }
}

// =============================================================================
// Determinism
// =============================================================================

mod determinism {
    use super::*;

    #[test]
    fn test_full_battle_is_reproducible() {
        verify_battle_determinism(|| runtime(&battle_fleet(), &battle_fleet()), 1_200)
            .assert_deterministic();
    }

    #[test]
    fn test_parallel_runtimes_agree() {
        run_parallel_battles(|| runtime(&battle_fleet(), &gun_line(4)), 4, 600)
            .assert_deterministic();
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(8))]

        #[test]
        fn random_fleets_are_deterministic(left in arb_fleet(12)) {
            let result = verify_battle_determinism(|| runtime(&left, &gun_line(2)), 200);
            prop_assert!(result.is_deterministic);
        }
    }
}

// =============================================================================
// Scoring and validation
// =============================================================================

mod tooling {
    use super::*;

    #[test]
    fn test_score_is_repeatable_and_ranks_fleets() {
        let registry = test_registry();
        let config = test_config();

        let strong = estimate_fleet_score(&battle_fleet(), registry.clone(), &config).unwrap();
        let again = estimate_fleet_score(&battle_fleet(), registry.clone(), &config).unwrap();
        let weak = estimate_fleet_score(&gun_line(1), registry, &config).unwrap();

        assert_eq!(strong, again);
        assert!(strong.score > weak.score);
        assert!(strong.max_hp > weak.max_hp);
    }

    #[test]
    fn test_validation_drops_unknown_content() {
        let registry = test_registry();
        let mut state = battle_fleet()
            .with_tile(Tile::new(30, 30), TileData::new(BuildingTypeId::new(99), 1))
            .with_tech(fleet_core::data::TechId::new(99));
        assert!(check_game_state(&state, &registry).is_err());

        let report = validate_game_state(&mut state, &registry);
        assert_eq!(report.dropped_tiles.len(), 1);
        assert_eq!(report.dropped_techs.len(), 1);
        assert_eq!(report.errors().len(), 2);
        assert!(check_game_state(&state, &registry).is_ok());
        assert_eq!(state.tiles.len(), battle_fleet().tiles.len());
    }
}
