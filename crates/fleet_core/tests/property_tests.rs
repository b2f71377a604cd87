//! Property tests for the grid, state hashing and the damage model.

use fleet_core::combat::{DamageFlags, DamageType, Defense};
use fleet_core::data::{BuildingData, BuildingTypeId};
use fleet_core::events::EventLog;
use fleet_core::game_state::{GameState, TileData};
use fleet_core::grid::{decode_tile, encode_tile, Tile, GRID_HEIGHT, GRID_WIDTH};
use fleet_core::math::{
    damage_after_armor, damage_after_deflection, damage_after_shield, evasion_chance,
};
use fleet_core::rng::ScriptedRandom;
use fleet_core::runtime_tile::RuntimeTile;
use fleet_test_utils::strategies::{arb_damage, arb_damage_type, arb_left_tile, arb_level};
use proptest::prelude::*;

// =============================================================================
// Grid
// =============================================================================

mod grid {
    use super::*;

    proptest! {
        #[test]
        fn tile_roundtrip(x in 0..GRID_WIDTH, y in 0..GRID_HEIGHT) {
            prop_assert_eq!(decode_tile(encode_tile(x, y)), (x, y));
        }

        #[test]
        fn mirror_is_involution(tile in arb_left_tile()) {
            let mirrored = tile.mirrored();
            prop_assert_ne!(mirrored.side(), tile.side());
            prop_assert_eq!(mirrored.mirrored(), tile);
        }

        #[test]
        fn center_maps_back_to_tile(x in 0..GRID_WIDTH, y in 0..GRID_HEIGHT) {
            let tile = Tile::new(x, y);
            prop_assert_eq!(Tile::from_position(tile.center()), Some(tile));
        }
    }
}

// =============================================================================
// State hashing
// =============================================================================

mod hashing {
    use super::*;

    fn build(entries: &[(Tile, u32)]) -> GameState {
        entries.iter().fold(GameState::new(), |state, &(tile, level)| {
            state.with_tile(tile, TileData::new(BuildingTypeId::new(1), level))
        })
    }

    proptest! {
        #[test]
        fn hash_ignores_insertion_order(
            entries in proptest::collection::btree_map(arb_left_tile(), arb_level(), 1..20)
        ) {
            let forward: Vec<(Tile, u32)> = entries.iter().map(|(t, l)| (*t, *l)).collect();
            let mut backward = forward.clone();
            backward.reverse();
            prop_assert_eq!(build(&forward).state_hash(), build(&backward).state_hash());
        }

        #[test]
        fn hash_sees_level_changes(
            entries in proptest::collection::btree_map(arb_left_tile(), arb_level(), 1..20),
            bump in 1u32..5,
        ) {
            let state = build(&entries.iter().map(|(t, l)| (*t, *l)).collect::<Vec<_>>());
            let mut changed = state.clone();
            if let Some(data) = changed.tiles.values_mut().next() {
                data.level += bump;
            }
            prop_assert_ne!(state.state_hash(), changed.state_hash());
        }

        #[test]
        fn hash_pair_is_symmetric(
            a in proptest::collection::btree_map(arb_left_tile(), arb_level(), 0..10),
            b in proptest::collection::btree_map(arb_left_tile(), arb_level(), 0..10),
        ) {
            let a = build(&a.into_iter().collect::<Vec<_>>());
            let b = build(&b.into_iter().collect::<Vec<_>>());
            prop_assert_eq!(GameState::hash_pair(&a, &b), GameState::hash_pair(&b, &a));
        }
    }
}

// =============================================================================
// Damage model
// =============================================================================

mod damage {
    use super::*;

    #[test]
    fn test_no_stat_means_no_mitigation() {
        assert_eq!(damage_after_armor(0.0), 1.0);
        assert_eq!(damage_after_shield(0.0), 1.0);
        assert_eq!(damage_after_deflection(0.0), 1.0);
    }

    proptest! {
        #[test]
        fn mitigation_is_non_increasing(a in 0.0..1_000.0f64, b in 0.0..1_000.0f64) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            for curve in [damage_after_armor, damage_after_shield, damage_after_deflection] {
                prop_assert!(curve(hi) <= curve(lo) + 1e-12);
                prop_assert!(curve(hi) >= 0.0);
            }
        }

        #[test]
        fn evasion_chance_is_bounded(v in 0.0..1e6f64) {
            let chance = evasion_chance(v);
            prop_assert!(chance >= 0.0);
            prop_assert!(chance < 1.0);
        }

        #[test]
        fn unmitigated_hit_lands_in_full_once(
            amount in arb_damage(),
            damage_type in arb_damage_type(),
        ) {
            let building = BuildingData::new(BuildingTypeId::new(1), "Target", 1e9)
                .with_defense(Defense::default());
            let mut tile = RuntimeTile::new(Tile::new(60, 5), 1, &building);
            let mut rng = ScriptedRandom::constant(0.0);
            let mut events = EventLog::new();

            let actual = tile.take_damage(
                amount,
                damage_type,
                DamageFlags::default(),
                BuildingTypeId::new(2),
                &mut rng,
                &mut events,
            );
            prop_assert_eq!(actual, amount);
            prop_assert_eq!(tile.damage_taken, amount);
            prop_assert_eq!(events.len(), 1);
        }

        #[test]
        fn death_boundary(hp in 1.0..1_000.0f64, fraction in 0.0..2.0f64) {
            let building = BuildingData::new(BuildingTypeId::new(1), "Target", hp);
            let mut tile = RuntimeTile::new(Tile::new(60, 5), 1, &building);
            let mut rng = ScriptedRandom::constant(0.5);
            let mut events = EventLog::new();

            let amount = hp * fraction;
            tile.take_damage(
                amount,
                DamageType::Pure,
                DamageFlags::TRUE_DAMAGE,
                BuildingTypeId::new(2),
                &mut rng,
                &mut events,
            );
            prop_assert_eq!(tile.is_dead(), tile.damage_taken >= hp);

            tile.recover_hp(tile.damage_taken, &mut events);
            prop_assert!(!tile.is_dead());
            prop_assert_eq!(tile.current_hp(), hp);
        }
    }
}
