//! Battle resolution: weapon fire, targeting and projectile impact.
//!
//! Runs once per side per battle tick, left fleet first. Each weapon tile
//! cycles `cooldown -> ready -> fired`; a fired weapon spawns its
//! projectiles through the runtime's schedule, staggered so a volley fans
//! out, with damage and criticals rolled when each projectile spawns.

use std::sync::Arc;

use crate::combat::DamageFlags;
use crate::data::{AbilityData, AbilityEffect, AbilityTiming, BuildingData, Registry};
use crate::economy::ResourceKind;
use crate::events::SimEvent;
use crate::grid::{neighbors, BoundingBox, Side, Tile};
use crate::math::{reached, seconds, Fixed, Seconds};
use crate::projectile::Projectile;
use crate::runtime::{PendingShot, Runtime, ScheduledAction};
use crate::status_effect::EffectCommand;
use crate::tracked::MultiplierSnapshot;

impl Runtime {
    /// Fire every ready weapon of `side`.
    pub(crate) fn tick_tiles(&mut self, side: Side, interval: Seconds) {
        let registry = Arc::clone(&self.registry);

        if !self.passive[side.index()] {
            let tiles: Vec<Tile> = self.states[side.index()].tiles.keys().copied().collect();
            for tile in tiles {
                let Some(rt) = self.arena.get_mut(tile) else {
                    continue;
                };
                if !rt.can_fire() {
                    continue;
                }
                rt.cooldown += interval;
                if !reached(rt.cooldown, rt.props.fire_cooldown) {
                    continue;
                }
                let drone = rt.props.flags.drone;
                let sticky = rt.target;
                if let Some(target) = self.select_target(side, sticky, tile, drone) {
                    self.fire(tile, target, &registry);
                }
            }
        }

        let stats = &mut self.stats[side.index()];
        if self.projectiles[side.index()].is_empty() {
            stats.zero_projectile_seconds += interval;
        } else {
            stats.zero_projectile_seconds = Fixed::ZERO;
        }
    }

    /// Pick a target on the enemy fleet.
    ///
    /// Drones always chase the lowest HP fraction. Other weapons keep their
    /// target while it exists, else take the nearest enemy by squared tile
    /// distance; ties go to the lowest tile key.
    pub(crate) fn select_target(
        &self,
        side: Side,
        sticky: Option<Tile>,
        origin: Tile,
        drone: bool,
    ) -> Option<Tile> {
        let enemy = &self.states[side.opponent().index()];

        if drone {
            let mut best: Option<(f64, Tile)> = None;
            for &tile in enemy.tiles.keys() {
                let fraction = self.arena.get(tile).map_or(1.0, |rt| rt.hp_fraction());
                if best.map_or(true, |(lowest, _)| fraction < lowest) {
                    best = Some((fraction, tile));
                }
            }
            return best.map(|(_, tile)| tile);
        }

        if let Some(tile) = sticky {
            if enemy.tiles.contains_key(&tile) {
                return Some(tile);
            }
        }

        let mut best: Option<(u32, Tile)> = None;
        for &tile in enemy.tiles.keys() {
            let distance = origin.distance_squared(tile);
            if best.map_or(true, |(nearest, _)| distance < nearest) {
                best = Some((distance, tile));
            }
        }
        best.map(|(_, tile)| tile)
    }

    fn fire(&mut self, tile: Tile, target: Tile, registry: &Registry) {
        let Some(rt) = self.arena.get_mut(tile) else {
            return;
        };
        rt.cooldown = Fixed::ZERO;
        rt.target = Some(target);
        let damage_per_fire = rt.props.damage_per_fire;
        let count = rt.props.projectile_count;
        let building = rt.building;
        let level = rt.level;
        let multipliers = rt.multiplier_snapshot();

        let side = tile.side();
        self.states[side.index()]
            .resources
            .add(ResourceKind::XP, damage_per_fire);
        self.stats[side.index()]
            .resources
            .add_produced(ResourceKind::XP, damage_per_fire);
        self.events.push(SimEvent::WeaponFired {
            from: tile,
            to: target,
        });

        if let Some(def) = registry.building(building) {
            if let Some(weapon) = &def.weapon {
                for ability in weapon.abilities_at(AbilityTiming::OnFire) {
                    self.apply_ability(tile, tile, def, level, multipliers, ability);
                }
            }
        }

        let stagger = self.config.projectile_stagger();
        for index in 0..count {
            let shot = PendingShot {
                origin: tile,
                destination: target,
                multipliers,
            };
            self.schedule(
                ScheduledAction::SpawnProjectile(shot),
                stagger * Fixed::from_num(index),
            );
        }
    }

    /// Spawn one projectile of a volley; skipped if the firer is gone.
    pub(crate) fn spawn_projectile(&mut self, shot: PendingShot) {
        let Some(rt) = self.arena.get(shot.origin) else {
            return;
        };
        if rt.is_dead() {
            return;
        }
        let (damage, critical) = rt.roll_damage(self.rng.as_mut());
        let mut projectile = Projectile::new(shot.origin, shot.destination, damage, rt.building);
        projectile.source_level = rt.level;
        projectile.damage_type = rt.props.damage_type;
        projectile.speed = rt.props.projectile_speed;
        projectile.flags = rt.props.flags;
        projectile.critical = critical;
        projectile.multipliers = shot.multipliers;
        projectile.magnitude = rt.props.magnitude;
        self.projectiles[shot.origin.side().index()].push(projectile);
    }

    /// Move `side`'s projectiles and resolve their hits.
    pub(crate) fn tick_projectiles(&mut self, side: Side, interval: Seconds) {
        let registry = Arc::clone(&self.registry);
        let enemy = side.opponent();
        let forward = side.forward();

        let in_flight = std::mem::take(&mut self.projectiles[side.index()]);
        let mut survivors = Vec::with_capacity(in_flight.len());
        let mut bounds = self.enemy_bounds(enemy);

        for mut projectile in in_flight {
            let path = projectile.advance_path(interval);
            if bounds.is_none() {
                continue;
            }

            let mut spent = false;
            for tile in path {
                if projectile.flags.drone && tile != projectile.destination {
                    continue;
                }
                let live = tile.side() == enemy
                    && !projectile.has_hit(tile)
                    && self.states[enemy.index()].tiles.contains_key(&tile);
                let Some(target) = self.arena.get(tile).filter(|_| live) else {
                    continue;
                };

                let blocks = target.props.block_laser;
                let hits = projectile.record_hit(tile);
                let damage = projectile.damage / hits.max(1) as f64;
                self.events.push(SimEvent::ProjectileHit {
                    from: projectile.origin,
                    to: tile,
                    damage,
                    critical: projectile.critical,
                });

                if let Some(def) = registry.building(projectile.source_building) {
                    if let Some(weapon) = &def.weapon {
                        for ability in weapon.abilities_at(AbilityTiming::OnHit) {
                            self.apply_ability(
                                tile,
                                projectile.origin,
                                def,
                                projectile.source_level,
                                projectile.multipliers,
                                ability,
                            );
                        }
                    }
                }

                self.deal_damage(
                    tile,
                    damage,
                    projectile.damage_type,
                    projectile.flags.damage_flags(),
                    projectile.source_building,
                    Some(projectile.origin),
                );
                self.flush_commands();
                bounds = self.enemy_bounds(enemy);

                if !projectile.flags.laser || blocks {
                    spent = true;
                    break;
                }
            }
            if spent {
                continue;
            }

            let Some(area) = bounds else {
                continue;
            };
            // drones arc outside the box on their way in
            let arcing = projectile.flags.drone && projectile.progress() < 1.0;
            if !arcing && area.is_passed(projectile.position(), forward) {
                continue;
            }
            survivors.push(projectile);
        }

        // projectiles spawned while resolving (zero-delay volleys from hooks)
        survivors.append(&mut self.projectiles[side.index()]);
        self.projectiles[side.index()] = survivors;
    }

    fn enemy_bounds(&self, enemy: Side) -> Option<BoundingBox> {
        BoundingBox::of(self.states[enemy.index()].tiles.keys().copied())
    }

    /// Apply one ability to every occupied tile in its area around `anchor`.
    pub(crate) fn apply_ability(
        &mut self,
        anchor: Tile,
        firer: Tile,
        def: &BuildingData,
        level: u32,
        multipliers: MultiplierSnapshot,
        ability: &AbilityData,
    ) {
        let mut area = Vec::new();
        neighbors(anchor, ability.range, |tile| area.push(tile));

        let mut out = Vec::new();
        for tile in area {
            if !self.states[tile.side().index()].tiles.contains_key(&tile) {
                continue;
            }
            match ability.effect {
                AbilityEffect::ApplyStatus {
                    kind,
                    value,
                    duration,
                } => {
                    let value = value.evaluate(def, level, &multipliers);
                    if let Some(rt) = self.arena.get_mut(tile) {
                        rt.add_status_effect(
                            kind,
                            firer,
                            def.id,
                            value,
                            seconds(duration),
                            &mut out,
                            &mut self.events,
                        );
                    }
                }
                AbilityEffect::Damage { value, damage_type } => out.push(EffectCommand::Damage {
                    target: tile,
                    amount: value.evaluate(def, level, &multipliers),
                    damage_type,
                    flags: DamageFlags::default(),
                    source_building: def.id,
                    attacker: Some(firer),
                }),
                AbilityEffect::Heal { value } => out.push(EffectCommand::Heal {
                    target: tile,
                    amount: value.evaluate(def, level, &multipliers),
                }),
            }
        }
        self.pending.extend(out);
        self.flush_commands();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{CriticalDamage, Defense, ProjectileFlags};
    use crate::config::SimConfig;
    use crate::data::{AbilityValue, BuildingTypeId, WeaponData};
    use crate::game_state::{GameState, TileData};
    use crate::grid::TileRange;
    use crate::math::millis;
    use crate::rng::ScriptedRandom;
    use crate::runtime::BattleStatus;
    use crate::status_effect::StatusEffectKind;

    const PLATE: BuildingTypeId = BuildingTypeId::new(1);
    const GUN: BuildingTypeId = BuildingTypeId::new(2);
    const LASER: BuildingTypeId = BuildingTypeId::new(3);
    const VOLLEY: BuildingTypeId = BuildingTypeId::new(4);
    const BURNER: BuildingTypeId = BuildingTypeId::new(5);
    const DRONE: BuildingTypeId = BuildingTypeId::new(6);
    const WALL: BuildingTypeId = BuildingTypeId::new(7);
    const FAST_GUN: BuildingTypeId = BuildingTypeId::new(8);
    const FAST_LASER: BuildingTypeId = BuildingTypeId::new(9);

    fn laser_flags() -> ProjectileFlags {
        ProjectileFlags {
            laser: true,
            ..ProjectileFlags::default()
        }
    }

    fn registry() -> Arc<Registry> {
        Arc::new(
            Registry::new()
                .with_building(BuildingData::new(PLATE, "Plate", 100.0))
                .with_building(
                    BuildingData::new(GUN, "Gun", 20.0)
                        .with_weapon(WeaponData::new(10.0, 0.05, 20.0)),
                )
                .with_building(
                    BuildingData::new(LASER, "Laser", 20.0)
                        .with_weapon(WeaponData::new(12.0, 10.0, 20.0).with_flags(laser_flags())),
                )
                .with_building(
                    BuildingData::new(VOLLEY, "Volley", 20.0)
                        .with_weapon(WeaponData::new(9.0, 10.0, 20.0).with_projectiles(3)),
                )
                .with_building(
                    BuildingData::new(BURNER, "Burner", 20.0).with_weapon(
                        WeaponData::new(1.0, 10.0, 20.0).with_ability(AbilityData::new(
                            AbilityTiming::OnHit,
                            TileRange::Adjacent,
                            AbilityEffect::ApplyStatus {
                                kind: StatusEffectKind::Burn,
                                value: AbilityValue::Constant(2.0),
                                duration: 3.0,
                            },
                        )),
                    ),
                )
                .with_building(
                    BuildingData::new(DRONE, "Drone bay", 20.0).with_weapon(
                        WeaponData::new(1.0, 10.0, 20.0)
                            .with_flags(ProjectileFlags {
                                drone: true,
                                ..ProjectileFlags::default()
                            })
                            .with_magnitude(2.0),
                    ),
                )
                .with_building(BuildingData::new(WALL, "Wall", 500.0).blocking_lasers())
                .with_building(
                    BuildingData::new(FAST_GUN, "Railgun", 20.0)
                        .with_weapon(WeaponData::new(10.0, 0.05, 50.0)),
                )
                .with_building(
                    BuildingData::new(FAST_LASER, "Lance", 20.0)
                        .with_weapon(WeaponData::new(12.0, 10.0, 40.0).with_flags(laser_flags())),
                ),
        )
    }

    fn runtime(left: GameState, right: GameState) -> Runtime {
        Runtime::with_rng(
            &left,
            &right,
            registry(),
            SimConfig::default(),
            Box::new(ScriptedRandom::constant(0.5)),
        )
        .unwrap()
    }

    fn at(tiles: &[(u16, u16, BuildingTypeId)]) -> GameState {
        tiles.iter().fold(GameState::new(), |state, &(x, y, b)| {
            state.with_tile(Tile::new(x, y), TileData::new(b, 1))
        })
    }

    fn ready(rt: &mut Runtime, tile: Tile) {
        let weapon = rt.get(tile).unwrap();
        weapon.cooldown = weapon.props.fire_cooldown;
    }

    #[test]
    fn test_nearest_target_ties_go_to_lowest_key() {
        let rt = runtime(
            at(&[(49, 10, GUN)]),
            at(&[(50, 9, PLATE), (50, 11, PLATE), (52, 10, PLATE)]),
        );
        let target = rt.select_target(Side::Left, None, Tile::new(49, 10), false);
        assert_eq!(target, Some(Tile::new(50, 9)));
    }

    #[test]
    fn test_sticky_target_kept_while_alive() {
        let rt = runtime(at(&[(49, 10, GUN)]), at(&[(50, 10, PLATE), (70, 10, PLATE)]));
        let sticky = Some(Tile::new(70, 10));
        assert_eq!(
            rt.select_target(Side::Left, sticky, Tile::new(49, 10), false),
            sticky
        );
        let gone = Some(Tile::new(80, 10));
        assert_eq!(
            rt.select_target(Side::Left, gone, Tile::new(49, 10), false),
            Some(Tile::new(50, 10))
        );
    }

    #[test]
    fn test_drone_targets_lowest_hp_fraction() {
        let mut rt = runtime(at(&[(49, 10, DRONE)]), at(&[(50, 10, PLATE), (70, 10, PLATE)]));
        rt.get(Tile::new(70, 10)).unwrap().damage_taken = 50.0;
        let target = rt.select_target(Side::Left, Some(Tile::new(50, 10)), Tile::new(49, 10), true);
        assert_eq!(target, Some(Tile::new(70, 10)));
    }

    #[test]
    fn test_basic_combat_deals_exact_damage() {
        let gun = Tile::new(40, 10);
        let plate = Tile::new(60, 10);
        let mut rt = runtime(at(&[(40, 10, GUN)]), at(&[(60, 10, PLATE)]));

        rt.battle_step();
        assert_eq!(rt.projectiles(Side::Left).len(), 1);
        rt.get(gun).unwrap().insufficient = true;

        // 20 tiles at 20 tiles/s
        for _ in 0..20 {
            rt.battle_step();
        }
        assert!(rt.projectiles(Side::Left).is_empty());
        let expected = rt.tile(gun).unwrap().props.damage_per_projectile;
        assert_eq!(rt.tile(plate).unwrap().damage_taken, expected);
        assert_eq!(rt.stats(Side::Left).damage_dealt.total_actual(), expected);
    }

    #[test]
    fn test_firing_grants_xp() {
        let mut rt = runtime(at(&[(40, 10, GUN)]), at(&[(60, 10, PLATE)]));
        rt.battle_step();
        assert_eq!(rt.state(Side::Left).resources.get(ResourceKind::XP), 10.0);
        assert!(rt
            .drain_events()
            .contains(&SimEvent::WeaponFired { from: Tile::new(40, 10), to: Tile::new(60, 10) }));
    }

    #[test]
    fn test_normal_projectile_removed_after_one_hit() {
        let mut rt = runtime(
            at(&[(48, 10, GUN)]),
            at(&[(50, 10, PLATE), (51, 10, PLATE), (52, 10, PLATE)]),
        );
        rt.battle_step();
        rt.get(Tile::new(48, 10)).unwrap().insufficient = true;
        for _ in 0..10 {
            rt.battle_step();
        }
        let hit: Vec<_> = [50, 51, 52]
            .iter()
            .map(|&x| rt.tile(Tile::new(x, 10)).unwrap().damage_taken)
            .collect();
        assert_eq!(hit, vec![10.0, 0.0, 0.0]);
        assert!(rt.projectiles(Side::Left).is_empty());
    }

    #[test]
    fn test_laser_hits_every_tile_in_line_and_splits_damage() {
        let laser = Tile::new(48, 10);
        let mut rt = runtime(
            at(&[(48, 10, LASER)]),
            at(&[(50, 10, PLATE), (51, 10, PLATE), (52, 10, PLATE)]),
        );
        ready(&mut rt, laser);
        rt.battle_step();
        for _ in 0..3 {
            rt.battle_step();
            assert_eq!(rt.projectiles(Side::Left).len(), 1);
        }
        let taken: Vec<_> = [50, 51, 52]
            .iter()
            .map(|&x| rt.tile(Tile::new(x, 10)).unwrap().damage_taken)
            .collect();
        assert_eq!(taken, vec![12.0, 6.0, 4.0]);

        // one more step leaves the box
        rt.battle_step();
        assert!(rt.projectiles(Side::Left).is_empty());
    }

    #[test]
    fn test_fast_laser_hits_every_tile_it_crosses() {
        let laser = Tile::new(48, 10);
        let mut rt = runtime(
            at(&[(48, 10, FAST_LASER)]),
            at(&[(50, 10, PLATE), (51, 10, PLATE), (52, 10, PLATE)]),
        );
        ready(&mut rt, laser);

        // two tiles per step: 48 -> 50 -> 52 -> 54
        rt.battle_step();
        assert_eq!(rt.tile(Tile::new(50, 10)).unwrap().damage_taken, 12.0);
        rt.battle_step();
        let taken: Vec<_> = [50, 51, 52]
            .iter()
            .map(|&x| rt.tile(Tile::new(x, 10)).unwrap().damage_taken)
            .collect();
        assert_eq!(taken, vec![12.0, 6.0, 4.0]);
        assert_eq!(rt.projectiles(Side::Left).len(), 1);

        rt.battle_step();
        assert!(rt.projectiles(Side::Left).is_empty());
    }

    #[test]
    fn test_fast_projectile_does_not_skip_target() {
        let gun = Tile::new(41, 10);
        let plate = Tile::new(60, 10);
        let mut rt = runtime(at(&[(41, 10, FAST_GUN)]), at(&[(60, 10, PLATE)]));

        rt.battle_step();
        rt.get(gun).unwrap().insufficient = true;
        // 2.5 tiles per step never lands on x = 60 exactly
        for _ in 0..30 {
            rt.battle_step();
        }
        assert!(rt.projectiles(Side::Left).is_empty());
        let expected = rt.tile(gun).unwrap().props.damage_per_projectile;
        assert_eq!(rt.tile(plate).unwrap().damage_taken, expected);
    }

    #[test]
    fn test_diagonal_shot_reaches_target_outside_box_rows() {
        let gun = Tile::new(45, 0);
        let target = Tile::new(52, 10);
        let mut rt = runtime(at(&[(45, 0, GUN)]), at(&[(52, 10, PLATE), (50, 40, PLATE)]));

        rt.battle_step();
        assert_eq!(rt.projectiles(Side::Left).len(), 1);
        rt.get(gun).unwrap().insufficient = true;
        for _ in 0..30 {
            rt.battle_step();
        }
        assert!(rt.projectiles(Side::Left).is_empty());
        let expected = rt.tile(gun).unwrap().props.damage_per_projectile;
        assert_eq!(rt.tile(target).unwrap().damage_taken, expected);
        assert_eq!(rt.tile(Tile::new(50, 40)).unwrap().damage_taken, 0.0);
    }

    #[test]
    fn test_laser_blocked() {
        let laser = Tile::new(48, 10);
        let mut rt = runtime(at(&[(48, 10, LASER)]), at(&[(50, 10, WALL), (51, 10, PLATE)]));
        ready(&mut rt, laser);
        rt.battle_step();
        rt.battle_step();
        rt.battle_step();
        assert!(rt.projectiles(Side::Left).is_empty());
        assert_eq!(rt.tile(Tile::new(51, 10)).unwrap().damage_taken, 0.0);
    }

    #[test]
    fn test_volley_is_staggered() {
        let volley = Tile::new(10, 10);
        let mut rt = runtime(at(&[(10, 10, VOLLEY)]), at(&[(90, 10, PLATE)]));
        ready(&mut rt, volley);
        rt.battle_step();
        assert_eq!(rt.projectiles(Side::Left).len(), 1);
        assert_eq!(rt.scheduled_len(), 2);
        rt.battle_step();
        assert_eq!(rt.projectiles(Side::Left).len(), 2);
        assert_eq!(rt.scheduled_len(), 1);
        rt.battle_step();
        assert_eq!(rt.projectiles(Side::Left).len(), 2);
        rt.battle_step();
        assert_eq!(rt.projectiles(Side::Left).len(), 3);
        assert!(rt.projectiles(Side::Left).iter().all(|p| p.damage == 3.0));
        assert_eq!(rt.scheduled_len(), 0);
    }

    #[test]
    fn test_volley_skipped_when_firer_destroyed() {
        let volley = Tile::new(10, 10);
        let mut rt = runtime(at(&[(10, 10, VOLLEY)]), at(&[(90, 10, PLATE)]));
        ready(&mut rt, volley);
        rt.battle_step();
        rt.damage_tile(
            volley,
            1e6,
            crate::combat::DamageType::Pure,
            DamageFlags::TRUE_DAMAGE,
            PLATE,
        );
        for _ in 0..4 {
            rt.battle_step();
        }
        assert_eq!(rt.projectiles(Side::Left).len(), 1);
    }

    #[test]
    fn test_on_hit_ability_applies_status_around_target() {
        let burner = Tile::new(48, 10);
        let mut rt = runtime(
            at(&[(48, 10, BURNER)]),
            at(&[(50, 10, PLATE), (50, 11, PLATE), (60, 10, PLATE)]),
        );
        ready(&mut rt, burner);
        rt.battle_step();
        rt.battle_step();
        rt.battle_step();
        let burning = |rt: &Runtime, x, y| {
            rt.tile(Tile::new(x, y))
                .is_some_and(|t| t.status_effects.contains_key(&burner))
        };
        // Adjacent excludes the centre
        assert!(!burning(&rt, 50, 10));
        assert!(burning(&rt, 50, 11));
        assert!(!burning(&rt, 60, 10));
    }

    #[test]
    fn test_criticals_rolled_at_spawn() {
        let reg = Arc::new(
            Registry::new()
                .with_building(BuildingData::new(PLATE, "Plate", 100.0))
                .with_building(BuildingData::new(GUN, "Gun", 20.0).with_weapon(
                    WeaponData::new(10.0, 0.05, 20.0).with_critical(CriticalDamage::new(0.5, 3.0)),
                )),
        );
        let left = at(&[(40, 10, GUN)]);
        let right = at(&[(60, 10, PLATE)]);
        let mut rt = Runtime::with_rng(
            &left,
            &right,
            reg,
            SimConfig::default(),
            Box::new(ScriptedRandom::constant(0.1)),
        )
        .unwrap();
        rt.battle_step();
        let p = &rt.projectiles(Side::Left)[0];
        assert!(p.critical);
        assert_eq!(p.damage, 30.0);
    }

    #[test]
    fn test_evaded_hit_deals_nothing() {
        let reg = Arc::new(
            Registry::new()
                .with_building(BuildingData::new(PLATE, "Plate", 100.0).with_defense(Defense {
                    evasion: 1e9,
                    ..Defense::default()
                }))
                .with_building(
                    BuildingData::new(GUN, "Gun", 20.0)
                        .with_weapon(WeaponData::new(10.0, 0.05, 20.0)),
                ),
        );
        let left = at(&[(48, 10, GUN)]);
        let right = at(&[(50, 10, PLATE)]);
        let mut rt = Runtime::with_rng(
            &left,
            &right,
            reg,
            SimConfig::default(),
            Box::new(ScriptedRandom::constant(0.5)),
        )
        .unwrap();
        for _ in 0..4 {
            rt.battle_step();
        }
        assert_eq!(rt.tile(Tile::new(50, 10)).unwrap().damage_taken, 0.0);
        assert!(rt
            .drain_events()
            .contains(&SimEvent::Evaded { tile: Tile::new(50, 10) }));
    }

    #[test]
    fn test_drone_only_hits_destination() {
        let drone = Tile::new(48, 10);
        let mut rt = runtime(at(&[(48, 10, DRONE)]), at(&[(50, 10, PLATE), (52, 10, PLATE)]));
        rt.get(Tile::new(52, 10)).unwrap().damage_taken = 10.0;
        ready(&mut rt, drone);
        for _ in 0..6 {
            rt.battle_step();
        }
        assert_eq!(rt.tile(Tile::new(50, 10)).unwrap().damage_taken, 0.0);
        assert_eq!(rt.tile(Tile::new(52, 10)).unwrap().damage_taken, 11.0);
    }

    #[test]
    fn test_stall_counter() {
        let mut rt = runtime(at(&[(10, 10, PLATE)]), at(&[(90, 10, PLATE)]));
        rt.battle_step();
        rt.battle_step();
        assert_eq!(rt.stats(Side::Left).zero_projectile_seconds, millis(50) * Fixed::from_num(2));
        assert_eq!(rt.status(), BattleStatus::InProgress);
    }
}
