//! The simulation clock.
//!
//! A [`Runtime`] owns deep copies of both fleets' [`GameState`]s, the arena
//! of [`RuntimeTile`]s, every in-flight projectile and the queue of delayed
//! actions. Each call to [`Runtime::tick`] feeds one wall-clock delta into
//! two fixed-rate accumulators and drains them in whole steps:
//!
//! - production steps (default 1s): time-warp charge, multiplier rebuild,
//!   status effects, production for both fleets, sudden death
//! - battle steps (default 50ms): weapons and projectiles of the left fleet,
//!   then of the right fleet, then due scheduled actions, then either a new
//!   peace-mode wave or the bounded battle status
//!
//! # Determinism
//!
//! - Clock accumulators use fixed-point time
//! - Every random draw goes through the injected [`RandomSource`]
//! - Tiles are visited in tile-key order (left fleet before right fleet)
//! - No global state: events go to the runtime's own [`EventLog`]
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use fleet_core::prelude::*;
//!
//! let gun = BuildingData::new(BuildingTypeId::new(1), "Gun", 10.0)
//!     .with_weapon(WeaponData::new(5.0, 0.05, 20.0));
//! let registry = Arc::new(Registry::new().with_building(gun));
//!
//! let fleet = GameState::new().with_tile(
//!     Tile::new(45, 10),
//!     TileData::new(BuildingTypeId::new(1), 1),
//! );
//!
//! let mut runtime = Runtime::new(&fleet, &fleet, registry, SimConfig::default()).unwrap();
//! let status = runtime.run_battle(2_000);
//! assert_ne!(status, BattleStatus::InProgress);
//! ```

use std::collections::VecDeque;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::combat::{DamageFlags, DamageStats, DamageType};
use crate::config::SimConfig;
use crate::data::{BuildingTypeId, Registry};
use crate::economy::{ResourceKind, ResourceStats};
use crate::error::Result;
use crate::events::{EventLog, SimEvent};
use crate::game_state::{GameState, TileData};
use crate::grid::{BoundingBox, Side, Tile};
use crate::math::{expired, fixed_serde, reached, to_f64, Fixed, Seconds};
use crate::projectile::Projectile;
use crate::rng::{RandomSource, SeededRandom};
use crate::runtime_tile::{RuntimeTile, TileArena};
use crate::status_effect::EffectCommand;
use crate::tracked::MultiplierSnapshot;

/// How the enemy fleet is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BattleMode {
    /// Endless: a fresh enemy wave spawns whenever the last one is destroyed.
    Peace,
    /// One battle that ends when a fleet is gone.
    #[default]
    Bounded,
}

/// Outcome of a bounded battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BattleStatus {
    /// Both fleets still have tiles.
    #[default]
    InProgress,
    /// Only the left fleet remains.
    LeftWon,
    /// Only the right fleet remains.
    RightWon,
    /// Both fleets were destroyed.
    Draw,
}

/// Requested simulation speed, owned by the caller.
///
/// The runtime resets `speed` to 1 when the left fleet runs out of Warp, so
/// callers must read it back after every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeedContext {
    /// Speed multiplier (1 = real time).
    pub speed: u32,
}

impl SpeedContext {
    /// Request a speed.
    #[must_use]
    pub const fn new(speed: u32) -> Self {
        Self { speed }
    }
}

impl Default for SpeedContext {
    fn default() -> Self {
        Self::new(1)
    }
}

/// A projectile waiting for its stagger delay.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PendingShot {
    /// Firing tile.
    pub origin: Tile,
    /// Target tile.
    pub destination: Tile,
    /// Firer's multipliers when the weapon fired.
    pub multipliers: MultiplierSnapshot,
}

/// Work that can be deferred with [`Runtime::schedule`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScheduledAction {
    /// Spawn one projectile (damage is rolled at spawn).
    SpawnProjectile(PendingShot),
    /// Apply an effect command.
    Command(EffectCommand),
}

#[derive(Debug, Clone)]
struct Scheduled {
    action: ScheduledAction,
    countdown: Seconds,
}

/// Per-fleet statistics kept by the runtime.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SideStats {
    /// Sum of live tiles' current HP.
    pub current_hp: f64,
    /// Sum of live tiles' max HP plus HP lost to destruction.
    pub max_hp: f64,
    /// `current_hp` at the previous production tick.
    pub previous_hp: Option<f64>,
    /// Max HP of enemy tiles this fleet destroyed.
    pub destroyed_hp: f64,
    /// Max HP of this fleet's own destroyed tiles.
    pub lost_hp: f64,
    /// Time since this fleet last lost HP.
    #[serde(with = "fixed_serde")]
    pub undamaged_seconds: Seconds,
    /// Time this fleet has had no projectile in flight.
    #[serde(with = "fixed_serde")]
    pub zero_projectile_seconds: Seconds,
    /// Damage dealt by this fleet, by type.
    pub damage_dealt: DamageStats,
    /// Resource flow of the last production tick.
    pub resources: ResourceStats,
}

/// One running simulation of two fleets.
pub struct Runtime {
    pub(crate) registry: Arc<Registry>,
    pub(crate) config: SimConfig,
    pub(crate) states: [GameState; 2],
    pub(crate) arena: TileArena,
    pub(crate) projectiles: [Vec<Projectile>; 2],
    pub(crate) stats: [SideStats; 2],
    pub(crate) rng: Box<dyn RandomSource>,
    pub(crate) events: EventLog,
    pub(crate) pending: VecDeque<EffectCommand>,
    pub(crate) passive: [bool; 2],
    scheduled: Vec<Scheduled>,
    mode: BattleMode,
    status: BattleStatus,
    production_timer: Seconds,
    battle_timer: Seconds,
    notify_timer: Seconds,
    elapsed: Seconds,
    sudden_death: Option<Seconds>,
    dirty: bool,
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("mode", &self.mode)
            .field("status", &self.status)
            .field("elapsed", &self.elapsed)
            .field("tiles", &self.arena.len())
            .finish_non_exhaustive()
    }
}

impl Runtime {
    /// Start a simulation with the default seeded random source.
    ///
    /// Both states are copied; the caller's values are never touched.
    pub fn new(
        left: &GameState,
        right: &GameState,
        registry: Arc<Registry>,
        config: SimConfig,
    ) -> Result<Self> {
        let rng = Box::new(SeededRandom::new(config.rng_seed));
        Self::with_rng(left, right, registry, config, rng)
    }

    /// Start a simulation with a caller-supplied random source.
    ///
    /// A right fleet laid out on the left half is mirrored across; tiles
    /// that sit on the wrong half of a mixed layout are dropped.
    pub fn with_rng(
        left: &GameState,
        right: &GameState,
        registry: Arc<Registry>,
        config: SimConfig,
        rng: Box<dyn RandomSource>,
    ) -> Result<Self> {
        config.validate()?;
        let states = [
            place_on_side(left.clone(), Side::Left),
            place_on_side(right.clone(), Side::Right),
        ];
        let mut runtime = Self {
            registry,
            config,
            states,
            arena: TileArena::new(),
            projectiles: [Vec::new(), Vec::new()],
            stats: [SideStats::default(), SideStats::default()],
            rng,
            events: EventLog::new(),
            pending: VecDeque::new(),
            passive: [false, false],
            scheduled: Vec::new(),
            mode: BattleMode::default(),
            status: BattleStatus::InProgress,
            production_timer: Fixed::ZERO,
            battle_timer: Fixed::ZERO,
            notify_timer: Fixed::ZERO,
            elapsed: Fixed::ZERO,
            sudden_death: None,
            dirty: false,
        };
        runtime.sync_tiles();
        Ok(runtime)
    }

    /// Builder: battle mode.
    #[must_use]
    pub fn with_mode(mut self, mode: BattleMode) -> Self {
        self.mode = mode;
        self
    }

    /// Builder: record no events (for throwaway simulations).
    #[must_use]
    pub fn without_events(mut self) -> Self {
        self.events = EventLog::disabled();
        self
    }

    /// Make a fleet passive: it never fires and its tiles never die.
    pub fn set_passive(&mut self, side: Side, passive: bool) {
        self.passive[side.index()] = passive;
    }

    /// Battle mode.
    #[must_use]
    pub fn mode(&self) -> BattleMode {
        self.mode
    }

    /// Current battle status.
    #[must_use]
    pub fn status(&self) -> BattleStatus {
        self.status
    }

    /// A fleet's state.
    #[must_use]
    pub fn state(&self, side: Side) -> &GameState {
        &self.states[side.index()]
    }

    /// A fleet's statistics.
    #[must_use]
    pub fn stats(&self, side: Side) -> &SideStats {
        &self.stats[side.index()]
    }

    /// In-flight projectiles fired by a fleet.
    #[must_use]
    pub fn projectiles(&self, side: Side) -> &[Projectile] {
        &self.projectiles[side.index()]
    }

    /// Number of actions waiting on the schedule.
    #[must_use]
    pub fn scheduled_len(&self) -> usize {
        self.scheduled.len()
    }

    /// Simulated time so far.
    #[must_use]
    pub fn elapsed(&self) -> Seconds {
        self.elapsed
    }

    /// Content registry.
    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Configuration.
    #[must_use]
    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Pending events.
    #[must_use]
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Take every pending event.
    pub fn drain_events(&mut self) -> Vec<SimEvent> {
        self.events.drain()
    }

    /// Seconds of sudden death so far, once it has started.
    #[must_use]
    pub fn sudden_death(&self) -> Option<Seconds> {
        self.sudden_death
    }

    /// Runtime tile at `tile`, created from its fleet's state on first use.
    ///
    /// `None` when neither fleet has a building there.
    pub fn get(&mut self, tile: Tile) -> Option<&mut RuntimeTile> {
        if !self.arena.contains(tile) {
            let data = *self.states[tile.side().index()].get(tile)?;
            let Some(building) = self.registry.building(data.building) else {
                tracing::error!(
                    ?tile,
                    building = ?data.building,
                    "no definition for placed building"
                );
                return None;
            };
            self.arena
                .insert(RuntimeTile::new(tile, data.level, building));
        }
        self.arena.get_mut(tile)
    }

    /// Runtime tile at `tile` if it has already been created.
    #[must_use]
    pub fn tile(&self, tile: Tile) -> Option<&RuntimeTile> {
        self.arena.get(tile)
    }

    /// Place or replace a building during the simulation.
    pub fn place_tile(&mut self, tile: Tile, data: TileData) {
        self.arena.remove(tile);
        self.states[tile.side().index()].place(tile, data);
        self.get(tile);
    }

    /// Advance by `dt` of game time.
    pub fn tick(&mut self, dt: Seconds, speed: &mut SpeedContext) {
        self.notify_timer += dt;
        if self.dirty && reached(self.notify_timer, self.config.notify_interval()) {
            self.events.push(SimEvent::GameStateUpdated);
            self.dirty = false;
            self.notify_timer = Fixed::ZERO;
        }

        let production = self.config.production_interval();
        self.production_timer += dt;
        while reached(self.production_timer, production) {
            self.production_timer -= production;
            self.charge_warp(speed, production);
            self.production_step();
        }

        let battle = self.config.battle_interval();
        self.battle_timer += dt;
        while reached(self.battle_timer, battle) {
            self.battle_timer -= battle;
            self.battle_step();
        }

        self.elapsed += dt;
    }

    /// Tick in battle-interval steps until the battle ends or `max_ticks`
    /// steps have run. Peace mode always runs the full budget.
    pub fn run_battle(&mut self, max_ticks: u32) -> BattleStatus {
        let dt = self.config.battle_interval();
        let mut speed = SpeedContext::default();
        for _ in 0..max_ticks {
            self.tick(dt, &mut speed);
            if self.mode == BattleMode::Bounded && self.status != BattleStatus::InProgress {
                break;
            }
        }
        self.status
    }

    /// One production step (without the time-warp charge).
    pub fn production_step(&mut self) {
        let interval = self.config.production_interval();
        self.sync_tiles();
        self.apply_multipliers();
        self.tick_status_effects(interval);
        for side in Side::ALL {
            self.tick_production(side, interval);
        }
        self.apply_sudden_death(interval);
        #[cfg(feature = "debug-validation")]
        self.check_arena();
        self.dirty = true;
        tracing::trace!(
            left = self.states[0].state_hash(),
            right = self.states[1].state_hash(),
            "production step"
        );
    }

    /// One battle step.
    pub fn battle_step(&mut self) {
        let interval = self.config.battle_interval();
        self.sync_tiles();
        for side in Side::ALL {
            self.tick_tiles(side, interval);
            self.tick_projectiles(side, interval);
        }
        self.tick_scheduled(interval);

        match self.mode {
            BattleMode::Peace => {
                if self.states[Side::Right.index()].tiles.is_empty() {
                    self.spawn_wave();
                }
            }
            BattleMode::Bounded => {
                self.update_battle_status();
            }
        }
    }

    /// Run `action` after `delay`; a zero delay runs it now.
    pub fn schedule(&mut self, action: ScheduledAction, delay: Seconds) {
        if delay <= Fixed::ZERO {
            self.run_action(action);
        } else {
            self.scheduled.push(Scheduled {
                action,
                countdown: delay,
            });
        }
    }

    /// Deal damage to a tile from outside the battle loop.
    ///
    /// Hooks run and the tile is destroyed if it dies, exactly as for a
    /// projectile hit. Returns the damage actually applied.
    pub fn damage_tile(
        &mut self,
        tile: Tile,
        amount: f64,
        damage_type: DamageType,
        flags: DamageFlags,
        source_building: BuildingTypeId,
    ) -> f64 {
        if self.get(tile).is_none() {
            return 0.0;
        }
        let dealt = self.deal_damage(tile, amount, damage_type, flags, source_building, None);
        self.flush_commands();
        dealt
    }

    /// Recompute the bounded-battle status, emitting an event on change.
    pub fn update_battle_status(&mut self) -> BattleStatus {
        let left = !self.states[Side::Left.index()].tiles.is_empty();
        let right = !self.states[Side::Right.index()].tiles.is_empty();
        let status = match (left, right) {
            (true, true) => BattleStatus::InProgress,
            (true, false) => BattleStatus::LeftWon,
            (false, true) => BattleStatus::RightWon,
            (false, false) => BattleStatus::Draw,
        };
        if status == self.status {
            return status;
        }

        tracing::debug!(from = ?self.status, to = ?status, "battle status changed");
        self.events.push(SimEvent::BattleStatusChanged {
            from: self.status,
            to: status,
        });
        if status != BattleStatus::InProgress {
            for state in &mut self.states {
                state.battle_counters.battles += 1;
            }
            let (winner, loser) = match status {
                BattleStatus::LeftWon => (Some(Side::Left), Some(Side::Right)),
                BattleStatus::RightWon => (Some(Side::Right), Some(Side::Left)),
                _ => (None, None),
            };
            if let Some(side) = winner {
                self.states[side.index()].battle_counters.wins += 1;
            }
            if let Some(side) = loser {
                self.states[side.index()].battle_counters.losses += 1;
            }
        }
        self.status = status;
        status
    }

    /// Replace the right fleet with a new peace-mode wave.
    ///
    /// The wave fills the left fleet's bounding box, mirrored, with the
    /// configured basic building at the wave's difficulty level.
    pub fn spawn_wave(&mut self) {
        let left = &self.states[Side::Left.index()];
        let Some(bounds) = BoundingBox::of(left.tiles.keys().copied()) else {
            return;
        };
        let building = self.config.peace_basic_building;
        if self.registry.building(building).is_none() {
            tracing::error!(?building, "peace wave building missing from registry");
            return;
        }
        let wave = left.battle_counters.waves + 1;
        let level = self.wave_level(wave);

        for rt in self.arena.iter_mut() {
            if rt.side() == Side::Left {
                rt.target = None;
            }
        }
        self.arena.clear_side(Side::Right);
        self.projectiles[Side::Right.index()].clear();

        let right = &mut self.states[Side::Right.index()];
        right.tiles.clear();
        for tile in bounds.tiles() {
            right.place(tile.mirrored(), TileData::new(building, level));
        }
        self.states[Side::Left.index()].battle_counters.waves = wave;
        self.sync_tiles();

        tracing::debug!(wave, level, tiles = self.states[1].tiles.len(), "spawned wave");
        self.events.push(SimEvent::WaveSpawned { wave, level });
    }

    /// Difficulty of a wave: the left fleet's average level plus
    /// `peace_level_per_wave` for every wave already beaten.
    fn wave_level(&self, wave: u32) -> u32 {
        let left = &self.states[Side::Left.index()];
        let count = left.tiles.len().max(1) as u64;
        let total: u64 = left.tiles.values().map(|d| u64::from(d.level)).sum();
        let progress = (total / count).max(1) as u32;
        let per_wave = self.config.peace_level_per_wave;
        progress.saturating_add(wave.saturating_sub(1).saturating_mul(per_wave))
    }

    /// Ensure every placed building has a runtime tile.
    pub(crate) fn sync_tiles(&mut self) {
        let missing: Vec<Tile> = self
            .states
            .iter()
            .flat_map(|s| s.tiles.keys().copied())
            .filter(|t| !self.arena.contains(*t))
            .collect();
        for tile in missing {
            self.get(tile);
        }
    }

    #[cfg(feature = "debug-validation")]
    fn check_arena(&self) {
        for rt in self.arena.iter() {
            if !self.states[rt.side().index()].tiles.contains_key(&rt.tile) {
                tracing::error!(tile = ?rt.tile, "runtime tile without a placed building");
            }
        }
    }

    /// All occupied tiles, left fleet first, each in key order.
    pub(crate) fn all_tiles(&self) -> Vec<Tile> {
        self.states
            .iter()
            .flat_map(|s| s.tiles.keys().copied())
            .collect()
    }

    fn charge_warp(&mut self, speed: &mut SpeedContext, interval: Seconds) {
        if speed.speed <= 1 {
            return;
        }
        let factor = f64::from(speed.speed);
        let cost = (factor - 1.0) / factor * to_f64(interval);
        let ledger = &mut self.states[Side::Left.index()].resources;
        if ledger.has(ResourceKind::Warp, cost) {
            ledger.deduct(ResourceKind::Warp, cost);
        } else {
            tracing::warn!(
                speed = speed.speed,
                available = ledger.get(ResourceKind::Warp),
                cost,
                "not enough warp, resetting speed to 1"
            );
            speed.speed = 1;
            self.events.push(SimEvent::SpeedReset { side: Side::Left });
        }
    }

    fn tick_status_effects(&mut self, interval: Seconds) {
        let registry = Arc::clone(&self.registry);
        for tile in self.all_tiles() {
            let Some(rt) = self.arena.get_mut(tile) else {
                continue;
            };
            let Some(building) = registry.building(rt.building) else {
                tracing::error!(?tile, building = ?rt.building, "no definition for live tile");
                continue;
            };
            let mut out = Vec::new();
            rt.tick_status_effect(building, interval, &mut out, &mut self.events);
            self.pending.extend(out);
            self.flush_commands();
            self.destroy_if_dead(tile);
        }
    }

    fn apply_sudden_death(&mut self, interval: Seconds) {
        if self.mode != BattleMode::Bounded || self.status != BattleStatus::InProgress {
            return;
        }
        let elapsed = match self.sudden_death {
            Some(so_far) => so_far + interval,
            None => {
                let after = self.config.sudden_death_after();
                let stalled = self
                    .stats
                    .iter()
                    .all(|s| reached(s.undamaged_seconds, after));
                if !stalled {
                    return;
                }
                tracing::debug!("sudden death started");
                interval
            }
        };
        self.sudden_death = Some(elapsed);

        let pct = self.config.sudden_death_pct * to_f64(elapsed);
        for tile in self.all_tiles() {
            if let Some(rt) = self.arena.get(tile) {
                self.pending.push_back(EffectCommand::Damage {
                    target: tile,
                    amount: rt.props.hp * pct,
                    damage_type: DamageType::Pure,
                    flags: DamageFlags::TRUE_DAMAGE,
                    source_building: rt.building,
                    attacker: None,
                });
            }
        }
        self.flush_commands();
    }

    fn tick_scheduled(&mut self, interval: Seconds) {
        for entry in &mut self.scheduled {
            entry.countdown -= interval;
        }
        let (due, waiting): (Vec<Scheduled>, Vec<Scheduled>) = std::mem::take(&mut self.scheduled)
            .into_iter()
            .partition(|entry| expired(entry.countdown));
        self.scheduled = waiting;
        for entry in due {
            self.run_action(entry.action);
        }
    }

    fn run_action(&mut self, action: ScheduledAction) {
        match action {
            ScheduledAction::SpawnProjectile(shot) => self.spawn_projectile(shot),
            ScheduledAction::Command(command) => {
                self.pending.push_back(command);
                self.flush_commands();
            }
        }
    }

    /// Apply queued effect commands until none are left.
    pub(crate) fn flush_commands(&mut self) {
        while let Some(command) = self.pending.pop_front() {
            match command {
                EffectCommand::Damage {
                    target,
                    amount,
                    damage_type,
                    flags,
                    source_building,
                    attacker,
                } => {
                    self.deal_damage(target, amount, damage_type, flags, source_building, attacker);
                }
                EffectCommand::Heal { target, amount } => {
                    if let Some(rt) = self.arena.get_mut(target) {
                        rt.recover_hp(amount, &mut self.events);
                    }
                }
                EffectCommand::Dispel {
                    target,
                    remove,
                    except,
                } => {
                    if let Some(rt) = self.arena.get_mut(target) {
                        rt.dispel(remove, except, &mut self.events);
                    }
                }
            }
        }
    }

    /// Damage pipeline: mitigation, damage hooks, destruction.
    ///
    /// Follow-up commands from hooks are queued, not applied.
    pub(crate) fn deal_damage(
        &mut self,
        target: Tile,
        amount: f64,
        damage_type: DamageType,
        flags: DamageFlags,
        source_building: BuildingTypeId,
        attacker: Option<Tile>,
    ) -> f64 {
        let Some(rt) = self.arena.get_mut(target) else {
            return 0.0;
        };
        let actual = rt.take_damage(
            amount,
            damage_type,
            flags,
            source_building,
            self.rng.as_mut(),
            &mut self.events,
        );
        self.stats[target.side().opponent().index()]
            .damage_dealt
            .record(damage_type, amount, actual);

        if actual > 0.0 {
            let mut out = Vec::new();
            rt.on_taking_damage(attacker, actual, &mut out);
            if let Some(firer) = attacker.and_then(|a| self.arena.get(a)) {
                if !firer.is_dead() {
                    firer.on_dealing_damage(target, actual, &mut out);
                }
            }
            self.pending.extend(out);
        }

        self.destroy_if_dead(target);
        actual
    }

    fn destroy_if_dead(&mut self, tile: Tile) {
        let dead = self.arena.get(tile).is_some_and(RuntimeTile::is_dead);
        if dead && !self.passive[tile.side().index()] {
            self.destroy_tile(tile);
        }
    }

    /// Remove a tile: `on_destroyed` hooks, then removal and HP attribution.
    pub(crate) fn destroy_tile(&mut self, tile: Tile) {
        let mut out = Vec::new();
        if let Some(rt) = self.arena.get(tile) {
            rt.on_destroyed(&mut out);
        }
        let Some(rt) = self.arena.remove(tile) else {
            return;
        };
        let side = tile.side();
        self.states[side.index()].remove(tile);

        let max_hp = rt.props.hp;
        self.stats[side.opponent().index()].destroyed_hp += max_hp;
        self.stats[side.index()].lost_hp += max_hp;

        tracing::debug!(?tile, ?side, max_hp, "tile destroyed");
        self.events.push(SimEvent::TileDestroyed { tile, max_hp });
        self.pending.extend(out);
    }
}

/// Put a fleet on its half of the shared grid.
fn place_on_side(mut state: GameState, side: Side) -> GameState {
    if state.tiles.keys().all(|t| t.side() == side) {
        return state;
    }
    if state.tiles.keys().all(|t| t.side() != side) {
        return state.mirrored();
    }
    let before = state.tiles.len();
    state.tiles.retain(|t, _| t.side() == side);
    tracing::warn!(
        ?side,
        dropped = before - state.tiles.len(),
        "fleet straddles both halves, dropping tiles on the wrong side"
    );
    state
}
