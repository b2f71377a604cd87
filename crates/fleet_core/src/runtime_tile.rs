//! Live combat and production state of one placed building.
//!
//! A [`RuntimeTile`] is the non-persistent shadow of a `GameState` tile. Its
//! [`TileProps`] are rebuilt from scratch every production tick out of the
//! building definition, the level and the current [`Modifiers`]; nothing is
//! patched incrementally.
//!
//! Tiles live in a [`TileArena`]: a dense vector plus a side table from tile
//! key to slot, owned exclusively by one runtime.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::combat::{
    mitigate, CriticalDamage, DamageFlags, DamageStats, DamageType, Defense, ProjectileFlags,
};
use crate::data::{BuildingData, BuildingTypeId};
use crate::events::{EventLog, SimEvent};
use crate::grid::{Side, Tile};
use crate::math::{evasion_chance, expired, fixed_serde, seconds, Fixed, Seconds};
use crate::rng::RandomSource;
use crate::status_effect::{EffectCommand, Polarity, StatusEffect, StatusEffectKind};
use crate::tracked::{MultiplierSnapshot, TrackedValue};

/// Per-tick contributions to a tile's stats.
///
/// Cleared and rebuilt every production tick (boosters, status effects,
/// techs and elements each add their share).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Modifiers {
    /// Multiplies max HP.
    pub hp_multiplier: TrackedValue,
    /// Multiplies weapon damage.
    pub damage_multiplier: TrackedValue,
    /// Multiplies resource output.
    pub production_multiplier: TrackedValue,
    /// Converts production value into bonus XP above 1.0.
    pub xp_multiplier: TrackedValue,
    /// Added to the building's base defense.
    pub defense: Defense,
    /// Extra critical chances.
    pub criticals: Vec<CriticalDamage>,
    /// Weapon may not fire.
    pub no_fire: bool,
    /// Tile stops lasers.
    pub block_laser: bool,
}

impl Modifiers {
    /// Reset every contribution.
    pub fn clear(&mut self) {
        self.hp_multiplier.clear();
        self.damage_multiplier.clear();
        self.production_multiplier.clear();
        self.xp_multiplier.clear();
        self.defense = Defense::default();
        self.criticals.clear();
        self.no_fire = false;
        self.block_laser = false;
    }

    /// Freeze the combat multipliers.
    #[must_use]
    pub fn snapshot(&self) -> MultiplierSnapshot {
        MultiplierSnapshot {
            hp: self.hp_multiplier.value(),
            damage: self.damage_multiplier.value(),
        }
    }
}

/// Derived stats of a tile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TileProps {
    /// Maximum HP.
    pub hp: f64,
    /// Effective defense.
    pub defense: Defense,
    /// Picks targets and fires.
    pub can_target: bool,
    /// Stops lasers.
    pub block_laser: bool,
    /// Seconds between fire events.
    #[serde(with = "fixed_serde")]
    pub fire_cooldown: Seconds,
    /// Projectiles per fire event.
    pub projectile_count: u32,
    /// Projectile speed in tiles per second.
    pub projectile_speed: f64,
    /// Total damage of one fire event.
    pub damage_per_fire: f64,
    /// Damage of one projectile before criticals.
    pub damage_per_projectile: f64,
    /// Projectile damage type.
    pub damage_type: DamageType,
    /// Projectile flags.
    pub flags: ProjectileFlags,
    /// Drone arc amplitude.
    pub magnitude: f64,
    /// Critical entries, highest multiplier first.
    pub criticals: Vec<CriticalDamage>,
}

/// Live state of one occupied tile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuntimeTile {
    /// Grid position.
    pub tile: Tile,
    /// Building placed here.
    pub building: BuildingTypeId,
    /// Building level.
    pub level: u32,
    /// Derived stats.
    pub props: TileProps,
    /// Cumulative damage taken.
    pub damage_taken: f64,
    /// This tick's stat contributions.
    pub modifiers: Modifiers,
    /// Active effects keyed by the tile that applied them.
    pub status_effects: BTreeMap<Tile, StatusEffect>,
    /// Time accumulated towards the next shot.
    #[serde(with = "fixed_serde")]
    pub cooldown: Seconds,
    /// Sticky target.
    pub target: Option<Tile>,
    /// An input was missing at the last production tick.
    pub insufficient: bool,
    /// Damage received, by type.
    pub damage_stats: DamageStats,
    /// Damage received, by attacking building.
    pub damage_by_source: BTreeMap<BuildingTypeId, f64>,
    buffs: usize,
    debuffs: usize,
}

impl RuntimeTile {
    /// Shadow a placed building, deriving its props with neutral modifiers.
    #[must_use]
    pub fn new(tile: Tile, level: u32, building: &BuildingData) -> Self {
        let mut runtime = Self {
            tile,
            building: building.id,
            level: level.max(1),
            props: TileProps::default(),
            damage_taken: 0.0,
            modifiers: Modifiers::default(),
            status_effects: BTreeMap::new(),
            cooldown: Fixed::ZERO,
            target: None,
            insufficient: false,
            damage_stats: DamageStats::default(),
            damage_by_source: BTreeMap::new(),
            buffs: 0,
            debuffs: 0,
        };
        runtime.recompute_props(building);
        runtime
    }

    /// Fleet this tile belongs to.
    #[must_use]
    pub fn side(&self) -> Side {
        self.tile.side()
    }

    /// Rebuild props from the definition, level and modifiers.
    pub fn recompute_props(&mut self, building: &BuildingData) {
        let level = self.level;
        let hp_multiplier = self.modifiers.hp_multiplier.value().max(0.0);
        let damage_multiplier = self.modifiers.damage_multiplier.value().max(0.0);

        let bonus = self.modifiers.defense;
        let mut props = TileProps {
            hp: building.hp_at(level) * hp_multiplier,
            defense: Defense {
                armor: building.defense.armor + bonus.armor,
                shield: building.defense.shield + bonus.shield,
                deflection: building.defense.deflection + bonus.deflection,
                evasion: building.defense.evasion + bonus.evasion,
            },
            can_target: building.can_target,
            block_laser: building.block_laser || self.modifiers.block_laser,
            ..TileProps::default()
        };

        if let Some(weapon) = &building.weapon {
            let count = weapon.projectile_count.max(1);
            props.fire_cooldown = seconds(weapon.fire_cooldown);
            props.projectile_count = count;
            props.projectile_speed = weapon.projectile_speed;
            props.damage_per_fire = weapon.damage_pct * weapon.damage_at(level) * damage_multiplier;
            props.damage_per_projectile = props.damage_per_fire / f64::from(count);
            props.damage_type = weapon.damage_type;
            props.flags = weapon.flags;
            props.magnitude = weapon.magnitude;
            props.criticals = weapon
                .criticals
                .iter()
                .chain(self.modifiers.criticals.iter())
                .copied()
                .collect();
            props
                .criticals
                .sort_by(|a, b| b.multiplier.total_cmp(&a.multiplier));
        }

        self.props = props;
    }

    /// `props.hp - damage_taken`.
    #[must_use]
    pub fn current_hp(&self) -> f64 {
        self.props.hp - self.damage_taken
    }

    /// Remaining HP as a fraction of max HP.
    #[must_use]
    pub fn hp_fraction(&self) -> f64 {
        if self.props.hp <= 0.0 {
            return 0.0;
        }
        self.current_hp() / self.props.hp
    }

    /// Dead once damage taken reaches max HP.
    #[must_use]
    pub fn is_dead(&self) -> bool {
        self.damage_taken >= self.props.hp
    }

    /// Whether the weapon is allowed to accumulate cooldown and fire.
    #[must_use]
    pub fn can_fire(&self) -> bool {
        self.props.can_target
            && self.props.projectile_count > 0
            && !self.modifiers.no_fire
            && !self.insufficient
    }

    /// Multipliers to capture into projectiles and ability evaluation.
    #[must_use]
    pub fn multiplier_snapshot(&self) -> MultiplierSnapshot {
        self.modifiers.snapshot()
    }

    /// Apply a hit: evasion roll, then mitigation.
    ///
    /// Returns the damage actually applied (zero when evaded).
    pub fn take_damage(
        &mut self,
        amount: f64,
        damage_type: DamageType,
        flags: DamageFlags,
        source_building: BuildingTypeId,
        rng: &mut dyn RandomSource,
        events: &mut EventLog,
    ) -> f64 {
        if amount <= 0.0 {
            return 0.0;
        }

        let defense = self.props.defense;
        if !flags.skips_evasion()
            && defense.evasion > 0.0
            && rng.chance(evasion_chance(defense.evasion))
        {
            events.push(SimEvent::Evaded { tile: self.tile });
            return 0.0;
        }

        let actual = mitigate(amount, damage_type, flags, &defense);
        self.damage_stats.record(damage_type, amount, actual);
        *self.damage_by_source.entry(source_building).or_insert(0.0) += actual;
        self.damage_taken += actual;
        events.push(SimEvent::Damaged {
            tile: self.tile,
            amount: actual,
            damage_type,
        });
        actual
    }

    /// Heal, never below zero damage taken.
    pub fn recover_hp(&mut self, amount: f64, events: &mut EventLog) {
        if amount <= 0.0 {
            return;
        }
        self.damage_taken = (self.damage_taken - amount).max(0.0);
        events.push(SimEvent::Damaged {
            tile: self.tile,
            amount: -amount,
            damage_type: DamageType::Pure,
        });
    }

    /// Damage of one projectile, with the first critical that succeeds.
    pub fn roll_damage(&self, rng: &mut dyn RandomSource) -> (f64, bool) {
        let base = self.props.damage_per_projectile;
        for critical in &self.props.criticals {
            if rng.chance(critical.chance) {
                return (base * critical.multiplier, true);
            }
        }
        (base, false)
    }

    /// Insert or overwrite the effect from `source`, then run `on_added`.
    pub fn add_status_effect(
        &mut self,
        kind: StatusEffectKind,
        source: Tile,
        source_building: BuildingTypeId,
        value: f64,
        duration: Seconds,
        out: &mut Vec<EffectCommand>,
        events: &mut EventLog,
    ) {
        let effect = StatusEffect {
            kind,
            source_building,
            value,
            time_left: duration,
        };
        self.status_effects.insert(source, effect);
        kind.on_added(self.tile, &effect, out);
        self.refresh_counts(events);
    }

    /// Remove effects of `remove` polarity, sparing `except`.
    pub fn dispel(&mut self, remove: Polarity, except: StatusEffectKind, events: &mut EventLog) {
        self.status_effects
            .retain(|_, effect| effect.kind == except || effect.kind.polarity() != remove);
        self.refresh_counts(events);
    }

    /// Let every active effect contribute to this tick's modifiers.
    pub fn apply_effect_modifiers(&mut self) {
        for effect in self.status_effects.values() {
            effect.kind.apply_modifiers(effect, &mut self.modifiers);
        }
    }

    /// Production-tick pass over the tile's effects.
    ///
    /// Props are recomputed first. An effect whose time has run out is
    /// removed without a final `on_tick`; a live one ticks and then loses
    /// `interval`. So a 2s effect ticks at t=1 and t=2 and is gone at t=3.
    pub fn tick_status_effect(
        &mut self,
        building: &BuildingData,
        interval: Seconds,
        out: &mut Vec<EffectCommand>,
        events: &mut EventLog,
    ) {
        self.recompute_props(building);

        let holder = self.tile;
        self.status_effects.retain(|_, effect| {
            if expired(effect.time_left) {
                return false;
            }
            effect.kind.on_tick(holder, effect, out);
            effect.time_left -= interval;
            true
        });
        self.refresh_counts(events);
    }

    /// Run every effect's `on_destroyed` hook.
    pub fn on_destroyed(&self, out: &mut Vec<EffectCommand>) {
        for effect in self.status_effects.values() {
            effect.kind.on_destroyed(self.tile, effect, out);
        }
    }

    /// Hooks for damage this tile took.
    pub fn on_taking_damage(
        &self,
        attacker: Option<Tile>,
        damage: f64,
        out: &mut Vec<EffectCommand>,
    ) {
        for effect in self.status_effects.values() {
            effect
                .kind
                .on_taking_damage(self.tile, effect, attacker, damage, out);
        }
    }

    /// Hooks for damage this tile dealt.
    pub fn on_dealing_damage(&self, target: Tile, damage: f64, out: &mut Vec<EffectCommand>) {
        for effect in self.status_effects.values() {
            effect
                .kind
                .on_dealing_damage(self.tile, effect, target, damage, out);
        }
    }

    /// Active (buff, debuff) counts.
    #[must_use]
    pub fn effect_counts(&self) -> (usize, usize) {
        (self.buffs, self.debuffs)
    }

    fn refresh_counts(&mut self, events: &mut EventLog) {
        let buffs = self
            .status_effects
            .values()
            .filter(|e| e.kind.polarity() == Polarity::Positive)
            .count();
        let debuffs = self.status_effects.len() - buffs;
        if (buffs, debuffs) != (self.buffs, self.debuffs) {
            self.buffs = buffs;
            self.debuffs = debuffs;
            events.push(SimEvent::StatusEffectsChanged {
                tile: self.tile,
                buffs,
                debuffs,
            });
        }
    }
}

/// Dense storage of runtime tiles with a tile-key side table.
#[derive(Debug, Clone, Default)]
pub struct TileArena {
    slots: Vec<RuntimeTile>,
    index: HashMap<Tile, usize>,
}

impl TileArena {
    /// Empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tiles held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the arena is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Whether `tile` has a runtime entry.
    #[must_use]
    pub fn contains(&self, tile: Tile) -> bool {
        self.index.contains_key(&tile)
    }

    /// Insert (or replace) the entry for `runtime.tile`.
    pub fn insert(&mut self, runtime: RuntimeTile) -> &mut RuntimeTile {
        let slot = match self.index.get(&runtime.tile) {
            Some(&slot) => {
                self.slots[slot] = runtime;
                slot
            }
            None => {
                let slot = self.slots.len();
                self.index.insert(runtime.tile, slot);
                self.slots.push(runtime);
                slot
            }
        };
        &mut self.slots[slot]
    }

    /// Look up a tile.
    #[must_use]
    pub fn get(&self, tile: Tile) -> Option<&RuntimeTile> {
        self.index.get(&tile).map(|&slot| &self.slots[slot])
    }

    /// Look up a tile mutably.
    pub fn get_mut(&mut self, tile: Tile) -> Option<&mut RuntimeTile> {
        match self.index.get(&tile) {
            Some(&slot) => Some(&mut self.slots[slot]),
            None => None,
        }
    }

    /// Remove a tile, moving the last slot into its place.
    pub fn remove(&mut self, tile: Tile) -> Option<RuntimeTile> {
        let slot = self.index.remove(&tile)?;
        let removed = self.slots.swap_remove(slot);
        if let Some(moved) = self.slots.get(slot) {
            self.index.insert(moved.tile, slot);
        }
        Some(removed)
    }

    /// Drop every tile on one side.
    pub fn clear_side(&mut self, side: Side) {
        let doomed: Vec<Tile> = self
            .slots
            .iter()
            .filter(|rt| rt.side() == side)
            .map(|rt| rt.tile)
            .collect();
        for tile in doomed {
            self.remove(tile);
        }
    }

    /// Iterate in slot order (not tile order).
    pub fn iter(&self) -> impl Iterator<Item = &RuntimeTile> {
        self.slots.iter()
    }

    /// Iterate mutably in slot order.
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut RuntimeTile> {
        self.slots.iter_mut()
    }
}
