//! Timed, stacking buffs and debuffs on runtime tiles.
//!
//! Effect kinds are a closed enum. Each kind has a polarity and may
//! implement any of the hooks below. Hooks never mutate the runtime directly:
//! they push [`EffectCommand`]s which the runtime applies afterwards, so a
//! hook can affect other tiles without aliasing the tile it lives on.
//!
//! | hook | called |
//! |---|---|
//! | `on_added` | right after the effect is (re)applied |
//! | `on_tick` | every production tick while `time_left > 0` |
//! | `on_destroyed` | when the holder is destroyed |
//! | `on_dealing_damage` | holder dealt actual damage > 0 |
//! | `on_taking_damage` | holder took actual damage > 0 |
//!
//! Stat-changing kinds contribute through [`StatusEffectKind::apply_modifiers`]
//! during the multiplier phase instead of a hook, because multipliers are
//! rebuilt from scratch every production tick.

use serde::{Deserialize, Serialize};

use crate::combat::{CriticalDamage, DamageFlags, DamageType};
use crate::data::BuildingTypeId;
use crate::grid::{neighbors, Tile, TileRange};
use crate::math::{fixed_serde, Seconds};
use crate::runtime_tile::Modifiers;

/// Whether an effect helps or hurts its holder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    /// Buff.
    Positive,
    /// Debuff.
    Negative,
}

impl Polarity {
    /// The other polarity.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Polarity::Positive => Polarity::Negative,
            Polarity::Negative => Polarity::Positive,
        }
    }
}

/// Every status effect kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StatusEffectKind {
    /// Takes `value` pure damage per tick.
    Burn,
    /// Heals `value` per tick.
    Regen,
    /// Damage multiplier +`value`.
    DamageBoost,
    /// Damage multiplier −`value`.
    Weaken,
    /// HP multiplier +`value`.
    Fortify,
    /// Armor −`value`.
    ArmorBreak,
    /// Shield +`value`.
    ShieldBoost,
    /// Cannot fire.
    Disable,
    /// Stops lasers.
    Barrier,
    /// Heals `value` × damage dealt.
    LifeSteal,
    /// Returns `value` × damage taken to the attacker.
    Reflect,
    /// Heals `value` whenever hit.
    RegenOnHit,
    /// Removes negative effects on application.
    Cleanse,
    /// Removes positive effects on application.
    Purge,
    /// Deals `value` explosive damage to adjacent tiles when destroyed.
    Volatile,
    /// Adds a `value` chance of double damage.
    Focus,
}

/// Side effects requested by hooks, applied by the runtime in order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectCommand {
    /// Damage a tile.
    Damage {
        /// Tile hit.
        target: Tile,
        /// Amount before mitigation.
        amount: f64,
        /// Damage type.
        damage_type: DamageType,
        /// Hit flags.
        flags: DamageFlags,
        /// Building credited with the damage.
        source_building: BuildingTypeId,
        /// Tile credited as the attacker, for dealing-damage hooks.
        attacker: Option<Tile>,
    },
    /// Heal a tile.
    Heal {
        /// Tile healed.
        target: Tile,
        /// HP restored.
        amount: f64,
    },
    /// Remove effects of one polarity from a tile.
    Dispel {
        /// Tile cleansed.
        target: Tile,
        /// Polarity removed.
        remove: Polarity,
        /// Kind spared (the dispeller itself).
        except: StatusEffectKind,
    },
}

/// One live effect on one tile, keyed by its source tile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatusEffect {
    /// Kind.
    pub kind: StatusEffectKind,
    /// Building that applied it.
    pub source_building: BuildingTypeId,
    /// Strength.
    pub value: f64,
    /// Remaining duration.
    #[serde(with = "fixed_serde")]
    pub time_left: Seconds,
}

impl StatusEffectKind {
    /// Whether the effect is a buff or a debuff.
    #[must_use]
    pub const fn polarity(self) -> Polarity {
        match self {
            StatusEffectKind::Regen
            | StatusEffectKind::DamageBoost
            | StatusEffectKind::Fortify
            | StatusEffectKind::ShieldBoost
            | StatusEffectKind::Barrier
            | StatusEffectKind::LifeSteal
            | StatusEffectKind::Reflect
            | StatusEffectKind::RegenOnHit
            | StatusEffectKind::Cleanse
            | StatusEffectKind::Focus => Polarity::Positive,
            StatusEffectKind::Burn
            | StatusEffectKind::Weaken
            | StatusEffectKind::ArmorBreak
            | StatusEffectKind::Disable
            | StatusEffectKind::Purge
            | StatusEffectKind::Volatile => Polarity::Negative,
        }
    }

    /// Whether applying the effect strips effects of the opposite polarity.
    #[must_use]
    pub const fn is_dispel(self) -> bool {
        matches!(self, StatusEffectKind::Cleanse | StatusEffectKind::Purge)
    }

    /// Hook: effect just applied to `holder`.
    pub fn on_added(self, holder: Tile, _effect: &StatusEffect, out: &mut Vec<EffectCommand>) {
        if self.is_dispel() {
            out.push(EffectCommand::Dispel {
                target: holder,
                remove: self.polarity().opposite(),
                except: self,
            });
        }
    }

    /// Hook: one production tick elapsed.
    pub fn on_tick(self, holder: Tile, effect: &StatusEffect, out: &mut Vec<EffectCommand>) {
        match self {
            StatusEffectKind::Burn => out.push(EffectCommand::Damage {
                target: holder,
                amount: effect.value,
                damage_type: DamageType::Pure,
                flags: DamageFlags::TRUE_DAMAGE,
                source_building: effect.source_building,
                attacker: None,
            }),
            StatusEffectKind::Regen => out.push(EffectCommand::Heal {
                target: holder,
                amount: effect.value,
            }),
            _ => {}
        }
    }

    /// Hook: holder is being destroyed.
    pub fn on_destroyed(self, holder: Tile, effect: &StatusEffect, out: &mut Vec<EffectCommand>) {
        if self == StatusEffectKind::Volatile {
            neighbors(holder, TileRange::Adjacent, |target| {
                out.push(EffectCommand::Damage {
                    target,
                    amount: effect.value,
                    damage_type: DamageType::Explosive,
                    flags: DamageFlags::NO_EVASION,
                    source_building: effect.source_building,
                    attacker: None,
                });
            });
        }
    }

    /// Hook: holder dealt `damage` (> 0) to `target`.
    pub fn on_dealing_damage(
        self,
        holder: Tile,
        effect: &StatusEffect,
        _target: Tile,
        damage: f64,
        out: &mut Vec<EffectCommand>,
    ) {
        if self == StatusEffectKind::LifeSteal {
            out.push(EffectCommand::Heal {
                target: holder,
                amount: effect.value * damage,
            });
        }
    }

    /// Hook: holder took `damage` (> 0), from `attacker` when known.
    pub fn on_taking_damage(
        self,
        holder: Tile,
        effect: &StatusEffect,
        attacker: Option<Tile>,
        damage: f64,
        out: &mut Vec<EffectCommand>,
    ) {
        match self {
            StatusEffectKind::Reflect => {
                if let Some(attacker) = attacker {
                    out.push(EffectCommand::Damage {
                        target: attacker,
                        amount: effect.value * damage,
                        damage_type: DamageType::Pure,
                        flags: DamageFlags::TRUE_DAMAGE,
                        source_building: effect.source_building,
                        // No attacker: a reflected hit never reflects again.
                        attacker: None,
                    });
                }
            }
            StatusEffectKind::RegenOnHit => out.push(EffectCommand::Heal {
                target: holder,
                amount: effect.value,
            }),
            _ => {}
        }
    }

    /// Contribution to the holder's modifiers during the multiplier phase.
    pub fn apply_modifiers(self, effect: &StatusEffect, modifiers: &mut Modifiers) {
        let label = format!("{self:?}");
        match self {
            StatusEffectKind::DamageBoost => modifiers.damage_multiplier.add(effect.value, label),
            StatusEffectKind::Weaken => modifiers.damage_multiplier.add(-effect.value, label),
            StatusEffectKind::Fortify => modifiers.hp_multiplier.add(effect.value, label),
            StatusEffectKind::ArmorBreak => modifiers.defense.armor -= effect.value,
            StatusEffectKind::ShieldBoost => modifiers.defense.shield += effect.value,
            StatusEffectKind::Disable => modifiers.no_fire = true,
            StatusEffectKind::Barrier => modifiers.block_laser = true,
            StatusEffectKind::Focus => modifiers
                .criticals
                .push(CriticalDamage::new(effect.value, 2.0)),
            _ => {}
        }
    }
}
