//! Weapon abilities: area effects triggered when a weapon fires or hits.
//!
//! Ability magnitudes are a closed set of formulas ([`AbilityValue`]) so
//! content can be described in data and evaluated without dynamic dispatch.

use serde::{Deserialize, Serialize};

use crate::combat::DamageType;
use crate::data::building_data::BuildingData;
use crate::grid::TileRange;
use crate::status_effect::StatusEffectKind;
use crate::tracked::MultiplierSnapshot;

/// When an ability triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AbilityTiming {
    /// Around the firer, each time the weapon fires.
    OnFire,
    /// Around the struck tile, each time a projectile hits.
    OnHit,
}

/// Formula for an ability's magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AbilityValue {
    /// Fixed number.
    Constant(f64),
    /// `base + per_level × level`.
    PerLevel {
        /// Value at level zero.
        base: f64,
        /// Increase per level.
        per_level: f64,
    },
    /// Fraction of the weapon's damage per fire (with damage multiplier).
    DamagePct(f64),
    /// Fraction of the building's HP (with HP multiplier).
    HpPct(f64),
}

impl AbilityValue {
    /// Evaluate for a building at a level with frozen multipliers.
    #[must_use]
    pub fn evaluate(
        &self,
        building: &BuildingData,
        level: u32,
        multipliers: &MultiplierSnapshot,
    ) -> f64 {
        match *self {
            AbilityValue::Constant(v) => v,
            AbilityValue::PerLevel { base, per_level } => base + per_level * f64::from(level),
            AbilityValue::DamagePct(pct) => {
                let damage = building.weapon.as_ref().map_or(0.0, |w| w.damage_at(level));
                pct * damage * multipliers.damage
            }
            AbilityValue::HpPct(pct) => pct * building.hp_at(level) * multipliers.hp,
        }
    }
}

/// What an ability does to each tile in its area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AbilityEffect {
    /// Apply a status effect, keyed by the firing tile.
    ApplyStatus {
        /// Effect kind.
        kind: StatusEffectKind,
        /// Effect strength.
        value: AbilityValue,
        /// Duration in seconds.
        duration: f64,
    },
    /// Deal damage.
    Damage {
        /// Damage amount.
        value: AbilityValue,
        /// Damage type.
        damage_type: DamageType,
    },
    /// Restore HP.
    Heal {
        /// HP restored.
        value: AbilityValue,
    },
}

/// An ability attached to a weapon.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AbilityData {
    /// Trigger.
    pub timing: AbilityTiming,
    /// Area around the anchor tile (firer or struck tile).
    pub range: TileRange,
    /// Effect on each occupied tile in the area.
    pub effect: AbilityEffect,
}

impl AbilityData {
    /// Create an ability.
    #[must_use]
    pub const fn new(timing: AbilityTiming, range: TileRange, effect: AbilityEffect) -> Self {
        Self {
            timing,
            range,
            effect,
        }
    }
}
