//! Damage types and the mitigation pipeline.
//!
//! Each damage type is reduced by exactly one defensive stat:
//! - Kinetic by armor (hyperbolic curve)
//! - Explosive by shield (exponential decay)
//! - Energy by deflection (tanh curve)
//! - Pure is never reduced

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::math::{damage_after_armor, damage_after_deflection, damage_after_shield};

/// Damage type classification for weapons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
pub enum DamageType {
    /// Kinetic damage (shells, slugs) - reduced by armor.
    #[default]
    Kinetic,
    /// Explosive damage (missiles, mines) - reduced by shield.
    Explosive,
    /// Energy damage (lasers, plasma) - reduced by deflection.
    Energy,
    /// Unmitigated damage (status effects, sudden death).
    Pure,
}

/// Modifiers carried by a hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DamageFlags {
    /// The hit cannot be evaded.
    #[serde(default)]
    pub no_evasion: bool,
    /// The hit ignores evasion and mitigation.
    #[serde(default)]
    pub true_damage: bool,
}

impl DamageFlags {
    /// Hit that cannot be evaded but is still mitigated.
    pub const NO_EVASION: Self = Self {
        no_evasion: true,
        true_damage: false,
    };

    /// Hit that bypasses evasion and mitigation.
    pub const TRUE_DAMAGE: Self = Self {
        no_evasion: true,
        true_damage: true,
    };

    /// Whether the evasion roll is skipped.
    #[must_use]
    pub const fn skips_evasion(self) -> bool {
        self.no_evasion || self.true_damage
    }
}

/// Flags fixed by a weapon's definition and copied into its projectiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ProjectileFlags {
    /// Projectile cannot be evaded.
    #[serde(default)]
    pub no_evasion: bool,
    /// Continuous beam: keeps flying and hits every tile on its line once.
    #[serde(default)]
    pub laser: bool,
    /// Homing drone: retargets the weakest enemy and only hits its destination.
    #[serde(default)]
    pub drone: bool,
    /// Ignores evasion and mitigation.
    #[serde(default)]
    pub true_damage: bool,
}

impl ProjectileFlags {
    /// The damage flags a hit from this projectile carries.
    #[must_use]
    pub const fn damage_flags(self) -> DamageFlags {
        DamageFlags {
            no_evasion: self.no_evasion,
            true_damage: self.true_damage,
        }
    }
}

/// Defensive stats of a target at the time of the hit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Defense {
    /// Reduces kinetic damage.
    pub armor: f64,
    /// Reduces explosive damage.
    pub shield: f64,
    /// Reduces energy damage.
    pub deflection: f64,
    /// Chance to avoid a hit entirely.
    pub evasion: f64,
}

/// Damage left after the target's defense for this type.
#[must_use]
pub fn mitigate(
    amount: f64,
    damage_type: DamageType,
    flags: DamageFlags,
    defense: &Defense,
) -> f64 {
    if flags.true_damage {
        return amount;
    }
    let factor = match damage_type {
        DamageType::Kinetic => damage_after_armor(defense.armor),
        DamageType::Explosive => damage_after_shield(defense.shield),
        DamageType::Energy => damage_after_deflection(defense.deflection),
        DamageType::Pure => 1.0,
    };
    (amount * factor).max(0.0)
}

/// A chance to multiply a projectile's damage.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriticalDamage {
    /// Probability in `[0, 1]`.
    pub chance: f64,
    /// Damage multiplier on success.
    pub multiplier: f64,
}

impl CriticalDamage {
    /// Create a critical entry.
    #[must_use]
    pub const fn new(chance: f64, multiplier: f64) -> Self {
        Self { chance, multiplier }
    }
}

/// Raw and post-mitigation damage received, per damage type.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DamageStats {
    /// Damage before mitigation.
    pub raw: BTreeMap<DamageType, f64>,
    /// Damage after mitigation.
    pub actual: BTreeMap<DamageType, f64>,
}

impl DamageStats {
    /// Record one hit.
    pub fn record(&mut self, damage_type: DamageType, raw: f64, actual: f64) {
        *self.raw.entry(damage_type).or_insert(0.0) += raw;
        *self.actual.entry(damage_type).or_insert(0.0) += actual;
    }

    /// Total raw damage over all types.
    #[must_use]
    pub fn total_raw(&self) -> f64 {
        self.raw.values().sum()
    }

    /// Total actual damage over all types.
    #[must_use]
    pub fn total_actual(&self) -> f64 {
        self.actual.values().sum()
    }
}
