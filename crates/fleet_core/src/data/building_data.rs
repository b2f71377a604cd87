//! Building data structures for data-driven building definitions.

use serde::{Deserialize, Serialize};

use crate::combat::{CriticalDamage, DamageType, Defense, ProjectileFlags};
use crate::data::ability_data::{AbilityData, AbilityTiming};
use crate::data::tech_data::ElementId;
use crate::economy::ResourceKind;
use crate::grid::TileRange;

/// Unique identifier for building types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BuildingTypeId(pub u32);

impl BuildingTypeId {
    /// Create a new building type ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

/// A resource and a per-level amount.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResourceAmount {
    /// Resource kind.
    pub resource: ResourceKind,
    /// Amount per level per production tick.
    pub amount: f64,
}

impl ResourceAmount {
    /// Create a resource amount.
    #[must_use]
    pub const fn new(resource: ResourceKind, amount: f64) -> Self {
        Self { resource, amount }
    }
}

/// Data-driven building definition.
///
/// # Example RON
///
/// ```ron
/// BuildingData(
///     id: (3),
///     name: "Railgun",
///     hp: 40.0,
///     inputs: [(resource: Shell, amount: 1.0)],
///     can_target: true,
///     weapon: Some(WeaponData(
///         damage_per_fire: 12.0,
///         fire_cooldown: 2.0,
///         projectile_speed: 20.0,
///     )),
/// )
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BuildingData {
    /// Unique identifier for this building type.
    pub id: BuildingTypeId,

    /// Display name (debugging only, UI strings live elsewhere).
    pub name: String,

    /// Hit points per level.
    pub hp: f64,

    /// Base defensive stats.
    #[serde(default)]
    pub defense: Defense,

    /// Resources consumed per level per production tick.
    #[serde(default)]
    pub inputs: Vec<ResourceAmount>,

    /// Resources produced per level per production tick.
    #[serde(default)]
    pub outputs: Vec<ResourceAmount>,

    /// Element whose inventory boosts this building.
    #[serde(default)]
    pub element: Option<ElementId>,

    /// Whether the building picks targets.
    #[serde(default)]
    pub can_target: bool,

    /// Stops laser projectiles passing through.
    #[serde(default)]
    pub block_laser: bool,

    /// Weapon capability.
    #[serde(default)]
    pub weapon: Option<WeaponData>,

    /// Booster capability.
    #[serde(default)]
    pub booster: Option<BoosterData>,
}

impl BuildingData {
    /// A plain building with only hit points.
    #[must_use]
    pub fn new(id: BuildingTypeId, name: impl Into<String>, hp: f64) -> Self {
        Self {
            id,
            name: name.into(),
            hp,
            defense: Defense::default(),
            inputs: Vec::new(),
            outputs: Vec::new(),
            element: None,
            can_target: false,
            block_laser: false,
            weapon: None,
            booster: None,
        }
    }

    /// Builder: defensive stats.
    #[must_use]
    pub fn with_defense(mut self, defense: Defense) -> Self {
        self.defense = defense;
        self
    }

    /// Builder: add an input.
    #[must_use]
    pub fn with_input(mut self, resource: ResourceKind, amount: f64) -> Self {
        self.inputs.push(ResourceAmount::new(resource, amount));
        self
    }

    /// Builder: add an output.
    #[must_use]
    pub fn with_output(mut self, resource: ResourceKind, amount: f64) -> Self {
        self.outputs.push(ResourceAmount::new(resource, amount));
        self
    }

    /// Builder: associated element.
    #[must_use]
    pub fn with_element(mut self, element: ElementId) -> Self {
        self.element = Some(element);
        self
    }

    /// Builder: weapon capability (also makes the building target).
    #[must_use]
    pub fn with_weapon(mut self, weapon: WeaponData) -> Self {
        self.weapon = Some(weapon);
        self.can_target = true;
        self
    }

    /// Builder: booster capability.
    #[must_use]
    pub fn with_booster(mut self, booster: BoosterData) -> Self {
        self.booster = Some(booster);
        self
    }

    /// Builder: block lasers.
    #[must_use]
    pub fn blocking_lasers(mut self) -> Self {
        self.block_laser = true;
        self
    }

    /// Hit points at a level.
    #[must_use]
    pub fn hp_at(&self, level: u32) -> f64 {
        self.hp * f64::from(level)
    }

    /// Whether this is a weapon building.
    #[must_use]
    pub fn is_weapon(&self) -> bool {
        self.weapon.is_some()
    }
}

/// Weapon stats of a building.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponData {
    /// Total damage per fire event per level, split over projectiles.
    pub damage_per_fire: f64,

    /// Share of `damage_per_fire` actually delivered.
    #[serde(default = "default_one")]
    pub damage_pct: f64,

    /// Seconds between fire events.
    pub fire_cooldown: f64,

    /// Projectiles per fire event.
    #[serde(default = "default_projectile_count")]
    pub projectile_count: u32,

    /// Projectile speed in tiles per second.
    pub projectile_speed: f64,

    /// Damage type of the projectiles.
    #[serde(default)]
    pub damage_type: DamageType,

    /// Projectile behaviour flags.
    #[serde(default)]
    pub flags: ProjectileFlags,

    /// Lateral arc amplitude (drones).
    #[serde(default)]
    pub magnitude: f64,

    /// Critical damage chances.
    #[serde(default)]
    pub criticals: Vec<CriticalDamage>,

    /// Abilities triggered on fire or on hit.
    #[serde(default)]
    pub abilities: Vec<AbilityData>,
}

const fn default_one() -> f64 {
    1.0
}

const fn default_projectile_count() -> u32 {
    1
}

impl WeaponData {
    /// A single-projectile kinetic weapon.
    #[must_use]
    pub fn new(damage_per_fire: f64, fire_cooldown: f64, projectile_speed: f64) -> Self {
        Self {
            damage_per_fire,
            damage_pct: 1.0,
            fire_cooldown,
            projectile_count: 1,
            projectile_speed,
            damage_type: DamageType::Kinetic,
            flags: ProjectileFlags::default(),
            magnitude: 0.0,
            criticals: Vec::new(),
            abilities: Vec::new(),
        }
    }

    /// Builder: damage type.
    #[must_use]
    pub fn with_damage_type(mut self, damage_type: DamageType) -> Self {
        self.damage_type = damage_type;
        self
    }

    /// Builder: projectile count.
    #[must_use]
    pub fn with_projectiles(mut self, count: u32) -> Self {
        self.projectile_count = count.max(1);
        self
    }

    /// Builder: projectile flags.
    #[must_use]
    pub fn with_flags(mut self, flags: ProjectileFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Builder: drone arc amplitude.
    #[must_use]
    pub fn with_magnitude(mut self, magnitude: f64) -> Self {
        self.magnitude = magnitude;
        self
    }

    /// Builder: add a critical entry.
    #[must_use]
    pub fn with_critical(mut self, critical: CriticalDamage) -> Self {
        self.criticals.push(critical);
        self
    }

    /// Builder: add an ability.
    #[must_use]
    pub fn with_ability(mut self, ability: AbilityData) -> Self {
        self.abilities.push(ability);
        self
    }

    /// Damage per fire at a level.
    #[must_use]
    pub fn damage_at(&self, level: u32) -> f64 {
        self.damage_per_fire * f64::from(level)
    }

    /// Abilities with the given timing.
    pub fn abilities_at(&self, timing: AbilityTiming) -> impl Iterator<Item = &AbilityData> {
        self.abilities.iter().filter(move |a| a.timing == timing)
    }
}

/// Aura a booster building projects on tiles in range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum BoosterEffect {
    /// Adds to the production multiplier.
    ProductionBoost(f64),
    /// Adds to the HP multiplier.
    HpBoost(f64),
    /// Adds to the damage multiplier.
    DamageBoost(f64),
    /// Heals this many HP per level every production tick.
    Repair(f64),
}

/// Booster capability of a building.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoosterData {
    /// Tiles affected.
    pub range: TileRange,
    /// What happens to them.
    pub effect: BoosterEffect,
}

impl BoosterData {
    /// Create a booster.
    #[must_use]
    pub const fn new(range: TileRange, effect: BoosterEffect) -> Self {
        Self { range, effect }
    }
}
