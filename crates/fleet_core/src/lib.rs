//! # Fleet Core
//!
//! Deterministic battle and production simulation for an idle spaceship
//! game.
//!
//! This crate contains **only** simulation logic:
//! - No rendering
//! - No IO
//! - No system randomness (every draw goes through an injected source)
//! - Fixed-point clock accumulators
//!
//! This separation enables:
//! - Headless balance runs and fleet scoring
//! - Save migration tooling
//! - Determinism testing
//!
//! ## Crate Structure
//!
//! - [`grid`] - Tile addressing, sides, ranges and bounding boxes
//! - [`data`] - Building, weapon, tech and element definitions
//! - [`game_state`] - Persistent state of one fleet
//! - [`runtime_tile`] - Live per-tile combat state
//! - [`status_effect`] - Buffs and debuffs
//! - [`runtime`] - The simulation clock
//! - [`battle`] / [`production`] - The two tick phases
//! - [`score`] - Fleet strength estimate

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod battle;
pub mod combat;
pub mod config;
pub mod data;
pub mod economy;
pub mod error;
pub mod events;
pub mod game_state;
pub mod grid;
pub mod math;
pub mod production;
pub mod projectile;
pub mod rng;
pub mod runtime;
pub mod runtime_tile;
pub mod score;
pub mod status_effect;
pub mod tracked;
pub mod validate;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::combat::{CriticalDamage, DamageFlags, DamageType, Defense, ProjectileFlags};
    pub use crate::config::SimConfig;
    pub use crate::data::{
        AbilityData, AbilityEffect, AbilityTiming, AbilityValue, BoosterData, BoosterEffect,
        BuildingData, BuildingTypeId, ElementData, ElementId, Registry, TechData, TechId,
        WeaponData,
    };
    pub use crate::economy::{ResourceKind, ResourceLedger};
    pub use crate::error::{Result, SimError};
    pub use crate::events::{EventLog, SimEvent};
    pub use crate::game_state::{GameState, TileData};
    pub use crate::grid::{Side, Tile, TileRange};
    pub use crate::math::{millis, seconds, Fixed, Seconds};
    pub use crate::rng::{RandomSource, ScriptedRandom, SeededRandom};
    pub use crate::runtime::{BattleMode, BattleStatus, Runtime, SpeedContext};
    pub use crate::runtime_tile::RuntimeTile;
    pub use crate::score::{estimate_fleet_score, FleetScore};
    pub use crate::status_effect::StatusEffectKind;
    pub use crate::validate::{validate_game_state, ValidationReport};
}
