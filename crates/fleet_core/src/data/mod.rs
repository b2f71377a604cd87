//! Data structures for content configuration.
//!
//! This module contains pure data structures that define buildings,
//! weapons, abilities, techs and elements. All structs can be built in code
//! with builder methods or deserialized from RON.
//!
//! **Note:** This module contains no IO - it only defines data types.

pub mod ability_data;
pub mod building_data;
pub mod registry;
pub mod tech_data;

pub use ability_data::{AbilityData, AbilityEffect, AbilityTiming, AbilityValue};
pub use building_data::{
    BoosterData, BoosterEffect, BuildingData, BuildingTypeId, ResourceAmount, WeaponData,
};
pub use registry::Registry;
pub use tech_data::{ElementData, ElementId, TechData, TechId, TechMultiplier};
