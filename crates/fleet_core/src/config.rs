//! Simulation tuning knobs.
//!
//! Every constant the clock and the combat rules depend on lives in
//! [`SimConfig`], which can be built in code or loaded from RON:
//!
//! ```ron
//! SimConfig(
//!     production_interval_ms: 1000,
//!     battle_interval_ms: 50,
//!     rng_seed: 42,
//! )
//! ```

use serde::{Deserialize, Serialize};

use crate::data::BuildingTypeId;
use crate::error::{Result, SimError};
use crate::math::{millis, Seconds};

/// Runtime configuration. Missing RON fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    /// Length of one production tick.
    pub production_interval_ms: u32,
    /// Length of one battle tick.
    pub battle_interval_ms: u32,
    /// Minimum spacing of `GameStateUpdated` notifications.
    pub notify_interval_ms: u32,
    /// Ammo cycles granted on a fleet's very first production tick.
    pub battle_start_ammo_cycles: u32,
    /// Delay between consecutive projectiles of one fire event.
    pub projectile_stagger_ms: u32,
    /// Seconds both fleets must go undamaged before sudden death starts.
    pub sudden_death_after_secs: u32,
    /// Share of max HP lost per second of sudden death, per production tick.
    pub sudden_death_pct: f64,
    /// Building used to fill peace-mode waves.
    pub peace_basic_building: BuildingTypeId,
    /// Extra enemy levels per peace wave.
    pub peace_level_per_wave: u32,
    /// Battle ticks simulated by the score estimate.
    pub score_battle_ticks: u32,
    /// Seed of the default random source.
    pub rng_seed: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            production_interval_ms: 1000,
            battle_interval_ms: 50,
            notify_interval_ms: 100,
            battle_start_ammo_cycles: 5,
            projectile_stagger_ms: 100,
            sudden_death_after_secs: 60,
            sudden_death_pct: 0.01,
            peace_basic_building: BuildingTypeId::new(0),
            peace_level_per_wave: 1,
            score_battle_ticks: 600,
            rng_seed: 0x5eed,
        }
    }
}

impl SimConfig {
    /// Parse from RON and validate.
    pub fn from_ron(src: &str) -> Result<Self> {
        let config: Self = ron::from_str(src).map_err(|e| SimError::DataParseError {
            what: "sim config".to_string(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the clock cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.production_interval_ms == 0 {
            return Err(SimError::InvalidConfig(
                "production_interval_ms must be positive".to_string(),
            ));
        }
        if self.battle_interval_ms == 0 {
            return Err(SimError::InvalidConfig(
                "battle_interval_ms must be positive".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.sudden_death_pct) {
            return Err(SimError::InvalidConfig(format!(
                "sudden_death_pct must be within [0, 1], got {}",
                self.sudden_death_pct
            )));
        }
        Ok(())
    }

    /// Production tick length.
    #[must_use]
    pub fn production_interval(&self) -> Seconds {
        millis(self.production_interval_ms)
    }

    /// Battle tick length.
    #[must_use]
    pub fn battle_interval(&self) -> Seconds {
        millis(self.battle_interval_ms)
    }

    /// Notification spacing.
    #[must_use]
    pub fn notify_interval(&self) -> Seconds {
        millis(self.notify_interval_ms)
    }

    /// Delay between projectiles of one fire event.
    #[must_use]
    pub fn projectile_stagger(&self) -> Seconds {
        millis(self.projectile_stagger_ms)
    }

    /// Undamaged time before sudden death.
    #[must_use]
    pub fn sudden_death_after(&self) -> Seconds {
        Seconds::from_num(self.sudden_death_after_secs)
    }
}
