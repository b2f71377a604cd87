//! Named-contribution accumulators for derived multipliers.

use serde::{Deserialize, Serialize};

/// A value built from a base plus labelled contributions.
///
/// The contribution list is kept so the UI can show where a multiplier comes
/// from; the value is always the base plus the sum of the list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackedValue {
    base: f64,
    contributions: Vec<(String, f64)>,
}

impl TrackedValue {
    /// Start at `base` with no contributions.
    #[must_use]
    pub fn new(base: f64) -> Self {
        Self {
            base,
            contributions: Vec::new(),
        }
    }

    /// Append a contribution.
    pub fn add(&mut self, delta: f64, source: impl Into<String>) {
        self.contributions.push((source.into(), delta));
    }

    /// Drop every contribution, leaving the base.
    pub fn clear(&mut self) {
        self.contributions.clear();
    }

    /// Base value.
    #[must_use]
    pub fn base(&self) -> f64 {
        self.base
    }

    /// Current value.
    #[must_use]
    pub fn value(&self) -> f64 {
        self.base + self.contributions.iter().map(|(_, d)| d).sum::<f64>()
    }

    /// Contributions in the order they were added.
    #[must_use]
    pub fn contributions(&self) -> &[(String, f64)] {
        &self.contributions
    }
}

impl Default for TrackedValue {
    fn default() -> Self {
        Self::new(1.0)
    }
}

/// Multipliers of a tile frozen at the moment a weapon fires or an ability
/// is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MultiplierSnapshot {
    /// HP multiplier.
    pub hp: f64,
    /// Damage multiplier.
    pub damage: f64,
}

impl Default for MultiplierSnapshot {
    fn default() -> Self {
        Self {
            hp: 1.0,
            damage: 1.0,
        }
    }
}
