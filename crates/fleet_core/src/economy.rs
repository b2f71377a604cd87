//! Resource kinds, the per-fleet resource ledger and per-tick statistics.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Every resource a fleet can stockpile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceKind {
    /// Use-it-or-lose-it energy, reset every production tick.
    Power,
    /// Experience, generated by firing weapons and by boosted production.
    XP,
    /// Spent to run the simulation faster than real time.
    Warp,
    /// Raw ore.
    Ore,
    /// Refined alloy.
    Alloy,
    /// Fuel.
    Fuel,
    /// Kinetic ammunition.
    Shell,
    /// Explosive ammunition.
    Missile,
    /// Energy ammunition.
    PlasmaCell,
    /// Rare crystal.
    Crystal,
}

/// Amount of each resource a fleet holds.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceLedger {
    amounts: BTreeMap<ResourceKind, f64>,
}

impl ResourceLedger {
    /// Empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: set an initial amount.
    #[must_use]
    pub fn with(mut self, kind: ResourceKind, amount: f64) -> Self {
        self.set(kind, amount);
        self
    }

    /// Amount held (zero when never touched).
    #[must_use]
    pub fn get(&self, kind: ResourceKind) -> f64 {
        self.amounts.get(&kind).copied().unwrap_or(0.0)
    }

    /// Overwrite an amount.
    pub fn set(&mut self, kind: ResourceKind, amount: f64) {
        self.amounts.insert(kind, amount);
    }

    /// Add (or with a negative delta, remove) an amount.
    pub fn add(&mut self, kind: ResourceKind, delta: f64) {
        *self.amounts.entry(kind).or_insert(0.0) += delta;
    }

    /// Whether at least `amount` is held.
    #[must_use]
    pub fn has(&self, kind: ResourceKind, amount: f64) -> bool {
        self.get(kind) >= amount
    }

    /// Deduct `amount`, clamping at zero. A deduction that would go negative
    /// is a bookkeeping bug upstream and is reported, not propagated.
    pub fn deduct(&mut self, kind: ResourceKind, amount: f64) {
        let entry = self.amounts.entry(kind).or_insert(0.0);
        *entry -= amount;
        if *entry < 0.0 {
            tracing::error!(
                resource = ?kind,
                amount = *entry,
                "resource ledger went negative after deduction, clamping"
            );
            *entry = 0.0;
        }
    }

    /// Iterate held resources in kind order.
    pub fn iter(&self) -> impl Iterator<Item = (ResourceKind, f64)> + '_ {
        self.amounts.iter().map(|(k, v)| (*k, *v))
    }
}

/// Resource flow recorded during one production tick, for UI display.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceStats {
    /// Actually produced.
    pub produced: BTreeMap<ResourceKind, f64>,
    /// Actually consumed (plus unmet power demand).
    pub consumed: BTreeMap<ResourceKind, f64>,
    /// Weapon ammo demand per production interval.
    pub theoretical_consumed: BTreeMap<ResourceKind, f64>,
    /// XP equivalent of the weapon ammo demand.
    pub theoretical_xp: f64,
}

impl ResourceStats {
    /// Reset for a new tick.
    pub fn clear(&mut self) {
        self.produced.clear();
        self.consumed.clear();
        self.theoretical_consumed.clear();
        self.theoretical_xp = 0.0;
    }

    /// Record production.
    pub fn add_produced(&mut self, kind: ResourceKind, amount: f64) {
        *self.produced.entry(kind).or_insert(0.0) += amount;
    }

    /// Record consumption.
    pub fn add_consumed(&mut self, kind: ResourceKind, amount: f64) {
        *self.consumed.entry(kind).or_insert(0.0) += amount;
    }

    /// Produced amount this tick.
    #[must_use]
    pub fn produced(&self, kind: ResourceKind) -> f64 {
        self.produced.get(&kind).copied().unwrap_or(0.0)
    }

    /// Consumed amount this tick.
    #[must_use]
    pub fn consumed(&self, kind: ResourceKind) -> f64 {
        self.consumed.get(&kind).copied().unwrap_or(0.0)
    }
}
