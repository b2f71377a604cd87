//! Notifications emitted by a runtime for the rendering/UI layer.
//!
//! Each runtime owns its own [`EventLog`]; nothing is global, so concurrent
//! simulations never see each other's events. The simulation never reads
//! the log back.

use serde::{Deserialize, Serialize};

use crate::combat::DamageType;
use crate::grid::{Side, Tile};
use crate::runtime::BattleStatus;

/// One notification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum SimEvent {
    /// A weapon fired at a target.
    WeaponFired {
        /// Firing tile.
        from: Tile,
        /// Target tile.
        to: Tile,
    },
    /// A projectile struck a tile.
    ProjectileHit {
        /// Firing tile.
        from: Tile,
        /// Struck tile.
        to: Tile,
        /// Damage carried into the hit (before mitigation).
        damage: f64,
        /// Whether the projectile rolled a critical.
        critical: bool,
    },
    /// HP changed; negative amounts are heals.
    Damaged {
        /// Tile.
        tile: Tile,
        /// Damage dealt (negative for healing).
        amount: f64,
        /// Damage type (Pure for heals).
        damage_type: DamageType,
    },
    /// A hit was evaded.
    Evaded {
        /// Tile that evaded.
        tile: Tile,
    },
    /// Buff/debuff counts on a tile changed.
    StatusEffectsChanged {
        /// Tile.
        tile: Tile,
        /// Positive effects.
        buffs: usize,
        /// Negative effects.
        debuffs: usize,
    },
    /// A tile was destroyed and removed.
    TileDestroyed {
        /// Tile.
        tile: Tile,
        /// Its maximum HP.
        max_hp: f64,
    },
    /// Battle status transitioned.
    BattleStatusChanged {
        /// Previous status.
        from: BattleStatus,
        /// New status.
        to: BattleStatus,
    },
    /// A new enemy wave was generated.
    WaveSpawned {
        /// Wave number (1-based).
        wave: u32,
        /// Level of the generated buildings.
        level: u32,
    },
    /// Time warp was cancelled for lack of Warp.
    SpeedReset {
        /// Fleet that ran out.
        side: Side,
    },
    /// Coalesced "something changed, please redraw".
    GameStateUpdated,
}

/// Output queue of events, drained by the caller.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<SimEvent>,
    enabled: bool,
}

impl EventLog {
    /// A log that records events.
    #[must_use]
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
            enabled: true,
        }
    }

    /// A log that drops everything (used for score estimation).
    #[must_use]
    pub fn disabled() -> Self {
        Self {
            events: Vec::new(),
            enabled: false,
        }
    }

    /// Record an event.
    pub fn push(&mut self, event: SimEvent) {
        if self.enabled {
            self.events.push(event);
        }
    }

    /// Events recorded since the last drain.
    #[must_use]
    pub fn events(&self) -> &[SimEvent] {
        &self.events
    }

    /// Take every recorded event.
    pub fn drain(&mut self) -> Vec<SimEvent> {
        std::mem::take(&mut self.events)
    }

    /// Number of pending events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether no events are pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
