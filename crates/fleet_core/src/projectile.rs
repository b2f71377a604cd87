//! In-flight damage carriers.
//!
//! A projectile's position is a pure function of its elapsed time: linear
//! interpolation from the origin tile centre towards the destination centre
//! (continuing past it), plus a sinusoidal sideways offset scaled by
//! `magnitude` for drone arcs.

use std::collections::BTreeSet;
use std::f64::consts::PI;

use serde::{Deserialize, Serialize};

use crate::combat::{DamageType, ProjectileFlags};
use crate::data::BuildingTypeId;
use crate::grid::Tile;
use crate::math::{fixed_serde, to_f64, Fixed, Seconds, Vec2};
use crate::tracked::MultiplierSnapshot;

/// Longest gap between two path samples, in tiles.
pub const PATH_STEP: f64 = 0.25;

/// One projectile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// Firing tile.
    pub origin: Tile,
    /// Tile aimed at.
    pub destination: Tile,
    /// Damage carried (after the critical roll).
    pub damage: f64,
    /// Firing building.
    pub source_building: BuildingTypeId,
    /// Firing building's level.
    pub source_level: u32,
    /// Damage type.
    pub damage_type: DamageType,
    /// Tiles per second.
    pub speed: f64,
    /// Behaviour flags.
    pub flags: ProjectileFlags,
    /// The damage roll was a critical.
    pub critical: bool,
    /// Firer's multipliers when the weapon fired.
    pub multipliers: MultiplierSnapshot,
    /// Sideways arc amplitude.
    pub magnitude: f64,
    /// Time in flight.
    #[serde(with = "fixed_serde")]
    pub elapsed: Seconds,
    hits: BTreeSet<Tile>,
}

impl Projectile {
    /// A projectile leaving `origin` for `destination`.
    #[must_use]
    pub fn new(
        origin: Tile,
        destination: Tile,
        damage: f64,
        source_building: BuildingTypeId,
    ) -> Self {
        Self {
            origin,
            destination,
            damage,
            source_building,
            source_level: 1,
            damage_type: DamageType::default(),
            speed: 1.0,
            flags: ProjectileFlags::default(),
            critical: false,
            multipliers: MultiplierSnapshot::default(),
            magnitude: 0.0,
            elapsed: Fixed::ZERO,
            hits: BTreeSet::new(),
        }
    }

    /// Advance by one battle interval.
    pub fn advance(&mut self, dt: Seconds) {
        self.elapsed += dt;
    }

    /// Advance by `dt` and return every on-grid tile crossed, in path order.
    ///
    /// The flight is sampled at most [`PATH_STEP`] tiles apart, so a shot
    /// faster than one tile per interval still visits each tile it crosses.
    pub fn advance_path(&mut self, dt: Seconds) -> Vec<Tile> {
        let start = self.progress();
        let from = self.position();
        self.advance(dt);
        let end = self.progress();

        // sideways arc travel is at most magnitude * pi per unit of progress
        let arc = self.magnitude.abs() * PI * (end - start);
        let length = from.distance(self.position()) + arc;
        let steps = (length / PATH_STEP).ceil().max(1.0) as u32;

        let mut path: Vec<Tile> = Vec::new();
        for i in 0..=steps {
            let t = start + (end - start) * f64::from(i) / f64::from(steps);
            if let Some(tile) = Tile::from_position(self.position_at(t)) {
                if path.last() != Some(&tile) {
                    path.push(tile);
                }
            }
        }
        path
    }

    /// Fraction of the origin→destination distance covered (may exceed 1).
    #[must_use]
    pub fn progress(&self) -> f64 {
        let distance = self.origin.center().distance(self.destination.center());
        if distance <= f64::EPSILON {
            return 1.0;
        }
        to_f64(self.elapsed) * self.speed / distance
    }

    /// Current position in tile units.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position_at(self.progress())
    }

    fn position_at(&self, t: f64) -> Vec2 {
        let from = self.origin.center();
        let to = self.destination.center();
        let base = from.lerp(to, t);
        if self.magnitude == 0.0 {
            return base;
        }
        let side = (to - from).perpendicular_unit();
        let offset = (t * PI).sin() * self.magnitude;
        base + Vec2::new(side.x * offset, side.y * offset)
    }

    /// Tile under the projectile, if on the grid.
    #[must_use]
    pub fn current_tile(&self) -> Option<Tile> {
        Tile::from_position(self.position())
    }

    /// Whether `tile` was already hit.
    #[must_use]
    pub fn has_hit(&self, tile: Tile) -> bool {
        self.hits.contains(&tile)
    }

    /// Record a hit, returning the number of tiles hit so far.
    pub fn record_hit(&mut self, tile: Tile) -> usize {
        self.hits.insert(tile);
        self.hits.len()
    }

    /// Tiles hit so far.
    #[must_use]
    pub fn hit_count(&self) -> usize {
        self.hits.len()
    }
}
