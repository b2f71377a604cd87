//! Fixed-point time math and the damage mitigation curves.
//!
//! Simulation time (clock accumulators, cooldowns, effect durations,
//! scheduled countdowns) uses fixed-point so that draining an accumulator in
//! interval-sized steps is exact and identical on every platform. Combat and
//! economy quantities are `f64` because the mitigation curves are
//! transcendental.

use fixed::types::I32F32;
use serde::{Deserialize, Serialize};

/// Fixed-point number type for simulation time.
///
/// Uses 32 bits for integer part and 32 bits for fractional part.
pub type Fixed = I32F32;

/// Seconds of simulation time.
pub type Seconds = Fixed;

/// Build a duration from whole milliseconds.
#[must_use]
pub fn millis(ms: u32) -> Seconds {
    Fixed::from_num(ms) / Fixed::from_num(1000)
}

/// Slack for comparisons against decimal durations.
///
/// Millisecond intervals such as 50ms are not dyadic, so `n` truncated steps
/// can land a few ulps short of the whole they should add up to.
pub const TICK_EPSILON: Fixed = Fixed::from_bits(1 << 16);

/// Whether an accumulator has reached `target`.
#[must_use]
pub fn reached(elapsed: Seconds, target: Seconds) -> bool {
    elapsed + TICK_EPSILON >= target
}

/// Whether a countdown has run out.
#[must_use]
pub fn expired(remaining: Seconds) -> bool {
    remaining <= TICK_EPSILON
}

/// Convert to floating point seconds.
#[must_use]
pub fn to_f64(value: Seconds) -> f64 {
    value.to_num::<f64>()
}

/// Build a duration from (content-authored) floating point seconds.
#[must_use]
pub fn seconds(value: f64) -> Seconds {
    Fixed::saturating_from_num(value.max(0.0))
}

/// Serde support for fixed-point numbers.
///
/// Serializes fixed-point numbers as their raw bit representation (i64)
/// to preserve exact precision across serialization boundaries.
pub mod fixed_serde {
    use super::Fixed;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    /// Serialize a fixed-point number as its raw bit representation.
    pub fn serialize<S>(value: &Fixed, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        value.to_bits().serialize(serializer)
    }

    /// Deserialize a fixed-point number from its raw bit representation.
    pub fn deserialize<'de, D>(deserializer: D) -> Result<Fixed, D::Error>
    where
        D: Deserializer<'de>,
    {
        let bits = i64::deserialize(deserializer)?;
        Ok(Fixed::from_bits(bits))
    }
}

/// Floating point 2D position in tile units (tile centres are integers).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
}

impl Vec2 {
    /// Create a new vector.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Squared distance (avoids sqrt for comparisons).
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance.
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.distance_squared(other).sqrt()
    }

    /// Linearly interpolate between two vectors. `t` is not clamped so
    /// projectiles keep travelling past their destination.
    #[must_use]
    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }

    /// Unit vector perpendicular to `self` (rotated +90°). Zero stays zero.
    #[must_use]
    pub fn perpendicular_unit(self) -> Self {
        let len = (self.x * self.x + self.y * self.y).sqrt();
        if len == 0.0 {
            return Self::default();
        }
        Self::new(-self.y / len, self.x / len)
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

/// Fraction of kinetic damage that gets through `armor`.
///
/// `1 - 0.05a / (1 + 0.05|a|)`; negative armor amplifies damage.
#[must_use]
pub fn damage_after_armor(armor: f64) -> f64 {
    let scaled = 0.05 * armor;
    1.0 - scaled / (1.0 + scaled.abs())
}

/// Fraction of explosive damage that gets through `shield`.
#[must_use]
pub fn damage_after_shield(shield: f64) -> f64 {
    (-0.025 * shield).exp()
}

/// Fraction of energy damage that gets through `deflection`.
#[must_use]
pub fn damage_after_deflection(deflection: f64) -> f64 {
    1.0 - (0.02 * deflection).tanh()
}

/// Probability of evading a hit: `1 - 1/(1 + evasion)`, zero for
/// non-positive evasion.
#[must_use]
pub fn evasion_chance(evasion: f64) -> f64 {
    if evasion <= 0.0 {
        return 0.0;
    }
    1.0 - 1.0 / (1.0 + evasion)
}
