//! Spatial grid and tile addressing.
//!
//! Both fleets share one coordinate space. The left fleet occupies
//! `x < GRID_WIDTH / 2`, the right (enemy) fleet the other half. A tile is
//! packed into a single `u32` as `(x << 16) | y`, so ordering tiles by their
//! packed key is ordering by x, then y.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// Width of the shared two-fleet grid.
pub const GRID_WIDTH: u16 = 100;

/// Height of the shared grid.
pub const GRID_HEIGHT: u16 = 50;

/// First column belonging to the right fleet.
pub const HALF_WIDTH: u16 = GRID_WIDTH / 2;

/// One cell of the shared grid, packed as `(x << 16) | y`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tile(pub u32);

impl Tile {
    /// Pack a coordinate pair.
    #[must_use]
    pub const fn new(x: u16, y: u16) -> Self {
        Self(((x as u32) << 16) | y as u32)
    }

    /// Column.
    #[must_use]
    pub const fn x(self) -> u16 {
        (self.0 >> 16) as u16
    }

    /// Row.
    #[must_use]
    pub const fn y(self) -> u16 {
        (self.0 & 0xFFFF) as u16
    }

    /// Whether the tile lies inside the grid bounds.
    #[must_use]
    pub const fn in_bounds(self) -> bool {
        self.x() < GRID_WIDTH && self.y() < GRID_HEIGHT
    }

    /// Fleet side this tile belongs to.
    #[must_use]
    pub const fn side(self) -> Side {
        Side::of(self)
    }

    /// Horizontal mirror across the centre line; maps one fleet's half onto
    /// the other's.
    #[must_use]
    pub const fn mirrored(self) -> Self {
        Self::new(GRID_WIDTH - 1 - self.x(), self.y())
    }

    /// Tile centre in tile units.
    #[must_use]
    pub fn center(self) -> Vec2 {
        Vec2::new(f64::from(self.x()), f64::from(self.y()))
    }

    /// Tile containing a position, if the position is on the grid.
    #[must_use]
    pub fn from_position(pos: Vec2) -> Option<Self> {
        let x = pos.x.round();
        let y = pos.y.round();
        if x < 0.0 || y < 0.0 || x >= f64::from(GRID_WIDTH) || y >= f64::from(GRID_HEIGHT) {
            return None;
        }
        Some(Self::new(x as u16, y as u16))
    }

    /// Squared Euclidean distance between tile coordinates.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> u32 {
        let dx = i32::from(self.x()) - i32::from(other.x());
        let dy = i32::from(self.y()) - i32::from(other.y());
        (dx * dx + dy * dy) as u32
    }

    /// Offset by a signed delta, staying on the grid.
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        let x = i32::from(self.x()) + dx;
        let y = i32::from(self.y()) + dy;
        if x < 0 || y < 0 || x >= i32::from(GRID_WIDTH) || y >= i32::from(GRID_HEIGHT) {
            return None;
        }
        Some(Self::new(x as u16, y as u16))
    }
}

impl fmt::Debug for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tile({}, {})", self.x(), self.y())
    }
}

/// Pack a coordinate pair into a [`Tile`].
#[must_use]
pub const fn encode_tile(x: u16, y: u16) -> Tile {
    Tile::new(x, y)
}

/// Unpack a [`Tile`] into its coordinate pair.
#[must_use]
pub const fn decode_tile(tile: Tile) -> (u16, u16) {
    (tile.x(), tile.y())
}

/// Which fleet a tile, state or projectile belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Side {
    /// The player's durable fleet.
    Left,
    /// The opponent (or regenerated wave) fleet.
    Right,
}

impl Side {
    /// Both sides in battle resolution order.
    pub const ALL: [Side; 2] = [Side::Left, Side::Right];

    /// Side owning a tile.
    #[must_use]
    pub const fn of(tile: Tile) -> Self {
        if tile.x() < HALF_WIDTH {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Direction of "forward" along x: towards the enemy.
    #[must_use]
    pub const fn forward(self) -> i32 {
        match self {
            Side::Left => 1,
            Side::Right => -1,
        }
    }

    /// Array index for per-side storage.
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Side::Left => 0,
            Side::Right => 1,
        }
    }

    /// Column range owned by this side.
    #[must_use]
    pub const fn columns(self) -> (u16, u16) {
        match self {
            Side::Left => (0, HALF_WIDTH),
            Side::Right => (HALF_WIDTH, GRID_WIDTH),
        }
    }
}

/// Area pattern around a tile, used for ability and booster targeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TileRange {
    /// Only the centre tile.
    #[default]
    Single,
    /// The four orthogonal neighbours.
    Adjacent,
    /// The tile directly in front (towards the enemy).
    Front,
    /// The three tiles in front.
    FrontTrio,
    /// The tile directly behind.
    Rear,
    /// The three tiles behind.
    RearTrio,
    /// 3x3 square including the centre.
    Range1,
    /// 5x5 square including the centre.
    Range2,
    /// 7x7 square including the centre.
    Range3,
    /// Every tile in the centre's row on its side.
    Row,
    /// Every tile in the centre's column.
    Column,
}

/// Invoke `visit` for every tile covered by `range` around `center`.
///
/// Tiles are visited in ascending x then ascending y, and never leave the
/// grid or cross to the other fleet's half.
pub fn neighbors(center: Tile, range: TileRange, mut visit: impl FnMut(Tile)) {
    let side = center.side();
    let fwd = side.forward();
    let mut offsets: Vec<(i32, i32)> = match range {
        TileRange::Single => vec![(0, 0)],
        TileRange::Adjacent => vec![(-1, 0), (0, -1), (0, 1), (1, 0)],
        TileRange::Front => vec![(fwd, 0)],
        TileRange::FrontTrio => vec![(fwd, -1), (fwd, 0), (fwd, 1)],
        TileRange::Rear => vec![(-fwd, 0)],
        TileRange::RearTrio => vec![(-fwd, -1), (-fwd, 0), (-fwd, 1)],
        TileRange::Range1 => square(1),
        TileRange::Range2 => square(2),
        TileRange::Range3 => square(3),
        TileRange::Row => {
            let (lo, hi) = side.columns();
            let cx = i32::from(center.x());
            (i32::from(lo)..i32::from(hi)).map(|x| (x - cx, 0)).collect()
        }
        TileRange::Column => {
            let cy = i32::from(center.y());
            (0..i32::from(GRID_HEIGHT)).map(|y| (0, y - cy)).collect()
        }
    };
    offsets.sort_unstable();

    for (dx, dy) in offsets {
        if let Some(tile) = center.offset(dx, dy) {
            if tile.side() == side {
                visit(tile);
            }
        }
    }
}

fn square(radius: i32) -> Vec<(i32, i32)> {
    let mut out = Vec::with_capacity(((2 * radius + 1) * (2 * radius + 1)) as usize);
    for dx in -radius..=radius {
        for dy in -radius..=radius {
            out.push((dx, dy));
        }
    }
    out
}

/// Axis-aligned bounding box over a set of tiles (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    /// Smallest x.
    pub min_x: u16,
    /// Smallest y.
    pub min_y: u16,
    /// Largest x.
    pub max_x: u16,
    /// Largest y.
    pub max_y: u16,
}

impl BoundingBox {
    /// Box around every tile yielded, or `None` for an empty set.
    pub fn of(tiles: impl IntoIterator<Item = Tile>) -> Option<Self> {
        let mut iter = tiles.into_iter();
        let first = iter.next()?;
        let mut bb = Self {
            min_x: first.x(),
            min_y: first.y(),
            max_x: first.x(),
            max_y: first.y(),
        };
        for tile in iter {
            bb.min_x = bb.min_x.min(tile.x());
            bb.min_y = bb.min_y.min(tile.y());
            bb.max_x = bb.max_x.max(tile.x());
            bb.max_y = bb.max_y.max(tile.y());
        }
        Some(bb)
    }

    /// Whether a tile lies inside the box.
    #[must_use]
    pub const fn contains(&self, tile: Tile) -> bool {
        tile.x() >= self.min_x
            && tile.x() <= self.max_x
            && tile.y() >= self.min_y
            && tile.y() <= self.max_y
    }

    /// Whether a point travelling in direction `forward` along x has left
    /// the box on its far side.
    #[must_use]
    pub fn is_passed(&self, pos: Vec2, forward: i32) -> bool {
        let margin = 0.5;
        if forward > 0 {
            pos.x > f64::from(self.max_x) + margin
        } else {
            pos.x < f64::from(self.min_x) - margin
        }
    }

    /// Every tile in the box, ascending x then y.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> + '_ {
        (self.min_x..=self.max_x)
            .flat_map(move |x| (self.min_y..=self.max_y).map(move |y| Tile::new(x, y)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(center: Tile, range: TileRange) -> Vec<Tile> {
        let mut out = Vec::new();
        neighbors(center, range, |t| out.push(t));
        out
    }

    #[test]
    fn test_encode_decode() {
        let tile = encode_tile(42, 7);
        assert_eq!(decode_tile(tile), (42, 7));
        assert_eq!(tile.0, (42 << 16) | 7);
    }

    #[test]
    fn test_side_split() {
        assert_eq!(Tile::new(HALF_WIDTH - 1, 0).side(), Side::Left);
        assert_eq!(Tile::new(HALF_WIDTH, 0).side(), Side::Right);
        assert_eq!(Side::Left.opponent(), Side::Right);
    }

    #[test]
    fn test_mirror_swaps_sides() {
        let tile = Tile::new(3, 9);
        let mirrored = tile.mirrored();
        assert_eq!(mirrored, Tile::new(GRID_WIDTH - 4, 9));
        assert_eq!(mirrored.side(), Side::Right);
        assert_eq!(mirrored.mirrored(), tile);
    }

    #[test]
    fn test_front_is_side_relative() {
        let left = Tile::new(10, 10);
        let right = Tile::new(60, 10);
        assert_eq!(collect(left, TileRange::Front), vec![Tile::new(11, 10)]);
        assert_eq!(collect(right, TileRange::Front), vec![Tile::new(59, 10)]);
        assert_eq!(collect(left, TileRange::Rear), vec![Tile::new(9, 10)]);
        assert_eq!(collect(right, TileRange::Rear), vec![Tile::new(61, 10)]);
    }

    #[test]
    fn test_adjacent_order_and_bounds() {
        let tiles = collect(Tile::new(0, 0), TileRange::Adjacent);
        assert_eq!(tiles, vec![Tile::new(0, 1), Tile::new(1, 0)]);
    }

    #[test]
    fn test_range_never_crosses_halves() {
        let tiles = collect(Tile::new(HALF_WIDTH - 1, 5), TileRange::Range2);
        assert!(tiles.iter().all(|t| t.side() == Side::Left));
        assert_eq!(tiles.len(), 3 * 5);
    }

    #[test]
    fn test_row_covers_own_half() {
        let tiles = collect(Tile::new(70, 3), TileRange::Row);
        assert_eq!(tiles.len(), usize::from(GRID_WIDTH - HALF_WIDTH));
        assert!(tiles.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_column_covers_height() {
        let tiles = collect(Tile::new(4, 3), TileRange::Column);
        assert_eq!(tiles.len(), usize::from(GRID_HEIGHT));
    }

    #[test]
    fn test_bounding_box() {
        let bb = BoundingBox::of([Tile::new(2, 5), Tile::new(4, 1), Tile::new(3, 3)]).unwrap();
        assert_eq!((bb.min_x, bb.min_y, bb.max_x, bb.max_y), (2, 1, 4, 5));
        assert!(bb.contains(Tile::new(3, 4)));
        assert!(!bb.contains(Tile::new(5, 4)));
        assert_eq!(bb.tiles().count(), 3 * 5);
        assert!(BoundingBox::of(Vec::<Tile>::new()).is_none());
    }

    #[test]
    fn test_bounding_box_passed() {
        let bb = BoundingBox::of([Tile::new(60, 5), Tile::new(62, 5)]).unwrap();
        assert!(!bb.is_passed(Vec2::new(61.0, 5.0), 1));
        assert!(bb.is_passed(Vec2::new(62.6, 5.0), 1));
        assert!(bb.is_passed(Vec2::new(59.4, 5.0), -1));
        assert!(!bb.is_passed(Vec2::new(40.0, 5.0), 1));
    }

    #[test]
    fn test_bounding_box_ignores_rows() {
        let bb = BoundingBox::of([Tile::new(52, 10), Tile::new(50, 40)]).unwrap();
        assert!(!bb.is_passed(Vec2::new(48.0, 2.0), 1));
        assert!(!bb.is_passed(Vec2::new(51.0, 45.0), 1));
        assert!(bb.is_passed(Vec2::new(52.6, 2.0), 1));
    }

    #[test]
    fn test_from_position() {
        assert_eq!(Tile::from_position(Vec2::new(3.4, 2.6)), Some(Tile::new(3, 3)));
        assert_eq!(Tile::from_position(Vec2::new(-1.0, 0.0)), None);
    }
}
