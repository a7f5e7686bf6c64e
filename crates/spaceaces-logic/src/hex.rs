//! Axial hex-grid geometry for the galaxy map.
//!
//! Coordinates are axial `(q, r)` with the implicit cube component
//! `s = -q - r`. Layout is flat-top. Everything here is a pure function
//! over plain values and holds no map state.
//!
//! ```
//! use spaceaces_logic::hex::{hex_distance, hex_ring, HexCoord};
//!
//! let origin = HexCoord::ORIGIN;
//! let ring = hex_ring(origin, 2);
//! assert_eq!(ring.len(), 12);
//! assert!(ring.iter().all(|h| hex_distance(origin, *h) == 2));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const SQRT_3: f64 = 1.732_050_807_568_877_2;

/// Axial hex coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct HexCoord {
    pub q: i32,
    pub r: i32,
}

impl HexCoord {
    pub const ORIGIN: HexCoord = HexCoord { q: 0, r: 0 };

    pub const fn new(q: i32, r: i32) -> Self {
        Self { q, r }
    }

    /// Derived cube component.
    pub const fn s(&self) -> i32 {
        -self.q - self.r
    }

    /// Step `n` times in `dir`.
    pub fn offset(self, dir: HexDirection, n: i32) -> Self {
        let (dq, dr) = dir.offset();
        Self::new(self.q + dq * n, self.r + dr * n)
    }
}

impl fmt::Display for HexCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.q, self.r)
    }
}

impl FromStr for HexCoord {
    type Err = HexKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        key_to_hex(s)
    }
}

/// Fractional axial coordinate, produced by projection and interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FractionalHex {
    pub q: f64,
    pub r: f64,
}

impl FractionalHex {
    pub fn new(q: f64, r: f64) -> Self {
        Self { q, r }
    }

    pub fn s(&self) -> f64 {
        -self.q - self.r
    }
}

impl From<HexCoord> for FractionalHex {
    fn from(h: HexCoord) -> Self {
        Self::new(h.q as f64, h.r as f64)
    }
}

/// Pixel-space position. Derived for rendering, never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// The six neighbor directions, in the order [`hex_neighbors`] returns them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HexDirection {
    East,
    NorthEast,
    NorthWest,
    West,
    SouthWest,
    SouthEast,
}

impl HexDirection {
    pub const ALL: [HexDirection; 6] = [
        HexDirection::East,
        HexDirection::NorthEast,
        HexDirection::NorthWest,
        HexDirection::West,
        HexDirection::SouthWest,
        HexDirection::SouthEast,
    ];

    /// Axial `(dq, dr)` step for this direction.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            HexDirection::East => (1, 0),
            HexDirection::NorthEast => (1, -1),
            HexDirection::NorthWest => (0, -1),
            HexDirection::West => (-1, 0),
            HexDirection::SouthWest => (-1, 1),
            HexDirection::SouthEast => (0, 1),
        }
    }

    /// Direction `steps` positions further round the compass.
    pub fn rotated(self, steps: usize) -> Self {
        Self::ALL[(self as usize + steps) % 6]
    }
}

/// Malformed `"q,r"` map key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HexKeyError {
    #[error("hex key {0:?} is not of the form \"q,r\"")]
    MissingComma(String),
    #[error("hex key component {0:?} is not an integer")]
    InvalidComponent(String),
}

// ── Projection ──────────────────────────────────────────────────────────

/// Center of `hex` in pixel space for a flat-top layout of the given size
/// (center-to-vertex radius).
pub fn hex_to_pixel(hex: HexCoord, size: f64) -> Point {
    let q = hex.q as f64;
    let r = hex.r as f64;
    Point {
        x: size * 1.5 * q,
        y: size * (SQRT_3 / 2.0 * q + SQRT_3 * r),
    }
}

/// Hex containing `point`. Inverse of [`hex_to_pixel`].
pub fn pixel_to_hex(point: Point, size: f64) -> HexCoord {
    let q = (2.0 / 3.0 * point.x) / size;
    let r = (-1.0 / 3.0 * point.x + SQRT_3 / 3.0 * point.y) / size;
    hex_round(FractionalHex { q, r })
}

/// Round a fractional coordinate to the nearest hex.
///
/// Each cube component is rounded independently, then whichever one moved
/// the most is recomputed from the other two so `q + r + s == 0` holds.
pub fn hex_round(hex: FractionalHex) -> HexCoord {
    let s = hex.s();
    let mut rq = hex.q.round();
    let mut rr = hex.r.round();
    let rs = s.round();

    let q_diff = (rq - hex.q).abs();
    let r_diff = (rr - hex.r).abs();
    let s_diff = (rs - s).abs();

    if q_diff > r_diff && q_diff > s_diff {
        rq = -rr - rs;
    } else if r_diff > s_diff {
        rr = -rq - rs;
    }

    HexCoord::new(rq as i32, rr as i32)
}

// ── Metrics & neighborhoods ─────────────────────────────────────────────

/// Grid distance in hex steps.
pub fn hex_distance(a: HexCoord, b: HexCoord) -> i32 {
    let dq = a.q - b.q;
    let dr = a.r - b.r;
    (dq.abs() + (dq + dr).abs() + dr.abs()) / 2
}

/// The six adjacent hexes in E, NE, NW, W, SW, SE order.
pub fn hex_neighbors(hex: HexCoord) -> [HexCoord; 6] {
    HexDirection::ALL.map(|dir| hex.offset(dir, 1))
}

/// Every hex within `range` steps of `center`, center included.
pub fn hexes_within_range(center: HexCoord, range: i32) -> Vec<HexCoord> {
    if range < 0 {
        return Vec::new();
    }
    let mut results = Vec::with_capacity((1 + 3 * range * (range + 1)) as usize);
    for dq in -range..=range {
        let r1 = (-range).max(-dq - range);
        let r2 = range.min(-dq + range);
        for dr in r1..=r2 {
            results.push(HexCoord::new(center.q + dq, center.r + dr));
        }
    }
    results
}

/// Hexes at exactly `radius` steps from `center`.
///
/// Starts at the corner `radius` steps north-east of center and walks the
/// six edges. The first edge heads west, i.e. the neighbor directions
/// rotated two places from the starting corner, so each corner is emitted
/// exactly once.
pub fn hex_ring(center: HexCoord, radius: i32) -> Vec<HexCoord> {
    if radius < 0 {
        return Vec::new();
    }
    if radius == 0 {
        return vec![center];
    }

    let mut results = Vec::with_capacity(6 * radius as usize);
    let start = HexDirection::NorthEast;
    let mut hex = center.offset(start, radius);
    for side in 0..6 {
        let dir = start.rotated(2 + side);
        for _ in 0..radius {
            results.push(hex);
            hex = hex.offset(dir, 1);
        }
    }
    results
}

/// `center` followed by rings 1 through `max_radius`, innermost first.
pub fn hex_spiral(center: HexCoord, max_radius: i32) -> Vec<HexCoord> {
    let mut results = vec![center];
    for radius in 1..=max_radius {
        results.extend(hex_ring(center, radius));
    }
    results
}

/// Hexes along the straight line from `start` to `end`, both included.
pub fn hex_line(start: HexCoord, end: HexCoord) -> Vec<HexCoord> {
    let n = hex_distance(start, end);
    if n == 0 {
        return vec![start];
    }

    // Nudge off exact edges so ties round consistently along the line.
    let a = FractionalHex::new(start.q as f64 + 1e-6, start.r as f64 + 1e-6);
    let b = FractionalHex::new(end.q as f64 + 1e-6, end.r as f64 + 1e-6);

    (0..=n)
        .map(|i| {
            let t = i as f64 / n as f64;
            hex_round(FractionalHex {
                q: a.q + (b.q - a.q) * t,
                r: a.r + (b.r - a.r) * t,
            })
        })
        .collect()
}

// ── Discovery & visibility ──────────────────────────────────────────────

/// True when `target` is adjacent to (or is) any discovered hex.
pub fn is_discoverable(target: HexCoord, discovered: &[HexCoord]) -> bool {
    discovered.iter().any(|d| hex_distance(target, *d) <= 1)
}

/// Candidates within `range` of `center`.
pub fn visible_hexes(center: HexCoord, candidates: &[HexCoord], range: i32) -> Vec<HexCoord> {
    candidates
        .iter()
        .copied()
        .filter(|h| hex_distance(center, *h) <= range)
        .collect()
}

// ── Map keys ────────────────────────────────────────────────────────────

/// Canonical `"q,r"` key.
pub fn hex_to_key(hex: HexCoord) -> String {
    hex.to_string()
}

/// Parse a `"q,r"` key. Callers must handle the error before using the
/// coordinate.
pub fn key_to_hex(key: &str) -> Result<HexCoord, HexKeyError> {
    let (q, r) = key
        .split_once(',')
        .ok_or_else(|| HexKeyError::MissingComma(key.to_string()))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<i32>()
            .map_err(|_| HexKeyError::InvalidComponent(part.to_string()))
    };
    Ok(HexCoord::new(parse(q)?, parse(r)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn h(q: i32, r: i32) -> HexCoord {
        HexCoord::new(q, r)
    }

    fn sample_coords() -> Vec<HexCoord> {
        hexes_within_range(h(2, -3), 4)
    }

    #[test]
    fn test_key_roundtrip() {
        for c in sample_coords() {
            assert_eq!(key_to_hex(&hex_to_key(c)), Ok(c));
        }
        assert_eq!(hex_to_key(h(-12, 7)), "-12,7");
        assert_eq!("3,-4".parse::<HexCoord>(), Ok(h(3, -4)));
    }

    #[test]
    fn test_malformed_keys_rejected() {
        assert!(matches!(key_to_hex("12"), Err(HexKeyError::MissingComma(_))));
        assert!(matches!(key_to_hex("a,3"), Err(HexKeyError::InvalidComponent(_))));
        assert!(matches!(key_to_hex("1,"), Err(HexKeyError::InvalidComponent(_))));
        assert!(matches!(key_to_hex("1.5,2"), Err(HexKeyError::InvalidComponent(_))));
    }

    #[test]
    fn test_cube_invariant() {
        for c in sample_coords() {
            assert_eq!(c.q + c.r + c.s(), 0);
        }
    }

    #[test]
    fn test_distance_metric() {
        let coords = sample_coords();
        for &a in &coords {
            assert_eq!(hex_distance(a, a), 0);
            for &b in &coords {
                let ab = hex_distance(a, b);
                assert_eq!(ab, hex_distance(b, a));
                assert_eq!(ab == 0, a == b);
            }
        }
        // Triangle inequality on a smaller sample.
        let small = hexes_within_range(HexCoord::ORIGIN, 2);
        for &a in &small {
            for &b in &small {
                for &c in &small {
                    assert!(hex_distance(a, c) <= hex_distance(a, b) + hex_distance(b, c));
                }
            }
        }
    }

    #[test]
    fn test_distance_known_values() {
        assert_eq!(hex_distance(h(0, 0), h(3, 0)), 3);
        assert_eq!(hex_distance(h(0, 0), h(2, -3)), 3);
        assert_eq!(hex_distance(h(-1, 2), h(2, -1)), 3);
    }

    #[test]
    fn test_neighbors() {
        let n = hex_neighbors(HexCoord::ORIGIN);
        let unique: HashSet<_> = n.iter().collect();
        assert_eq!(unique.len(), 6);
        assert!(n.iter().all(|c| hex_distance(HexCoord::ORIGIN, *c) == 1));
        assert_eq!(n[0], h(1, 0));
        assert_eq!(n[1], h(1, -1));
        assert_eq!(n[5], h(0, 1));
    }

    #[test]
    fn test_range_sizes() {
        for r in 0..7 {
            let hexes = hexes_within_range(h(5, -2), r);
            assert_eq!(hexes.len() as i32, 1 + 3 * r * (r + 1));
            let unique: HashSet<_> = hexes.iter().collect();
            assert_eq!(unique.len(), hexes.len());
        }
        assert!(hexes_within_range(HexCoord::ORIGIN, -1).is_empty());
    }

    #[test]
    fn test_ring_zero_is_center() {
        assert_eq!(hex_ring(h(3, 1), 0), vec![h(3, 1)]);
    }

    #[test]
    fn test_ring_matches_annulus() {
        for center in [HexCoord::ORIGIN, h(-4, 2)] {
            for radius in 1..7 {
                let ring = hex_ring(center, radius);
                assert_eq!(ring.len() as i32, 6 * radius);
                assert!(ring.iter().all(|c| hex_distance(center, *c) == radius));

                let ring_set: HashSet<HexCoord> = ring.iter().copied().collect();
                assert_eq!(ring_set.len(), ring.len(), "duplicate in ring {radius}");

                let outer: HashSet<HexCoord> =
                    hexes_within_range(center, radius).into_iter().collect();
                let inner: HashSet<HexCoord> =
                    hexes_within_range(center, radius - 1).into_iter().collect();
                let annulus: HashSet<HexCoord> = outer.difference(&inner).copied().collect();
                assert_eq!(ring_set, annulus);
            }
        }
    }

    #[test]
    fn test_ring_is_a_closed_walk() {
        let ring = hex_ring(HexCoord::ORIGIN, 3);
        assert_eq!(ring[0], h(3, -3));
        for pair in ring.windows(2) {
            assert_eq!(hex_distance(pair[0], pair[1]), 1);
        }
        assert_eq!(hex_distance(ring[0], *ring.last().unwrap()), 1);
    }

    #[test]
    fn test_spiral_order() {
        let center = h(1, 1);
        let spiral = hex_spiral(center, 3);
        assert_eq!(spiral.len(), 1 + 3 * 3 * 4);
        assert_eq!(spiral[0], center);
        let distances: Vec<i32> = spiral.iter().map(|c| hex_distance(center, *c)).collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(hex_spiral(center, 0), vec![center]);
    }

    #[test]
    fn test_pixel_roundtrip() {
        for size in [1.0, 24.0, 40.0, 93.7] {
            for c in sample_coords() {
                assert_eq!(pixel_to_hex(hex_to_pixel(c, size), size), c);
            }
        }
    }

    #[test]
    fn test_hex_to_pixel_values() {
        let p = hex_to_pixel(h(2, 0), 10.0);
        assert!((p.x - 30.0).abs() < 1e-9);
        assert!((p.y - 10.0 * SQRT_3).abs() < 1e-9);
        assert_eq!(hex_to_pixel(HexCoord::ORIGIN, 10.0), Point::new(0.0, 0.0));
    }

    #[test]
    fn test_round_fixes_largest_error() {
        assert_eq!(hex_round(FractionalHex::new(0.2, 0.1)), h(0, 0));
        // Naive rounding of (0.4, 0.4) would give (0, 0), which is not the nearest hex.
        assert_eq!(hex_round(FractionalHex::new(0.4, 0.4)), h(0, 1));
        // (0.6, 0.3): q rounds up, s = -0.9 rounds to -1, r is corrected.
        let c = hex_round(FractionalHex::new(0.6, 0.3));
        assert_eq!(c.q + c.r + c.s(), 0);
        assert_eq!(c, h(1, 0));
        assert_eq!(hex_round(FractionalHex::new(-2.1, 1.05)), h(-2, 1));
    }

    #[test]
    fn test_line() {
        let line = hex_line(h(0, 0), h(4, -2));
        assert_eq!(line.len(), 5);
        assert_eq!(line[0], h(0, 0));
        assert_eq!(*line.last().unwrap(), h(4, -2));
        for pair in line.windows(2) {
            assert_eq!(hex_distance(pair[0], pair[1]), 1);
        }
        assert_eq!(hex_line(h(2, 2), h(2, 2)), vec![h(2, 2)]);
    }

    #[test]
    fn test_discoverable_is_adjacency() {
        let discovered = [h(0, 0)];
        assert!(is_discoverable(h(0, 0), &discovered));
        assert!(is_discoverable(h(1, -1), &discovered));
        assert!(!is_discoverable(h(2, 0), &discovered));
        assert!(!is_discoverable(h(0, 0), &[]));
    }

    #[test]
    fn test_visible_hexes() {
        let candidates = [h(0, 0), h(1, 0), h(2, 0), h(0, 3)];
        assert_eq!(visible_hexes(h(0, 0), &candidates, 1), vec![h(0, 0), h(1, 0)]);
        assert_eq!(visible_hexes(h(0, 0), &candidates, 3).len(), 4);
    }

    #[test]
    fn test_direction_rotation() {
        assert_eq!(HexDirection::NorthEast.rotated(2), HexDirection::West);
        assert_eq!(HexDirection::SouthEast.rotated(1), HexDirection::East);
    }
}
