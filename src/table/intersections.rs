//! Intersection map construction.

use indexmap::IndexMap;

use super::ruling::{Ruling, RulingOrientation};
use crate::geometry::Point;

/// Quantized point key, so two intersection computations that land within
/// floating-point noise of each other hash to the same map entry.
pub type PointKey = (i64, i64);

/// Insertion-ordered map keyed on quantized points, hashed with `ahash` —
/// this map is rebuilt per page and looked up heavily during cell
/// discovery, so a fast non-cryptographic hasher matters more than
/// `std::collections::HashMap`'s DOS resistance; `IndexMap` additionally
/// keeps iteration order stable across runs for the same input, which
/// `find_cells`' explicit sort doesn't need but doesn't hurt either.
pub type IntersectionMap = IndexMap<PointKey, Intersection, ahash::RandomState>;

pub fn key_of(p: Point) -> PointKey {
    const SCALE: f64 = 1000.0;
    ((p.x * SCALE).round() as i64, (p.y * SCALE).round() as i64)
}

/// One crossing: the point itself plus the indices (into the merged ruling
/// list passed to [`build_intersection_map`]) of the horizontal and
/// vertical ruling that cross there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub point: Point,
    pub horizontal: usize,
    pub vertical: usize,
}

/// Maps every crossing point to the `(horizontal ruling, vertical ruling)`
/// pair that produced it. Keys are unique: a later crossing at the same
/// quantized point overwrites an earlier one.
pub fn build_intersection_map(rulings: &[Ruling]) -> IntersectionMap {
    let horizontals: Vec<usize> = (0..rulings.len())
        .filter(|&i| rulings[i].orientation == RulingOrientation::Horizontal)
        .collect();
    let verticals: Vec<usize> = (0..rulings.len())
        .filter(|&i| rulings[i].orientation == RulingOrientation::Vertical)
        .collect();

    let mut map = IntersectionMap::default();
    for &h in &horizontals {
        for &v in &verticals {
            if let Some(point) = rulings[h].segment.intersect(&rulings[v].segment) {
                map.insert(
                    key_of(point),
                    Intersection {
                        point,
                        horizontal: h,
                        vertical: v,
                    },
                );
            }
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::LineSegment;

    #[test]
    fn crossing_lines_produce_one_intersection() {
        let rulings = vec![
            Ruling {
                segment: LineSegment::new(Point::new(0.0, 5.0), Point::new(10.0, 5.0)),
                orientation: RulingOrientation::Horizontal,
            },
            Ruling {
                segment: LineSegment::new(Point::new(5.0, 0.0), Point::new(5.0, 10.0)),
                orientation: RulingOrientation::Vertical,
            },
        ];
        let map = build_intersection_map(&rulings);
        assert_eq!(map.len(), 1);
        let intersection = map.values().next().unwrap();
        assert_eq!(intersection.point, Point::new(5.0, 5.0));
    }

    #[test]
    fn parallel_rulings_never_intersect() {
        let rulings = vec![
            Ruling {
                segment: LineSegment::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0)),
                orientation: RulingOrientation::Horizontal,
            },
            Ruling {
                segment: LineSegment::new(Point::new(0.0, 5.0), Point::new(10.0, 5.0)),
                orientation: RulingOrientation::Horizontal,
            },
        ];
        assert!(build_intersection_map(&rulings).is_empty());
    }
}
