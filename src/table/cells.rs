//! Rectangular cell discovery, Nurminen's algorithm.

use super::intersections::{key_of, Intersection, IntersectionMap};
use super::ruling::Ruling;
use crate::geometry::{Point, Rectangle, EPSILON};

/// Finds every closed rectangular cell among the ruling intersections.
/// Intersections are sorted top-to-bottom, then left-to-right, into a
/// stack; each popped crossing looks only at crossings still in the stack
/// (later in this order), so every cell is discovered exactly once, at its
/// top-left corner.
pub fn find_cells(map: &IntersectionMap, _rulings: &[Ruling]) -> Vec<Rectangle> {
    let mut order: Vec<Intersection> = map.values().copied().collect();
    order.sort_by(|a, b| {
        b.point
            .y
            .partial_cmp(&a.point.y)
            .unwrap()
            .then(a.point.x.partial_cmp(&b.point.x).unwrap())
    });

    let mut cells = Vec::new();

    for (idx, c) in order.iter().enumerate() {
        let remaining = &order[idx + 1..];

        let x_points = nearest_below(c, remaining);
        let y_points = nearest_right(c, remaining);

        'pair: for &xp in &x_points {
            for &yp in &y_points {
                let opposite_point = Point::new(yp.point.x, xp.point.y);
                if let Some(opposite) = map.get(&key_of(opposite_point)) {
                    if opposite.horizontal == xp.horizontal && opposite.vertical == yp.vertical {
                        cells.push(Rectangle::from_aabb(
                            c.point.x,
                            opposite.point.y,
                            opposite.point.x,
                            c.point.y,
                        ));
                        break 'pair;
                    }
                }
            }
        }
    }

    cells
}

/// The crossing(s) directly below `c` on `c`'s own vertical ruling: among
/// still-in-stack crossings sharing that ruling, the one(s) with the
/// largest `y` strictly less than `c.point.y`.
fn nearest_below(c: &Intersection, remaining: &[Intersection]) -> Vec<Intersection> {
    let candidates: Vec<Intersection> = remaining
        .iter()
        .filter(|i| i.vertical == c.vertical && i.point.y < c.point.y - EPSILON)
        .copied()
        .collect();
    nearest_by(candidates, |i| i.point.y, true)
}

/// The crossing(s) directly to the right of `c` on `c`'s own horizontal
/// ruling: the one(s) with the smallest `x` strictly greater than
/// `c.point.x`.
fn nearest_right(c: &Intersection, remaining: &[Intersection]) -> Vec<Intersection> {
    let candidates: Vec<Intersection> = remaining
        .iter()
        .filter(|i| i.horizontal == c.horizontal && i.point.x > c.point.x + EPSILON)
        .copied()
        .collect();
    nearest_by(candidates, |i| i.point.x, false)
}

/// Keeps only the candidates tied for the extreme (`max` if
/// `prefer_max`, else `min`) value of `key`.
fn nearest_by(candidates: Vec<Intersection>, key: impl Fn(&Intersection) -> f64, prefer_max: bool) -> Vec<Intersection> {
    if candidates.is_empty() {
        return candidates;
    }
    let extreme = if prefer_max {
        candidates.iter().map(&key).fold(f64::NEG_INFINITY, f64::max)
    } else {
        candidates.iter().map(&key).fold(f64::INFINITY, f64::min)
    };
    candidates
        .into_iter()
        .filter(|c| (key(c) - extreme).abs() < EPSILON)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::intersections::build_intersection_map;
    use super::super::ruling::RulingOrientation;
    use crate::geometry::LineSegment;

    #[test]
    fn two_by_two_grid_yields_four_cells() {
        let mut rulings = Vec::new();
        for i in 0..3 {
            let y = i as f64 * 10.0;
            rulings.push(Ruling {
                segment: LineSegment::new(Point::new(0.0, y), Point::new(20.0, y)),
                orientation: RulingOrientation::Horizontal,
            });
        }
        for i in 0..3 {
            let x = i as f64 * 10.0;
            rulings.push(Ruling {
                segment: LineSegment::new(Point::new(x, 0.0), Point::new(x, 20.0)),
                orientation: RulingOrientation::Vertical,
            });
        }

        let map = build_intersection_map(&rulings);
        let cells = find_cells(&map, &rulings);
        assert_eq!(cells.len(), 4);
        let total_area: f64 = cells.iter().map(|c| c.area()).sum();
        assert!((total_area - 400.0).abs() < 1e-6);
    }

    #[test]
    fn missing_edge_produces_no_cell() {
        // An "L" of rulings with no closing edge: no cell can form.
        let rulings = vec![
            Ruling {
                segment: LineSegment::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0)),
                orientation: RulingOrientation::Horizontal,
            },
            Ruling {
                segment: LineSegment::new(Point::new(0.0, 0.0), Point::new(0.0, 10.0)),
                orientation: RulingOrientation::Vertical,
            },
        ];
        let map = build_intersection_map(&rulings);
        let cells = find_cells(&map, &rulings);
        assert!(cells.is_empty());
    }
}
