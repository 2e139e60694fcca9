//! Property-based tests for the core geometric invariants: hull
//! convexity/permutation-invariance, MBR ≤ AABB area, cubic-solver residual
//! bound, and k-d tree agreement with brute force.

use kreuzberg_layout::bezier::solve_cubic;
use kreuzberg_layout::clipping::{point_in_polygon, FillRule};
use kreuzberg_layout::geometry::Point;
use kreuzberg_layout::hull::{graham_scan, minimum_area_rectangle};
use kreuzberg_layout::kdtree::KdTree;
use proptest::prelude::*;

fn arb_point() -> impl Strategy<Value = Point> {
    (-100.0f64..100.0, -100.0f64..100.0).prop_map(|(x, y)| Point::new(x, y))
}

fn aabb_area(points: &[Point]) -> f64 {
    let min_x = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let max_x = points.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
    (max_x - min_x) * (max_y - min_y)
}

proptest! {
    #[test]
    fn cubic_solver_residual_is_small(
        a in -10.0f64..10.0,
        b in -10.0f64..10.0,
        c in -10.0f64..10.0,
        d in -10.0f64..10.0,
    ) {
        prop_assume!(a.abs() > 1e-3);
        let scale = a.abs() + b.abs() + c.abs() + d.abs();
        for root in solve_cubic(a, b, c, d) {
            let residual = a * root.powi(3) + b * root.powi(2) + c * root + d;
            prop_assert!(residual.abs() < 1e-4 * scale.max(1.0));
        }
    }

    #[test]
    fn hull_is_convex_and_permutation_invariant(
        points in prop::collection::vec(arb_point(), 3..25),
    ) {
        let hull_a = graham_scan(&points).unwrap();
        let mut reversed = points.clone();
        reversed.reverse();
        let hull_b = graham_scan(&reversed).unwrap();

        prop_assert_eq!(hull_a.len(), hull_b.len());
        for p in &hull_a {
            prop_assert!(hull_b.iter().any(|q| (p.x - q.x).abs() < 1e-6 && (p.y - q.y).abs() < 1e-6));
        }

        if hull_a.len() >= 3 {
            let n = hull_a.len();
            for i in 0..n {
                let a = hull_a[i];
                let b = hull_a[(i + 1) % n];
                let c = hull_a[(i + 2) % n];
                let cross = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
                prop_assert!(cross >= -1e-9, "hull must turn consistently (convex)");
            }

            for p in &points {
                prop_assert!(point_in_polygon(*p, &hull_a, FillRule::NonZeroWinding)
                    || hull_a.iter().any(|h| (h.x - p.x).abs() < 1e-6 && (h.y - p.y).abs() < 1e-6));
            }
        }
    }

    #[test]
    fn mbr_area_never_exceeds_aabb_area(
        points in prop::collection::vec(arb_point(), 3..25),
    ) {
        let mbr = minimum_area_rectangle(&points).unwrap();
        let aabb = aabb_area(&points);
        prop_assert!(mbr.area() <= aabb + 1e-6);
    }

    #[test]
    fn kdtree_nearest_matches_brute_force(
        points in prop::collection::vec(arb_point(), 1..50),
        query in arb_point(),
    ) {
        let indexed: Vec<(Point, usize)> = points.iter().copied().zip(0..points.len()).collect();
        let tree = KdTree::build(indexed);

        let brute = points
            .iter()
            .enumerate()
            .map(|(i, p)| (i, p.sub(query).norm()))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
            .unwrap();

        let (found, _index, dist) = tree.nearest(query).unwrap();
        prop_assert!((dist - brute.1).abs() < 1e-6);
        // Ties are possible; just check the distance matches the true minimum.
        let found_point = points[*found];
        prop_assert!((found_point.sub(query).norm() - brute.1).abs() < 1e-6);
    }
}
