//! Graham scan convex hull, minimum-area bounding rectangle via rotating
//! calipers, and oriented bounding box via least-squares regression.

use crate::error::{LayoutError, Result};
use crate::geometry::{ccw, Point, Rectangle};

/// Convex hull via Graham scan.
///
/// Degenerate inputs: empty input is an error; a single point or two
/// points are returned as-is,
/// since "convex hull" of fewer than three points is just the points
/// themselves.
///
/// The polar-angle grouping below is taken modulo π, which collapses a
/// direction with its opposite. That is only sound because the pivot is
/// chosen as the minimum-y (then minimum-x) point: no other input point can
/// lie "behind" the pivot, so the ambiguity modulo π never matters.
pub fn graham_scan(points: &[Point]) -> Result<Vec<Point>> {
    if points.is_empty() {
        return Err(LayoutError::invalid_argument(
            "graham_scan",
            "point set must not be empty",
        ));
    }

    let mut unique: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        if !unique
            .iter()
            .any(|&u| (u.x - p.x).abs() < 1e-9 && (u.y - p.y).abs() < 1e-9)
        {
            unique.push(p);
        }
    }

    if unique.len() <= 2 {
        return Ok(unique);
    }

    unique.sort_by(|a, b| a.y.partial_cmp(&b.y).unwrap().then(a.x.partial_cmp(&b.x).unwrap()));
    let pivot = unique[0];

    // Group the rest by polar angle mod π around the pivot; within a group
    // keep only the point farthest from the pivot.
    let mut rest: Vec<Point> = unique[1..].to_vec();
    rest.sort_by(|a, b| {
        let angle_a = polar_angle_mod_pi(pivot, *a);
        let angle_b = polar_angle_mod_pi(pivot, *b);
        angle_a
            .partial_cmp(&angle_b)
            .unwrap()
            .then_with(|| {
                let da = pivot.sub(*a).norm_squared();
                let db = pivot.sub(*b).norm_squared();
                da.partial_cmp(&db).unwrap()
            })
    });

    let mut grouped: Vec<Point> = Vec::with_capacity(rest.len());
    let mut i = 0;
    while i < rest.len() {
        let mut j = i;
        while j + 1 < rest.len()
            && (polar_angle_mod_pi(pivot, rest[j + 1]) - polar_angle_mod_pi(pivot, rest[i])).abs()
                < 1e-9
        {
            j += 1;
        }
        grouped.push(rest[j]); // farthest in the group, since rest is sorted by distance ascending within equal angle
        i = j + 1;
    }

    if grouped.len() < 2 {
        let mut out = vec![pivot];
        out.extend(grouped);
        return Ok(out);
    }

    let mut stack: Vec<Point> = vec![pivot, grouped[0], grouped[1]];
    for &p in &grouped[2..] {
        while stack.len() >= 2 {
            let top = stack[stack.len() - 1];
            let second = stack[stack.len() - 2];
            if ccw(second, top, p) {
                break;
            }
            stack.pop();
        }
        stack.push(p);
    }

    Ok(stack)
}

fn polar_angle_mod_pi(pivot: Point, p: Point) -> f64 {
    let mut angle = (p.y - pivot.y).atan2(p.x - pivot.x);
    if angle < 0.0 {
        angle += std::f64::consts::PI;
    }
    angle % std::f64::consts::PI
}

/// Minimum-area bounding rectangle over the convex hull of `points`, via
/// Den Boer's rotating-calipers variant: for each hull edge, project
/// every hull vertex onto it to find the extent along the edge and the
/// farthest perpendicular distance, then keep the minimum-area candidate.
pub fn minimum_area_rectangle(points: &[Point]) -> Result<Rectangle> {
    let hull = graham_scan(points)?;
    if hull.len() < 3 {
        // A single point or two (possibly collinear) points have no area;
        // the minimum-area rectangle degenerates to a zero-height strip
        // along the segment itself, not an axis-aligned box — an AABB here
        // would report the wrong width whenever the segment isn't axis
        // aligned.
        let p0 = hull[0];
        let p1 = *hull.last().unwrap();
        return Ok(Rectangle::from_corners(p0, p1, p1, p0));
    }

    let n = hull.len();
    let mut best_area = f64::INFINITY;
    let mut best_rect = Rectangle::from_aabb(0.0, 0.0, 0.0, 0.0);

    for k in 0..n {
        let p_k = hull[k];
        let p_k1 = hull[(k + 1) % n];
        let edge = p_k1.sub(p_k);
        let edge_len_sq = edge.norm_squared();
        if edge_len_sq < 1e-12 {
            continue;
        }

        let mut t_min = f64::INFINITY;
        let mut t_max = f64::NEG_INFINITY;
        let mut s_max = 0.0_f64;

        for &p_j in &hull {
            let v = p_j.sub(p_k);
            let t = v.dot(edge) / edge_len_sq;
            t_min = t_min.min(t);
            t_max = t_max.max(t);
            // Perpendicular distance from p_j to the line through p_k along `edge`.
            let projected = p_k.add(edge.scale(t));
            let perp = p_j.sub(projected).norm();
            s_max = s_max.max(perp);
        }

        let edge_unit_len = edge_len_sq.sqrt();
        let width = (t_max - t_min) * edge_unit_len;
        let height = s_max;
        let area = width * height;

        if area < best_area {
            best_area = area;
            let dir = edge.scale(1.0 / edge_unit_len);
            let normal = Point::new(-dir.y, dir.x);
            let origin = p_k.add(dir.scale(t_min * edge_unit_len));
            let bl = origin;
            let br = origin.add(dir.scale(width));
            let tl = origin.add(normal.scale(height));
            let tr = br.add(normal.scale(height));
            best_rect = Rectangle::from_corners(bl, br, tr, tl);
        }
    }

    Ok(best_rect)
}

/// Oriented bounding box via least-squares regression: fit a line
/// through the points, rotate into that line's frame, take the AABB, rotate
/// back. Requires at least 2 points.
pub fn oriented_bounding_box(points: &[Point]) -> Result<Rectangle> {
    if points.len() < 2 {
        return Err(LayoutError::invalid_argument(
            "oriented_bounding_box",
            "at least 2 points are required",
        ));
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|p| p.x).sum::<f64>() / n;
    let mean_y = points.iter().map(|p| p.y).sum::<f64>() / n;

    let mut s_xy = 0.0;
    let mut s_xx = 0.0;
    for p in points {
        s_xy += (p.x - mean_x) * (p.y - mean_y);
        s_xx += (p.x - mean_x) * (p.x - mean_x);
    }

    // A near-vertical point cloud has no meaningful least-squares slope;
    // treat it as already axis-aligned (angle 0) rather than dividing by a
    // near-zero denominator.
    let slope = if s_xx.abs() < 1e-9 { 0.0 } else { s_xy / s_xx };
    let angle = slope.atan();

    let rotation = crate::geometry::Matrix::rotate(-angle);
    let rotated: Vec<Point> = points.iter().map(|&p| rotation.apply(p)).collect();
    let (min, max) = aabb_extent(&rotated);

    let back = crate::geometry::Matrix::rotate(angle);
    let corners = [
        Point::new(min.x, min.y),
        Point::new(max.x, min.y),
        Point::new(max.x, max.y),
        Point::new(min.x, max.y),
    ]
    .map(|p| back.apply(p));

    Ok(Rectangle::from_corners(
        corners[0], corners[1], corners[2], corners[3],
    ))
}

fn aabb_extent(points: &[Point]) -> (Point, Point) {
    let min_x = points.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let max_x = points
        .iter()
        .map(|p| p.x)
        .fold(f64::NEG_INFINITY, f64::max);
    let min_y = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = points
        .iter()
        .map(|p| p.y)
        .fold(f64::NEG_INFINITY, f64::max);
    (Point::new(min_x, min_y), Point::new(max_x, max_y))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hull_of_square_with_interior_point() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 3.0),
            Point::new(0.0, 3.0),
            Point::new(2.0, 1.0),
        ];
        let hull = graham_scan(&points).unwrap();
        assert_eq!(hull.len(), 4);
        assert!(!hull.contains(&Point::new(2.0, 1.0)));

        let mbr = minimum_area_rectangle(&points).unwrap();
        assert!((mbr.area() - 12.0).abs() < 1e-6);
    }

    #[test]
    fn hull_is_invariant_under_permutation() {
        let mut points = vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(4.0, 3.0),
            Point::new(0.0, 3.0),
            Point::new(2.0, 1.0),
        ];
        let hull_a = graham_scan(&points).unwrap();
        points.reverse();
        let hull_b = graham_scan(&points).unwrap();
        assert_eq!(hull_a.len(), hull_b.len());
        for p in &hull_a {
            assert!(hull_b.contains(p));
        }
    }

    #[test]
    fn degenerate_inputs() {
        assert!(graham_scan(&[]).is_err());
        let one = graham_scan(&[Point::new(1.0, 1.0)]).unwrap();
        assert_eq!(one, vec![Point::new(1.0, 1.0)]);
        let two = graham_scan(&[Point::new(0.0, 0.0), Point::new(1.0, 1.0)]).unwrap();
        assert_eq!(two.len(), 2);
    }

    #[test]
    fn obb_of_collinear_points_is_degenerate() {
        let points = vec![
            Point::new(1.0, 1.0),
            Point::new(2.0, 2.0),
            Point::new(3.0, 3.0),
            Point::new(4.0, 4.0),
        ];
        let obb = oriented_bounding_box(&points).unwrap();
        assert!(obb.area() < 1e-6);

        let mbr = minimum_area_rectangle(&points).unwrap();
        let expected_width = 3.0 * std::f64::consts::SQRT_2;
        assert!((mbr.width().max(mbr.height()) - expected_width).abs() < 1e-6);
    }

    #[test]
    fn obb_requires_at_least_two_points() {
        assert!(oriented_bounding_box(&[Point::new(0.0, 0.0)]).is_err());
    }
}
