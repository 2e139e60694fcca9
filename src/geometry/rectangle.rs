use super::{Point, EPSILON};

/// A rectangle expressed by its four corners, so it can represent both
/// axis-aligned and rotated ("oriented") rectangles uniformly.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rectangle {
    bottom_left: Point,
    bottom_right: Point,
    top_right: Point,
    top_left: Point,
}

impl Rectangle {
    /// Builds a rectangle from arbitrary corners, in `(bottom_left,
    /// bottom_right, top_right, top_left)` order. The caller is responsible
    /// for the corners actually forming a rectangle; this type does not
    /// validate that — constructors on invalid input are not defensively
    /// checked.
    pub fn from_corners(
        bottom_left: Point,
        bottom_right: Point,
        top_right: Point,
        top_left: Point,
    ) -> Self {
        Self {
            bottom_left,
            bottom_right,
            top_right,
            top_left,
        }
    }

    /// Builds the axis-aligned rectangle `[min_x, min_y] – [max_x, max_y]`.
    /// Coordinates are reordered so the result is always well-formed even if
    /// the caller passes them swapped.
    pub fn from_aabb(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        let (min_x, max_x) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let (min_y, max_y) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        Self {
            bottom_left: Point::new(min_x, min_y),
            bottom_right: Point::new(max_x, min_y),
            top_right: Point::new(max_x, max_y),
            top_left: Point::new(min_x, max_y),
        }
    }

    pub fn bottom_left(&self) -> Point {
        self.bottom_left
    }

    pub fn bottom_right(&self) -> Point {
        self.bottom_right
    }

    pub fn top_right(&self) -> Point {
        self.top_right
    }

    pub fn top_left(&self) -> Point {
        self.top_left
    }

    pub fn corners(&self) -> [Point; 4] {
        [
            self.bottom_left,
            self.bottom_right,
            self.top_right,
            self.top_left,
        ]
    }

    /// `true` when all four edges are axis-parallel within [`EPSILON`].
    pub fn is_axis_aligned(&self) -> bool {
        (self.bottom_right.y - self.bottom_left.y).abs() < EPSILON
            && (self.top_left.x - self.bottom_left.x).abs() < EPSILON
            && (self.top_right.y - self.top_left.y).abs() < EPSILON
            && (self.bottom_right.x - self.top_right.x).abs() < EPSILON
    }

    pub fn width(&self) -> f64 {
        self.bottom_left.sub(self.bottom_right).norm()
    }

    pub fn height(&self) -> f64 {
        self.bottom_left.sub(self.top_left).norm()
    }

    /// Shoelace area, correct for both axis-aligned and rotated rectangles.
    pub fn area(&self) -> f64 {
        let pts = self.corners();
        let mut sum = 0.0;
        for i in 0..4 {
            let a = pts[i];
            let b = pts[(i + 1) % 4];
            sum += a.x * b.y - b.x * a.y;
        }
        (sum / 2.0).abs()
    }

    /// The smallest axis-aligned rectangle containing all four corners.
    pub fn normalise(&self) -> Rectangle {
        let pts = self.corners();
        let min_x = pts.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let max_x = pts.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let min_y = pts.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_y = pts.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        Rectangle::from_aabb(min_x, min_y, max_x, max_y)
    }

    pub fn left(&self) -> f64 {
        self.normalise().bottom_left.x
    }

    pub fn right(&self) -> f64 {
        self.normalise().bottom_right.x
    }

    pub fn bottom(&self) -> f64 {
        self.normalise().bottom_left.y
    }

    pub fn top(&self) -> f64 {
        self.normalise().top_left.y
    }

    pub fn centroid(&self) -> Point {
        let pts = self.corners();
        let sum = pts.iter().fold(Point::ORIGIN, |acc, p| acc.add(*p));
        sum.scale(0.25)
    }

    /// Point containment. Axis-aligned rectangles compare coordinates
    /// directly; rotated rectangles use the sum-of-triangle-areas test: the
    /// point is inside iff the four triangles fanned from it to each edge
    /// sum to the rectangle's area within [`EPSILON`].
    pub fn contains_point(&self, p: Point, include_border: bool) -> bool {
        if self.is_axis_aligned() {
            let r = self.normalise();
            return if include_border {
                p.x >= r.bottom_left.x
                    && p.x <= r.bottom_right.x
                    && p.y >= r.bottom_left.y
                    && p.y <= r.top_left.y
            } else {
                p.x > r.bottom_left.x
                    && p.x < r.bottom_right.x
                    && p.y > r.bottom_left.y
                    && p.y < r.top_left.y
            };
        }

        let pts = self.corners();
        let mut triangle_sum = 0.0;
        let mut min_triangle = f64::INFINITY;
        for i in 0..4 {
            let a = pts[i];
            let b = pts[(i + 1) % 4];
            let area = triangle_area_abs(p, a, b);
            triangle_sum += area;
            min_triangle = min_triangle.min(area);
        }
        let on_edge = min_triangle < EPSILON;
        if on_edge {
            return include_border;
        }
        (triangle_sum - self.area()).abs() < EPSILON
    }

    /// `true` iff every corner of `other` is inside `self`.
    pub fn contains_rect(&self, other: &Rectangle) -> bool {
        other
            .corners()
            .iter()
            .all(|&p| self.contains_point(p, true))
    }

    /// Whether this rectangle and `other` share any area or boundary.
    pub fn intersects(&self, other: &Rectangle) -> bool {
        if self.is_axis_aligned() && other.is_axis_aligned() {
            return intervals_overlap(self.left(), self.right(), other.left(), other.right())
                && intervals_overlap(self.bottom(), self.top(), other.bottom(), other.top());
        }

        // Rotated path: cheap AABB reject first, then exact corner/edge tests.
        let a = self.normalise();
        let b = other.normalise();
        if !(intervals_overlap(a.left(), a.right(), b.left(), b.right())
            && intervals_overlap(a.bottom(), a.top(), b.bottom(), b.top()))
        {
            return false;
        }

        if self
            .corners()
            .iter()
            .any(|&p| other.contains_point(p, true))
        {
            return true;
        }
        if other
            .corners()
            .iter()
            .any(|&p| self.contains_point(p, true))
        {
            return true;
        }

        let self_edges = edge_pairs(&self.corners());
        let other_edges = edge_pairs(&other.corners());
        for (s0, s1) in &self_edges {
            for (o0, o1) in &other_edges {
                if super::LineSegment::new(*s0, *s1).intersects(&super::LineSegment::new(*o0, *o1))
                {
                    return true;
                }
            }
        }
        false
    }

    /// The overlapping region, as an axis-aligned rectangle. Exact for two
    /// axis-aligned rectangles; for rotated input this is the intersection
    /// of the two normalised bounding boxes, an approximation documented
    /// here rather than a full oriented-polygon intersection (component
    /// G does not depend on the polygon clipper).
    pub fn intersect(&self, other: &Rectangle) -> Option<Rectangle> {
        if !self.intersects(other) {
            return None;
        }
        let a = self.normalise();
        let b = other.normalise();
        let x0 = a.left().max(b.left());
        let x1 = a.right().min(b.right());
        let y0 = a.bottom().max(b.bottom());
        let y1 = a.top().min(b.top());
        if x0 > x1 || y0 > y1 {
            return None;
        }
        Some(Rectangle::from_aabb(x0, y0, x1, y1))
    }
}

fn triangle_area_abs(p: Point, a: Point, b: Point) -> f64 {
    let cross = (a.x - p.x) * (b.y - p.y) - (b.x - p.x) * (a.y - p.y);
    (cross / 2.0).abs()
}

fn intervals_overlap(a0: f64, a1: f64, b0: f64, b1: f64) -> bool {
    a0 <= b1 && b0 <= a1
}

fn edge_pairs(corners: &[Point; 4]) -> [(Point, Point); 4] {
    [
        (corners[0], corners[1]),
        (corners[1], corners[2]),
        (corners[2], corners[3]),
        (corners[3], corners[0]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_aligned_area_and_normalise() {
        let r = Rectangle::from_aabb(0.0, 0.0, 4.0, 3.0);
        assert_eq!(r.area(), 12.0);
        assert_eq!(r.normalise(), r);
    }

    #[test]
    fn contains_point_strict_vs_inclusive_border() {
        let r = Rectangle::from_aabb(0.0, 0.0, 10.0, 10.0);
        let edge = Point::new(10.0, 5.0);
        assert!(r.contains_point(edge, true));
        assert!(!r.contains_point(edge, false));
        assert!(r.contains_point(Point::new(5.0, 5.0), false));
    }

    #[test]
    fn intersect_of_overlapping_squares() {
        let a = Rectangle::from_aabb(0.0, 0.0, 10.0, 10.0);
        let b = Rectangle::from_aabb(5.0, 5.0, 15.0, 15.0);
        let overlap = a.intersect(&b).expect("rectangles overlap");
        assert_eq!(overlap, Rectangle::from_aabb(5.0, 5.0, 10.0, 10.0));
    }

    #[test]
    fn disjoint_rectangles_do_not_intersect() {
        let a = Rectangle::from_aabb(0.0, 0.0, 1.0, 1.0);
        let b = Rectangle::from_aabb(2.0, 2.0, 3.0, 3.0);
        assert!(!a.intersects(&b));
        assert!(a.intersect(&b).is_none());
    }

    #[test]
    fn contains_rect_true_for_nested_rectangle() {
        let outer = Rectangle::from_aabb(0.0, 0.0, 10.0, 10.0);
        let inner = Rectangle::from_aabb(2.0, 2.0, 8.0, 8.0);
        assert!(outer.contains_rect(&inner));
        assert!(!inner.contains_rect(&outer));
    }

    #[test]
    fn rotated_rectangle_contains_its_own_centroid() {
        // A unit square rotated 45 degrees about the origin.
        let s = std::f64::consts::FRAC_1_SQRT_2;
        let r = Rectangle::from_corners(
            Point::new(0.0, -s),
            Point::new(s, 0.0),
            Point::new(0.0, s),
            Point::new(-s, 0.0),
        );
        assert!(r.contains_point(Point::ORIGIN, false));
    }
}
