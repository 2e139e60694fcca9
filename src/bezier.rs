//! Bézier & cubic solver: De Casteljau subdivision, the general
//! cubic-equation root finder (Cardano + Viète), and cubic/line
//! intersection.

use crate::geometry::{LineSegment, Point, Rectangle};

const EPS: f64 = 1e-9;

/// A cubic Bézier curve defined by its four control points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier {
    pub start: Point,
    pub c1: Point,
    pub c2: Point,
    pub end: Point,
}

impl CubicBezier {
    pub fn new(start: Point, c1: Point, c2: Point, end: Point) -> Self {
        Self { start, c1, c2, end }
    }

    /// Point at parameter `t ∈ [0, 1]` via direct Bernstein-basis evaluation.
    pub fn evaluate(&self, t: f64) -> Point {
        let mt = 1.0 - t;
        let w0 = mt * mt * mt;
        let w1 = 3.0 * mt * mt * t;
        let w2 = 3.0 * mt * t * t;
        let w3 = t * t * t;
        Point::new(
            w0 * self.start.x + w1 * self.c1.x + w2 * self.c2.x + w3 * self.end.x,
            w0 * self.start.y + w1 * self.c1.y + w2 * self.c2.y + w3 * self.end.y,
        )
    }

    /// The curve's axis-aligned bounding box over its control polygon — a
    /// loose but cheap bound, since a Bézier curve always lies within the
    /// convex hull of its control points.
    pub fn bounding_rectangle(&self) -> Rectangle {
        let pts = [self.start, self.c1, self.c2, self.end];
        let min_x = pts.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
        let max_x = pts.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
        let min_y = pts.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let max_y = pts.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        Rectangle::from_aabb(min_x, min_y, max_x, max_y)
    }

    /// De Casteljau split at `tau`: two sub-curves whose control points are
    /// the standard triangular linear-interpolation scheme, reproducing the
    /// original curve exactly at the split point.
    pub fn split(&self, tau: f64) -> (CubicBezier, CubicBezier) {
        let lerp = |a: Point, b: Point| Point::new(a.x + (b.x - a.x) * tau, a.y + (b.y - a.y) * tau);

        let p01 = lerp(self.start, self.c1);
        let p12 = lerp(self.c1, self.c2);
        let p23 = lerp(self.c2, self.end);

        let p012 = lerp(p01, p12);
        let p123 = lerp(p12, p23);

        let p0123 = lerp(p012, p123);

        (
            CubicBezier::new(self.start, p01, p012, p0123),
            CubicBezier::new(p0123, p123, p23, self.end),
        )
    }

    /// Intersection points with a line segment.
    ///
    /// The line is expressed implicitly as `A·x + B·y + C = 0`; substituting
    /// the curve's parametric `x(t)`, `y(t)` gives a cubic in `t`, solved by
    /// [`solve_cubic`]. Roots are accepted in `[-ε, 1+ε]` to tolerate
    /// floating-point roots that land just outside the unit interval at an
    /// exact endpoint, then the corresponding curve point is checked against
    /// the line *segment* (not just the infinite line).
    pub fn intersect_line(&self, segment: &LineSegment) -> Vec<Point> {
        let seg_bbox = Rectangle::from_aabb(
            segment.p1.x.min(segment.p2.x),
            segment.p1.y.min(segment.p2.y),
            segment.p1.x.max(segment.p2.x),
            segment.p1.y.max(segment.p2.y),
        );
        if !self.bounding_rectangle().intersects(&seg_bbox) {
            return Vec::new();
        }

        let (a_coef, b_coef, c_coef) = implicit_line(segment.p1, segment.p2);

        // Cubic Bézier in Bernstein form, expanded into the power basis
        // x(t) = sum_i C(3,i) * (1-t)^(3-i) * t^i * P_i, and substituted
        // into A*x + B*y + C = 0.
        let px = [self.start.x, self.c1.x, self.c2.x, self.end.x];
        let py = [self.start.y, self.c1.y, self.c2.y, self.end.y];

        let cx = bernstein_to_power(px);
        let cy = bernstein_to_power(py);

        let a = a_coef * cx[3] + b_coef * cy[3];
        let b = a_coef * cx[2] + b_coef * cy[2];
        let c = a_coef * cx[1] + b_coef * cy[1];
        let d = a_coef * cx[0] + b_coef * cy[0] + c_coef;

        let mut points = Vec::new();
        for t in solve_cubic(a, b, c, d) {
            if t < -1e-6 || t > 1.0 + 1e-6 {
                continue;
            }
            let t_clamped = t.clamp(0.0, 1.0);
            let p = self.evaluate(t_clamped);
            if segment.contains(p) {
                points.push(p);
            }
        }
        points
    }
}

/// Power-basis coefficients `[c0, c1, c2, c3]` such that
/// `B(t) = c0 + c1*t + c2*t^2 + c3*t^3` for a cubic Bernstein polynomial with
/// control values `p`.
fn bernstein_to_power(p: [f64; 4]) -> [f64; 4] {
    [
        p[0],
        -3.0 * p[0] + 3.0 * p[1],
        3.0 * p[0] - 6.0 * p[1] + 3.0 * p[2],
        -p[0] + 3.0 * p[1] - 3.0 * p[2] + p[3],
    ]
}

/// `(A, B, C)` for the implicit line `A·x + B·y + C = 0` through `p1, p2`.
fn implicit_line(p1: Point, p2: Point) -> (f64, f64, f64) {
    let a = p2.y - p1.y;
    let b = p1.x - p2.x;
    let c = -(a * p1.x + b * p1.y);
    (a, b, c)
}

/// Solves `a·x³ + b·x² + c·x + d = 0` for real roots.
///
/// Falls back to the quadratic formula when `|a| < ε`. Otherwise applies
/// Cardano's method; when the discriminant is negative (casus
/// irreducibilis, three distinct real roots) switches to Viète's
/// trigonometric form instead of taking a complex cube root.
pub fn solve_cubic(a: f64, b: f64, c: f64, d: f64) -> Vec<f64> {
    if a.abs() < EPS {
        return solve_quadratic(b, c, d);
    }

    let q = (3.0 * a * c - b * b) / (9.0 * a * a);
    let r = (9.0 * a * b * c - 27.0 * a * a * d - 2.0 * b * b * b) / (54.0 * a * a * a);
    let det = q * q * q + r * r;
    let offset = -b / (3.0 * a);

    if det >= 0.0 {
        let sqrt_det = det.sqrt();
        let s = real_cbrt(r + sqrt_det);
        let t = real_cbrt(r - sqrt_det);

        let mut roots = vec![s + t + offset];
        // A second (repeated-pair) real root exists iff S - T collapses,
        // i.e. the two "other" Cardano roots coincide with each other.
        if (s - t).abs() < 1e-7 {
            roots.push(-(s + t) / 2.0 + offset);
        }
        roots
    } else {
        // Three distinct real roots. Using q_nr = -q, r_nr = -r (the
        // Numerical-Recipes Q/R convention, related to this function's Q/R
        // by a sign flip): theta = acos(r_nr / sqrt(q_nr^3)), each root is
        // -2*sqrt(q_nr)*cos((theta + 2*pi*k)/3) - b/3a.
        let q_nr = -q;
        let r_nr = -r;
        let theta = (r_nr / q_nr.powi(3).sqrt()).acos();
        let magnitude = 2.0 * q_nr.sqrt();
        (0..3)
            .map(|k| {
                -magnitude * ((theta + 2.0 * std::f64::consts::PI * k as f64) / 3.0).cos() + offset
            })
            .collect()
    }
}

fn solve_quadratic(a: f64, b: f64, c: f64) -> Vec<f64> {
    if a.abs() < EPS {
        if b.abs() < EPS {
            return Vec::new();
        }
        return vec![-c / b];
    }
    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        Vec::new()
    } else if discriminant.abs() < EPS {
        vec![-b / (2.0 * a)]
    } else {
        let sqrt_d = discriminant.sqrt();
        vec![(-b + sqrt_d) / (2.0 * a), (-b - sqrt_d) / (2.0 * a)]
    }
}

/// Real cube root that preserves the sign of `x` (`(-8).cbrt() == -2`).
fn real_cbrt(x: f64) -> f64 {
    x.cbrt()
}
