//! Distance & metrics: point/line distances, colour distances, string
//! distance, and nearest-index search. A leaf module like geometry — it
//! depends only on `geometry::Point`.

use crate::geometry::Point;

pub fn euclidean(a: Point, b: Point) -> f64 {
    a.sub(b).norm()
}

/// Euclidean distance with each axis scaled independently, used when x and y
/// carry different semantic weight (e.g. clustering words into lines cares
/// far more about vertical gaps than horizontal ones).
pub fn weighted_euclidean(a: Point, b: Point, weight_x: f64, weight_y: f64) -> f64 {
    let dx = (a.x - b.x) * weight_x;
    let dy = (a.y - b.y) * weight_y;
    (dx * dx + dy * dy).sqrt()
}

pub fn manhattan(a: Point, b: Point) -> f64 {
    (a.x - b.x).abs() + (a.y - b.y).abs()
}

pub fn horizontal_projection(a: Point, b: Point) -> f64 {
    (a.x - b.x).abs()
}

pub fn vertical_projection(a: Point, b: Point) -> f64 {
    (a.y - b.y).abs()
}

/// Signed angle in radians from `a` to `b`, measured counter-clockwise from
/// the positive x-axis, in `(-π, π]`.
pub fn signed_angle_radians(a: Point, b: Point) -> f64 {
    (b.y - a.y).atan2(b.x - a.x)
}

pub fn signed_angle_degrees(a: Point, b: Point) -> f64 {
    signed_angle_radians(a, b).to_degrees()
}

/// Euclidean distance in linear RGB space.
pub fn color_euclidean(rgb_a: (f64, f64, f64), rgb_b: (f64, f64, f64)) -> f64 {
    let dr = rgb_a.0 - rgb_b.0;
    let dg = rgb_a.1 - rgb_b.1;
    let db = rgb_a.2 - rgb_b.2;
    (dr * dr + dg * dg + db * db).sqrt()
}

/// CIEDE2000 perceptual colour difference between two CIE L*a*b* triples.
/// Implements the full formula (not the simplified CIE94 shortcut), matching
/// the precision expected of a document-layout colour comparison.
pub fn ciede2000(lab_a: (f64, f64, f64), lab_b: (f64, f64, f64)) -> f64 {
    let (l1, a1, b1) = lab_a;
    let (l2, a2, b2) = lab_b;

    let c1 = (a1 * a1 + b1 * b1).sqrt();
    let c2 = (a2 * a2 + b2 * b2).sqrt();
    let c_bar = (c1 + c2) / 2.0;

    let c_bar7 = c_bar.powi(7);
    let g = 0.5 * (1.0 - (c_bar7 / (c_bar7 + 25f64.powi(7))).sqrt());

    let a1p = a1 * (1.0 + g);
    let a2p = a2 * (1.0 + g);

    let c1p = (a1p * a1p + b1 * b1).sqrt();
    let c2p = (a2p * a2p + b2 * b2).sqrt();

    let h1p = hue_prime(a1p, b1);
    let h2p = hue_prime(a2p, b2);

    let delta_l = l2 - l1;
    let delta_c = c2p - c1p;

    let delta_h_angle = if c1p * c2p == 0.0 {
        0.0
    } else {
        let mut diff = h2p - h1p;
        if diff > 180.0 {
            diff -= 360.0;
        } else if diff < -180.0 {
            diff += 360.0;
        }
        diff
    };
    let delta_h = 2.0 * (c1p * c2p).sqrt() * (delta_h_angle.to_radians() / 2.0).sin();

    let l_bar = (l1 + l2) / 2.0;
    let c_bar_p = (c1p + c2p) / 2.0;

    let h_bar_p = if c1p * c2p == 0.0 {
        h1p + h2p
    } else if (h1p - h2p).abs() <= 180.0 {
        (h1p + h2p) / 2.0
    } else if h1p + h2p < 360.0 {
        (h1p + h2p + 360.0) / 2.0
    } else {
        (h1p + h2p - 360.0) / 2.0
    };

    let t = 1.0 - 0.17 * (h_bar_p - 30.0).to_radians().cos()
        + 0.24 * (2.0 * h_bar_p).to_radians().cos()
        + 0.32 * (3.0 * h_bar_p + 6.0).to_radians().cos()
        - 0.20 * (4.0 * h_bar_p - 63.0).to_radians().cos();

    let delta_theta = 30.0 * (-((h_bar_p - 275.0) / 25.0).powi(2)).exp();
    let c_bar_p7 = c_bar_p.powi(7);
    let r_c = 2.0 * (c_bar_p7 / (c_bar_p7 + 25f64.powi(7))).sqrt();
    let s_l = 1.0 + (0.015 * (l_bar - 50.0).powi(2)) / (20.0 + (l_bar - 50.0).powi(2)).sqrt();
    let s_c = 1.0 + 0.045 * c_bar_p;
    let s_h = 1.0 + 0.015 * c_bar_p * t;
    let r_t = -r_c * (2.0 * delta_theta).to_radians().sin();

    let kl = 1.0;
    let kc = 1.0;
    let kh = 1.0;

    let term_l = delta_l / (kl * s_l);
    let term_c = delta_c / (kc * s_c);
    let term_h = delta_h / (kh * s_h);

    (term_l * term_l + term_c * term_c + term_h * term_h + r_t * term_c * term_h).sqrt()
}

fn hue_prime(a_p: f64, b: f64) -> f64 {
    if a_p == 0.0 && b == 0.0 {
        return 0.0;
    }
    let h = b.atan2(a_p).to_degrees();
    if h < 0.0 {
        h + 360.0
    } else {
        h
    }
}

/// Converts sRGB (each channel in `[0, 1]`) to CIE L*a*b*, the colour space
/// [`ciede2000`] expects.
pub fn rgb_to_lab(r: f64, g: f64, b: f64) -> (f64, f64, f64) {
    fn linearize(c: f64) -> f64 {
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }
    let (r, g, b) = (linearize(r), linearize(g), linearize(b));

    let x = r * 0.4124 + g * 0.3576 + b * 0.1805;
    let y = r * 0.2126 + g * 0.7152 + b * 0.0722;
    let z = r * 0.0193 + g * 0.1192 + b * 0.9505;

    // D65 reference white.
    let (xn, yn, zn) = (0.95047, 1.0, 1.08883);
    fn f(t: f64) -> f64 {
        const DELTA: f64 = 6.0 / 29.0;
        if t > DELTA.powi(3) {
            t.cbrt()
        } else {
            t / (3.0 * DELTA * DELTA) + 4.0 / 29.0
        }
    }
    let (fx, fy, fz) = (f(x / xn), f(y / yn), f(z / zn));

    let l = 116.0 * fy - 16.0;
    let a = 500.0 * (fx - fy);
    let bb = 200.0 * (fy - fz);
    (l, a, bb)
}

/// Levenshtein edit distance, `O(|s1|·|s2|)` time and `O(min(|s1|,|s2|))`
/// space via a rolling row of `u16` costs (documents are short strings —
/// `u16` comfortably bounds any realistic edit distance).
pub fn levenshtein(s1: &str, s2: &str) -> u32 {
    let (a, b): (Vec<char>, Vec<char>) = if s1.chars().count() <= s2.chars().count() {
        (s1.chars().collect(), s2.chars().collect())
    } else {
        (s2.chars().collect(), s1.chars().collect())
    };

    let mut previous: Vec<u16> = (0..=a.len() as u16).collect();
    let mut current = vec![0u16; a.len() + 1];

    for (j, &cb) in b.iter().enumerate() {
        current[0] = (j + 1) as u16;
        for (i, &ca) in a.iter().enumerate() {
            let cost = if ca == cb { 0 } else { 1 };
            current[i + 1] = (previous[i] + cost)
                .min(previous[i + 1] + 1)
                .min(current[i] + 1);
        }
        std::mem::swap(&mut previous, &mut current);
    }

    previous[a.len()] as u32
}

/// [`levenshtein`] divided by the length of the longer string, in `[0, 1]`.
/// Two empty strings are defined as distance `0.0` (identical, vacuously).
pub fn normalized_levenshtein(s1: &str, s2: &str) -> f64 {
    let max_len = s1.chars().count().max(s2.chars().count());
    if max_len == 0 {
        return 0.0;
    }
    levenshtein(s1, s2) as f64 / max_len as f64
}

/// Index of the candidate nearest to `query` among `candidates`, excluding
/// `query_index` itself (so a point can search its own cluster without
/// matching itself). Ties keep the first (lowest-index) candidate
/// encountered, for determinism. Returns `None` for an empty or
/// single-element candidate list.
pub fn find_index_nearest(
    candidates: &[Point],
    query_index: usize,
    distance_fn: impl Fn(Point, Point) -> f64,
) -> Option<usize> {
    let query = *candidates.get(query_index)?;
    let mut best: Option<(usize, f64)> = None;
    for (i, &candidate) in candidates.iter().enumerate() {
        if i == query_index {
            continue;
        }
        let d = distance_fn(query, candidate);
        if best.is_none_or(|(_, best_d)| d < best_d) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euclidean_matches_pythagoras() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(euclidean(a, b), 5.0);
    }

    #[test]
    fn manhattan_sums_axis_differences() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(manhattan(a, b), 7.0);
    }

    #[test]
    fn identical_colors_have_zero_ciede2000() {
        let lab = rgb_to_lab(0.4, 0.5, 0.6);
        assert!(ciede2000(lab, lab) < 1e-9);
    }

    #[test]
    fn levenshtein_known_distances() {
        assert_eq!(levenshtein("kitten", "sitting"), 3);
        assert_eq!(levenshtein("", "abc"), 3);
        assert_eq!(levenshtein("same", "same"), 0);
    }

    #[test]
    fn normalized_levenshtein_is_bounded() {
        let d = normalized_levenshtein("kitten", "sitting");
        assert!(d > 0.0 && d <= 1.0);
        assert_eq!(normalized_levenshtein("", ""), 0.0);
    }

    #[test]
    fn find_index_nearest_excludes_self() {
        let points = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(10.0, 0.0),
        ];
        let nearest = find_index_nearest(&points, 0, euclidean).unwrap();
        assert_eq!(nearest, 1);
    }

    #[test]
    fn find_index_nearest_empty_candidates_is_none() {
        assert_eq!(find_index_nearest(&[], 0, euclidean), None);
    }
}
