//! Ruling extraction and merge.

use ahash::AHashMap;

use super::settings::TableSettings;
use crate::clustering::{connected_components, EdgeArray};
use crate::external::{Page, Path, PathCommand};
use crate::geometry::{LineSegment, Point, EPSILON};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulingOrientation {
    Horizontal,
    Vertical,
}

/// A vertical or horizontal line segment extracted from a drawn path,
/// candidate table border (glossary).
#[derive(Debug, Clone, Copy)]
pub struct Ruling {
    pub segment: LineSegment,
    pub orientation: RulingOrientation,
}

impl Ruling {
    /// The coordinate shared by every point on this ruling: `x` for a
    /// vertical ruling, `y` for a horizontal one.
    pub fn fixed_coord(&self) -> f64 {
        match self.orientation {
            RulingOrientation::Vertical => self.segment.p1.x,
            RulingOrientation::Horizontal => self.segment.p1.y,
        }
    }

    /// The span along the ruling's own direction: `(min_y, max_y)` for
    /// vertical, `(min_x, max_x)` for horizontal.
    pub fn span(&self) -> (f64, f64) {
        match self.orientation {
            RulingOrientation::Vertical => (
                self.segment.p1.y.min(self.segment.p2.y),
                self.segment.p1.y.max(self.segment.p2.y),
            ),
            RulingOrientation::Horizontal => (
                self.segment.p1.x.min(self.segment.p2.x),
                self.segment.p1.x.max(self.segment.p2.x),
            ),
        }
    }

    fn from_segment(segment: LineSegment, extend: f64) -> Option<Ruling> {
        if segment.is_vertical() && !segment.is_horizontal() {
            let (y0, y1) = (segment.p1.y.min(segment.p2.y), segment.p1.y.max(segment.p2.y));
            let x = segment.p1.x;
            Some(Ruling {
                segment: LineSegment::new(Point::new(x, y0 - extend), Point::new(x, y1 + extend)),
                orientation: RulingOrientation::Vertical,
            })
        } else if segment.is_horizontal() {
            let (x0, x1) = (segment.p1.x.min(segment.p2.x), segment.p1.x.max(segment.p2.x));
            let y = segment.p1.y;
            Some(Ruling {
                segment: LineSegment::new(Point::new(x0 - extend, y), Point::new(x1 + extend, y)),
                orientation: RulingOrientation::Horizontal,
            })
        } else {
            None
        }
    }
}

const EXTEND: f64 = 2.0;

/// Mode glyph width and height across a page's non-whitespace letters, the
/// scale unit the thin-bar heuristic is measured against (glossary: Mode
/// width/height). Falls back to `(1.0, 1.0)` on a page with no letters.
fn mode_glyph_dimensions(page: &Page) -> (f64, f64) {
    let mut width_counts: AHashMap<u64, (f64, usize)> = AHashMap::new();
    let mut height_counts: AHashMap<u64, (f64, usize)> = AHashMap::new();

    for letter in page.non_whitespace_letters() {
        let w = letter.glyph_rectangle.width();
        let h = letter.glyph_rectangle.height();
        bump(&mut width_counts, w);
        bump(&mut height_counts, h);
    }

    let mode_w = mode_of(&width_counts).unwrap_or(1.0);
    let mode_h = mode_of(&height_counts).unwrap_or(1.0);
    (mode_w, mode_h)
}

fn bump(counts: &mut AHashMap<u64, (f64, usize)>, value: f64) {
    let key = (value * 100.0).round() as u64;
    let entry = counts.entry(key).or_insert((value, 0));
    entry.1 += 1;
}

fn mode_of(counts: &AHashMap<u64, (f64, usize)>) -> Option<f64> {
    counts
        .values()
        .max_by_key(|(_, count)| *count)
        .map(|(value, _)| *value)
}

/// Extracts rulings from every non-clipping path on the page.
pub fn extract_rulings(page: &Page, settings: &TableSettings) -> Vec<Ruling> {
    let (mode_w, mode_h) = mode_glyph_dimensions(page);
    let mut rulings = Vec::new();

    for path in &page.paths {
        if path.is_clipping {
            continue;
        }
        if path.has_curve() {
            continue;
        }

        if path.is_drawn_as_rectangle() {
            if let Some(bbox) = path.bounding_rectangle() {
                let thin_w = bbox.width() < settings.thin_bar_ratio * mode_w;
                let thin_h = bbox.height() < settings.thin_bar_ratio * mode_h;
                if thin_w || thin_h {
                    rulings.extend(centerline_rulings(&bbox, thin_w, thin_h));
                    continue;
                }
            }
        }

        for command in &path.commands {
            if let PathCommand::Line { from, to } = command {
                if let Some(ruling) = Ruling::from_segment(LineSegment::new(*from, *to), EXTEND) {
                    if ruling.segment.length() >= settings.min_ruling_length {
                        rulings.push(ruling);
                    }
                }
            }
        }
    }

    let mut rulings = dedupe_rulings(rulings);

    let have_horizontal = rulings
        .iter()
        .any(|r| r.orientation == RulingOrientation::Horizontal);
    let have_vertical = rulings
        .iter()
        .any(|r| r.orientation == RulingOrientation::Vertical);

    if settings.horizontal_strategy == super::settings::TableStrategy::Text && !have_horizontal {
        rulings.extend(words_to_edges_h(page, settings));
    }
    if settings.vertical_strategy == super::settings::TableStrategy::Text && !have_vertical {
        rulings.extend(words_to_edges_v(page, settings));
    }

    rulings
}

/// Reduces a thin filled rectangle to its centerline ruling(s): a bar thin
/// in width becomes a vertical ruling at its horizontal center; thin in
/// height becomes horizontal at its vertical center. A bar thin in both
/// becomes both (the rare case of a near-point marker).
fn centerline_rulings(bbox: &crate::geometry::Rectangle, thin_w: bool, thin_h: bool) -> Vec<Ruling> {
    let mut out = Vec::new();
    if thin_w {
        let cx = (bbox.left() + bbox.right()) / 2.0;
        out.push(Ruling {
            segment: LineSegment::new(
                Point::new(cx, bbox.bottom() - EXTEND),
                Point::new(cx, bbox.top() + EXTEND),
            ),
            orientation: RulingOrientation::Vertical,
        });
    }
    if thin_h {
        let cy = (bbox.bottom() + bbox.top()) / 2.0;
        out.push(Ruling {
            segment: LineSegment::new(
                Point::new(bbox.left() - EXTEND, cy),
                Point::new(bbox.right() + EXTEND, cy),
            ),
            orientation: RulingOrientation::Horizontal,
        });
    }
    out
}

fn dedupe_rulings(rulings: Vec<Ruling>) -> Vec<Ruling> {
    let mut out: Vec<Ruling> = Vec::with_capacity(rulings.len());
    for r in rulings {
        let is_dup = out.iter().any(|existing: &Ruling| {
            existing.orientation == r.orientation
                && (existing.fixed_coord() - r.fixed_coord()).abs() < EPSILON
                && {
                    let (a0, a1) = existing.span();
                    let (b0, b1) = r.span();
                    (a0 - b0).abs() < EPSILON && (a1 - b1).abs() < EPSILON
                }
        });
        if !is_dup {
            out.push(r);
        }
    }
    out
}

/// Merges collinear, overlapping-or-touching rulings into their union span.
/// Implemented by building a mergeable-neighbour edge array and feeding it
/// to the clustering module's DFS component grouper: each connected group
/// of rulings collapses to one segment via min/max of the shared-axis
/// coordinate.
pub fn merge_rulings(rulings: Vec<Ruling>, tolerance: f64) -> Vec<Ruling> {
    let edges: EdgeArray = rulings
        .iter()
        .enumerate()
        .map(|(i, r)| {
            rulings
                .iter()
                .enumerate()
                .find(|(j, other)| *j != i && mergeable(r, other, tolerance))
                .map(|(j, _)| j)
        })
        .collect();

    let components = connected_components(&edges);

    components
        .into_iter()
        .map(|group| merge_group(&rulings, &group))
        .collect()
}

fn mergeable(a: &Ruling, b: &Ruling, tolerance: f64) -> bool {
    if a.orientation != b.orientation {
        return false;
    }
    if (a.fixed_coord() - b.fixed_coord()).abs() > tolerance {
        return false;
    }
    let (a0, a1) = a.span();
    let (b0, b1) = b.span();
    a0 <= b1 + tolerance && b0 <= a1 + tolerance
}

fn merge_group(rulings: &[Ruling], group: &[usize]) -> Ruling {
    let orientation = rulings[group[0]].orientation;
    let fixed_coord = rulings[group[0]].fixed_coord();
    let mut min_span = f64::INFINITY;
    let mut max_span = f64::NEG_INFINITY;
    for &idx in group {
        let (a, b) = rulings[idx].span();
        min_span = min_span.min(a);
        max_span = max_span.max(b);
    }

    // A merged segment's span is a superset of every input span by
    // construction; this would only fail on a logic error upstream.
    debug_assert!(min_span <= max_span);

    let segment = match orientation {
        RulingOrientation::Vertical => {
            LineSegment::new(Point::new(fixed_coord, min_span), Point::new(fixed_coord, max_span))
        }
        RulingOrientation::Horizontal => {
            LineSegment::new(Point::new(min_span, fixed_coord), Point::new(max_span, fixed_coord))
        }
    };

    Ruling { segment, orientation }
}

/// Groups sorted values into clusters whose consecutive gaps are within
/// `tolerance`, returning one representative (the cluster mean) per group.
/// The borderless-table counterpart of a drawn ruling: a cluster of
/// aligned word edges stands in for a line nobody actually drew.
fn cluster_coordinates(mut values: Vec<f64>, tolerance: f64) -> Vec<f64> {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let mut clusters: Vec<Vec<f64>> = Vec::new();
    for v in values {
        match clusters.last_mut() {
            Some(group) if v - group[group.len() - 1] <= tolerance => group.push(v),
            _ => clusters.push(vec![v]),
        }
    }
    clusters
        .into_iter()
        .map(|g| g.iter().sum::<f64>() / g.len() as f64)
        .collect()
}

/// Infers horizontal rulings from clusters of word-top y-coordinates
/// (`words_to_edges_h`): a row boundary sits at each cluster of aligned
/// glyph tops, spanning the full width of the letters that produced it.
fn words_to_edges_h(page: &Page, settings: &TableSettings) -> Vec<Ruling> {
    let tops: Vec<f64> = page
        .non_whitespace_letters()
        .map(|l| l.glyph_rectangle.top())
        .collect();
    if tops.len() < settings.min_words_for_text_strategy {
        return Vec::new();
    }

    let (min_x, max_x) = letters_x_span(page);
    cluster_coordinates(tops, settings.snap_tolerance)
        .into_iter()
        .map(|y| Ruling {
            segment: LineSegment::new(Point::new(min_x, y), Point::new(max_x, y)),
            orientation: RulingOrientation::Horizontal,
        })
        .collect()
}

/// Infers vertical rulings from clusters of word left/right x-coordinates
/// (`words_to_edges_v`): a column boundary sits at each cluster of aligned
/// glyph edges, spanning the full height of the letters on the page.
fn words_to_edges_v(page: &Page, settings: &TableSettings) -> Vec<Ruling> {
    let mut xs: Vec<f64> = Vec::new();
    for letter in page.non_whitespace_letters() {
        xs.push(letter.glyph_rectangle.left());
        xs.push(letter.glyph_rectangle.right());
    }
    if xs.len() < settings.min_words_for_text_strategy {
        return Vec::new();
    }

    let (min_y, max_y) = letters_y_span(page);
    cluster_coordinates(xs, settings.snap_tolerance)
        .into_iter()
        .map(|x| Ruling {
            segment: LineSegment::new(Point::new(x, min_y), Point::new(x, max_y)),
            orientation: RulingOrientation::Vertical,
        })
        .collect()
}

fn letters_x_span(page: &Page) -> (f64, f64) {
    let min = page
        .non_whitespace_letters()
        .map(|l| l.glyph_rectangle.left())
        .fold(f64::INFINITY, f64::min);
    let max = page
        .non_whitespace_letters()
        .map(|l| l.glyph_rectangle.right())
        .fold(f64::NEG_INFINITY, f64::max);
    (min, max)
}

fn letters_y_span(page: &Page) -> (f64, f64) {
    let min = page
        .non_whitespace_letters()
        .map(|l| l.glyph_rectangle.bottom())
        .fold(f64::INFINITY, f64::min);
    let max = page
        .non_whitespace_letters()
        .map(|l| l.glyph_rectangle.top())
        .fold(f64::NEG_INFINITY, f64::max);
    (min, max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::Letter;
    use crate::geometry::Rectangle;

    #[test]
    fn horizontal_and_vertical_lines_become_rulings() {
        let mut path = Path::new(Vec::new());
        path.line_to(Point::new(0.0, 5.0), Point::new(10.0, 5.0));
        path.line_to(Point::new(3.0, 0.0), Point::new(3.0, 8.0));
        let page = Page::new(
            Rectangle::from_aabb(0.0, 0.0, 20.0, 20.0),
            vec![Letter::new("x", Rectangle::from_aabb(0.0, 0.0, 5.0, 8.0))],
            vec![path],
        );
        let rulings = extract_rulings(&page, &TableSettings::default());
        assert_eq!(rulings.len(), 2);
        assert!(rulings
            .iter()
            .any(|r| r.orientation == RulingOrientation::Horizontal));
        assert!(rulings
            .iter()
            .any(|r| r.orientation == RulingOrientation::Vertical));
    }

    #[test]
    fn text_strategy_infers_rulings_from_word_alignment_when_no_lines_drawn() {
        let letters = vec![
            Letter::new("a", Rectangle::from_aabb(0.0, 0.0, 2.0, 10.0)),
            Letter::new("b", Rectangle::from_aabb(20.0, 0.0, 22.0, 10.0)),
            Letter::new("c", Rectangle::from_aabb(0.0, 30.0, 2.0, 40.0)),
            Letter::new("d", Rectangle::from_aabb(20.0, 30.0, 22.0, 40.0)),
        ];
        let page = Page::new(
            Rectangle::from_aabb(0.0, 0.0, 50.0, 50.0),
            letters,
            Vec::new(),
        );
        let settings = TableSettings {
            vertical_strategy: super::super::settings::TableStrategy::Text,
            horizontal_strategy: super::super::settings::TableStrategy::Text,
            min_words_for_text_strategy: 2,
            ..TableSettings::default()
        };
        let rulings = extract_rulings(&page, &settings);
        assert!(rulings
            .iter()
            .any(|r| r.orientation == RulingOrientation::Horizontal));
        assert!(rulings
            .iter()
            .any(|r| r.orientation == RulingOrientation::Vertical));
    }

    #[test]
    fn merge_joins_overlapping_collinear_rulings() {
        let rulings = vec![
            Ruling {
                segment: LineSegment::new(Point::new(0.0, 0.0), Point::new(5.0, 0.0)),
                orientation: RulingOrientation::Horizontal,
            },
            Ruling {
                segment: LineSegment::new(Point::new(4.0, 0.0), Point::new(10.0, 0.0)),
                orientation: RulingOrientation::Horizontal,
            },
        ];
        let merged = merge_rulings(rulings, 1.0);
        assert_eq!(merged.len(), 1);
        let (min, max) = merged[0].span();
        assert_eq!((min, max), (0.0, 10.0));
    }

    #[test]
    fn diagonal_line_command_is_not_a_ruling() {
        let mut path = Path::new(Vec::new());
        path.line_to(Point::new(0.0, 0.0), Point::new(5.0, 5.0));
        let page = Page::new(Rectangle::from_aabb(0.0, 0.0, 20.0, 20.0), Vec::new(), vec![path]);
        let rulings = extract_rulings(&page, &TableSettings::default());
        assert!(rulings.is_empty());
    }
}
