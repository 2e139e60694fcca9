//! External collaborator types.
//!
//! The real PDF object model — tokenizer, font subsystem, encryption,
//! image filters — lives outside this crate. These types stand in for the
//! pieces of that model the layout core actually reads: a page's crop box,
//! its positioned glyphs, and its drawn paths. A host application adapts
//! its own `Page`/`Letter`/`PdfPath` into these at the boundary; nothing
//! here parses bytes.

use crate::geometry::{Point, Rectangle};

/// A decoded page: crop box, positioned glyphs, and drawn paths.
#[derive(Debug, Clone)]
pub struct Page {
    pub crop_box: Rectangle,
    pub letters: Vec<Letter>,
    pub paths: Vec<Path>,
}

impl Page {
    pub fn new(crop_box: Rectangle, letters: Vec<Letter>, paths: Vec<Path>) -> Self {
        Self {
            crop_box,
            letters,
            paths,
        }
    }

    /// Non-whitespace letters, used by the table extractor to compute mode
    /// glyph width/height.
    pub fn non_whitespace_letters(&self) -> impl Iterator<Item = &Letter> {
        self.letters.iter().filter(|l| !l.value.trim().is_empty())
    }
}

/// A single positioned glyph.
#[derive(Debug, Clone)]
pub struct Letter {
    pub value: String,
    pub glyph_rectangle: Rectangle,
}

impl Letter {
    pub fn new(value: impl Into<String>, glyph_rectangle: Rectangle) -> Self {
        Self {
            value: value.into(),
            glyph_rectangle,
        }
    }
}

/// One segment of a drawn path.
#[derive(Debug, Clone, PartialEq)]
pub enum PathCommand {
    Move(Point),
    Line { from: Point, to: Point },
    BezierCurve {
        start: Point,
        c1: Point,
        c2: Point,
        end: Point,
    },
    Close,
}

/// Which points are inside a self-intersecting fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillingRule {
    EvenOdd,
    NonZeroWinding,
}

/// A drawn path: an ordered sequence of commands plus the flags needed to
/// tell a filled shape from a stroked outline or a clipping region.
#[derive(Debug, Clone)]
pub struct Path {
    pub commands: Vec<PathCommand>,
    pub is_clipping: bool,
    pub is_filled: bool,
    pub filling_rule: FillingRule,
}

impl Path {
    pub fn new(commands: Vec<PathCommand>) -> Self {
        Self {
            commands,
            is_clipping: false,
            is_filled: false,
            filling_rule: FillingRule::NonZeroWinding,
        }
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.commands.last(), Some(PathCommand::Close))
    }

    /// Whether this path contains any Bézier segment.
    pub fn has_curve(&self) -> bool {
        self.commands
            .iter()
            .any(|c| matches!(c, PathCommand::BezierCurve { .. }))
    }

    /// Structural check, memoised nowhere (the path is immutable and cheap
    /// to re-derive): four `Line` commands whose endpoints form a closed
    /// axis-aligned rectangle, in either winding order.
    pub fn is_drawn_as_rectangle(&self) -> bool {
        let lines: Vec<(Point, Point)> = self
            .commands
            .iter()
            .filter_map(|c| match c {
                PathCommand::Line { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect();
        if lines.len() != 4 {
            return false;
        }
        for (from, to) in &lines {
            let dx = (to.x - from.x).abs();
            let dy = (to.y - from.y).abs();
            const EPS: f64 = 1e-9;
            if dx > EPS && dy > EPS {
                return false;
            }
        }
        // Chained endpoints must close up.
        for i in 0..lines.len() {
            let (_, end) = lines[i];
            let (next_start, _) = lines[(i + 1) % lines.len()];
            if (end.x - next_start.x).abs() > 1e-6 || (end.y - next_start.y).abs() > 1e-6 {
                return false;
            }
        }
        true
    }

    /// The axis-aligned bounding rectangle of all points visited by this
    /// path's commands, or `None` for an empty path.
    pub fn bounding_rectangle(&self) -> Option<Rectangle> {
        let mut points = Vec::new();
        for c in &self.commands {
            match c {
                PathCommand::Move(p) => points.push(*p),
                PathCommand::Line { from, to } => {
                    points.push(*from);
                    points.push(*to);
                }
                PathCommand::BezierCurve { start, c1, c2, end } => {
                    points.push(*start);
                    points.push(*c1);
                    points.push(*c2);
                    points.push(*end);
                }
                PathCommand::Close => {}
            }
        }
        if points.is_empty() {
            return None;
        }
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
        Some(Rectangle::from_aabb(min_x, min_y, max_x, max_y))
    }

    /// An empty path carrying this path's flags, for builder use.
    pub fn clone_empty(&self) -> Self {
        Self {
            commands: Vec::new(),
            is_clipping: self.is_clipping,
            is_filled: self.is_filled,
            filling_rule: self.filling_rule,
        }
    }

    pub fn move_to(&mut self, p: Point) -> &mut Self {
        self.commands.push(PathCommand::Move(p));
        self
    }

    pub fn line_to(&mut self, from: Point, to: Point) -> &mut Self {
        self.commands.push(PathCommand::Line { from, to });
        self
    }

    pub fn rectangle(&mut self, rect: Rectangle) -> &mut Self {
        let (bl, br, tr, tl) = (
            rect.bottom_left(),
            rect.bottom_right(),
            rect.top_right(),
            rect.top_left(),
        );
        self.move_to(bl);
        self.line_to(bl, br);
        self.line_to(br, tr);
        self.line_to(tr, tl);
        self.line_to(tl, bl);
        self.commands.push(PathCommand::Close);
        self
    }
}

/// A colour, convertible to the two colour spaces the distance metrics in
/// `distance.rs` operate on.
pub trait Color {
    fn to_rgb_values(&self) -> (f64, f64, f64);
    fn to_lab_values(&self) -> (f64, f64, f64);
}

/// A plain sRGB colour usable in tests without a real colour-management
/// stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RgbColor {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color for RgbColor {
    fn to_rgb_values(&self) -> (f64, f64, f64) {
        (self.r, self.g, self.b)
    }

    fn to_lab_values(&self) -> (f64, f64, f64) {
        crate::distance::rgb_to_lab(self.r, self.g, self.b)
    }
}
