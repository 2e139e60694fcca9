//! Polygon clipping: Sutherland–Hodgman for convex clippers, and
//! Greiner–Hormann for general polygons with even-odd / non-zero-winding
//! fill rules.

use crate::error::{LayoutError, Result};
use crate::geometry::{ccw, LineSegment, Point};

/// Fill rule used to decide which regions of a self-intersecting polygon
/// count as "inside" (glossary: winding number).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FillRule {
    EvenOdd,
    NonZeroWinding,
}

/// Clips `subject` against `clipper` using Sutherland–Hodgman. The clipper
/// must be convex and wound counter-clockwise; behavior is unspecified
/// otherwise.
pub fn sutherland_hodgman(subject: &[Point], clipper: &[Point]) -> Vec<Point> {
    if subject.is_empty() || clipper.len() < 3 {
        return Vec::new();
    }

    let mut output = subject.to_vec();
    for i in 0..clipper.len() {
        if output.is_empty() {
            break;
        }
        let edge_start = clipper[i];
        let edge_end = clipper[(i + 1) % clipper.len()];

        let input = output;
        output = Vec::with_capacity(input.len());

        for j in 0..input.len() {
            let current = input[j];
            let previous = input[(j + input.len() - 1) % input.len()];

            let current_inside = ccw(edge_start, edge_end, current) || on_line(edge_start, edge_end, current);
            let previous_inside =
                ccw(edge_start, edge_end, previous) || on_line(edge_start, edge_end, previous);

            if current_inside {
                if !previous_inside {
                    if let Some(p) = line_intersection(previous, current, edge_start, edge_end) {
                        output.push(p);
                    }
                }
                output.push(current);
            } else if previous_inside {
                if let Some(p) = line_intersection(previous, current, edge_start, edge_end) {
                    output.push(p);
                }
            }
        }
    }
    output
}

fn on_line(a: Point, b: Point, p: Point) -> bool {
    ((b.x - a.x) * (p.y - a.y) - (b.y - a.y) * (p.x - a.x)).abs() < 1e-9
}

fn line_intersection(p1: Point, p2: Point, p3: Point, p4: Point) -> Option<Point> {
    let d1 = p2.sub(p1);
    let d2 = p4.sub(p3);
    let denom = d1.x * d2.y - d1.y * d2.x;
    if denom.abs() < 1e-12 {
        return None;
    }
    let t = ((p3.x - p1.x) * d2.y - (p3.y - p1.y) * d2.x) / denom;
    Some(p1.add(d1.scale(t)))
}

// ---------------------------------------------------------------------
// Greiner–Hormann
// ---------------------------------------------------------------------

/// A back-reference into the *other* polygon's vertex list, breaking the
/// cyclic doubly-linked-list structure of the original algorithm into
/// plain indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VertexList {
    Subject,
    Clip,
}

#[derive(Debug, Clone)]
struct Vertex {
    coords: Point,
    intersect: bool,
    entry: bool,
    alpha: f32,
    neighbour: Option<(VertexList, u32)>,
    processed: bool,
    is_fake: bool,
}

impl Vertex {
    fn original(p: Point) -> Self {
        Self {
            coords: p,
            intersect: false,
            entry: false,
            alpha: 0.0,
            neighbour: None,
            processed: false,
            is_fake: false,
        }
    }
}

/// Clips `subject` against `clipper`, both given as closed polygons (first
/// point not repeated at the end). `open` marks whether each input is an
/// open path that needs a synthetic closing ("fake") edge; closed polygons
/// pass `false` for both.
pub fn greiner_hormann(
    subject: &[Point],
    subject_open: bool,
    clipper: &[Point],
    clipper_open: bool,
    fill_rule: FillRule,
) -> Vec<Vec<Point>> {
    if subject.len() < 2 || clipper.len() < 2 {
        return Vec::new();
    }

    let mut subj: Vec<Vertex> = subject.iter().map(|&p| Vertex::original(p)).collect();
    let mut clip: Vec<Vertex> = clipper.iter().map(|&p| Vertex::original(p)).collect();

    // Phase 1: intersection insertion.
    insert_intersections(&mut subj, subject_open, &mut clip, clipper_open);

    let any_intersections = subj.iter().any(|v| v.intersect);

    if !any_intersections {
        // No crossings: either one polygon is wholly inside the other, or
        // they are disjoint.
        if point_in_polygon(subject[0], clipper, fill_rule) {
            return vec![subject.to_vec()];
        }
        if point_in_polygon(clipper[0], subject, fill_rule) {
            return vec![clipper.to_vec()];
        }
        return Vec::new();
    }

    // Phase 2: entry/exit labeling.
    label_entry_exit(&mut subj, fill_rule, subject[0], clipper);
    label_entry_exit(&mut clip, fill_rule, clipper[0], subject);

    // Phase 3: output assembly.
    assemble_output(&mut subj, &mut clip)
}

fn insert_intersections(
    subj: &mut Vec<Vertex>,
    subject_open: bool,
    clip: &mut Vec<Vertex>,
    clipper_open: bool,
) {
    let subj_edges = edge_count(subj.len(), subject_open);
    let clip_edges = edge_count(clip.len(), clipper_open);

    // Collect insertions per edge, then splice them in descending index
    // order so earlier insertions don't shift later edge indices.
    let mut subj_insertions: Vec<Vec<(f32, Vertex)>> = vec![Vec::new(); subj.len()];
    let mut clip_insertions: Vec<Vec<(f32, Vertex)>> = vec![Vec::new(); clip.len()];

    for si in 0..subj_edges {
        let s0 = subj[si].coords;
        let s1 = subj[(si + 1) % subj.len()].coords;
        let s_is_fake = subject_open && si == subj.len() - 1;
        let seg_s = LineSegment::new(s0, s1);

        for ci in 0..clip_edges {
            let c0 = clip[ci].coords;
            let c1 = clip[(ci + 1) % clip.len()].coords;
            let c_is_fake = clipper_open && ci == clip.len() - 1;
            let seg_c = LineSegment::new(c0, c1);

            if !seg_s.intersects(&seg_c) {
                continue;
            }
            let Some(point) = seg_s.intersect(&seg_c) else {
                continue;
            };

            let alpha_s = alpha_along(s0, s1, point);
            let alpha_c = alpha_along(c0, c1, point);
            let fake = s_is_fake || c_is_fake;

            let subj_idx = subj_insertions[si].len() as u32;
            let clip_idx = clip_insertions[ci].len() as u32;

            let mut sv = Vertex::original(point);
            sv.intersect = true;
            sv.alpha = alpha_s;
            sv.is_fake = fake;
            sv.neighbour = Some((VertexList::Clip, ci as u32 * 1_000_000 + clip_idx));

            let mut cv = Vertex::original(point);
            cv.intersect = true;
            cv.alpha = alpha_c;
            cv.is_fake = fake;
            cv.neighbour = Some((VertexList::Subject, si as u32 * 1_000_000 + subj_idx));

            subj_insertions[si].push((alpha_s, sv));
            clip_insertions[ci].push((alpha_c, cv));
        }
    }

    splice_insertions(subj, subj_insertions);
    splice_insertions(clip, clip_insertions);

    // Second pass: the neighbour fields above encode (edge, local-order)
    // pairs; resolve them to final absolute indices now that both lists
    // have their intersections spliced in.
    resolve_neighbours(subj, clip);
}

fn edge_count(len: usize, open: bool) -> usize {
    if open {
        len - 1
    } else {
        len
    }
}

fn alpha_along(a: Point, b: Point, p: Point) -> f32 {
    let total = b.sub(a).norm_squared();
    if total < 1e-12 {
        return 0.0;
    }
    (p.sub(a).norm_squared() / total) as f32
}

fn splice_insertions(list: &mut Vec<Vertex>, mut insertions: Vec<Vec<(f32, Vertex)>>) {
    let original_len = list.len();
    let mut result = Vec::with_capacity(original_len * 2);
    for i in 0..original_len {
        result.push(list[i].clone());
        if let Some(group) = insertions.get_mut(i) {
            group.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap());
            for (_, v) in group.drain(..) {
                result.push(v);
            }
        }
    }
    *list = result;
}

/// Rewrites the coarse `(edge, local-order)` neighbour encoding used during
/// insertion into final absolute indices into the spliced lists.
fn resolve_neighbours(subj: &mut [Vertex], clip: &mut [Vertex]) {
    let subj_positions = intersection_positions(subj);
    let clip_positions = intersection_positions(clip);

    for v in subj.iter_mut() {
        if let Some((VertexList::Clip, encoded)) = v.neighbour {
            let edge = (encoded / 1_000_000) as usize;
            let local = (encoded % 1_000_000) as usize;
            v.neighbour = Some((VertexList::Clip, clip_positions[edge][local] as u32));
        }
    }
    for v in clip.iter_mut() {
        if let Some((VertexList::Subject, encoded)) = v.neighbour {
            let edge = (encoded / 1_000_000) as usize;
            let local = (encoded % 1_000_000) as usize;
            v.neighbour = Some((VertexList::Subject, subj_positions[edge][local] as u32));
        }
    }
}

/// For each original edge index, the absolute indices (in the spliced list)
/// of the intersections inserted along it, in insertion order.
fn intersection_positions(list: &[Vertex]) -> Vec<Vec<usize>> {
    let mut positions = Vec::new();
    let mut current_edge: Vec<usize> = Vec::new();
    for (idx, v) in list.iter().enumerate() {
        if v.intersect {
            current_edge.push(idx);
        } else if !current_edge.is_empty() || idx > 0 {
            positions.push(std::mem::take(&mut current_edge));
        }
    }
    positions.push(current_edge);
    positions
}

fn label_entry_exit(
    list: &mut [Vertex],
    fill_rule: FillRule,
    start_point: Point,
    other_polygon: &[Point],
) {
    let mut status = point_in_polygon(start_point, other_polygon, fill_rule);
    for v in list.iter_mut() {
        if v.intersect {
            // `status` tracks the inside/outside state *before* this
            // crossing; the crossing's label is the state it transitions
            // into, i.e. an entry is `true` when we were outside.
            status = !status;
            v.entry = status;
        }
    }
}

/// Walks the cross-linked vertex lists starting from each unprocessed
/// non-fake intersection, alternating lists at every intersection per the
/// entry/exit status, until the ring closes.
fn assemble_output(subj: &mut [Vertex], clip: &mut [Vertex]) -> Vec<Vec<Point>> {
    let mut results = Vec::new();
    let guard = 4 * (subj.len() + clip.len()) + 16;

    loop {
        let Some(start_idx) = subj
            .iter()
            .position(|v| v.intersect && !v.processed && !v.is_fake)
        else {
            break;
        };

        let mut output = Vec::new();
        let mut in_subject = true;
        let mut idx = start_idx;

        loop {
            let forward = {
                let list: &mut [Vertex] = if in_subject { subj } else { clip };
                list[idx].processed = true;
                if !list[idx].is_fake {
                    output.push(list[idx].coords);
                }
                list[idx].entry
            };

            loop {
                let list: &mut [Vertex] = if in_subject { subj } else { clip };
                idx = step(list.len(), idx, forward);
                list[idx].processed = true;
                if !list[idx].is_fake {
                    output.push(list[idx].coords);
                }
                if list[idx].intersect || output.len() > guard {
                    break;
                }
            }

            let neighbour = {
                let list: &[Vertex] = if in_subject { subj } else { clip };
                list[idx].neighbour
            };
            match neighbour {
                Some((which, target)) => {
                    in_subject = matches!(which, VertexList::Subject);
                    idx = target as usize;
                }
                None => break,
            }

            if in_subject && idx == start_idx {
                break;
            }
            if output.len() > guard {
                // A malformed neighbour graph would otherwise loop forever;
                // this should never trigger on well-formed input.
                break;
            }
        }

        if output.len() >= 3 {
            results.push(output);
        }
    }

    results
}

fn step(len: usize, idx: usize, forward: bool) -> usize {
    if forward {
        (idx + 1) % len
    } else {
        (idx + len - 1) % len
    }
}

/// Winding-number-based point-in-polygon test (glossary: Winding number).
/// `polygon` is a closed ring (first point not repeated).
pub fn point_in_polygon(p: Point, polygon: &[Point], fill_rule: FillRule) -> bool {
    let winding = winding_number(p, polygon);
    match fill_rule {
        FillRule::NonZeroWinding => winding != 0,
        FillRule::EvenOdd => winding % 2 != 0,
    }
}

/// Signed count of polygon edges crossing the upward ray from `p`.
pub fn winding_number(p: Point, polygon: &[Point]) -> i32 {
    let n = polygon.len();
    if n < 2 {
        return 0;
    }
    let mut winding = 0;
    for i in 0..n {
        let a = polygon[i];
        let b = polygon[(i + 1) % n];
        if a.y <= p.y {
            if b.y > p.y && ccw(a, b, p) {
                winding += 1;
            }
        } else if b.y <= p.y && !ccw(a, b, p) {
            winding -= 1;
        }
    }
    winding
}

/// Top-level clip entry point over plain polygon vertex lists plus the
/// open/filled flags that decide how degenerate inputs are handled:
/// clipping an open, non-rectangular, *filled* path has no well-defined
/// interior and is `Unsupported`; an open, unfilled path is simplified to
/// its polyline and clipped segment-wise.
pub fn clip(
    clipper_vertices: &[Point],
    clipper_open: bool,
    subject_vertices: &[Point],
    subject_open: bool,
    subject_filled: bool,
    fill_rule: FillRule,
) -> Result<Vec<Vec<Point>>> {
    if subject_open && subject_filled {
        return Err(LayoutError::unsupported(
            "clip",
            "cannot clip a filled open path: it has no well-defined interior",
        ));
    }

    if subject_open {
        return Ok(clip_open_polyline(
            subject_vertices,
            clipper_vertices,
            fill_rule,
        ));
    }

    Ok(greiner_hormann(
        subject_vertices,
        false,
        clipper_vertices,
        clipper_open,
        fill_rule,
    ))
}

/// Clips `subject` against `clipper`, both given as the host's own
/// [`Path`](crate::external::Path) type, and rebuilds each output ring as a
/// new closed `Path` carrying the subject's fill flags. This is the public
/// entry point a caller with real page content reaches for; [`clip`] and
/// [`greiner_hormann`] work over plain vertex lists for callers (and tests)
/// that already have polygons in hand.
///
/// Curved segments are rejected as `Unsupported`: the clipper here only
/// understands straight polygon edges, and flattening a Bézier into a
/// polyline before clipping would silently change the shape being clipped.
pub fn clip_paths(
    clipper: &crate::external::Path,
    subject: &crate::external::Path,
) -> Result<Vec<crate::external::Path>> {
    if clipper.has_curve() || subject.has_curve() {
        return Err(LayoutError::unsupported(
            "clip_paths",
            "clipping a path containing a Bézier segment is not supported; flatten it first",
        ));
    }

    let clipper_vertices = path_vertices(clipper);
    let subject_vertices = path_vertices(subject);
    if clipper_vertices.len() < 2 || subject_vertices.len() < 2 {
        return Err(LayoutError::invalid_argument(
            "clip_paths",
            "both clipper and subject must contain at least one line segment",
        ));
    }

    let fill_rule = match subject.filling_rule {
        crate::external::FillingRule::EvenOdd => FillRule::EvenOdd,
        crate::external::FillingRule::NonZeroWinding => FillRule::NonZeroWinding,
    };

    let rings = clip(
        &clipper_vertices,
        !clipper.is_closed(),
        &subject_vertices,
        !subject.is_closed(),
        subject.is_filled,
        fill_rule,
    )?;

    Ok(rings.into_iter().map(|ring| ring_to_path(&ring, subject)).collect())
}

/// The ordered vertices a `Path`'s `Line` commands visit, taking the first
/// segment's start plus every segment's end in order. `Move`/`Close` carry
/// no additional geometry once the line chain is established.
///
/// A closed path's own commands often include an explicit closing `Line`
/// back to the start (the `rectangle()` builder does this); when that
/// closing edge lands back on the first vertex, it's trimmed here so the
/// result is a ring with the first point *not* repeated at the end, the
/// convention [`greiner_hormann`] and [`clip`] expect.
fn path_vertices(path: &crate::external::Path) -> Vec<Point> {
    let mut vertices = Vec::new();
    for command in &path.commands {
        match command {
            crate::external::PathCommand::Move(p) => {
                if vertices.is_empty() {
                    vertices.push(*p);
                }
            }
            crate::external::PathCommand::Line { from, to } => {
                if vertices.is_empty() {
                    vertices.push(*from);
                }
                vertices.push(*to);
            }
            crate::external::PathCommand::BezierCurve { .. } | crate::external::PathCommand::Close => {}
        }
    }
    if path.is_closed() && vertices.len() > 1 {
        let (first, last) = (vertices[0], vertices[vertices.len() - 1]);
        if first.sub(last).norm() < crate::geometry::EPSILON {
            vertices.pop();
        }
    }
    vertices
}

/// Rebuilds one clipped ring as a closed `Path`, carrying over `template`'s
/// fill flags (the subject's, by [`clip_paths`]'s convention).
fn ring_to_path(ring: &[Point], template: &crate::external::Path) -> crate::external::Path {
    let mut path = template.clone_empty();
    if let Some(&first) = ring.first() {
        let mut cursor = first;
        for &next in &ring[1..] {
            path.line_to(cursor, next);
            cursor = next;
        }
        if ring.len() > 1 {
            path.line_to(cursor, first);
        }
        path.commands.push(crate::external::PathCommand::Close);
    }
    path
}

/// Clips an open polyline segment-wise against a (possibly non-convex)
/// clip polygon: each segment is tested point-wise, keeping the portions
/// whose midpoints fall inside the clipper per the chosen fill rule.
fn clip_open_polyline(polyline: &[Point], clipper: &[Point], fill_rule: FillRule) -> Vec<Vec<Point>> {
    let mut segments: Vec<Vec<Point>> = Vec::new();
    let mut current: Vec<Point> = Vec::new();

    for window in polyline.windows(2) {
        let (a, b) = (window[0], window[1]);
        let midpoint = Point::new((a.x + b.x) / 2.0, (a.y + b.y) / 2.0);
        if point_in_polygon(midpoint, clipper, fill_rule) {
            if current.is_empty() {
                current.push(a);
            }
            current.push(b);
        } else if !current.is_empty() {
            segments.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}
