//! Nearest-neighbour clustering: parallel NN-edge construction, DFS
//! connected components, and axis-aligned rectangle coalescing.

use crate::geometry::{Point, Rectangle};
use crate::kdtree::KdTree;
use crate::parallel::{parallel_map, Parallelism};

/// `edges[i] = Some(j)` means element `i`'s chosen nearest neighbour is
/// element `j`; `None` means no acceptable neighbour was found. May be
/// asymmetric.
pub type EdgeArray = Vec<Option<usize>>;

/// Builds the 1-nearest-neighbour edge array over `points` using a k-d
/// tree, in parallel across elements.
///
/// `filter_pivot(i)` decides whether element `i` participates at all;
/// `accept(i, j, distance)` decides whether the nearest candidate `j` is an
/// acceptable match for `i` (encompasses both a "filter_final" step and a
/// max-distance check, folded into one predicate since both only ever
/// examine `(i, j, distance)`).
pub fn nearest_neighbour_edges(
    points: &[Point],
    parallelism: Parallelism,
    filter_pivot: impl Fn(usize) -> bool + Sync,
    accept: impl Fn(usize, usize, f64) -> bool + Sync,
) -> EdgeArray {
    let indexed: Vec<(Point, usize)> = points.iter().copied().zip(0..points.len()).collect();
    let tree = KdTree::build(indexed);

    parallel_map(points, parallelism, |i, &p| {
        if !filter_pivot(i) {
            return None;
        }
        // Ask for more than one neighbour since the tree will hand back `i`
        // itself (distance 0) as the closest point to its own coordinates.
        let candidates = tree.k_nearest(p, 8);
        for (&j, _index, distance) in candidates {
            if j != i && accept(i, j, distance) {
                return Some(j);
            }
        }
        None
    })
}

/// k-NN-with-filter variant: like [`nearest_neighbour_edges`] but considers
/// up to `k` candidates per element (rather than implicitly the handful
/// needed to skip self-matches), accepting the first that satisfies
/// `accept`.
pub fn k_nearest_neighbour_edges(
    points: &[Point],
    k: usize,
    parallelism: Parallelism,
    filter_pivot: impl Fn(usize) -> bool + Sync,
    accept: impl Fn(usize, usize, f64) -> bool + Sync,
) -> EdgeArray {
    let indexed: Vec<(Point, usize)> = points.iter().copied().zip(0..points.len()).collect();
    let tree = KdTree::build(indexed);

    parallel_map(points, parallelism, |i, &p| {
        if !filter_pivot(i) {
            return None;
        }
        let candidates = tree.k_nearest(p, k + 1);
        for (&j, _index, distance) in candidates {
            if j != i && accept(i, j, distance) {
                return Some(j);
            }
        }
        None
    })
}

/// Line-based variant: candidates are `LineSegment`s rather than points, so
/// nearest-neighbour search is a linear scan (no spatial index) rather than
/// a k-d tree query.
pub fn nearest_neighbour_edges_linear<Item: Copy>(
    items: &[Item],
    parallelism: Parallelism,
    distance: impl Fn(Item, Item) -> f64 + Sync,
    filter_pivot: impl Fn(usize) -> bool + Sync,
    accept: impl Fn(usize, usize, f64) -> bool + Sync,
) -> EdgeArray {
    parallel_map(items, parallelism, |i, &item| {
        if !filter_pivot(i) {
            return None;
        }
        let mut best: Option<(usize, f64)> = None;
        for (j, &other) in items.iter().enumerate() {
            if j == i {
                continue;
            }
            let d = distance(item, other);
            if accept(i, j, d) && best.is_none_or(|(_, bd)| d < bd) {
                best = Some((j, d));
            }
        }
        best.map(|(j, _)| j)
    })
}

/// Builds the undirected adjacency implied by an edge array: `adj[i] =
/// {edges[i]} ∪ {j | edges[j] = i}`, then returns its connected components
/// via iterative DFS.
pub fn connected_components(edges: &EdgeArray) -> Vec<Vec<usize>> {
    let n = edges.len();
    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); n];

    for (i, edge) in edges.iter().enumerate() {
        if let Some(j) = edge {
            adjacency[i].push(*j);
            adjacency[*j].push(i);
        }
    }

    let mut visited = vec![false; n];
    let mut components = Vec::new();

    for start in 0..n {
        if visited[start] {
            continue;
        }
        let mut component = Vec::new();
        let mut stack = vec![start];
        visited[start] = true;
        while let Some(node) = stack.pop() {
            component.push(node);
            for &neighbour in &adjacency[node] {
                if !visited[neighbour] {
                    visited[neighbour] = true;
                    stack.push(neighbour);
                }
            }
        }
        component.sort_unstable();
        components.push(component);
    }

    components
}

/// Axis-aligned rectangle coalescing via repeated scan-and-merge. Every input rectangle is normalised first; a
/// head is popped, rectangles intersecting it (within `tolerance`) are
/// merged into its union, and the process repeats on the grown head until
/// a full pass produces no further merge. Returns groups of original
/// indices whose rectangles no longer touch any other group.
pub fn intersect_axis_aligned(rectangles: &[Rectangle], tolerance: f64) -> Vec<Vec<usize>> {
    let normalised: Vec<Rectangle> = rectangles.iter().map(|r| r.normalise()).collect();

    let mut remaining: Vec<usize> = (0..rectangles.len()).collect();
    let mut groups: Vec<Vec<usize>> = Vec::new();

    while let Some(head_idx) = remaining.pop() {
        let mut group = vec![head_idx];
        let mut union_rect = normalised[head_idx];

        loop {
            let mut merged_any = false;
            let mut i = 0;
            while i < remaining.len() {
                let candidate_idx = remaining[i];
                if rects_touch(&union_rect, &normalised[candidate_idx], tolerance) {
                    union_rect = union(&union_rect, &normalised[candidate_idx]);
                    group.push(candidate_idx);
                    remaining.remove(i);
                    merged_any = true;
                } else {
                    i += 1;
                }
            }
            if !merged_any {
                break;
            }
        }

        groups.push(group);
    }

    groups
}

fn rects_touch(a: &Rectangle, b: &Rectangle, tolerance: f64) -> bool {
    let expanded = Rectangle::from_aabb(
        a.left() - tolerance,
        a.bottom() - tolerance,
        a.right() + tolerance,
        a.top() + tolerance,
    );
    expanded.intersects(b)
}

fn union(a: &Rectangle, b: &Rectangle) -> Rectangle {
    Rectangle::from_aabb(
        a.left().min(b.left()),
        a.bottom().min(b.bottom()),
        a.right().max(b.right()),
        a.top().max(b.top()),
    )
}
