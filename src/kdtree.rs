//! 2-D k-d tree: nearest and k-nearest queries via best-first descent with
//! backtracking.

use crate::geometry::Point;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    X,
    Y,
}

impl Axis {
    fn next(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }

    fn coord(self, p: Point) -> f64 {
        match self {
            Axis::X => p.x,
            Axis::Y => p.y,
        }
    }
}

struct Node<T> {
    item: T,
    point: Point,
    /// Position of this item in the `Vec` passed to [`KdTree::build`],
    /// independent of where the build's median-partitioning moved it to.
    /// Used only to break exact-distance ties deterministically (§5: "ties
    /// inside k-d tree queries must be broken by index").
    index: usize,
    axis: Axis,
    left: Option<Box<Node<T>>>,
    right: Option<Box<Node<T>>>,
}

/// A balanced, immutable 2-D spatial index over `(Point, T)` pairs.
pub struct KdTree<T> {
    root: Option<Box<Node<T>>>,
    len: usize,
}

impl<T: Clone> KdTree<T> {
    /// Builds the tree in one pass: recursively partition at the median
    /// along alternating axes.
    pub fn build(items: Vec<(Point, T)>) -> Self {
        let len = items.len();
        let mut indexed: Vec<(Point, T, usize)> = items
            .into_iter()
            .enumerate()
            .map(|(i, (p, t))| (p, t, i))
            .collect();
        let root = Self::build_node(&mut indexed, Axis::X);
        KdTree { root, len }
    }

    fn build_node(items: &mut [(Point, T, usize)], axis: Axis) -> Option<Box<Node<T>>> {
        if items.is_empty() {
            return None;
        }
        let mid = items.len() / 2;
        items.select_nth_unstable_by(mid, |a, b| {
            axis.coord(a.0).partial_cmp(&axis.coord(b.0)).unwrap()
        });
        let (point, item, index) = items[mid].clone();

        let (left_items, rest) = items.split_at_mut(mid);
        let right_items = &mut rest[1..];

        Some(Box::new(Node {
            item,
            point,
            index,
            axis,
            left: Self::build_node(left_items, axis.next()),
            right: Self::build_node(right_items, axis.next()),
        }))
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Nearest neighbour to `query` by squared Euclidean distance, as
    /// `(item, original index, distance)`. Exact-distance ties are broken
    /// by the candidate's original index (lowest wins), so repeated queries
    /// against the same tree — and queries against equivalently-built trees
    /// across runs — return the same candidate.
    pub fn nearest(&self, query: Point) -> Option<(&T, usize, f64)> {
        let root = self.root.as_deref()?;
        let mut best: Option<(&Node<T>, f64)> = None;
        Self::nearest_search(root, query, &mut best);
        best.map(|(node, dist_sq)| (&node.item, node.index, dist_sq.sqrt()))
    }

    fn nearest_search<'a>(node: &'a Node<T>, query: Point, best: &mut Option<(&'a Node<T>, f64)>) {
        let dist_sq = node.point.sub(query).norm_squared();
        if is_better(dist_sq, node.index, *best) {
            *best = Some((node, dist_sq));
        }

        let diff = node.axis.coord(query) - node.axis.coord(node.point);
        let (near, far) = if diff <= 0.0 {
            (&node.left, &node.right)
        } else {
            (&node.right, &node.left)
        };

        if let Some(near) = near {
            Self::nearest_search(near, query, best);
        }
        if let Some(far) = far {
            if best.is_none_or(|(_, best_d)| diff * diff < best_d) {
                Self::nearest_search(far, query, best);
            }
        }
    }

    /// The `k` nearest neighbours to `query`, nearest first, as `(item,
    /// original index, distance)`. Maintains a bounded max-heap of size `k`
    /// during the search; the prune condition at each split uses the
    /// heap's current worst distance once it is full. Distance ties within
    /// the result, and at the eviction boundary, are broken by original
    /// index.
    pub fn k_nearest(&self, query: Point, k: usize) -> Vec<(&T, usize, f64)> {
        if k == 0 {
            return Vec::new();
        }
        let Some(root) = self.root.as_deref() else {
            return Vec::new();
        };

        let mut heap: Vec<(f64, &Node<T>)> = Vec::with_capacity(k);
        Self::k_nearest_search(root, query, k, &mut heap);

        heap.sort_by(|a, b| cmp_dist_index(a.0, a.1.index, b.0, b.1.index));
        heap.into_iter()
            .map(|(dist_sq, node)| (&node.item, node.index, dist_sq.sqrt()))
            .collect()
    }

    fn k_nearest_search<'a>(
        node: &'a Node<T>,
        query: Point,
        k: usize,
        heap: &mut Vec<(f64, &'a Node<T>)>,
    ) {
        let dist_sq = node.point.sub(query).norm_squared();
        insert_bounded(heap, k, (dist_sq, node));

        let diff = node.axis.coord(query) - node.axis.coord(node.point);
        let (near, far) = if diff <= 0.0 {
            (&node.left, &node.right)
        } else {
            (&node.right, &node.left)
        };

        if let Some(near) = near {
            Self::k_nearest_search(near, query, k, heap);
        }
        let worst = heap.iter().map(|(d, _)| *d).fold(f64::NEG_INFINITY, f64::max);
        if let Some(far) = far {
            if heap.len() < k || diff * diff < worst {
                Self::k_nearest_search(far, query, k, heap);
            }
        }
    }
}

/// `true` iff `(dist_sq, index)` should replace `best` — strictly closer,
/// or an exact-distance tie broken in favour of the lower index.
fn is_better<T>(dist_sq: f64, index: usize, best: Option<(&Node<T>, f64)>) -> bool {
    match best {
        None => true,
        Some((node, best_d)) => dist_sq < best_d || (dist_sq == best_d && index < node.index),
    }
}

/// Lexicographic order on `(distance, index)`, ascending — the canonical
/// order for both the final `k_nearest` output and the heap's worst-item
/// search.
fn cmp_dist_index(a_dist: f64, a_index: usize, b_dist: f64, b_index: usize) -> std::cmp::Ordering {
    a_dist
        .partial_cmp(&b_dist)
        .unwrap()
        .then(a_index.cmp(&b_index))
}

/// Inserts `candidate` into `heap` (kept sorted by distance ascending would
/// be expensive to maintain per-insert at scale, so this is a simple bound:
/// push then truncate by re-sorting — the result set per query is small
/// relative to the tree, so this stays cheap in practice). On a tie
/// against the current worst slot, the higher-index node is treated as
/// worse, so the lower-index one is kept.
fn insert_bounded<'a, T>(heap: &mut Vec<(f64, &'a Node<T>)>, k: usize, candidate: (f64, &'a Node<T>)) {
    if heap.len() < k {
        heap.push(candidate);
        return;
    }
    let worst_idx = heap
        .iter()
        .enumerate()
        .max_by(|(_, (d1, n1)), (_, (d2, n2))| cmp_dist_index(*d1, n1.index, *d2, n2.index))
        .map(|(i, _)| i)
        .unwrap();
    let (worst_d, worst_node) = heap[worst_idx];
    if cmp_dist_index(candidate.0, candidate.1.index, worst_d, worst_node.index) == std::cmp::Ordering::Less {
        heap[worst_idx] = candidate;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brute_force_nearest(points: &[(Point, usize)], query: Point) -> (usize, f64) {
        points
            .iter()
            .map(|(p, id)| (*id, p.sub(query).norm()))
            .min_by(|a, b| a.1.partial_cmp(&b.1).unwrap())
            .unwrap()
    }

    #[test]
    fn nearest_matches_brute_force() {
        let points: Vec<(Point, usize)> = (0..200)
            .map(|i| {
                let x = (i as f64 * 37.0) % 100.0;
                let y = (i as f64 * 53.0) % 100.0;
                (Point::new(x, y), i)
            })
            .collect();

        let tree = KdTree::build(points.clone());

        for q in [(0.0, 0.0), (50.0, 50.0), (99.0, 1.0), (3.5, 72.1)] {
            let query = Point::new(q.0, q.1);
            let expected = brute_force_nearest(&points, query);
            let (found, _index, dist) = tree.nearest(query).unwrap();
            assert_eq!(*found, expected.0);
            assert!((dist - expected.1).abs() < 1e-9);
        }
    }

    #[test]
    fn nearest_breaks_exact_ties_by_lowest_index() {
        // Two points equidistant from the query; the lower original index
        // must win, regardless of which one the tree visits first.
        let points = vec![
            (Point::new(-1.0, 0.0), "left"),
            (Point::new(1.0, 0.0), "right"),
        ];
        let tree = KdTree::build(points);
        let (item, index, _dist) = tree.nearest(Point::new(0.0, 0.0)).unwrap();
        assert_eq!(*item, "left");
        assert_eq!(index, 0);
    }

    #[test]
    fn k_nearest_returns_k_closest_in_order() {
        let points: Vec<(Point, usize)> = (0..50)
            .map(|i| (Point::new(i as f64, 0.0), i))
            .collect();
        let tree = KdTree::build(points);

        let result = tree.k_nearest(Point::new(10.0, 0.0), 3);
        assert_eq!(result.len(), 3);
        let ids: Vec<usize> = result.iter().map(|(id, _, _)| **id).collect();
        assert!(ids.contains(&10));
        assert!(ids.contains(&9));
        assert!(ids.contains(&11));
        let distances: Vec<f64> = result.iter().map(|(_, _, d)| *d).collect();
        assert!(distances.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn k_nearest_reports_original_indices() {
        let points: Vec<(Point, &str)> = vec![
            (Point::new(0.0, 0.0), "a"),
            (Point::new(5.0, 0.0), "b"),
            (Point::new(10.0, 0.0), "c"),
        ];
        let tree = KdTree::build(points);
        let result = tree.k_nearest(Point::new(0.0, 0.0), 3);
        let indices: Vec<usize> = result.iter().map(|(_, i, _)| *i).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn empty_tree_returns_none() {
        let tree: KdTree<usize> = KdTree::build(Vec::new());
        assert!(tree.nearest(Point::new(0.0, 0.0)).is_none());
        assert!(tree.k_nearest(Point::new(0.0, 0.0), 3).is_empty());
    }
}
