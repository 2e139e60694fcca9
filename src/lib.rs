//! Document layout analysis core: convex hulls, oriented bounding boxes,
//! polygon clipping, k-d-tree-backed nearest-neighbour clustering, and
//! ruling-based table detection over already-decoded page geometry
//! (glyphs, drawn paths).
//!
//! This crate does not parse PDFs, decode fonts, or render anything — it
//! consumes the plain geometric primitives in [`external`] and reconstructs
//! the higher-level structure a document viewer or extractor needs on top
//! of them. See each module for the specific algorithm it owns; no module
//! depends on one listed below it here:
//!
//! - [`geometry`] — points, rectangles, line segments, affine transforms.
//! - [`distance`] — point/line/colour distance metrics, string distance.
//! - [`hull`] — convex hull, minimum-area rectangle, oriented bounding box.
//! - [`bezier`] — cubic root solver, De Casteljau split, curve/line crossing.
//! - [`clipping`] — Sutherland–Hodgman and Greiner–Hormann polygon clipping.
//! - [`kdtree`] — 2-D spatial index with nearest/k-nearest queries.
//! - [`clustering`] — nearest-neighbour graphs, DFS components, rectangle
//!   coalescing.
//! - [`table`] — ruling extraction through table grouping.

pub mod bezier;
pub mod clipping;
pub mod clustering;
pub mod distance;
pub mod error;
pub mod external;
pub mod geometry;
pub mod hull;
pub mod kdtree;
pub mod parallel;
pub mod table;

pub use error::{LayoutError, Result};
