//! Table extractor: ruling extraction → ruling merge → intersection map →
//! rectangular-cell discovery → table grouping.
//!
//! The only module here that depends on others: it calls into `geometry`,
//! `clustering` (for both the ruling-merge DFS grouping and the final
//! table-grouping DFS), and `distance`/`kdtree` indirectly through those.

mod cells;
mod grouping;
mod intersections;
mod ruling;
mod settings;
mod text;

pub use ruling::{Ruling, RulingOrientation};
pub use settings::{TableSettings, TableStrategy};
pub use text::{extract_table_text, StyledCellText};

use crate::external::Page;
use crate::geometry::Rectangle;

/// One candidate table: its cell rectangles and the bounding rectangle of
/// the whole grid.
#[derive(Debug, Clone)]
pub struct DetectedTable {
    pub cells: Vec<Rectangle>,
    pub bbox: Rectangle,
}

impl DetectedTable {
    /// Cells grouped into rows, sorted top-to-bottom then left-to-right,
    /// for callers that want row/column structure rather than a flat cell
    /// list.
    pub fn rows(&self, row_tolerance: f64) -> Vec<Vec<Rectangle>> {
        let mut sorted = self.cells.clone();
        sorted.sort_by(|a, b| {
            b.top()
                .partial_cmp(&a.top())
                .unwrap()
                .then(a.left().partial_cmp(&b.left()).unwrap())
        });

        let mut rows: Vec<Vec<Rectangle>> = Vec::new();
        for cell in sorted {
            match rows
                .last_mut()
                .filter(|row: &&mut Vec<Rectangle>| (row[0].top() - cell.top()).abs() < row_tolerance)
            {
                Some(row) => row.push(cell),
                None => rows.push(vec![cell]),
            }
        }
        for row in &mut rows {
            row.sort_by(|a, b| a.left().partial_cmp(&b.left()).unwrap());
        }
        rows
    }
}

/// Entry point: runs the full pipeline over one page's rulings and returns
/// one `DetectedTable` per discovered grid.
pub fn get_table_candidates(page: &Page, settings: &TableSettings) -> Vec<DetectedTable> {
    let rulings = ruling::extract_rulings(page, settings);
    if rulings.is_empty() {
        tracing::debug!("no rulings extracted from page, returning no table candidates");
        return Vec::new();
    }

    let merged = ruling::merge_rulings(rulings, settings.snap_tolerance);
    let intersection_map = intersections::build_intersection_map(&merged);
    if intersection_map.is_empty() {
        tracing::debug!("no ruling intersections found, returning no table candidates");
        return Vec::new();
    }

    let cell_rects = cells::find_cells(&intersection_map, &merged);
    if cell_rects.is_empty() {
        tracing::debug!("no closed cells found among ruling intersections");
        return Vec::new();
    }

    grouping::group_cells_into_tables(cell_rects, settings.table_corner_tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::{Letter, Page, Path};
    use crate::geometry::Point;

    /// Builds a page whose only content is a 2×2 grid of rulings: three
    /// horizontal lines and three vertical lines, all the same length.
    fn grid_page() -> Page {
        let mut letters = Vec::new();
        // A couple of glyphs so mode width/height isn't degenerate.
        for i in 0..4 {
            letters.push(Letter::new(
                "x",
                Rectangle::from_aabb(i as f64 * 10.0, 0.0, i as f64 * 10.0 + 5.0, 8.0),
            ));
        }

        let mut paths = Vec::new();
        for i in 0..3 {
            let y = i as f64 * 10.0;
            let mut p = Path::new(Vec::new());
            p.line_to(Point::new(0.0, y), Point::new(20.0, y));
            paths.push(p);
        }
        for i in 0..3 {
            let x = i as f64 * 10.0;
            let mut p = Path::new(Vec::new());
            p.line_to(Point::new(x, 0.0), Point::new(x, 20.0));
            paths.push(p);
        }

        Page::new(Rectangle::from_aabb(0.0, 0.0, 100.0, 100.0), letters, paths)
    }

    #[test]
    fn grid_of_rulings_yields_one_table_with_four_cells() {
        let page = grid_page();
        let settings = TableSettings::default();
        let tables = get_table_candidates(&page, &settings);

        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].cells.len(), 4);
        let total_area: f64 = tables[0].cells.iter().map(|c| c.area()).sum();
        assert!((total_area - 400.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_page_with_no_rulings_yields_no_tables() {
        let page = Page::new(Rectangle::from_aabb(0.0, 0.0, 10.0, 10.0), Vec::new(), Vec::new());
        let tables = get_table_candidates(&page, &TableSettings::default());
        assert!(tables.is_empty());
    }
}
