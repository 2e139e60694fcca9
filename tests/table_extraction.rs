//! Integration test for the table-extraction pipeline end to end: ruling
//! extraction, merge, intersection map, cell discovery, and table grouping,
//! over a 2×2 grid of rulings.

use kreuzberg_layout::external::{Letter, Page, Path};
use kreuzberg_layout::geometry::{Point, Rectangle};
use kreuzberg_layout::table::{get_table_candidates, TableSettings};

/// A page whose only drawn content is a 2×2 grid: three horizontal and
/// three vertical rulings, all the same length, forming four closed cells.
fn grid_page() -> Page {
    let letters = vec![Letter::new(
        "x",
        Rectangle::from_aabb(0.0, 0.0, 5.0, 8.0),
    )];

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
fn grid_of_rulings_produces_one_table_tiling_the_grid() {
    let page = grid_page();
    let tables = get_table_candidates(&page, &TableSettings::default());

    assert_eq!(tables.len(), 1, "expected exactly one candidate table");
    let table = &tables[0];
    assert_eq!(table.cells.len(), 4, "a 2x2 grid has four cells");

    let total_area: f64 = table.cells.iter().map(|c| c.area()).sum();
    assert!((total_area - 400.0).abs() < 1e-6);

    let bbox = table.bbox;
    assert!((bbox.width() - 20.0).abs() < 1e-6);
    assert!((bbox.height() - 20.0).abs() < 1e-6);

    let rows = table.rows(1.0);
    assert_eq!(rows.len(), 2);
    for row in &rows {
        assert_eq!(row.len(), 2);
    }
}

#[test]
fn page_with_no_drawn_paths_yields_no_tables() {
    let page = Page::new(Rectangle::from_aabb(0.0, 0.0, 50.0, 50.0), Vec::new(), Vec::new());
    let tables = get_table_candidates(&page, &TableSettings::default());
    assert!(tables.is_empty());
}

#[test]
fn incomplete_grid_missing_one_edge_yields_no_cells() {
    // An "L": one horizontal and one vertical ruling, no closing edges.
    let mut h = Path::new(Vec::new());
    h.line_to(Point::new(0.0, 0.0), Point::new(10.0, 0.0));
    let mut v = Path::new(Vec::new());
    v.line_to(Point::new(0.0, 0.0), Point::new(0.0, 10.0));

    let page = Page::new(
        Rectangle::from_aabb(0.0, 0.0, 20.0, 20.0),
        Vec::new(),
        vec![h, v],
    );
    let tables = get_table_candidates(&page, &TableSettings::default());
    assert!(tables.is_empty());
}
