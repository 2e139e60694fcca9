//! Table grouping: cells sharing a corner within tolerance belong to the
//! same table.

use super::DetectedTable;
use crate::clustering::connected_components;
use crate::geometry::Rectangle;

pub fn group_cells_into_tables(cells: Vec<Rectangle>, corner_tolerance: f64) -> Vec<DetectedTable> {
    let n = cells.len();
    let edges: Vec<Option<usize>> = (0..n)
        .map(|i| {
            (0..n)
                .find(|&j| j != i && share_a_corner(&cells[i], &cells[j], corner_tolerance))
        })
        .collect();

    connected_components(&edges)
        .into_iter()
        .map(|group| {
            let group_cells: Vec<Rectangle> = group.iter().map(|&i| cells[i]).collect();
            let bbox = bounding_box(&group_cells);
            DetectedTable {
                cells: group_cells,
                bbox,
            }
        })
        .collect()
}

fn share_a_corner(a: &Rectangle, b: &Rectangle, tolerance: f64) -> bool {
    a.corners()
        .iter()
        .any(|ac| b.corners().iter().any(|bc| ac.sub(*bc).norm() < tolerance))
}

fn bounding_box(cells: &[Rectangle]) -> Rectangle {
    let min_x = cells.iter().map(|c| c.left()).fold(f64::INFINITY, f64::min);
    let max_x = cells
        .iter()
        .map(|c| c.right())
        .fold(f64::NEG_INFINITY, f64::max);
    let min_y = cells
        .iter()
        .map(|c| c.bottom())
        .fold(f64::INFINITY, f64::min);
    let max_y = cells.iter().map(|c| c.top()).fold(f64::NEG_INFINITY, f64::max);
    Rectangle::from_aabb(min_x, min_y, max_x, max_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacent_cells_form_one_table() {
        let cells = vec![
            Rectangle::from_aabb(0.0, 0.0, 10.0, 10.0),
            Rectangle::from_aabb(10.0, 0.0, 20.0, 10.0),
        ];
        let tables = group_cells_into_tables(cells, 1.0);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].cells.len(), 2);
    }

    #[test]
    fn far_apart_cells_form_separate_tables() {
        let cells = vec![
            Rectangle::from_aabb(0.0, 0.0, 10.0, 10.0),
            Rectangle::from_aabb(100.0, 100.0, 110.0, 110.0),
        ];
        let tables = group_cells_into_tables(cells, 1.0);
        assert_eq!(tables.len(), 2);
    }
}
