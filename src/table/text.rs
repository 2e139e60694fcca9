//! Cell text assembly: once cells are discovered, the text falling inside
//! each cell's bounding box is gathered from the page's positioned glyphs
//! and sorted into reading order. `get_table_candidates` only returns cell
//! rectangles; this is the natural next step a caller reaches for.

use crate::external::Letter;
use crate::geometry::Rectangle;

/// The assembled text of one cell plus the rectangle it came from.
#[derive(Debug, Clone)]
pub struct StyledCellText {
    pub cell: Rectangle,
    pub text: String,
}

/// Collects every letter whose glyph rectangle's centroid falls inside
/// `cell`, sorts them top-to-bottom then left-to-right, and joins them into
/// one string (adjacent letters on the same visual line are *not*
/// re-spaced — the source already encodes inter-glyph gaps via coordinates,
/// which this function does not attempt to reconstruct into word breaks).
pub fn extract_table_text(cell: &Rectangle, letters: &[Letter]) -> StyledCellText {
    let mut inside: Vec<&Letter> = letters
        .iter()
        .filter(|l| cell.contains_point(l.glyph_rectangle.centroid(), true))
        .collect();

    inside.sort_by(|a, b| {
        b.glyph_rectangle
            .centroid()
            .y
            .partial_cmp(&a.glyph_rectangle.centroid().y)
            .unwrap()
            .then(
                a.glyph_rectangle
                    .centroid()
                    .x
                    .partial_cmp(&b.glyph_rectangle.centroid().x)
                    .unwrap(),
            )
    });

    let text = inside.iter().map(|l| l.value.as_str()).collect::<String>();
    StyledCellText { cell: *cell, text }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gathers_only_letters_inside_the_cell() {
        let cell = Rectangle::from_aabb(0.0, 0.0, 10.0, 10.0);
        let letters = vec![
            Letter::new("a", Rectangle::from_aabb(1.0, 1.0, 2.0, 2.0)),
            Letter::new("b", Rectangle::from_aabb(3.0, 1.0, 4.0, 2.0)),
            Letter::new("z", Rectangle::from_aabb(100.0, 100.0, 101.0, 101.0)),
        ];
        let result = extract_table_text(&cell, &letters);
        assert_eq!(result.text, "ab");
    }

    #[test]
    fn reading_order_is_top_to_bottom_then_left_to_right() {
        let cell = Rectangle::from_aabb(0.0, 0.0, 10.0, 10.0);
        let letters = vec![
            Letter::new("2", Rectangle::from_aabb(1.0, 1.0, 2.0, 2.0)),
            Letter::new("1", Rectangle::from_aabb(1.0, 8.0, 2.0, 9.0)),
        ];
        let result = extract_table_text(&cell, &letters);
        assert_eq!(result.text, "12");
    }
}
