//! Table detection parameters, split from the finder's own fixed internals
//! so a caller can tune thresholds without forking the pipeline.

/// Which edge-detection approach to use for rows/columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TableStrategy {
    /// Only drawn rulings count as edges.
    Lines,
    /// Like `Lines`, but edges must be exact (no extension/snap tolerance).
    LinesStrict,
    /// Infer edges from word-position alignment when no rulings exist.
    Text,
    /// Edges are supplied directly by the caller (not derived from the page).
    Explicit,
}

/// Tunable thresholds for the table-detection pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TableSettings {
    pub vertical_strategy: TableStrategy,
    pub horizontal_strategy: TableStrategy,

    /// A drawn rectangle thinner than `mode_dimension * thin_bar_ratio`
    /// along one axis is treated as a filled ruling bar rather than a
    /// bordered cell.
    pub thin_bar_ratio: f64,

    /// Distance, in page units, within which two ruling endpoints are
    /// extended and collinear rulings are considered mergeable.
    pub snap_tolerance: f64,

    /// Distance within which two cells' corners are considered coincident
    /// for table grouping (default 1.0).
    pub table_corner_tolerance: f64,

    /// Minimum ruling length, in page units, to avoid treating stray
    /// decorative marks as table borders.
    pub min_ruling_length: f64,

    /// Minimum number of word clusters required before the text-alignment
    /// strategy will propose an edge (avoids inferring a column border from
    /// a single stray word).
    pub min_words_for_text_strategy: usize,
}

impl Default for TableSettings {
    fn default() -> Self {
        Self {
            vertical_strategy: TableStrategy::Lines,
            horizontal_strategy: TableStrategy::Lines,
            thin_bar_ratio: 0.7,
            snap_tolerance: 2.0,
            table_corner_tolerance: 1.0,
            min_ruling_length: 1.0,
            min_words_for_text_strategy: 3,
        }
    }
}
