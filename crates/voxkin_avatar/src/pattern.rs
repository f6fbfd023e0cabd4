//! # Pattern Analyzer
//!
//! Reads the avatar glyph and measures it: row/column counts, the center
//! column, and each row's filled span.
//!
//! Rows may have different lengths. Columns past the end of a short row
//! are blank.

use voxkin_shared::constants::DEFAULT_GLYPH;

/// The avatar glyph: an ordered grid of characters, row 0 at the top.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Pattern {
    rows: Vec<Vec<char>>,
}

impl Pattern {
    /// Builds a pattern from row strings.
    #[must_use]
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Self {
        Self {
            rows: rows.iter().map(|row| row.as_ref().chars().collect()).collect(),
        }
    }

    /// Parses multi-line text, one row per line.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        Self {
            rows: text
                .lines()
                .map(|line| line.trim_end_matches('\r').chars().collect())
                .collect(),
        }
    }

    /// The baked-in avatar glyph.
    #[must_use]
    pub fn default_glyph() -> Self {
        Self::from_rows(DEFAULT_GLYPH)
    }

    /// Number of rows.
    #[inline]
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Widest row length.
    #[must_use]
    pub fn col_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Characters of one row (may be shorter than [`Pattern::col_count`]).
    #[must_use]
    pub fn row(&self, row: usize) -> &[char] {
        self.rows.get(row).map_or(&[], Vec::as_slice)
    }

    /// Character at a grid position; `None` past the end of the row.
    #[inline]
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<char> {
        self.rows.get(row).and_then(|r| r.get(col)).copied()
    }
}

/// Filled span of one row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowEdge {
    /// First non-blank column.
    pub first_col: usize,
    /// Last non-blank column.
    pub last_col: usize,
    /// `last_col - first_col + 1`.
    pub width: usize,
}

/// Inclusive range of rows selected by two ratios of the total row count.
///
/// `top = floor(rows * top_ratio)`, `bottom = floor(rows * bottom_ratio)`.
/// When `top > bottom` the band is empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowBand {
    /// First row of the band.
    pub top: usize,
    /// Last row of the band (inclusive).
    pub bottom: usize,
}

impl RowBand {
    /// Band between two row ratios.
    #[must_use]
    pub fn from_ratios(rows: usize, top_ratio: f64, bottom_ratio: f64) -> Self {
        Self {
            top: floor_scaled(rows, top_ratio),
            bottom: floor_scaled(rows, bottom_ratio),
        }
    }

    /// True if `row` lies within the band.
    #[inline]
    #[must_use]
    pub fn contains(&self, row: usize) -> bool {
        row >= self.top && row <= self.bottom
    }

    /// Band rows that exist in a glyph of `rows` rows.
    pub fn rows(&self, rows: usize) -> impl Iterator<Item = usize> {
        let end = self.bottom.min(rows.saturating_sub(1));
        let empty = rows == 0;
        (self.top..=end).filter(move |_| !empty)
    }
}

/// `floor(count * ratio)` for a validated, non-negative ratio.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
#[must_use]
pub fn floor_scaled(count: usize, ratio: f64) -> usize {
    (count as f64 * ratio).floor().max(0.0) as usize
}

/// Measurements of a glyph.
#[derive(Clone, Debug, PartialEq)]
pub struct PatternAnalysis {
    /// Number of rows.
    pub rows: usize,
    /// Number of columns (widest row).
    pub cols: usize,
    /// `(cols - 1) / 2`; fractional for even widths.
    pub center_col: f32,
    /// Filled span per row; `None` for rows without a lit cell.
    pub edges: Vec<Option<RowEdge>>,
    /// True if any row contains the hand marker.
    pub has_hand_marker: bool,
}

impl PatternAnalysis {
    /// Analyzes `pattern`, treating `blank` as off.
    #[must_use]
    pub fn analyze(pattern: &Pattern, blank: char, hand_marker: char) -> Self {
        let rows = pattern.row_count();
        let cols = pattern.col_count();
        let edges = (0..rows)
            .map(|r| row_edge(pattern.row(r), blank))
            .collect();
        let has_hand_marker = (0..rows).any(|r| pattern.row(r).contains(&hand_marker));

        Self {
            rows,
            cols,
            center_col: (cols as f32 - 1.0) / 2.0,
            edges,
            has_hand_marker,
        }
    }

    /// Filled span of `row`; `None` if the row is empty or out of range.
    #[inline]
    #[must_use]
    pub fn edge(&self, row: usize) -> Option<RowEdge> {
        self.edges.get(row).copied().flatten()
    }
}

fn row_edge(row: &[char], blank: char) -> Option<RowEdge> {
    let first_col = row.iter().position(|&ch| ch != blank)?;
    let last_col = row.iter().rposition(|&ch| ch != blank)?;
    Some(RowEdge {
        first_col,
        last_col,
        width: last_col - first_col + 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_edges() {
        let pattern = Pattern::from_rows(&["  ##  ", "      ", "#    #", "#"]);
        let analysis = PatternAnalysis::analyze(&pattern, ' ', 'X');

        assert_eq!(analysis.rows, 4);
        assert_eq!(analysis.cols, 6);
        assert_eq!(analysis.center_col, 2.5);
        assert_eq!(
            analysis.edge(0),
            Some(RowEdge { first_col: 2, last_col: 3, width: 2 })
        );
        assert_eq!(analysis.edge(1), None);
        assert_eq!(
            analysis.edge(2),
            Some(RowEdge { first_col: 0, last_col: 5, width: 6 })
        );
        assert_eq!(
            analysis.edge(3),
            Some(RowEdge { first_col: 0, last_col: 0, width: 1 })
        );
        assert_eq!(analysis.edge(99), None);
        assert!(!analysis.has_hand_marker);
    }

    #[test]
    fn test_hand_marker_detection() {
        let pattern = Pattern::from_rows(&["     ", " X   "]);
        let analysis = PatternAnalysis::analyze(&pattern, ' ', 'X');
        assert!(analysis.has_hand_marker);
    }

    #[test]
    fn test_short_rows_read_as_blank() {
        let pattern = Pattern::from_rows(&["#####", "#"]);
        assert_eq!(pattern.get(1, 0), Some('#'));
        assert_eq!(pattern.get(1, 3), None);
        assert_eq!(pattern.col_count(), 5);
    }

    #[test]
    fn test_parse_strips_carriage_returns() {
        let pattern = Pattern::parse("# #\r\n###\r\n");
        assert_eq!(pattern.row_count(), 2);
        assert_eq!(pattern.row(0), &['#', ' ', '#']);
    }

    #[test]
    fn test_empty_pattern() {
        let analysis = PatternAnalysis::analyze(&Pattern::default(), ' ', 'X');
        assert_eq!(analysis.rows, 0);
        assert_eq!(analysis.cols, 0);
        assert!(analysis.edges.is_empty());
    }

    #[test]
    fn test_row_band_floors_ratios() {
        let band = RowBand::from_ratios(20, 0.58, 0.72);
        assert_eq!(band, RowBand { top: 11, bottom: 14 });
        assert_eq!(band.rows(20).collect::<Vec<_>>(), vec![11, 12, 13, 14]);
        assert!(!band.contains(10));
        assert!(!band.contains(15));
    }

    #[test]
    fn test_row_band_clamped_to_glyph() {
        let band = RowBand::from_ratios(4, 0.5, 1.0);
        assert_eq!(band.rows(4).collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(RowBand::from_ratios(0, 0.0, 1.0).rows(0).count(), 0);
    }

    #[test]
    fn test_inverted_band_is_empty() {
        let band = RowBand::from_ratios(10, 0.8, 0.2);
        assert_eq!(band.rows(10).count(), 0);
        assert!(!band.contains(5));
    }
}
