//! # Cell Classifier
//!
//! Assigns every lit glyph cell to exactly one part of the avatar.
//!
//! ## Priority Order
//!
//! 1. Explicit hand marker → left/right hand marker (never falls through)
//! 2. Foot band + near the center column → left/right foot
//! 3. Arm band + within the arm distance band → left/right arm candidate
//! 4. Everything else → body
//!
//! Steps 2 and 3 only run when their swing axis is enabled; step 3 is also
//! skipped for every cell once the glyph contains a hand marker.

use voxkin_shared::constants::COL_DELTA_EPSILON;
use voxkin_shared::Vec2;

use crate::config::{ArmClassifyMode, AvatarConfig};
use crate::pattern::{floor_scaled, Pattern, PatternAnalysis, RowBand};

/// Body side of a limb.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// Columns left of the center column.
    Left,
    /// The center column and everything right of it.
    Right,
}

impl Side {
    /// Side of `col` relative to `center_col`.
    #[inline]
    #[must_use]
    pub fn of(col: usize, center_col: f32) -> Self {
        if (col as f32) < center_col {
            Self::Left
        } else {
            Self::Right
        }
    }

    /// `-1.0` for left, `+1.0` for right.
    #[inline]
    #[must_use]
    pub const fn sign(self) -> f32 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }
}

/// A lit glyph cell placed in the avatar's local plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    /// Local X.
    pub x: f32,
    /// Local Y.
    pub y: f32,
    /// Glyph row.
    pub row: usize,
    /// Glyph column.
    pub col: usize,
}

impl Cell {
    /// Planar position.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// An arm cell with the distance used for thresholding and symmetry.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ArmCell {
    /// The placed cell.
    pub cell: Cell,
    /// Edge or center distance, depending on how the cell was selected.
    pub col_delta: f32,
    /// `floor(col_delta + epsilon)`.
    pub col_delta_int: usize,
}

impl ArmCell {
    /// Wraps `cell` with its distance measure.
    #[must_use]
    pub fn new(cell: Cell, col_delta: f32) -> Self {
        Self {
            cell,
            col_delta,
            col_delta_int: floor_delta(col_delta),
        }
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn floor_delta(col_delta: f32) -> usize {
    (f64::from(col_delta) + COL_DELTA_EPSILON).floor().max(0.0) as usize
}

/// Maps glyph indices to local coordinates.
///
/// The glyph is centred on X, row 0 is the top, and the bottom row sits
/// `baseline_lift` above the ground plane.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphLayout {
    /// Voxel edge length.
    pub cell_size: f32,
    /// Glyph rows.
    pub rows: usize,
    /// Half the glyph width, in local units.
    pub x_offset: f32,
    /// Half the glyph height, in local units.
    pub y_offset: f32,
    /// Lift of the bottom row.
    pub baseline_lift: f32,
}

impl GlyphLayout {
    /// Layout for an analyzed glyph.
    #[must_use]
    pub fn new(analysis: &PatternAnalysis, cell_size: f32, baseline_lift: f32) -> Self {
        Self {
            cell_size,
            rows: analysis.rows,
            x_offset: (analysis.cols.saturating_sub(1) as f32 * cell_size) / 2.0,
            y_offset: (analysis.rows.saturating_sub(1) as f32 * cell_size) / 2.0,
            baseline_lift,
        }
    }

    /// Local position of a glyph cell.
    #[must_use]
    pub fn place(&self, row: usize, col: usize) -> Cell {
        let from_bottom = self.rows.saturating_sub(1).saturating_sub(row);
        Cell {
            x: col as f32 * self.cell_size - self.x_offset,
            y: from_bottom as f32 * self.cell_size + self.baseline_lift,
            row,
            col,
        }
    }

    /// Reference height for foot pivots.
    #[inline]
    #[must_use]
    pub fn baseline_y(&self) -> f32 {
        self.y_offset + self.baseline_lift
    }
}

/// The class of a single lit cell.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum CellClass {
    /// Torso/head voxel.
    Body,
    /// Arm candidate with its distance measure.
    Arm(Side, f32),
    /// Foot voxel.
    Foot(Side),
    /// Explicit hand marker.
    HandMarker(Side),
}

/// Output of the classifier: every lit cell in exactly one list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Classification {
    /// Body cells.
    pub body: Vec<Cell>,
    /// Left arm candidates.
    pub left_arm: Vec<ArmCell>,
    /// Right arm candidates.
    pub right_arm: Vec<ArmCell>,
    /// Left foot cells.
    pub left_foot: Vec<Cell>,
    /// Right foot cells.
    pub right_foot: Vec<Cell>,
    /// Left hand markers.
    pub left_hand: Vec<ArmCell>,
    /// Right hand markers.
    pub right_hand: Vec<ArmCell>,
}

impl Classification {
    /// Total number of classified cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.body.len()
            + self.left_arm.len()
            + self.right_arm.len()
            + self.left_foot.len()
            + self.right_foot.len()
            + self.left_hand.len()
            + self.right_hand.len()
    }

    /// True when the glyph had no lit cell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Per-build classifier state: bands and thresholds resolved once.
#[derive(Debug)]
pub struct CellClassifier<'a> {
    config: &'a AvatarConfig,
    analysis: &'a PatternAnalysis,
    layout: GlyphLayout,
    arm_band: RowBand,
    leg_band_top: usize,
    leg_center_threshold: f32,
    center_min: f32,
    center_max: f32,
}

impl<'a> CellClassifier<'a> {
    /// Resolves bands and thresholds for one glyph.
    #[must_use]
    pub fn new(config: &'a AvatarConfig, analysis: &'a PatternAnalysis, layout: GlyphLayout) -> Self {
        let rows = analysis.rows;
        let cols = analysis.cols;
        Self {
            config,
            analysis,
            layout,
            arm_band: RowBand::from_ratios(
                rows,
                config.arm_band_top_ratio,
                config.arm_band_bottom_ratio,
            ),
            leg_band_top: floor_scaled(rows, config.leg_band_top_ratio),
            leg_center_threshold: floor_scaled(cols, config.leg_threshold_center_ratio) as f32,
            center_min: floor_scaled(cols, config.arm_threshold_min_ratio) as f32,
            center_max: floor_scaled(cols, config.arm_threshold_max_ratio) as f32,
        }
    }

    /// The resolved arm band.
    #[inline]
    #[must_use]
    pub const fn arm_band(&self) -> RowBand {
        self.arm_band
    }

    /// Classifies one lit cell holding `ch`.
    #[must_use]
    pub fn classify_cell(&self, row: usize, col: usize, ch: char) -> CellClass {
        let center = self.analysis.center_col;
        let side = Side::of(col, center);
        let center_dist = (col as f32 - center).abs();

        if self.config.enable_arm_swing && ch == self.config.hand_marker {
            return CellClass::HandMarker(side);
        }

        if self.config.enable_leg_swing
            && row >= self.leg_band_top
            && center_dist <= self.leg_center_threshold
        {
            return CellClass::Foot(side);
        }

        if self.config.enable_arm_swing
            && !self.analysis.has_hand_marker
            && self.arm_band.contains(row)
        {
            if let Some(class) = self.classify_arm(row, col, side, center_dist) {
                return class;
            }
        }

        CellClass::Body
    }

    fn classify_arm(&self, row: usize, col: usize, side: Side, center_dist: f32) -> Option<CellClass> {
        let edge = self.analysis.edge(row)?;
        match self.config.arm_classify_mode {
            ArmClassifyMode::Edge => {
                let min = floor_scaled(edge.width, self.config.arm_edge_min_ratio);
                let max = floor_scaled(edge.width, self.config.arm_edge_max_ratio);
                let left_dist = col.checked_sub(edge.first_col)?;
                let right_dist = edge.last_col.checked_sub(col)?;
                if (min..=max).contains(&left_dist) {
                    Some(CellClass::Arm(Side::Left, left_dist as f32))
                } else if (min..=max).contains(&right_dist) {
                    Some(CellClass::Arm(Side::Right, right_dist as f32))
                } else {
                    None
                }
            }
            ArmClassifyMode::Center => (center_dist >= self.center_min
                && center_dist <= self.center_max)
                .then_some(CellClass::Arm(side, center_dist)),
        }
    }

    /// Classifies every lit cell of `pattern`, row by row.
    #[must_use]
    pub fn classify(&self, pattern: &Pattern) -> Classification {
        let mut out = Classification::default();
        let center = self.analysis.center_col;

        for row in 0..pattern.row_count() {
            for (col, &ch) in pattern.row(row).iter().enumerate() {
                if ch == self.config.blank {
                    continue;
                }
                let cell = self.layout.place(row, col);
                match self.classify_cell(row, col, ch) {
                    CellClass::Body => out.body.push(cell),
                    CellClass::Arm(Side::Left, delta) => {
                        out.left_arm.push(ArmCell::new(cell, delta));
                    }
                    CellClass::Arm(Side::Right, delta) => {
                        out.right_arm.push(ArmCell::new(cell, delta));
                    }
                    CellClass::Foot(Side::Left) => out.left_foot.push(cell),
                    CellClass::Foot(Side::Right) => out.right_foot.push(cell),
                    CellClass::HandMarker(side) => {
                        let marker = ArmCell::new(cell, (col as f32 - center).abs());
                        match side {
                            Side::Left => out.left_hand.push(marker),
                            Side::Right => out.right_hand.push(marker),
                        }
                    }
                }
            }
        }

        tracing::debug!(
            body = out.body.len(),
            left_arm = out.left_arm.len(),
            right_arm = out.right_arm.len(),
            left_foot = out.left_foot.len(),
            right_foot = out.right_foot.len(),
            left_hand = out.left_hand.len(),
            right_hand = out.right_hand.len(),
            "classified glyph cells"
        );
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(rows: &[&str], config: &AvatarConfig) -> Classification {
        let pattern = Pattern::from_rows(rows);
        let analysis = PatternAnalysis::analyze(&pattern, config.blank, config.hand_marker);
        let layout = GlyphLayout::new(&analysis, config.cell_size, config.baseline_lift);
        CellClassifier::new(config, &analysis, layout).classify(&pattern)
    }

    fn lit_count(rows: &[&str]) -> usize {
        rows.iter().map(|r| r.chars().filter(|&c| c != ' ').count()).sum()
    }

    #[test]
    fn test_side_of_center() {
        assert_eq!(Side::of(1, 2.0), Side::Left);
        assert_eq!(Side::of(2, 2.0), Side::Right);
        assert_eq!(Side::of(2, 2.5), Side::Left);
        assert_eq!(Side::Left.sign(), -1.0);
        assert_eq!(Side::Right.sign(), 1.0);
    }

    #[test]
    fn test_col_delta_floor_uses_epsilon() {
        let cell = Cell { x: 0.0, y: 0.0, row: 0, col: 0 };
        assert_eq!(ArmCell::new(cell, 2.999_999_5).col_delta_int, 3);
        assert_eq!(ArmCell::new(cell, 2.5).col_delta_int, 2);
        assert_eq!(ArmCell::new(cell, 0.0).col_delta_int, 0);
    }

    #[test]
    fn test_layout_places_rows_top_down() {
        let pattern = Pattern::from_rows(&["###", "###", "###"]);
        let analysis = PatternAnalysis::analyze(&pattern, ' ', 'X');
        let layout = GlyphLayout::new(&analysis, 1.0, 0.5);

        let top_left = layout.place(0, 0);
        let bottom_right = layout.place(2, 2);
        assert_eq!((top_left.x, top_left.y), (-1.0, 2.5));
        assert_eq!((bottom_right.x, bottom_right.y), (1.0, 0.5));
        assert_eq!(layout.baseline_y(), 1.5);
    }

    #[test]
    fn test_hand_markers_never_fall_through() {
        let config = AvatarConfig::default();
        let rows = ["     ", "     ", "X###X", "     ", "     "];
        let out = classify(&rows, &config);

        assert_eq!(out.left_hand.len(), 1);
        assert_eq!((out.left_hand[0].cell.row, out.left_hand[0].cell.col), (2, 0));
        assert_eq!(out.right_hand.len(), 1);
        assert_eq!((out.right_hand[0].cell.row, out.right_hand[0].cell.col), (2, 4));
        assert!(out.left_arm.is_empty() && out.right_arm.is_empty());
    }

    #[test]
    fn test_marker_in_foot_band_is_still_a_marker() {
        let config = AvatarConfig {
            leg_band_top_ratio: 0.0,
            leg_threshold_center_ratio: 1.0,
            ..AvatarConfig::default()
        };
        let out = classify(&["X  #"], &config);
        assert_eq!(out.left_hand.len(), 1);
        assert_eq!(out.right_foot.len(), 1);
    }

    #[test]
    fn test_feet_take_priority_over_arms() {
        let config = AvatarConfig {
            arm_band_top_ratio: 0.0,
            arm_band_bottom_ratio: 1.0,
            arm_edge_max_ratio: 1.0,
            leg_band_top_ratio: 0.0,
            leg_threshold_center_ratio: 1.0,
            ..AvatarConfig::default()
        };
        let out = classify(&["#####"], &config);
        assert_eq!(out.left_foot.len(), 2);
        assert_eq!(out.right_foot.len(), 3);
        assert!(out.left_arm.is_empty() && out.right_arm.is_empty());
    }

    #[test]
    fn test_edge_mode_measures_from_row_edges() {
        // width 10 -> edge band [0, floor(10 * 0.2)] = [0, 2]
        let config = AvatarConfig {
            arm_band_top_ratio: 0.0,
            arm_band_bottom_ratio: 1.0,
            arm_edge_min_ratio: 0.0,
            arm_edge_max_ratio: 0.2,
            enable_leg_swing: false,
            ..AvatarConfig::default()
        };
        let out = classify(&["  ##########  "], &config);

        let left: Vec<_> = out.left_arm.iter().map(|a| (a.cell.col, a.col_delta_int)).collect();
        let right: Vec<_> = out.right_arm.iter().map(|a| (a.cell.col, a.col_delta_int)).collect();
        assert_eq!(left, vec![(2, 0), (3, 1), (4, 2)]);
        assert_eq!(right, vec![(9, 2), (10, 1), (11, 0)]);
        assert_eq!(out.body.len(), 4);
    }

    #[test]
    fn test_edge_band_respects_minimum() {
        let config = AvatarConfig {
            arm_band_top_ratio: 0.0,
            arm_band_bottom_ratio: 1.0,
            arm_edge_min_ratio: 0.1,
            arm_edge_max_ratio: 0.2,
            enable_leg_swing: false,
            ..AvatarConfig::default()
        };
        let out = classify(&["##########"], &config);
        let left: Vec<_> = out.left_arm.iter().map(|a| a.cell.col).collect();
        let right: Vec<_> = out.right_arm.iter().map(|a| a.cell.col).collect();
        assert_eq!(left, vec![1, 2]);
        assert_eq!(right, vec![7, 8]);
    }

    #[test]
    fn test_center_mode_uses_center_distance() {
        // 9 cols, center 4, thresholds [floor(9*0.3), floor(9*0.5)] = [2, 4]
        let config = AvatarConfig {
            arm_band_top_ratio: 0.0,
            arm_band_bottom_ratio: 1.0,
            arm_classify_mode: ArmClassifyMode::Center,
            arm_threshold_min_ratio: 0.3,
            arm_threshold_max_ratio: 0.5,
            enable_leg_swing: false,
            ..AvatarConfig::default()
        };
        let out = classify(&["#########"], &config);
        let left: Vec<_> = out.left_arm.iter().map(|a| (a.cell.col, a.col_delta_int)).collect();
        let right: Vec<_> = out.right_arm.iter().map(|a| (a.cell.col, a.col_delta_int)).collect();
        assert_eq!(left, vec![(0, 4), (1, 3), (2, 2)]);
        assert_eq!(right, vec![(6, 2), (7, 3), (8, 4)]);
        assert_eq!(out.body.len(), 3);
    }

    #[test]
    fn test_rows_outside_arm_band_are_body() {
        let config = AvatarConfig {
            enable_leg_swing: false,
            ..AvatarConfig::default()
        };
        let rows: Vec<&str> = std::iter::repeat("##########").take(20).collect();
        let out = classify(&rows, &config);

        assert!(out
            .left_arm
            .iter()
            .chain(&out.right_arm)
            .all(|a| (11..=14).contains(&a.cell.row)));
        assert!(!out.left_arm.is_empty());
    }

    #[test]
    fn test_disabled_axes_fall_through_to_body() {
        let config = AvatarConfig {
            enable_arm_swing: false,
            enable_leg_swing: false,
            ..AvatarConfig::default()
        };
        let rows = ["#X#", "###", "###"];
        let out = classify(&rows, &config);
        assert_eq!(out.body.len(), 9);
        assert_eq!(out.len(), 9);
    }

    #[test]
    fn test_every_lit_cell_classified_once() {
        let config = AvatarConfig::default();
        let rows = voxkin_shared::DEFAULT_GLYPH;
        let out = classify(rows, &config);
        assert_eq!(out.len(), lit_count(rows));
    }

    #[test]
    fn test_empty_glyph() {
        let out = classify(&[], &AvatarConfig::default());
        assert!(out.is_empty());
    }
}
