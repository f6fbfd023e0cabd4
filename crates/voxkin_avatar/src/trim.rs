//! # Limb Trimmer
//!
//! Turns raw arm candidates into the final arm lists and removes every limb
//! cell from the body.
//!
//! ## Pass Order
//!
//! 1. Per-row symmetry: both sides keep cells up to the smaller outer delta.
//! 2. Fallback: too few cells (or too short a reach in center mode) rebuilds
//!    the arms from the outermost columns of the arm band.
//! 3. Hands-only: keep the lowest, innermost cells per side.
//! 4. Marker override: explicit hand markers replace all of the above.
//!
//! Feet pass through untouched.

use crate::classify::{ArmCell, Cell, Classification, GlyphLayout};
use crate::config::{ArmClassifyMode, AvatarConfig};
use crate::pattern::{floor_scaled, PatternAnalysis, RowBand};

/// Final cell lists of one avatar, ready for geometry emission.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LimbSelection {
    /// Body cells, disjoint from every limb cell.
    pub body: Vec<Cell>,
    /// Final left arm cells.
    pub arm_left: Vec<ArmCell>,
    /// Final right arm cells.
    pub arm_right: Vec<ArmCell>,
    /// Left foot cells.
    pub left_foot: Vec<Cell>,
    /// Right foot cells.
    pub right_foot: Vec<Cell>,
    /// The arms were rebuilt from the band edges.
    pub used_fallback: bool,
    /// The arms are the explicit hand markers.
    pub used_markers: bool,
}

impl LimbSelection {
    /// Total number of cells across all lists.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.body.len()
            + self.arm_left.len()
            + self.arm_right.len()
            + self.left_foot.len()
            + self.right_foot.len()
    }
}

/// Arm trimming for one analyzed glyph.
#[derive(Debug)]
pub struct LimbTrimmer<'a> {
    config: &'a AvatarConfig,
    analysis: &'a PatternAnalysis,
    layout: GlyphLayout,
    arm_band: RowBand,
}

impl<'a> LimbTrimmer<'a> {
    /// Creates a trimmer over the arm band resolved by the classifier.
    #[must_use]
    pub fn new(
        config: &'a AvatarConfig,
        analysis: &'a PatternAnalysis,
        layout: GlyphLayout,
        arm_band: RowBand,
    ) -> Self {
        Self {
            config,
            analysis,
            layout,
            arm_band,
        }
    }

    /// Runs every pass and excludes limb cells from the body.
    #[must_use]
    pub fn trim(&self, classification: Classification) -> LimbSelection {
        let Classification {
            body,
            left_arm,
            right_arm,
            left_foot,
            right_foot,
            left_hand,
            right_hand,
        } = classification;

        let mut selection = LimbSelection {
            left_foot: if self.config.enable_leg_swing { left_foot } else { Vec::new() },
            right_foot: if self.config.enable_leg_swing { right_foot } else { Vec::new() },
            ..LimbSelection::default()
        };

        if self.config.enable_arm_swing {
            if self.analysis.has_hand_marker {
                tracing::info!(
                    left = left_hand.len(),
                    right = right_hand.len(),
                    "hand markers override arm selection"
                );
                selection.arm_left = left_hand;
                selection.arm_right = right_hand;
                selection.used_markers = true;
            } else {
                let (mut left, mut right) = self.trim_symmetric(&left_arm, &right_arm);
                if self.needs_fallback(&left, &right) {
                    tracing::info!(
                        left = left.len(),
                        right = right.len(),
                        min_cells = self.config.arm_min_cells_for_swing,
                        "arm candidates below threshold, using band edges"
                    );
                    (left, right) = self.fallback();
                    selection.used_fallback = true;
                }
                if self.config.arm_select_hand_only {
                    select_hands(&mut left, self.config.arm_hand_cells_per_side);
                    select_hands(&mut right, self.config.arm_hand_cells_per_side);
                }
                selection.arm_left = left;
                selection.arm_right = right;
            }
        }

        selection.body = self.exclude_limbs(body, &selection);

        tracing::debug!(
            body = selection.body.len(),
            arm_left = selection.arm_left.len(),
            arm_right = selection.arm_right.len(),
            left_foot = selection.left_foot.len(),
            right_foot = selection.right_foot.len(),
            "trimmed limbs"
        );
        selection
    }

    /// Per band row, keeps both sides up to the smaller of their outer deltas.
    ///
    /// A row where either side has no candidate contributes nothing.
    #[must_use]
    pub fn trim_symmetric(
        &self,
        left: &[ArmCell],
        right: &[ArmCell],
    ) -> (Vec<ArmCell>, Vec<ArmCell>) {
        let rows = self.analysis.rows;
        let left_rows = group_by_row(left, rows);
        let right_rows = group_by_row(right, rows);

        let mut kept_left = Vec::new();
        let mut kept_right = Vec::new();

        for row in self.arm_band.rows(rows) {
            let (l, r) = (&left_rows[row], &right_rows[row]);
            // one-sided rows are dropped so every kept row is symmetric
            let (Some(l_max), Some(r_max)) = (max_delta(l), max_delta(r)) else {
                continue;
            };
            let limit = l_max.min(r_max);
            tracing::trace!(row, l_max, r_max, limit, "symmetric arm limit");
            kept_left.extend(l.iter().filter(|a| a.col_delta_int <= limit));
            kept_right.extend(r.iter().filter(|a| a.col_delta_int <= limit));
        }

        (kept_left, kept_right)
    }

    /// True if the trimmed arms are too small to animate.
    #[must_use]
    pub fn needs_fallback(&self, left: &[ArmCell], right: &[ArmCell]) -> bool {
        let min_cells = self.config.arm_min_cells_for_swing;
        if left.len() < min_cells || right.len() < min_cells {
            return true;
        }
        match self.config.arm_classify_mode {
            ArmClassifyMode::Edge => false,
            ArmClassifyMode::Center => {
                let inner = floor_scaled(self.analysis.cols, self.config.arm_threshold_min_ratio);
                let required = inner as f64 + self.config.arm_min_edge_delta_margin;
                outer_reach(left) < required || outer_reach(right) < required
            }
        }
    }

    /// Outermost `arm_fallback_width_cols` columns of every band row.
    ///
    /// Columns are taken in pairs from both edges inward and stop once the
    /// pair would meet, so both sides always have the same length and never
    /// share a cell.
    #[must_use]
    pub fn fallback(&self) -> (Vec<ArmCell>, Vec<ArmCell>) {
        let center = self.analysis.center_col;
        let width = self.config.arm_fallback_width_cols;

        let mut left = Vec::new();
        let mut right = Vec::new();
        let arm_cell = |row: usize, col: usize| {
            ArmCell::new(self.layout.place(row, col), (col as f32 - center).abs())
        };

        for row in self.arm_band.rows(self.analysis.rows) {
            let Some(edge) = self.analysis.edge(row) else {
                continue;
            };
            for w in 0..width {
                let col_left = edge.first_col + w;
                let Some(col_right) = edge.last_col.checked_sub(w) else {
                    break;
                };
                if col_left >= col_right {
                    break;
                }
                left.push(arm_cell(row, col_left));
                right.push(arm_cell(row, col_right));
            }
        }

        (left, right)
    }

    fn exclude_limbs(&self, body: Vec<Cell>, selection: &LimbSelection) -> Vec<Cell> {
        let cols = self.analysis.cols;
        let mut taken = vec![false; self.analysis.rows * cols];
        let mut mark = |cell: &Cell| {
            if let Some(slot) = taken.get_mut(cell.row * cols + cell.col) {
                *slot = true;
            }
        };

        selection
            .arm_left
            .iter()
            .chain(&selection.arm_right)
            .for_each(|a| mark(&a.cell));
        selection
            .left_foot
            .iter()
            .chain(&selection.right_foot)
            .for_each(&mut mark);

        body.into_iter()
            .filter(|cell| !taken[cell.row * cols + cell.col])
            .collect()
    }
}

/// Keeps the lowest rows first, then the smallest delta, up to `keep` cells.
pub fn select_hands(cells: &mut Vec<ArmCell>, keep: usize) {
    cells.sort_by(|a, b| {
        b.cell
            .row
            .cmp(&a.cell.row)
            .then(a.col_delta.total_cmp(&b.col_delta))
    });
    cells.truncate(keep);
}

fn group_by_row(cells: &[ArmCell], rows: usize) -> Vec<Vec<ArmCell>> {
    let mut slots = vec![Vec::new(); rows];
    for cell in cells {
        if let Some(slot) = slots.get_mut(cell.cell.row) {
            slot.push(*cell);
        }
    }
    slots
}

fn max_delta(cells: &[ArmCell]) -> Option<usize> {
    cells.iter().map(|a| a.col_delta_int).max()
}

fn outer_reach(cells: &[ArmCell]) -> f64 {
    cells
        .iter()
        .map(|a| f64::from(a.col_delta))
        .fold(0.0, f64::max)
}
