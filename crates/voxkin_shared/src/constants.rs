//! # Avatar Defaults
//!
//! Baked-in tuning for the player avatar. Every value here is only a
//! default: the builder reads its tunables from an explicit configuration
//! value, and TOML files may override any subset of them.

// =============================================================================
// GLYPH
// =============================================================================

/// Character that marks an "off" cell.
pub const BLANK: char = ' ';

/// Character reserved as an explicit hand marker.
pub const HAND_MARKER: char = 'X';

/// Default avatar silhouette, row 0 at the top.
pub const DEFAULT_GLYPH: &[&str] = &[
    "      #####      ",
    "     #######     ",
    "     ## # ##     ",
    "     #######     ",
    "     ##   ##     ",
    "      #####      ",
    "       ###       ",
    "   ###########   ",
    "  #############  ",
    " ############### ",
    " ###  #####  ### ",
    " ###  #####  ### ",
    " ###  #####  ### ",
    " ###  #####  ### ",
    " ###  #####  ### ",
    "      #####      ",
    "      ## ##      ",
    "      ## ##      ",
    "      ## ##      ",
    "     ### ###     ",
];

// =============================================================================
// VOXEL GEOMETRY
// =============================================================================

/// Edge length of one voxel.
pub const AVATAR_CELL: f32 = 0.1;

/// Number of voxel layers stacked along Z.
pub const AVATAR_DEPTH: u32 = 3;

/// Distance between depth layers.
pub const AVATAR_SPACING: f32 = 0.1;

/// Lift applied to the glyph so its bottom row clears the ground plane.
pub const AVATAR_BASELINE_LIFT: f32 = 0.02;

/// Avatar base color (0xRRGGBB).
pub const AVATAR_COLOR: u32 = 0x00_c8_ff;

/// Surface roughness of the avatar material.
pub const AVATAR_MAT_ROUGHNESS: f32 = 0.6;

/// Surface metalness of the avatar material.
pub const AVATAR_MAT_METALNESS: f32 = 0.1;

// =============================================================================
// ARM EXTRACTION
// =============================================================================

/// Top of the arm band as a fraction of total rows (upper torso, below head).
pub const ARM_BAND_TOP_RATIO: f64 = 0.58;

/// Bottom of the arm band as a fraction of total rows (above the waist).
pub const ARM_BAND_BOTTOM_RATIO: f64 = 0.72;

/// Inner bound of the arm band, as a fraction of the row's width from its edge.
pub const ARM_EDGE_MIN_RATIO: f64 = 0.0;

/// Outer bound of the arm band (~2-3 columns in from the edge).
pub const ARM_EDGE_MAX_RATIO: f64 = 0.12;

/// Minimum center distance for arm columns, as a fraction of total columns.
pub const ARM_THRESHOLD_MIN_RATIO: f64 = 0.0;

/// Maximum center distance for arm columns, as a fraction of total columns.
pub const ARM_THRESHOLD_MAX_RATIO: f64 = 0.12;

/// Fewer surviving cells than this on either side triggers the fallback.
pub const ARM_MIN_CELLS_FOR_SWING: usize = 8;

/// Columns taken inward from each row edge by the fallback.
pub const ARM_FALLBACK_WIDTH_COLS: usize = 1;

/// Required reach past the inner threshold before center-mode arms count.
pub const ARM_MIN_EDGE_DELTA_MARGIN: f64 = 0.5;

/// Reduce arms to the hands (outer/lower cells).
pub const ARM_SELECT_HAND_ONLY: bool = true;

/// Maximum hand cells kept per side.
pub const ARM_HAND_CELLS_PER_SIDE: usize = 2;

/// Arm swing on/off.
pub const ENABLE_ARM_SWING: bool = true;

// =============================================================================
// FOOT EXTRACTION
// =============================================================================

/// Top of the foot band as a fraction of total rows.
pub const LEG_BAND_TOP_RATIO: f64 = 0.85;

/// Maximum center distance for foot columns, as a fraction of total columns.
pub const LEG_THRESHOLD_CENTER_RATIO: f64 = 0.25;

/// Foot swing on/off.
pub const ENABLE_LEG_SWING: bool = true;

/// Minimum foot pivot height above the baseline, in cells.
pub const FOOT_PIVOT_MIN_CELLS: f32 = 1.2;

// =============================================================================
// FRAMING
// =============================================================================

/// Look-at height as a fraction of the avatar's bounding-box height.
pub const TARGET_HEIGHT_RATIO: f32 = 0.6;

/// Guards `floor` against float truncation at exact integer boundaries.
pub const COL_DELTA_EPSILON: f64 = 1e-6;
