//! # Avatar Configuration
//!
//! Every tunable of the avatar build lives in one [`AvatarConfig`] value.
//! Two builders with different configs never share state, so avatar
//! variants can be built side by side.
//!
//! ## Example
//!
//! ```rust,ignore
//! let config = AvatarConfig::from_toml_str(r#"
//!     enable_leg_swing = false
//!     arm_band_top_ratio = 0.5
//! "#)?;
//! let builder = AvatarBuilder::new(config)?;
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use voxkin_shared::constants as defaults;

use crate::error::{AvatarError, AvatarResult};

/// How the classifier measures a cell's distance for arm candidacy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArmClassifyMode {
    /// Distance from the row's nearest filled edge, scaled by row width.
    #[default]
    Edge,
    /// Distance from the glyph's center column, scaled by total columns.
    Center,
}

/// Complete tuning for one avatar build.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AvatarConfig {
    /// Character for "off" cells.
    pub blank: char,
    /// Character reserved as an explicit hand marker.
    pub hand_marker: char,

    /// Edge length of one voxel.
    pub cell_size: f32,
    /// Voxel layers stacked along Z.
    pub depth: u32,
    /// Distance between depth layers.
    pub spacing: f32,
    /// Height of the bottom glyph row above the ground plane.
    pub baseline_lift: f32,

    /// Material color (0xRRGGBB).
    pub color: u32,
    /// Material roughness.
    pub roughness: f32,
    /// Material metalness.
    pub metalness: f32,

    /// Arm band top, fraction of rows.
    pub arm_band_top_ratio: f64,
    /// Arm band bottom (inclusive), fraction of rows.
    pub arm_band_bottom_ratio: f64,
    /// Distance measure used for arm candidates.
    pub arm_classify_mode: ArmClassifyMode,
    /// Edge mode: inner bound, fraction of row width.
    pub arm_edge_min_ratio: f64,
    /// Edge mode: outer bound, fraction of row width.
    pub arm_edge_max_ratio: f64,
    /// Center mode: minimum center distance, fraction of columns.
    pub arm_threshold_min_ratio: f64,
    /// Center mode: maximum center distance, fraction of columns.
    pub arm_threshold_max_ratio: f64,
    /// Either side below this many cells triggers the fallback.
    pub arm_min_cells_for_swing: usize,
    /// Columns per side per row emitted by the fallback.
    pub arm_fallback_width_cols: usize,
    /// Center mode: required reach past the inner threshold.
    pub arm_min_edge_delta_margin: f64,
    /// Reduce each arm to its hand cells.
    pub arm_select_hand_only: bool,
    /// Hand cells kept per side.
    pub arm_hand_cells_per_side: usize,
    /// Arm classification on/off.
    pub enable_arm_swing: bool,

    /// Foot band top, fraction of rows.
    pub leg_band_top_ratio: f64,
    /// Maximum center distance for foot columns, fraction of columns.
    pub leg_threshold_center_ratio: f64,
    /// Foot classification on/off.
    pub enable_leg_swing: bool,
    /// Minimum foot pivot height above the baseline, in cells.
    pub foot_pivot_min_cells: f32,

    /// Look-at height as a fraction of the bounding-box height.
    pub target_height_ratio: f32,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            blank: defaults::BLANK,
            hand_marker: defaults::HAND_MARKER,
            cell_size: defaults::AVATAR_CELL,
            depth: defaults::AVATAR_DEPTH,
            spacing: defaults::AVATAR_SPACING,
            baseline_lift: defaults::AVATAR_BASELINE_LIFT,
            color: defaults::AVATAR_COLOR,
            roughness: defaults::AVATAR_MAT_ROUGHNESS,
            metalness: defaults::AVATAR_MAT_METALNESS,
            arm_band_top_ratio: defaults::ARM_BAND_TOP_RATIO,
            arm_band_bottom_ratio: defaults::ARM_BAND_BOTTOM_RATIO,
            arm_classify_mode: ArmClassifyMode::Edge,
            arm_edge_min_ratio: defaults::ARM_EDGE_MIN_RATIO,
            arm_edge_max_ratio: defaults::ARM_EDGE_MAX_RATIO,
            arm_threshold_min_ratio: defaults::ARM_THRESHOLD_MIN_RATIO,
            arm_threshold_max_ratio: defaults::ARM_THRESHOLD_MAX_RATIO,
            arm_min_cells_for_swing: defaults::ARM_MIN_CELLS_FOR_SWING,
            arm_fallback_width_cols: defaults::ARM_FALLBACK_WIDTH_COLS,
            arm_min_edge_delta_margin: defaults::ARM_MIN_EDGE_DELTA_MARGIN,
            arm_select_hand_only: defaults::ARM_SELECT_HAND_ONLY,
            arm_hand_cells_per_side: defaults::ARM_HAND_CELLS_PER_SIDE,
            enable_arm_swing: defaults::ENABLE_ARM_SWING,
            leg_band_top_ratio: defaults::LEG_BAND_TOP_RATIO,
            leg_threshold_center_ratio: defaults::LEG_THRESHOLD_CENTER_RATIO,
            enable_leg_swing: defaults::ENABLE_LEG_SWING,
            foot_pivot_min_cells: defaults::FOOT_PIVOT_MIN_CELLS,
            target_height_ratio: defaults::TARGET_HEIGHT_RATIO,
        }
    }
}

impl AvatarConfig {
    /// Parses a config from TOML text. Missing fields keep their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`AvatarError::ConfigParse`] for malformed TOML or unknown
    /// fields, and [`AvatarError::InvalidConfig`] if a value is out of range.
    pub fn from_toml_str(text: &str) -> AvatarResult<Self> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`AvatarError::Io`] if the file cannot be read, otherwise
    /// the same errors as [`AvatarConfig::from_toml_str`].
    pub fn from_toml_file(path: impl AsRef<Path>) -> AvatarResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|err| AvatarError::Io {
            path: path.display().to_string(),
            message: err.to_string(),
        })?;
        Self::from_toml_str(&text)
    }

    /// Serializes the config back to TOML.
    ///
    /// # Errors
    ///
    /// Returns [`AvatarError::ConfigParse`] if serialization fails.
    pub fn to_toml_string(&self) -> AvatarResult<String> {
        toml::to_string(self).map_err(|err| AvatarError::ConfigParse(err.to_string()))
    }

    /// Checks every field, reporting the first invalid one.
    ///
    /// A zero-height arm band (`top >= bottom` after flooring) is allowed;
    /// it simply routes every build through the fallback.
    ///
    /// # Errors
    ///
    /// Returns [`AvatarError::InvalidConfig`] naming the offending field.
    pub fn validate(&self) -> AvatarResult<()> {
        if self.blank == self.hand_marker {
            return Err(AvatarError::InvalidConfig(format!(
                "blank and hand_marker must differ (both {:?})",
                self.blank
            )));
        }
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            return Err(AvatarError::InvalidConfig(format!(
                "cell_size must be positive, got {}",
                self.cell_size
            )));
        }
        if self.depth == 0 {
            return Err(AvatarError::InvalidConfig(
                "depth must be at least 1".to_string(),
            ));
        }
        check_non_negative("spacing", f64::from(self.spacing))?;
        check_finite("baseline_lift", f64::from(self.baseline_lift))?;
        check_finite("foot_pivot_min_cells", f64::from(self.foot_pivot_min_cells))?;
        check_finite("target_height_ratio", f64::from(self.target_height_ratio))?;
        check_non_negative("arm_min_edge_delta_margin", self.arm_min_edge_delta_margin)?;
        check_unit("roughness", f64::from(self.roughness))?;
        check_unit("metalness", f64::from(self.metalness))?;

        for (name, value) in [
            ("arm_band_top_ratio", self.arm_band_top_ratio),
            ("arm_band_bottom_ratio", self.arm_band_bottom_ratio),
            ("arm_edge_min_ratio", self.arm_edge_min_ratio),
            ("arm_edge_max_ratio", self.arm_edge_max_ratio),
            ("arm_threshold_min_ratio", self.arm_threshold_min_ratio),
            ("arm_threshold_max_ratio", self.arm_threshold_max_ratio),
            ("leg_band_top_ratio", self.leg_band_top_ratio),
            ("leg_threshold_center_ratio", self.leg_threshold_center_ratio),
        ] {
            check_unit(name, value)?;
        }

        if self.arm_edge_min_ratio > self.arm_edge_max_ratio {
            return Err(AvatarError::InvalidConfig(format!(
                "arm_edge_min_ratio ({}) exceeds arm_edge_max_ratio ({})",
                self.arm_edge_min_ratio, self.arm_edge_max_ratio
            )));
        }
        if self.arm_threshold_min_ratio > self.arm_threshold_max_ratio {
            return Err(AvatarError::InvalidConfig(format!(
                "arm_threshold_min_ratio ({}) exceeds arm_threshold_max_ratio ({})",
                self.arm_threshold_min_ratio, self.arm_threshold_max_ratio
            )));
        }
        if self.color > 0x00ff_ffff {
            return Err(AvatarError::InvalidConfig(format!(
                "color must be 0xRRGGBB, got {:#x}",
                self.color
            )));
        }
        Ok(())
    }
}

fn check_finite(name: &str, value: f64) -> AvatarResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(AvatarError::InvalidConfig(format!("{name} must be finite, got {value}")))
    }
}

fn check_non_negative(name: &str, value: f64) -> AvatarResult<()> {
    check_finite(name, value)?;
    if value < 0.0 {
        return Err(AvatarError::InvalidConfig(format!(
            "{name} must not be negative, got {value}"
        )));
    }
    Ok(())
}

fn check_unit(name: &str, value: f64) -> AvatarResult<()> {
    check_finite(name, value)?;
    if !(0.0..=1.0).contains(&value) {
        return Err(AvatarError::InvalidConfig(format!(
            "{name} must be within [0, 1], got {value}"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(AvatarConfig::default().validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AvatarConfig::from_toml_str(
            r#"
            enable_leg_swing = false
            arm_classify_mode = "center"
            arm_band_top_ratio = 0.5
            "#,
        )
        .expect("valid toml");

        assert!(!config.enable_leg_swing);
        assert_eq!(config.arm_classify_mode, ArmClassifyMode::Center);
        assert_eq!(config.arm_band_top_ratio, 0.5);
        assert_eq!(config.arm_band_bottom_ratio, AvatarConfig::default().arm_band_bottom_ratio);
        assert_eq!(config.hand_marker, 'X');
    }

    #[test]
    fn test_unknown_field_is_a_parse_error() {
        let err = AvatarConfig::from_toml_str("arm_band_middle_ratio = 0.3").unwrap_err();
        assert!(matches!(err, AvatarError::ConfigParse(_)));
    }

    #[test]
    fn test_out_of_range_ratio_rejected() {
        let err = AvatarConfig::from_toml_str("leg_band_top_ratio = 1.5").unwrap_err();
        match err {
            AvatarError::InvalidConfig(msg) => assert!(msg.contains("leg_band_top_ratio")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_inverted_edge_band_rejected() {
        let config = AvatarConfig {
            arm_edge_min_ratio: 0.3,
            arm_edge_max_ratio: 0.1,
            ..AvatarConfig::default()
        };
        assert!(matches!(config.validate(), Err(AvatarError::InvalidConfig(_))));
    }

    #[test]
    fn test_zero_height_arm_band_allowed() {
        let config = AvatarConfig {
            arm_band_top_ratio: 0.8,
            arm_band_bottom_ratio: 0.2,
            ..AvatarConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_blank_and_marker_must_differ() {
        let config = AvatarConfig {
            blank: 'X',
            ..AvatarConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_depth_rejected() {
        let config = AvatarConfig {
            depth: 0,
            ..AvatarConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = AvatarConfig {
            arm_hand_cells_per_side: 1,
            hand_marker: 'H',
            ..AvatarConfig::default()
        };
        let text = config.to_toml_string().expect("serializable");
        let parsed = AvatarConfig::from_toml_str(&text).expect("parses back");
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = AvatarConfig::from_toml_file("/definitely/not/here.toml").unwrap_err();
        assert!(matches!(err, AvatarError::Io { .. }));
    }
}
