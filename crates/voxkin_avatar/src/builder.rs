//! # Avatar Builder
//!
//! Entry point: glyph in, limb groups and look-at point out.
//!
//! ```text
//! Pattern → PatternAnalysis → CellClassifier → LimbTrimmer → GeometryEmitter
//! ```
//!
//! Every stage runs once, in order, with no retries. The builder holds only
//! its validated config, so one builder can serve any number of builds and
//! builders with different configs can run on different threads.

use voxkin_shared::Vec3;

use crate::classify::{CellClassifier, GlyphLayout, Side};
use crate::config::AvatarConfig;
use crate::emit::GeometryEmitter;
use crate::error::AvatarResult;
use crate::pattern::{Pattern, PatternAnalysis};
use crate::scene::{BoxGeometry, InstancedMesh, LimbGroup, ResourceRegistry, StandardMaterial};
use crate::trim::{LimbSelection, LimbTrimmer};

/// Everything one build produces.
#[derive(Debug, Clone, PartialEq)]
pub struct AvatarBuild {
    /// Body voxels, avatar-local, no pivot.
    pub body: InstancedMesh,
    /// Left arm, absent if no cells survived or arm swing is off.
    pub arm_left: Option<LimbGroup>,
    /// Right arm.
    pub arm_right: Option<LimbGroup>,
    /// Left foot, absent if no cells or leg swing is off.
    pub left_foot: Option<LimbGroup>,
    /// Right foot.
    pub right_foot: Option<LimbGroup>,
    /// Camera target in avatar-local coordinates.
    pub look_at: Vec3,
    /// Reference height the foot pivots are clamped against.
    pub baseline_y: f32,
    /// The cell lists the geometry was built from.
    pub selection: LimbSelection,
}

impl AvatarBuild {
    /// Present limb groups, in arm-left, arm-right, left-foot, right-foot order.
    pub fn limbs(&self) -> impl Iterator<Item = &LimbGroup> {
        [
            &self.arm_left,
            &self.arm_right,
            &self.left_foot,
            &self.right_foot,
        ]
        .into_iter()
        .flatten()
    }

    /// Voxel instances across the body and every limb.
    #[must_use]
    pub fn voxel_count(&self) -> usize {
        self.body.count() + self.limbs().map(|l| l.mesh.count()).sum::<usize>()
    }
}

/// Builds avatars from glyphs under one configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AvatarBuilder {
    config: AvatarConfig,
}

impl AvatarBuilder {
    /// Validates `config` and creates a builder.
    ///
    /// # Errors
    ///
    /// Returns [`crate::AvatarError::InvalidConfig`] if any tunable is out
    /// of range.
    pub fn new(config: AvatarConfig) -> AvatarResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The builder's configuration.
    #[must_use]
    pub const fn config(&self) -> &AvatarConfig {
        &self.config
    }

    /// Classifies and trims `pattern` without allocating any geometry.
    #[must_use]
    pub fn select(&self, pattern: &Pattern) -> LimbSelection {
        self.prepare(pattern).1
    }

    /// Builds the avatar, registering its geometry and material with
    /// `registry` exactly once each.
    #[must_use]
    pub fn build<R: ResourceRegistry + ?Sized>(
        &self,
        pattern: &Pattern,
        registry: &mut R,
    ) -> AvatarBuild {
        let config = &self.config;
        let (layout, selection) = self.prepare(pattern);

        let geometry = registry.register_geometry(BoxGeometry::cube(config.cell_size));
        let material = registry.register_material(StandardMaterial::new(
            config.color,
            config.roughness,
            config.metalness,
        ));

        let baseline_y = layout.baseline_y();
        let emitter = GeometryEmitter::new(config, baseline_y, geometry, material);

        let body = emitter.body_mesh(&selection.body);
        let (arm_left, arm_right) = if config.enable_arm_swing {
            (
                emitter.arm_group(&selection.arm_left, Side::Left),
                emitter.arm_group(&selection.arm_right, Side::Right),
            )
        } else {
            (None, None)
        };
        let (left_foot, right_foot) = if config.enable_leg_swing {
            (
                emitter.foot_group(&selection.left_foot, Side::Left),
                emitter.foot_group(&selection.right_foot, Side::Right),
            )
        } else {
            (None, None)
        };

        let mut build = AvatarBuild {
            body,
            arm_left,
            arm_right,
            left_foot,
            right_foot,
            look_at: Vec3::ZERO,
            baseline_y,
            selection,
        };
        build.look_at = emitter.look_at(&build.body, build.limbs());

        tracing::info!(
            body = build.body.count(),
            limbs = build.limbs().count(),
            voxels = build.voxel_count(),
            look_at_y = build.look_at.y,
            "avatar built"
        );
        build
    }

    fn prepare(&self, pattern: &Pattern) -> (GlyphLayout, LimbSelection) {
        let config = &self.config;
        let analysis = PatternAnalysis::analyze(pattern, config.blank, config.hand_marker);
        let layout = GlyphLayout::new(&analysis, config.cell_size, config.baseline_lift);

        tracing::debug!(
            rows = analysis.rows,
            cols = analysis.cols,
            has_hand_marker = analysis.has_hand_marker,
            "analyzed glyph"
        );

        let classifier = CellClassifier::new(config, &analysis, layout);
        let classification = classifier.classify(pattern);
        let trimmer = LimbTrimmer::new(config, &analysis, layout, classifier.arm_band());
        (layout, trimmer.trim(classification))
    }
}
