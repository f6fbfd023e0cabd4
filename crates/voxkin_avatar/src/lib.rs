//! # VOXKIN Avatar Builder
//!
//! Turns a character-grid glyph into a voxel avatar with swingable limbs.
//!
//! ## Pipeline
//!
//! ```text
//! ┌───────────────┐   ┌───────────────┐   ┌──────────────┐   ┌────────────────┐
//! │ PatternAnalysis│ → │ CellClassifier │ → │ LimbTrimmer  │ → │ GeometryEmitter│
//! │ rows/cols/edges│   │ body/arm/foot  │   │ symmetry,    │   │ instanced      │
//! │ hand markers   │   │ hand markers   │   │ fallback,    │   │ groups @ pivot │
//! └───────────────┘   └───────────────┘   │ markers      │   │ look-at point  │
//!                                         └──────────────┘   └────────────────┘
//! ```
//!
//! ## Design Principles
//!
//! 1. **Deterministic** - same glyph + same config = same avatar
//! 2. **Partitioned** - every lit cell ends up in exactly one mesh
//! 3. **Infallible builds** - configuration is validated once, odd glyphs are policy
//! 4. **No renderer** - resources are described and registered, never created
//!
//! ## Example
//!
//! ```rust,ignore
//! use voxkin_avatar::{AvatarBuilder, AvatarConfig, DisposeList, Pattern};
//!
//! let builder = AvatarBuilder::new(AvatarConfig::from_toml_file("avatar.toml")?)?;
//! let mut disposables = DisposeList::new();
//! let avatar = builder.build(&Pattern::default_glyph(), &mut disposables);
//!
//! if let Some(arm) = &avatar.arm_left {
//!     animator.swing(arm.pivot());
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod builder;
pub mod classify;
pub mod config;
pub mod emit;
pub mod error;
pub mod instancing;
pub mod pattern;
pub mod scene;
pub mod trim;

pub use builder::{AvatarBuild, AvatarBuilder};
pub use classify::{ArmCell, Cell, CellClass, CellClassifier, Classification, GlyphLayout, Side};
pub use config::{ArmClassifyMode, AvatarConfig};
pub use emit::GeometryEmitter;
pub use error::{AvatarError, AvatarResult};
pub use instancing::InstanceData;
pub use pattern::{Pattern, PatternAnalysis, RowBand, RowEdge};
pub use scene::{
    BoxGeometry, DisposeList, GeometryHandle, InstancedMesh, LimbGroup, LimbKind,
    MaterialHandle, Resource, ResourceRegistry, StandardMaterial,
};
pub use trim::{LimbSelection, LimbTrimmer};
