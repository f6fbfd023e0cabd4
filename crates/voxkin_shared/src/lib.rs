//! # VOXKIN Shared
//!
//! Common types used by the avatar builder and the tools around it.
//!
//! ## RULE
//!
//! This crate must NEVER depend on scene-graph or rendering types.
//! If you need instanced meshes or resource handles, put them in
//! `voxkin_avatar`.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod math;

pub use constants::{DEFAULT_GLYPH, HAND_MARKER, BLANK};
pub use math::{Bounds3, Quaternion, Transform, Vec2, Vec3};
