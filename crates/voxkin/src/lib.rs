//! # VOXKIN
//!
//! Voxel avatars from character glyphs.
//!
//! ## Crates
//!
//! - [`avatar`] - the builder: glyph analysis, limb classification, geometry
//! - [`shared`] - math value types and baked-in defaults
//!
//! ## Example
//!
//! ```rust,ignore
//! use voxkin::prelude::*;
//!
//! let mut disposables = DisposeList::new();
//! let avatar = AvatarBuilder::default().build(&Pattern::default_glyph(), &mut disposables);
//! camera.look_at(avatar.look_at);
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]

pub use voxkin_avatar as avatar;
pub use voxkin_shared as shared;

/// The types most callers need.
pub mod prelude {
    pub use voxkin_avatar::{
        AvatarBuild, AvatarBuilder, AvatarConfig, AvatarError, AvatarResult, DisposeList,
        LimbGroup, LimbKind, Pattern, ResourceRegistry, Side,
    };
    pub use voxkin_shared::{Bounds3, Transform, Vec3};
}
