//! Per-voxel instance data for the avatar meshes.

use bytemuck::{Pod, Zeroable};
use voxkin_shared::Vec3;

/// One voxel of an instanced avatar mesh.
///
/// Layout matches a tightly packed instance buffer (two vec4s, no padding),
/// so a mesh's instances can be uploaded with `bytemuck::cast_slice`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct InstanceData {
    /// Translation relative to the owning group (x, y, z) + uniform scale in w.
    pub translation_scale: [f32; 4],

    /// Source glyph row, column and depth layer; w is unused.
    pub cell: [u32; 4],
}

impl InstanceData {
    /// Size in bytes.
    pub const SIZE: usize = std::mem::size_of::<Self>();

    /// Voxel at `translation` for glyph cell (`row`, `col`) on depth `layer`.
    #[allow(clippy::cast_possible_truncation)]
    #[must_use]
    pub fn voxel(translation: Vec3, row: usize, col: usize, layer: u32) -> Self {
        Self {
            translation_scale: [translation.x, translation.y, translation.z, 1.0],
            cell: [row as u32, col as u32, layer, 0],
        }
    }

    /// Translation relative to the owning group.
    #[inline]
    #[must_use]
    pub const fn translation(&self) -> Vec3 {
        Vec3::new(
            self.translation_scale[0],
            self.translation_scale[1],
            self.translation_scale[2],
        )
    }

    /// Glyph `(row, col)` this voxel was emitted for.
    #[inline]
    #[must_use]
    pub const fn grid(&self) -> (u32, u32) {
        (self.cell[0], self.cell[1])
    }

    /// Depth layer index.
    #[inline]
    #[must_use]
    pub const fn layer(&self) -> u32 {
        self.cell[2]
    }
}
