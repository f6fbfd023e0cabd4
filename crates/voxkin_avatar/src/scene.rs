//! # Scene Resources
//!
//! Handles and descriptions of the graphics resources one avatar build
//! allocates, plus the groups and meshes it emits.
//!
//! A build allocates exactly one box geometry and one material and hands
//! both to a [`ResourceRegistry`] so the host scene can release them later.
//! Every mesh of the avatar shares those two handles.

use voxkin_shared::{Bounds3, Transform, Vec3};

use crate::classify::{Cell, Side};
use crate::instancing::InstanceData;

/// Registry-assigned geometry ID.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct GeometryHandle(pub u32);

impl GeometryHandle {
    /// Returns the raw ID.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Registry-assigned material ID.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct MaterialHandle(pub u32);

impl MaterialHandle {
    /// Returns the raw ID.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

/// Axis-aligned cube geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoxGeometry {
    /// Edge length.
    pub edge: f32,
}

impl BoxGeometry {
    /// Cube with edge `edge`.
    #[must_use]
    pub const fn cube(edge: f32) -> Self {
        Self { edge }
    }
}

/// Physically based opaque material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardMaterial {
    /// Base color (0xRRGGBB).
    pub color: u32,
    /// Roughness, 0..=1.
    pub roughness: f32,
    /// Metalness, 0..=1.
    pub metalness: f32,
}

impl StandardMaterial {
    /// Creates a material.
    #[must_use]
    pub const fn new(color: u32, roughness: f32, metalness: f32) -> Self {
        Self {
            color,
            roughness,
            metalness,
        }
    }

    /// Base color as RGB in 0..=1.
    #[must_use]
    pub fn rgb(&self) -> [f32; 3] {
        let channel = |shift: u32| ((self.color >> shift) & 0xff) as f32 / 255.0;
        [channel(16), channel(8), channel(0)]
    }
}

/// A resource registered for disposal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Resource {
    /// Box geometry.
    Geometry(GeometryHandle, BoxGeometry),
    /// Standard material.
    Material(MaterialHandle, StandardMaterial),
}

/// Sink for graphics resources allocated during a build.
///
/// The host scene owns the resources' lifetime; the builder only reports
/// what it allocated.
pub trait ResourceRegistry {
    /// Records a geometry and returns its handle.
    fn register_geometry(&mut self, geometry: BoxGeometry) -> GeometryHandle;

    /// Records a material and returns its handle.
    fn register_material(&mut self, material: StandardMaterial) -> MaterialHandle;
}

/// In-memory [`ResourceRegistry`] that hands out sequential handles.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisposeList {
    resources: Vec<Resource>,
    next_id: u32,
}

impl DisposeList {
    /// Creates an empty list.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered resources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// True when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Registered resources in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Resource> {
        self.resources.iter()
    }

    /// Number of registered geometries.
    #[must_use]
    pub fn geometry_count(&self) -> usize {
        self.iter()
            .filter(|r| matches!(r, Resource::Geometry(..)))
            .count()
    }

    /// Number of registered materials.
    #[must_use]
    pub fn material_count(&self) -> usize {
        self.iter()
            .filter(|r| matches!(r, Resource::Material(..)))
            .count()
    }

    /// Removes and returns every resource, newest first.
    pub fn dispose_all(&mut self) -> Vec<Resource> {
        let mut drained: Vec<_> = self.resources.drain(..).collect();
        drained.reverse();
        tracing::debug!(count = drained.len(), "disposing avatar resources");
        drained
    }

    fn next_handle(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }
}

impl ResourceRegistry for DisposeList {
    fn register_geometry(&mut self, geometry: BoxGeometry) -> GeometryHandle {
        let handle = GeometryHandle(self.next_handle());
        self.resources.push(Resource::Geometry(handle, geometry));
        handle
    }

    fn register_material(&mut self, material: StandardMaterial) -> MaterialHandle {
        let handle = MaterialHandle(self.next_handle());
        self.resources.push(Resource::Material(handle, material));
        handle
    }
}

/// Instanced voxel mesh sharing one geometry and one material.
#[derive(Debug, Clone, PartialEq)]
pub struct InstancedMesh {
    /// Shared cube geometry.
    pub geometry: GeometryHandle,
    /// Shared material.
    pub material: MaterialHandle,
    /// Voxel edge length of `geometry`.
    pub edge: f32,
    /// One entry per voxel.
    pub instances: Vec<InstanceData>,
}

impl InstancedMesh {
    /// Number of voxel instances.
    #[inline]
    #[must_use]
    pub fn count(&self) -> usize {
        self.instances.len()
    }

    /// Bounds of every voxel cube, offset by `origin`.
    #[must_use]
    pub fn bounds(&self, origin: Vec3) -> Bounds3 {
        let mut bounds = Bounds3::EMPTY;
        for instance in &self.instances {
            bounds.include_cube(origin + instance.translation(), self.edge);
        }
        bounds
    }

    /// Instance data as raw bytes for upload.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.instances)
    }
}

/// Which limb a group animates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimbKind {
    /// Arm, swung about the shoulder side of its pivot.
    Arm(Side),
    /// Foot, swung about a pivot above the ground.
    Foot(Side),
}

impl LimbKind {
    /// Body side of the limb.
    #[must_use]
    pub const fn side(self) -> Side {
        match self {
            Self::Arm(side) | Self::Foot(side) => side,
        }
    }
}

/// A limb: one mesh whose instances are relative to the group's pivot.
///
/// Rotating `transform` about its position swings the whole limb.
#[derive(Debug, Clone, PartialEq)]
pub struct LimbGroup {
    /// Which limb this is.
    pub kind: LimbKind,
    /// Group transform; its position is the pivot.
    pub transform: Transform,
    /// Voxels relative to the pivot.
    pub mesh: InstancedMesh,
    /// Glyph cells the limb was built from.
    pub cells: Vec<Cell>,
}

impl LimbGroup {
    /// Pivot in avatar-local coordinates.
    #[inline]
    #[must_use]
    pub const fn pivot(&self) -> Vec3 {
        self.transform.position
    }

    /// Bounds of the limb's voxels in avatar-local coordinates.
    #[must_use]
    pub fn bounds(&self) -> Bounds3 {
        self.mesh.bounds(self.pivot())
    }
}
