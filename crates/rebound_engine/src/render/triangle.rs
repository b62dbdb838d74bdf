//! Flattened world-space triangles in their GPU buffer layout

use crate::foundation::math::Vec3;
use crate::render::material::MaterialIndex;

/// One world-space triangle as the ray tracer's storage buffer expects it
///
/// std140 rules pad every vec3 to 16 bytes, and the trailing material index
/// is padded to a full 16-byte slot as well: 112 bytes per record.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriangleStd140 {
    /// First vertex position (world space)
    pub v0: [f32; 3],
    _pad0: f32,

    /// Second vertex position (world space)
    pub v1: [f32; 3],
    _pad1: f32,

    /// Third vertex position (world space)
    pub v2: [f32; 3],
    _pad2: f32,

    /// First vertex normal (world space, unit length or all-zero)
    pub n0: [f32; 3],
    _pad3: f32,

    /// Second vertex normal
    pub n1: [f32; 3],
    _pad4: f32,

    /// Third vertex normal
    pub n2: [f32; 3],
    _pad5: f32,

    /// Material table index
    pub material: u32,
    _pad6: [u32; 3],
}

unsafe impl bytemuck::Pod for TriangleStd140 {}
unsafe impl bytemuck::Zeroable for TriangleStd140 {}

impl TriangleStd140 {
    /// Build a record from world-space vertices and normals
    pub fn new(positions: [Vec3; 3], normals: [Vec3; 3], material: MaterialIndex) -> Self {
        Self {
            v0: positions[0].into(),
            _pad0: 0.0,
            v1: positions[1].into(),
            _pad1: 0.0,
            v2: positions[2].into(),
            _pad2: 0.0,
            n0: normals[0].into(),
            _pad3: 0.0,
            n1: normals[1].into(),
            _pad4: 0.0,
            n2: normals[2].into(),
            _pad5: 0.0,
            material: material.0,
            _pad6: [0; 3],
        }
    }
}

/// Frame-scoped buffer of flattened triangles
///
/// Fully rebuilt by the gather pass each frame; never mutated incrementally.
#[derive(Debug, Default)]
pub struct TriangleBuffer {
    triangles: Vec<TriangleStd140>,
}

impl TriangleBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all triangles, keeping the allocation for the next frame
    pub fn clear(&mut self) {
        self.triangles.clear();
    }

    /// Append one triangle
    pub fn push(&mut self, triangle: TriangleStd140) {
        self.triangles.push(triangle);
    }

    /// Number of triangles currently held
    pub fn len(&self) -> usize {
        self.triangles.len()
    }

    /// Whether the buffer holds no triangles
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// The triangles in emission order
    pub fn as_slice(&self) -> &[TriangleStd140] {
        &self.triangles
    }

    /// The raw bytes a storage-buffer upload would copy
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.triangles)
    }
}
