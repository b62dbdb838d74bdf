//! Material table and its GPU layout

use crate::foundation::math::Vec3;

/// Index into the global [`MaterialTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MaterialIndex(pub u32);

impl MaterialIndex {
    /// The default material; always present at slot 0
    pub const DEFAULT: MaterialIndex = MaterialIndex(0);
}

impl Default for MaterialIndex {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Surface parameters shared by both rendering backends
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    /// Base (albedo) color
    pub base_color: Vec3,

    /// Surface roughness in [0, 1]
    pub roughness: f32,

    /// Mirror reflectivity in [0, 1]
    pub reflectivity: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            base_color: Vec3::new(1.0, 1.0, 1.0),
            roughness: 0.8,
            reflectivity: 0.8,
        }
    }
}

/// std140-compatible material record: 32 bytes, vec3 padded to 16
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialStd140 {
    /// Base color, occupying a padded vec4 slot
    pub base_color: [f32; 3],
    _pad0: f32,

    /// Surface roughness
    pub roughness: f32,

    /// Mirror reflectivity
    pub reflectivity: f32,
    _pad1: [f32; 2],
}

unsafe impl bytemuck::Pod for MaterialStd140 {}
unsafe impl bytemuck::Zeroable for MaterialStd140 {}

impl From<&Material> for MaterialStd140 {
    fn from(material: &Material) -> Self {
        Self {
            base_color: material.base_color.into(),
            _pad0: 0.0,
            roughness: material.roughness,
            reflectivity: material.reflectivity,
            _pad1: [0.0; 2],
        }
    }
}

/// Ordered, indexable material storage
///
/// Slot 0 always exists and holds the default material, so a
/// [`MaterialIndex`] of 0 is valid on any table.
#[derive(Debug, Clone)]
pub struct MaterialTable {
    materials: Vec<Material>,
}

impl Default for MaterialTable {
    fn default() -> Self {
        Self::new()
    }
}

impl MaterialTable {
    /// Create a table holding only the default material
    pub fn new() -> Self {
        Self {
            materials: vec![Material::default()],
        }
    }

    /// Append a material and return its index
    pub fn push(&mut self, material: Material) -> MaterialIndex {
        let index = MaterialIndex(self.materials.len() as u32);
        self.materials.push(material);
        index
    }

    /// Look up a material, falling back to the default for stale indices
    pub fn get(&self, index: MaterialIndex) -> &Material {
        self.materials.get(index.0 as usize).unwrap_or(&self.materials[0])
    }

    /// Number of materials, including the default
    pub fn len(&self) -> usize {
        self.materials.len()
    }

    /// A material table is never empty
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The table in its GPU upload layout
    pub fn std140_records(&self) -> Vec<MaterialStd140> {
        self.materials.iter().map(MaterialStd140::from).collect()
    }
}
