//! Mesh data, procedural generators, and the mesh registry

use slotmap::SlotMap;

use crate::foundation::math::{Vec2, Vec3};

slotmap::new_key_type! {
    /// Opaque handle to a mesh stored in a [`MeshRegistry`]
    pub struct MeshHandle;
}

/// Static geometry data, immutable after load
///
/// Normals, UVs, and tangent frames are optional; the index list always
/// describes triangles (stride 3, in emission order). Meshes are shared by
/// handle, so several scene nodes may reference the same data.
#[derive(Debug, Clone, Default)]
pub struct Mesh {
    /// Vertex positions
    pub positions: Vec<Vec3>,

    /// Vertex normals; empty when the mesh has none
    pub normals: Vec<Vec3>,

    /// Texture coordinates; empty when the mesh has none
    pub uvs: Vec<Vec2>,

    /// Tangent vectors for normal mapping; filled by [`Mesh::compute_tangents`]
    pub tangents: Vec<Vec3>,

    /// Bitangent vectors for normal mapping
    pub bitangents: Vec<Vec3>,

    /// Triangle index list, stride 3
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a mesh from raw attribute arrays
    pub fn new(positions: Vec<Vec3>, normals: Vec<Vec3>, uvs: Vec<Vec2>, indices: Vec<u32>) -> Self {
        Self {
            positions,
            normals,
            uvs,
            tangents: Vec::new(),
            bitangents: Vec::new(),
            indices,
        }
    }

    /// Number of indices in the mesh
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    /// Axis-aligned box centered at the origin
    ///
    /// `invert_faces` turns the box inside out (interior walls): normals
    /// point inward and the winding flips. With `tile_texture` the UVs span
    /// `face_extent / texture_scale` so a texture repeats across large faces
    /// instead of stretching.
    pub fn cuboid(dimensions: Vec3, texture_scale: Vec2, tile_texture: bool, invert_faces: bool) -> Self {
        let h = dimensions * 0.5;
        let mut mesh = Self::default();

        // corners in CCW order seen from outside along the face normal
        let faces: [([Vec3; 4], Vec3, Vec2); 6] = [
            (
                [
                    Vec3::new(-h.x, -h.y, h.z),
                    Vec3::new(h.x, -h.y, h.z),
                    Vec3::new(h.x, h.y, h.z),
                    Vec3::new(-h.x, h.y, h.z),
                ],
                Vec3::new(0.0, 0.0, 1.0),
                Vec2::new(dimensions.x, dimensions.y),
            ),
            (
                [
                    Vec3::new(h.x, -h.y, -h.z),
                    Vec3::new(-h.x, -h.y, -h.z),
                    Vec3::new(-h.x, h.y, -h.z),
                    Vec3::new(h.x, h.y, -h.z),
                ],
                Vec3::new(0.0, 0.0, -1.0),
                Vec2::new(dimensions.x, dimensions.y),
            ),
            (
                [
                    Vec3::new(h.x, -h.y, h.z),
                    Vec3::new(h.x, -h.y, -h.z),
                    Vec3::new(h.x, h.y, -h.z),
                    Vec3::new(h.x, h.y, h.z),
                ],
                Vec3::new(1.0, 0.0, 0.0),
                Vec2::new(dimensions.z, dimensions.y),
            ),
            (
                [
                    Vec3::new(-h.x, -h.y, -h.z),
                    Vec3::new(-h.x, -h.y, h.z),
                    Vec3::new(-h.x, h.y, h.z),
                    Vec3::new(-h.x, h.y, -h.z),
                ],
                Vec3::new(-1.0, 0.0, 0.0),
                Vec2::new(dimensions.z, dimensions.y),
            ),
            (
                [
                    Vec3::new(-h.x, h.y, h.z),
                    Vec3::new(h.x, h.y, h.z),
                    Vec3::new(h.x, h.y, -h.z),
                    Vec3::new(-h.x, h.y, -h.z),
                ],
                Vec3::new(0.0, 1.0, 0.0),
                Vec2::new(dimensions.x, dimensions.z),
            ),
            (
                [
                    Vec3::new(-h.x, -h.y, -h.z),
                    Vec3::new(h.x, -h.y, -h.z),
                    Vec3::new(h.x, -h.y, h.z),
                    Vec3::new(-h.x, -h.y, h.z),
                ],
                Vec3::new(0.0, -1.0, 0.0),
                Vec2::new(dimensions.x, dimensions.z),
            ),
        ];

        for (corners, normal, face_extent) in faces {
            let uv_max = if tile_texture {
                Vec2::new(face_extent.x / texture_scale.x, face_extent.y / texture_scale.y)
            } else {
                Vec2::new(1.0, 1.0)
            };
            let base = mesh.positions.len() as u32;

            mesh.positions.extend(corners);
            let face_normal = if invert_faces { -normal } else { normal };
            mesh.normals.extend([face_normal; 4]);
            mesh.uvs.extend([
                Vec2::new(0.0, 0.0),
                Vec2::new(uv_max.x, 0.0),
                Vec2::new(uv_max.x, uv_max.y),
                Vec2::new(0.0, uv_max.y),
            ]);

            if invert_faces {
                mesh.indices
                    .extend([base, base + 2, base + 1, base + 2, base, base + 3]);
            } else {
                mesh.indices
                    .extend([base, base + 1, base + 2, base + 2, base + 3, base]);
            }
        }

        mesh
    }

    /// Latitude/longitude sphere centered at the origin
    pub fn uv_sphere(radius: f32, slices: u32, layers: u32) -> Self {
        use std::f32::consts::PI;

        let mut mesh = Self::default();

        for layer in 0..=layers {
            let theta = PI * layer as f32 / layers as f32;
            for slice in 0..=slices {
                let phi = 2.0 * PI * slice as f32 / slices as f32;

                let normal = Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin());
                mesh.positions.push(normal * radius);
                mesh.normals.push(normal);
                mesh.uvs
                    .push(Vec2::new(slice as f32 / slices as f32, layer as f32 / layers as f32));
            }
        }

        let ring = slices + 1;
        for layer in 0..layers {
            for slice in 0..slices {
                let a = layer * ring + slice;
                let b = a + ring;
                mesh.indices.extend([a, b, a + 1, a + 1, b, b + 1]);
            }
        }

        mesh
    }

    /// One textured quad per character of `text`, UV-indexed into a
    /// 128-glyph atlas row
    ///
    /// The quads sit in the XY plane starting at the origin; the 2D pass
    /// positions them in screen space via the node transform.
    pub fn text_quads(text: &str, character_height_over_width: f32, total_text_width: f32) -> Self {
        let character_count = text.len().max(1) as f32;
        let character_width = total_text_width / character_count;
        let character_height = character_height_over_width * character_width;
        let atlas_stride = 1.0 / 128.0;

        let mut mesh = Self::default();

        for (i, byte) in text.bytes().enumerate() {
            let base_x = i as f32 * character_width;
            let base_u = f32::from(byte) * atlas_stride;
            let base = mesh.positions.len() as u32;

            mesh.positions.extend([
                Vec3::new(base_x, 0.0, 0.0),
                Vec3::new(base_x + character_width, 0.0, 0.0),
                Vec3::new(base_x + character_width, character_height, 0.0),
                Vec3::new(base_x, character_height, 0.0),
            ]);
            mesh.uvs.extend([
                Vec2::new(base_u, 0.0),
                Vec2::new(base_u + atlas_stride, 0.0),
                Vec2::new(base_u + atlas_stride, 1.0),
                Vec2::new(base_u, 1.0),
            ]);
            mesh.indices
                .extend([base, base + 1, base + 2, base, base + 2, base + 3]);
        }

        mesh
    }

    /// Fill the tangent and bitangent arrays from positions and UVs
    ///
    /// Per-triangle tangents are accumulated onto the shared vertices and
    /// normalized at the end, so smooth surfaces get averaged frames.
    pub fn compute_tangents(&mut self) {
        if self.uvs.len() != self.positions.len() {
            log::warn!("compute_tangents skipped: mesh has no full UV set");
            return;
        }

        self.tangents = vec![Vec3::zeros(); self.positions.len()];
        self.bitangents = vec![Vec3::zeros(); self.positions.len()];

        for triple in self.indices.chunks_exact(3) {
            let (i0, i1, i2) = (triple[0] as usize, triple[1] as usize, triple[2] as usize);

            let e1 = self.positions[i1] - self.positions[i0];
            let e2 = self.positions[i2] - self.positions[i0];
            let duv1 = self.uvs[i1] - self.uvs[i0];
            let duv2 = self.uvs[i2] - self.uvs[i0];

            // small offset keeps degenerate UV triangles from dividing by zero
            let f = 1.0 / (duv1.x * duv2.y - duv2.x * duv1.y + 1e-8);
            let tangent = (e1 * duv2.y - e2 * duv1.y) * f;
            let bitangent = (e2 * duv1.x - e1 * duv2.x) * f;

            for &i in &[i0, i1, i2] {
                self.tangents[i] += tangent;
                self.bitangents[i] += bitangent;
            }
        }

        for i in 0..self.positions.len() {
            self.tangents[i] = self.tangents[i].try_normalize(1e-12).unwrap_or_else(Vec3::zeros);
            self.bitangents[i] = self.bitangents[i].try_normalize(1e-12).unwrap_or_else(Vec3::zeros);
        }
    }
}

/// Lookup table from opaque handles to mesh data
///
/// Populated once at load time; the flattening pass resolves node handles
/// against it every frame.
#[derive(Debug, Default)]
pub struct MeshRegistry {
    meshes: SlotMap<MeshHandle, Mesh>,
}

impl MeshRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a mesh and return its handle
    pub fn insert(&mut self, mesh: Mesh) -> MeshHandle {
        self.meshes.insert(mesh)
    }

    /// Resolve a handle; `None` for handles this registry never issued
    pub fn get(&self, handle: MeshHandle) -> Option<&Mesh> {
        self.meshes.get(handle)
    }

    /// Number of registered meshes
    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    /// Whether the registry holds no meshes
    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}
