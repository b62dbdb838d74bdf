//! Rasterization backend
//!
//! Traverses the scene tree in order and emits one draw call per drawable
//! node, split into a 3D pass (perspective, lit) and a 2D overlay pass
//! (orthographic, textured). Per-node matrices come straight from the
//! propagation pass; lights are staged as indexed uniform entries.

use crate::foundation::math::{Mat3, Mat4, Mat4Ext};
use crate::render::api::{BackendKind, FrameData, RenderBackend};
use crate::render::lighting::LightSourceData;
use crate::render::material::MaterialIndex;
use crate::render::mesh::MeshHandle;
use crate::render::{RenderError, RenderResult};
use crate::scene::node::{NodeId, NodeKind, TextureHandle, TextureSet};
use crate::scene::tree::SceneTree;

/// Size of the fragment shader's per-light uniform array
pub const MAX_SHADER_LIGHTS: usize = 8;

/// One 3D draw: mesh, matrices, and material state for a single node
#[derive(Debug, Clone, Copy)]
pub struct DrawCall3D {
    /// Combined view-projection-model matrix (vertex shader MVP uniform)
    pub mvp: Mat4,

    /// Model matrix (world-space lighting)
    pub model: Mat4,

    /// Normal matrix matching the model matrix
    pub normal_matrix: Mat3,

    /// Mesh to bind
    pub mesh: MeshHandle,

    /// Number of indices to draw
    pub index_count: u32,

    /// Material bound for this draw
    pub material: MaterialIndex,

    /// Texture maps; present only for normal-mapped nodes
    pub maps: Option<TextureSet>,
}

/// One 2D overlay draw (HUD text)
#[derive(Debug, Clone, Copy)]
pub struct DrawCall2D {
    /// Orthographic-projection-times-model matrix
    pub mvp: Mat4,

    /// Mesh to bind
    pub mesh: MeshHandle,

    /// Number of indices to draw
    pub index_count: u32,

    /// Texture sampled by the 2D shader
    pub texture: TextureHandle,
}

/// The rasterization backend: stages draw lists and light uniforms
#[derive(Debug)]
pub struct RasterBackend {
    ortho: Mat4,
    draws_3d: Vec<DrawCall3D>,
    draws_2d: Vec<DrawCall2D>,
    lights: Vec<LightSourceData>,
}

impl RasterBackend {
    /// Create a backend rendering into a target of the given pixel size
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InitializationFailed(format!(
                "raster target extent {width}x{height} is empty"
            )));
        }

        Ok(Self {
            ortho: Mat4::orthographic(0.0, width as f32, 0.0, height as f32, -1.0, 1.0),
            draws_3d: Vec::new(),
            draws_2d: Vec::new(),
            lights: Vec::new(),
        })
    }

    /// 3D draw calls staged for the current frame, in traversal order
    pub fn draws_3d(&self) -> &[DrawCall3D] {
        &self.draws_3d
    }

    /// 2D overlay draw calls staged for the current frame
    pub fn draws_2d(&self) -> &[DrawCall2D] {
        &self.draws_2d
    }

    /// Light uniform entries staged for the current frame
    pub fn lights(&self) -> &[LightSourceData] {
        &self.lights
    }

    fn collect_node(&mut self, tree: &SceneTree, id: NodeId) {
        let node = tree.node(id);

        match &node.kind {
            NodeKind::Geometry(geometry) => {
                if let Some(mesh) = geometry.mesh {
                    self.draws_3d.push(DrawCall3D {
                        mvp: node.mvp_matrix,
                        model: node.model_matrix,
                        normal_matrix: node.normal_matrix,
                        mesh,
                        index_count: geometry.index_count,
                        material: geometry.material,
                        maps: None,
                    });
                }
            }
            NodeKind::NormalMappedGeometry { geometry, maps } => {
                if let Some(mesh) = geometry.mesh {
                    self.draws_3d.push(DrawCall3D {
                        mvp: node.mvp_matrix,
                        model: node.model_matrix,
                        normal_matrix: node.normal_matrix,
                        mesh,
                        index_count: geometry.index_count,
                        material: geometry.material,
                        maps: Some(*maps),
                    });
                }
            }
            NodeKind::Geometry2D { geometry, texture } => {
                if let Some(mesh) = geometry.mesh {
                    self.draws_2d.push(DrawCall2D {
                        // 2D nodes ignore the perspective camera entirely
                        mvp: self.ortho * node.model_matrix,
                        mesh,
                        index_count: geometry.index_count,
                        texture: *texture,
                    });
                }
            }
            NodeKind::PointLight { .. } | NodeKind::SpotLight { .. } => {}
        }

        for &child in node.children() {
            self.collect_node(tree, child);
        }
    }
}

impl RenderBackend for RasterBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Rasterizer
    }

    fn prepare_frame(&mut self, frame: &FrameData<'_>) -> RenderResult<()> {
        self.draws_3d.clear();
        self.draws_2d.clear();
        self.collect_node(frame.tree, frame.tree.root());

        self.lights.clear();
        let lights = frame.lights.as_slice();
        if lights.len() > MAX_SHADER_LIGHTS {
            log::warn!(
                "{} lights exceed the shader's array of {}; extra lights dropped",
                lights.len(),
                MAX_SHADER_LIGHTS
            );
        }
        self.lights
            .extend_from_slice(&lights[..lights.len().min(MAX_SHADER_LIGHTS)]);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Vec3;
    use crate::render::api::CameraMatrices;
    use crate::render::lighting::FrameLights;
    use crate::render::material::MaterialTable;
    use crate::render::mesh::{Mesh, MeshRegistry};
    use crate::render::triangle::TriangleBuffer;
    use crate::scene::node::GeometryPayload;
    use crate::scene::propagate_transforms;

    fn prepared_backend(tree: &mut SceneTree) -> RasterBackend {
        let camera = CameraMatrices::identity();
        let mut lights = FrameLights::new();
        propagate_transforms(tree, &camera.view_projection(), &mut lights);

        let materials = MaterialTable::new();
        let triangles = TriangleBuffer::new();
        let mut backend = RasterBackend::new(1366, 768).expect("valid extent");
        backend
            .prepare_frame(&FrameData {
                tree,
                camera: &camera,
                lights: &lights,
                triangles: &triangles,
                materials: &materials,
            })
            .expect("staging cannot fail");
        backend
    }

    #[test]
    fn test_zero_extent_is_rejected() {
        assert!(RasterBackend::new(0, 768).is_err());
    }

    #[test]
    fn test_draw_lists_follow_traversal_order_and_pass_split() {
        let mut meshes = MeshRegistry::new();
        let handle = meshes.insert(Mesh::uv_sphere(1.0, 4, 4));

        let mut tree = SceneTree::new();
        let root = tree.root();

        let first = tree.create_node(NodeKind::Geometry(GeometryPayload::with_mesh(handle, 96)));
        let second = tree.create_node(NodeKind::Geometry(GeometryPayload::with_mesh(handle, 96)));
        let overlay = tree.create_node(NodeKind::Geometry2D {
            geometry: GeometryPayload::with_mesh(handle, 96),
            texture: TextureHandle(7),
        });
        let light = tree.create_node(NodeKind::PointLight {
            color: Vec3::new(1.0, 1.0, 1.0),
        });

        tree.add_child(root, second);
        tree.add_child(root, overlay);
        tree.add_child(root, first);
        tree.add_child(root, light);
        tree[second].position = Vec3::new(0.0, 1.0, 0.0);

        let backend = prepared_backend(&mut tree);

        // insertion order: second, first; overlay goes to the 2D pass
        assert_eq!(backend.draws_3d().len(), 2);
        assert_eq!(backend.draws_2d().len(), 1);
        assert_eq!(backend.lights().len(), 1);
        assert_eq!(backend.draws_3d()[0].model[(1, 3)], 1.0);
        assert_eq!(backend.draws_2d()[0].texture, TextureHandle(7));
    }

    #[test]
    fn test_nodes_without_mesh_draw_nothing() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        let node = tree.create_node(NodeKind::Geometry(GeometryPayload::empty()));
        tree.add_child(root, node);

        let backend = prepared_backend(&mut tree);
        assert!(backend.draws_3d().is_empty());
    }

    #[test]
    fn test_lights_truncate_at_shader_capacity() {
        let mut tree = SceneTree::new();
        let root = tree.root();
        for _ in 0..(MAX_SHADER_LIGHTS + 3) {
            let light = tree.create_node(NodeKind::PointLight {
                color: Vec3::new(1.0, 1.0, 1.0),
            });
            tree.add_child(root, light);
        }

        let backend = prepared_backend(&mut tree);
        assert_eq!(backend.lights().len(), MAX_SHADER_LIGHTS);
    }
}
