//! Scene tree nodes and their typed payloads

use crate::foundation::math::{Mat3, Mat4, Vec3};
use crate::render::material::MaterialIndex;
use crate::render::mesh::MeshHandle;

/// Identifier of a node inside a [`SceneTree`](crate::scene::SceneTree) arena
///
/// Ids are issued monotonically by the owning tree and are never reused, so a
/// detached node keeps its identity and can be re-attached later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Arena slot of this node
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Handle to a texture resource owned by the window/GPU layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(pub u32);

/// Diffuse/normal/roughness texture triple for normal-mapped geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureSet {
    /// Diffuse (base color) map
    pub diffuse: TextureHandle,

    /// Tangent-space normal map
    pub normal: TextureHandle,

    /// Roughness map
    pub roughness: TextureHandle,
}

/// Geometry payload shared by the drawable node kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeometryPayload {
    /// Mesh to draw; `None` means "no geometry, do not draw"
    pub mesh: Option<MeshHandle>,

    /// Number of indices to draw
    pub index_count: u32,

    /// Material used by this node
    pub material: MaterialIndex,
}

impl GeometryPayload {
    /// An empty payload that draws nothing
    pub fn empty() -> Self {
        Self {
            mesh: None,
            index_count: 0,
            material: MaterialIndex::DEFAULT,
        }
    }

    /// Payload drawing the given mesh with the default material
    pub fn with_mesh(mesh: MeshHandle, index_count: u32) -> Self {
        Self {
            mesh: Some(mesh),
            index_count,
            material: MaterialIndex::DEFAULT,
        }
    }
}

impl Default for GeometryPayload {
    fn default() -> Self {
        Self::empty()
    }
}

/// What a node is, and the data only that kind of node carries
///
/// Traversal dispatches on this by pattern matching; there are no unused
/// shared fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NodeKind {
    /// Plain 3D geometry
    Geometry(GeometryPayload),

    /// 3D geometry rendered with a tangent-space normal map
    NormalMappedGeometry {
        /// Mesh and material of the node
        geometry: GeometryPayload,
        /// Texture maps bound while drawing
        maps: TextureSet,
    },

    /// Screen-space geometry drawn in an orthographic pass (HUD text)
    Geometry2D {
        /// Mesh and material of the node
        geometry: GeometryPayload,
        /// Texture sampled by the 2D shader (e.g. a glyph atlas)
        texture: TextureHandle,
    },

    /// Omnidirectional light source
    PointLight {
        /// Emitted light color
        color: Vec3,
    },

    /// Cone light source. Declared for completeness; nothing collects or
    /// renders it yet.
    SpotLight {
        /// Emitted light color
        color: Vec3,
    },
}

/// A single element of the scene tree
///
/// Local transform fields are authoritative game state; the matrices are
/// derived per frame and are only meaningful after
/// [`propagate_transforms`](crate::scene::propagate_transforms) has run for
/// the current frame.
#[derive(Debug, Clone)]
pub struct SceneNode {
    id: NodeId,

    /// Position relative to the parent
    pub position: Vec3,

    /// Euler rotation in radians, applied in Y, X, Z order
    pub rotation: Vec3,

    /// Per-axis scale
    pub scale: Vec3,

    /// Pivot about which rotation and scale are applied
    pub reference_point: Vec3,

    /// Typed payload of this node
    pub kind: NodeKind,

    /// Cumulative object-to-world transform (derived)
    pub model_matrix: Mat4,

    /// Inverse-transpose of the model matrix's linear part (derived)
    pub normal_matrix: Mat3,

    /// View-projection times model matrix (derived)
    pub mvp_matrix: Mat4,

    pub(crate) children: Vec<NodeId>,
}

impl SceneNode {
    pub(crate) fn new(id: NodeId, kind: NodeKind) -> Self {
        Self {
            id,
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::new(1.0, 1.0, 1.0),
            reference_point: Vec3::zeros(),
            kind,
            model_matrix: Mat4::identity(),
            normal_matrix: Mat3::identity(),
            mvp_matrix: Mat4::identity(),
            children: Vec::new(),
        }
    }

    /// Unique id of this node
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Children in traversal order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Geometry payload if this node contributes world-space triangles
    ///
    /// Only `Geometry` and `NormalMappedGeometry` nodes do; 2D geometry and
    /// lights return `None`.
    pub fn surface_geometry(&self) -> Option<&GeometryPayload> {
        match &self.kind {
            NodeKind::Geometry(geometry) | NodeKind::NormalMappedGeometry { geometry, .. } => {
                Some(geometry)
            }
            NodeKind::Geometry2D { .. } | NodeKind::PointLight { .. } | NodeKind::SpotLight { .. } => {
                None
            }
        }
    }
}
