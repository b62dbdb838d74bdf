//! Backend abstraction for frame dispatch
//!
//! The frame pipeline rebuilds the scene-derived state once per frame and
//! hands it to whichever backend is active through [`RenderBackend`]. The
//! pipeline itself never inspects which backend that is; both must be able
//! to consume a freshly rebuilt frame.

use crate::foundation::math::{Mat4, Vec3};
use crate::render::lighting::FrameLights;
use crate::render::material::MaterialTable;
use crate::render::triangle::TriangleBuffer;
use crate::render::RenderResult;
use crate::scene::tree::SceneTree;

/// Which rendering path a backend implements
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Conventional rasterization pipeline
    Rasterizer,

    /// GPU compute ray tracer
    RayTracer,
}

/// View and projection matrices, recomputed externally once per frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraMatrices {
    /// World-to-view transform
    pub view: Mat4,

    /// Perspective projection
    pub projection: Mat4,
}

impl CameraMatrices {
    /// Identity camera, useful for tests
    pub fn identity() -> Self {
        Self {
            view: Mat4::identity(),
            projection: Mat4::identity(),
        }
    }

    /// Combined view-projection matrix
    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view
    }

    /// Camera position in world space, extracted from the inverted view
    /// matrix
    pub fn position(&self) -> Vec3 {
        self.view
            .try_inverse()
            .map_or_else(Vec3::zeros, |inverse| inverse.column(3).xyz())
    }
}

/// Borrowed view of one frame's fully rebuilt state
///
/// Everything here was rebuilt this frame, in order: propagation wrote the
/// per-node matrices and the light list, the gather pass wrote the triangle
/// buffer.
#[derive(Debug)]
pub struct FrameData<'a> {
    /// Scene tree with current per-node matrices
    pub tree: &'a SceneTree,

    /// Camera matrices for this frame
    pub camera: &'a CameraMatrices,

    /// Lights collected during propagation
    pub lights: &'a FrameLights,

    /// World-space triangle soup from the gather pass
    pub triangles: &'a TriangleBuffer,

    /// Global material table
    pub materials: &'a MaterialTable,
}

/// A rendering backend consuming per-frame scene state
pub trait RenderBackend {
    /// Which rendering path this backend implements
    fn kind(&self) -> BackendKind;

    /// Stage everything the GPU submission for this frame needs
    fn prepare_frame(&mut self, frame: &FrameData<'_>) -> RenderResult<()>;
}
