//! Per-frame orchestration
//!
//! One frame is a strictly ordered, synchronous sequence:
//!
//! 1. game update (consumes the sampled input, mutates node locals, returns
//!    the frame's camera matrices)
//! 2. transform propagation (rebuilds per-node matrices and the light list)
//! 3. triangle gather (rebuilds the world-space triangle buffer)
//! 4. backend dispatch (the active backend stages its GPU submission)
//!
//! Steps 2 and 3 are full rebuilds, so a tree-shape change made in step 1
//! is visible to both backends the very same frame. Each frame runs to
//! completion before the next frame's input is sampled; there is no
//! cancellation path.

use crate::input::InputState;
use crate::render::api::{CameraMatrices, FrameData, RenderBackend};
use crate::render::lighting::FrameLights;
use crate::render::material::MaterialTable;
use crate::render::mesh::MeshRegistry;
use crate::render::triangle::TriangleBuffer;
use crate::render::RenderResult;
use crate::scene::flatten::gather_triangles;
use crate::scene::propagate::propagate_transforms;
use crate::scene::tree::SceneTree;

/// Per-frame game logic hook implemented by the application layer
pub trait GameUpdate {
    /// Advance the game by `dt` seconds, mutating the scene tree, and return
    /// the camera matrices to render with
    fn update(&mut self, tree: &mut SceneTree, input: &InputState, dt: f32) -> CameraMatrices;
}

/// Owns the frame-scoped derived buffers and drives the per-frame sequence
#[derive(Debug, Default)]
pub struct FramePipeline {
    lights: FrameLights,
    triangles: TriangleBuffer,
}

impl FramePipeline {
    /// Create a pipeline with empty frame buffers
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one complete frame against the active backend
    pub fn run_frame(
        &mut self,
        game: &mut dyn GameUpdate,
        input: &InputState,
        dt: f32,
        tree: &mut SceneTree,
        meshes: &MeshRegistry,
        materials: &MaterialTable,
        backend: &mut dyn RenderBackend,
    ) -> RenderResult<()> {
        let camera = game.update(tree, input, dt);

        propagate_transforms(tree, &camera.view_projection(), &mut self.lights);
        gather_triangles(tree, meshes, &mut self.triangles);

        backend.prepare_frame(&FrameData {
            tree,
            camera: &camera,
            lights: &self.lights,
            triangles: &self.triangles,
            materials,
        })
    }

    /// Lights collected by the most recent frame
    pub fn lights(&self) -> &FrameLights {
        &self.lights
    }

    /// Triangles gathered by the most recent frame
    pub fn triangles(&self) -> &TriangleBuffer {
        &self.triangles
    }
}
