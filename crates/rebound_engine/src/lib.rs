//! # Rebound Engine
//!
//! A small scene-graph engine driving an arcade game that can be rendered by
//! either a conventional rasterizer or a GPU compute ray tracer.
//!
//! ## Features
//!
//! - **Scene Tree**: Arena-based scene graph with typed node payloads
//! - **Transform Propagation**: Per-frame world/normal/MVP matrix computation
//! - **Triangle Gather**: Flattens the scene into a GPU-layout triangle soup
//! - **Dual Backends**: Rasterizer draw lists and ray-tracer buffer staging
//!   behind one backend trait, switchable at runtime
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rebound_engine::prelude::*;
//!
//! struct MyGame;
//!
//! impl GameUpdate for MyGame {
//!     fn update(&mut self, _tree: &mut SceneTree, _input: &InputState, _dt: f32) -> CameraMatrices {
//!         CameraMatrices::identity()
//!     }
//! }
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut tree = SceneTree::new();
//!     let meshes = MeshRegistry::new();
//!     let materials = MaterialTable::new();
//!     let mut backend = RasterBackend::new(1366, 768)?;
//!     let mut pipeline = FramePipeline::new();
//!     let mut game = MyGame;
//!     pipeline.run_frame(
//!         &mut game,
//!         &InputState::default(),
//!         1.0 / 60.0,
//!         &mut tree,
//!         &meshes,
//!         &materials,
//!         &mut backend,
//!     )?;
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod foundation;
pub mod input;
pub mod render;
pub mod scene;

mod frame;

pub use frame::{FramePipeline, GameUpdate};

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{ObjError, ObjLoader},
        foundation::{
            math::{Mat3, Mat4, Mat4Ext, Vec2, Vec3},
            time::FrameClock,
        },
        input::InputState,
        render::{
            api::{BackendKind, CameraMatrices, FrameData, RenderBackend},
            backends::{RasterBackend, RayTraceBackend},
            lighting::{FrameLights, LightSourceData},
            material::{Material, MaterialIndex, MaterialTable},
            mesh::{Mesh, MeshHandle, MeshRegistry},
            triangle::TriangleBuffer,
            RenderError, RenderResult,
        },
        scene::{
            flatten::gather_triangles,
            node::{GeometryPayload, NodeId, NodeKind, SceneNode, TextureHandle, TextureSet},
            propagate::propagate_transforms,
            tree::SceneTree,
        },
        FramePipeline, GameUpdate,
    };
}
