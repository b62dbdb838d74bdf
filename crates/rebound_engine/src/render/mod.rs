//! Rendering resources and backend abstraction
//!
//! Everything here is backend-agnostic data: meshes, materials, lights, the
//! flattened triangle buffer, and the [`api::RenderBackend`] trait the two
//! concrete backends implement. The actual GPU API calls (GL/Vulkan buffer
//! uploads, shader binding) live in the window layer, which consumes the
//! staged frame state these types produce.

use thiserror::Error;

pub mod api;
pub mod backends;
pub mod lighting;
pub mod material;
pub mod mesh;
pub mod triangle;

pub use api::{BackendKind, CameraMatrices, FrameData, RenderBackend};
pub use backends::{RasterBackend, RayTraceBackend};
pub use lighting::{FrameLights, LightSourceData};
pub use material::{Material, MaterialIndex, MaterialTable};
pub use mesh::{Mesh, MeshHandle, MeshRegistry};
pub use triangle::{TriangleBuffer, TriangleStd140};

/// Errors produced by the rendering layer
#[derive(Error, Debug)]
pub enum RenderError {
    /// Backend initialization failed during setup
    #[error("Renderer initialization failed: {0}")]
    InitializationFailed(String),

    /// A per-frame rendering operation failed
    #[error("Rendering failed: {0}")]
    RenderingFailed(String),
}

/// Result type for rendering operations
pub type RenderResult<T> = Result<T, RenderError>;
