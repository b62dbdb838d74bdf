//! Compute ray-tracing backend
//!
//! Stages the bulk uploads the compute dispatch consumes: the flattened
//! triangle soup and the material table as storage-buffer bytes, the light
//! list, and the inverse camera matrices used to reconstruct primary rays.
//! Buffers are one-shot uploads, rewritten in full every frame.

use crate::foundation::math::{Mat4, Vec3};
use crate::render::api::{BackendKind, FrameData, RenderBackend};
use crate::render::lighting::LightSourceData;
use crate::render::{RenderError, RenderResult};

/// Workgroup edge length of the compute shader
const WORKGROUP_SIZE: u32 = 16;

/// Number of compute workgroups covering the output image
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComputeDispatch {
    /// Workgroups along X
    pub groups_x: u32,

    /// Workgroups along Y
    pub groups_y: u32,
}

/// The ray-tracing backend: stages storage buffers and dispatch parameters
#[derive(Debug)]
pub struct RayTraceBackend {
    width: u32,
    height: u32,
    ambient_color: Vec3,
    triangle_bytes: Vec<u8>,
    material_bytes: Vec<u8>,
    lights: Vec<LightSourceData>,
    triangle_count: u32,
    inverse_view: Mat4,
    inverse_projection: Mat4,
    camera_position: Vec3,
}

impl RayTraceBackend {
    /// Create a backend writing a ray-traced image of the given pixel size
    pub fn new(width: u32, height: u32) -> RenderResult<Self> {
        if width == 0 || height == 0 {
            return Err(RenderError::InitializationFailed(format!(
                "ray trace target extent {width}x{height} is empty"
            )));
        }

        Ok(Self {
            width,
            height,
            ambient_color: Vec3::new(0.1, 0.1, 0.1),
            triangle_bytes: Vec::new(),
            material_bytes: Vec::new(),
            lights: Vec::new(),
            triangle_count: 0,
            inverse_view: Mat4::identity(),
            inverse_projection: Mat4::identity(),
            camera_position: Vec3::zeros(),
        })
    }

    /// Workgroup counts covering the full output image, rounding up
    pub fn dispatch_size(&self) -> ComputeDispatch {
        ComputeDispatch {
            groups_x: (self.width + WORKGROUP_SIZE - 1) / WORKGROUP_SIZE,
            groups_y: (self.height + WORKGROUP_SIZE - 1) / WORKGROUP_SIZE,
        }
    }

    /// Triangle storage buffer contents for this frame
    pub fn triangle_bytes(&self) -> &[u8] {
        &self.triangle_bytes
    }

    /// Material storage buffer contents for this frame
    pub fn material_bytes(&self) -> &[u8] {
        &self.material_bytes
    }

    /// Number of triangles in the staged buffer (shader uniform)
    pub fn triangle_count(&self) -> u32 {
        self.triangle_count
    }

    /// Lights staged for this frame
    pub fn lights(&self) -> &[LightSourceData] {
        &self.lights
    }

    /// Inverse view matrix for primary ray reconstruction
    pub fn inverse_view(&self) -> &Mat4 {
        &self.inverse_view
    }

    /// Inverse projection matrix for primary ray reconstruction
    pub fn inverse_projection(&self) -> &Mat4 {
        &self.inverse_projection
    }

    /// Camera position in world space (shader uniform)
    pub fn camera_position(&self) -> Vec3 {
        self.camera_position
    }

    /// Ambient light term (shader uniform)
    pub fn ambient_color(&self) -> Vec3 {
        self.ambient_color
    }
}

impl RenderBackend for RayTraceBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::RayTracer
    }

    fn prepare_frame(&mut self, frame: &FrameData<'_>) -> RenderResult<()> {
        self.triangle_bytes.clear();
        self.triangle_bytes.extend_from_slice(frame.triangles.as_bytes());
        self.triangle_count = frame.triangles.len() as u32;

        self.material_bytes.clear();
        self.material_bytes
            .extend_from_slice(bytemuck::cast_slice(&frame.materials.std140_records()));

        self.lights.clear();
        self.lights.extend_from_slice(frame.lights.as_slice());

        self.inverse_view = frame.camera.view.try_inverse().unwrap_or_else(|| {
            log::warn!("view matrix is singular; staging identity for ray reconstruction");
            Mat4::identity()
        });
        self.inverse_projection = frame.camera.projection.try_inverse().unwrap_or_else(|| {
            log::warn!("projection matrix is singular; staging identity for ray reconstruction");
            Mat4::identity()
        });
        self.camera_position = frame.camera.position();

        Ok(())
    }
}
