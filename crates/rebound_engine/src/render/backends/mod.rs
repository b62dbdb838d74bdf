//! Concrete rendering backends
//!
//! Both backends stage the exact data a GPU submission would upload — draw
//! lists and uniform values for the rasterizer, bulk storage-buffer bytes
//! and a dispatch size for the ray tracer. The window layer performs the
//! actual API calls against the staged state.

mod raster;
mod raytrace;

pub use raster::{DrawCall2D, DrawCall3D, RasterBackend, MAX_SHADER_LIGHTS};
pub use raytrace::{ComputeDispatch, RayTraceBackend};
