//! Scene graph core
//!
//! The scene is an arena-based tree of typed nodes. Each frame the tree is
//! traversed twice, in this order:
//!
//! ```text
//! game update (mutates node locals)
//!      ↓
//! propagate_transforms  (world / normal / MVP matrices, light gather)
//!      ↓
//! gather_triangles      (world-space triangle soup for the ray tracer)
//! ```
//!
//! The flattening pass reads the matrices the propagation pass just wrote,
//! so the ordering above is a hard requirement, not a convention.

pub mod flatten;
pub mod node;
pub mod propagate;
pub mod tree;

pub use flatten::gather_triangles;
pub use node::{GeometryPayload, NodeId, NodeKind, SceneNode, TextureHandle, TextureSet};
pub use propagate::propagate_transforms;
pub use tree::SceneTree;
