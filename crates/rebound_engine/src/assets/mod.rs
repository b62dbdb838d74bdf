//! Asset loading
//!
//! Only the OBJ model loader lives here; texture decoding is owned by the
//! window/GPU layer, which hands the engine opaque texture handles.

pub mod obj_loader;

pub use obj_loader::{ObjError, ObjLoader};
