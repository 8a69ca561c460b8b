//! Renderable triangle mesh nodes for a minimal scene graph.
//!
//! A [TriMesh] owns validated per-vertex buffers, derives its model-space [Aabb] lazily, can be
//! [cloned](TriMesh::clone_mesh) into nodes that share its geometry but move independently, and
//! draws itself into any immediate-mode [DrawContext](render::DrawContext).
//!
//! Everything here is single-threaded: buffers are reference counted without synchronization,
//! and a clone's geometry aliases its source's storage. Mutating a source's buffers while one of
//! its clones is being drawn is a logic error on the caller's side.
#![cfg_attr(not(debug_assertions), warn(missing_docs))]

pub mod error;
pub mod mesh;
pub mod render;
pub mod scene;
pub mod spatial;

pub use error::*;
pub use mesh::{MeshConfig, StaleAttributePolicy, TriMesh};
pub use scene::*;
pub use spatial::*;

pub use tessel_buffer as buffer;
