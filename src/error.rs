use crate::mesh::{Attribute, Required};

/// Validation failures raised by [TriMesh](crate::TriMesh) operations.
///
/// None of these are fatal: the mesh that raised one is left exactly as it was before the call.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    #[error("Invalid vertex array length (found: {found}, not divisible by 3) in {mesh}")]
    VertexLength { mesh: String, found: usize },
    #[error("Invalid {attribute} array length (expected: {expected}, found: {found}) in {mesh}")]
    AttributeLength {
        mesh: String,
        attribute: Attribute,
        expected: usize,
        found: usize,
    },
    #[error("Unrecognized draw mode {raw:#x} in {mesh}")]
    DrawMode { mesh: String, raw: u32 },
    #[error("{missing} are not set in {mesh}")]
    MissingGeometry { mesh: String, missing: Required },
    #[error("Attempted to modify the shared geometry of clone {mesh}")]
    ReadOnlyClone { mesh: String },
    #[error("The source of clone {mesh} no longer exists")]
    DetachedClone { mesh: String },
    #[error(transparent)]
    Buffer(#[from] tessel_buffer::Error),
}

/// Alias used where the mesh context isn't obvious from the surrounding path.
pub type MeshError = Error;
