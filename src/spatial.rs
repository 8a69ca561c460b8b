//! Bounding volumes and local transforms.

mod bounding_box;
pub use bounding_box::*;
mod traits;
pub use traits::*;
mod transform;
pub use transform::*;
