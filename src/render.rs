//! The immediate-mode drawing target meshes render into.

mod record;
pub use record::*;

use std::ops::{Deref, DerefMut};

use nalgebra::Matrix4;

/// The method by which an index stream is assembled into triangles.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u32)]
pub enum DrawMode {
    #[default]
    Triangles = 4,
    TriangleStrip = 5,
    TriangleFan = 6,
}

impl DrawMode {
    /// The raw GL enum value of this mode.
    #[inline]
    pub fn to_gl(self) -> u32 {
        self as u32
    }
}

impl TryFrom<u32> for DrawMode {
    type Error = u32;

    fn try_from(raw: u32) -> Result<Self, Self::Error> {
        match raw {
            4 => Ok(Self::Triangles),
            5 => Ok(Self::TriangleStrip),
            6 => Ok(Self::TriangleFan),
            _ => Err(raw),
        }
    }
}

/// Width of each entry in an index stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndexWidth {
    U16,
}

/// Optional per-vertex streams which must be enabled before they're bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClientStream {
    Color,
    Normal,
}

/// A stateful immediate-mode drawing target, e.g. a GL ES 1.x context.
///
/// Calls are sequential and have no results; implementors own all state.
pub trait DrawContext {
    /// Save the current transform.
    fn push_matrix(&mut self);
    /// Restore the most recently saved transform.
    fn pop_matrix(&mut self);
    /// Post-multiply the current transform by `m`.
    fn mult_matrix(&mut self, m: &Matrix4<f32>);
    /// Bind vertex positions, `size` floats per vertex.
    fn vertex_pointer(&mut self, size: usize, vertices: &[f32]);
    fn enable_stream(&mut self, stream: ClientStream);
    fn disable_stream(&mut self, stream: ClientStream);
    /// Bind vertex colors, `size` unsigned bytes per vertex.
    fn color_pointer(&mut self, size: usize, colors: &[u8]);
    /// Bind vertex normals, 3 floats per vertex.
    fn normal_pointer(&mut self, normals: &[f32]);
    /// Assemble `count` entries of `indices` into primitives and draw them.
    fn draw_elements(&mut self, mode: DrawMode, count: usize, width: IndexWidth, indices: &[u16]);
}

/// Pushes the transform stack on construction and pops it on drop, so that every exit from a
/// draw call leaves the stack balanced.
pub struct MatrixGuard<'ctx> {
    ctx: &'ctx mut dyn DrawContext,
}

impl<'ctx> MatrixGuard<'ctx> {
    pub fn push(ctx: &'ctx mut dyn DrawContext) -> Self {
        ctx.push_matrix();
        Self { ctx }
    }
}

impl<'ctx> Deref for MatrixGuard<'ctx> {
    type Target = dyn DrawContext + 'ctx;

    fn deref(&self) -> &Self::Target {
        &*self.ctx
    }
}

impl<'ctx> DerefMut for MatrixGuard<'ctx> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut *self.ctx
    }
}

impl Drop for MatrixGuard<'_> {
    fn drop(&mut self) {
        self.ctx.pop_matrix();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draw_mode_from_gl() {
        assert_eq!(DrawMode::try_from(4), Ok(DrawMode::Triangles));
        assert_eq!(DrawMode::try_from(5), Ok(DrawMode::TriangleStrip));
        assert_eq!(DrawMode::try_from(6), Ok(DrawMode::TriangleFan));
        assert_eq!(DrawMode::try_from(0), Err(0));
        assert_eq!(DrawMode::TriangleFan.to_gl(), 6);
    }

    #[test]
    fn guard_balances_stack() {
        let mut log = CommandLog::default();
        {
            let mut guard = MatrixGuard::push(&mut log);
            guard.mult_matrix(&Matrix4::identity());
        }
        assert_eq!(
            log.commands(),
            &[
                DrawCommand::PushMatrix,
                DrawCommand::MultMatrix(Matrix4::identity()),
                DrawCommand::PopMatrix
            ]
        );
        assert_eq!(log.depth(), 0);
    }
}
