use crate::{
    render::{ClientStream, DrawContext, IndexWidth, MatrixGuard},
    Error,
};

use super::{Required, TriMesh};

impl TriMesh {
    /// Issue this frame's draw calls for the mesh.
    ///
    /// Vertices and indices are required; without them nothing at all is sent to `ctx`. Colors
    /// and normals are bound when present, and their streams disabled again afterwards. Texture
    /// coordinates are never bound. The transform stack is left as it was found.
    pub(crate) fn render(&self, ctx: &mut dyn DrawContext) -> Result<(), Error> {
        // check before touching the context, so failure leaves the stack untouched
        let Some(vertices) = self.buffers.vertices.as_ref() else {
            return self.reject(self.missing(Required::Vertices));
        };
        let Some(indices) = self.buffers.indices.as_ref() else {
            return self.reject(self.missing(Required::Indices));
        };
        let vertices = vertices.read();
        let indices = indices.read();
        let colors = self.buffers.colors.as_ref().map(|c| c.read());
        let normals = self.buffers.normals.as_ref().map(|n| n.read());

        let mut ctx = MatrixGuard::push(ctx);
        ctx.mult_matrix(self.spatial.world_matrix());

        ctx.vertex_pointer(3, &vertices);

        if let Some(colors) = &colors {
            ctx.enable_stream(ClientStream::Color);
            ctx.color_pointer(4, colors);
        }
        if let Some(normals) = &normals {
            ctx.enable_stream(ClientStream::Normal);
            ctx.normal_pointer(normals);
        }

        ctx.draw_elements(self.draw_mode, indices.len(), IndexWidth::U16, &indices);

        if colors.is_some() {
            ctx.disable_stream(ClientStream::Color);
        }
        if normals.is_some() {
            ctx.disable_stream(ClientStream::Normal);
        }

        tracing::trace!(
            mesh = %self.spatial.name(),
            mode = ?self.draw_mode,
            indices = indices.len(),
            "mesh drawn"
        );
        Ok(())
    }
}
