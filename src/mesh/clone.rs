use crate::{Error, Spatial};

use super::{Buffers, Required, Store, TriMesh};

impl TriMesh {
    /// Create a lightweight copy of this mesh named `name`.
    ///
    /// The clone aliases this mesh's vertex, index & attribute storage read-only: in-place
    /// changes to that storage show through the clone, but buffers this mesh later reallocates
    /// do not. Translation, rotation & scale are copied and independent from then on. Model
    /// bound queries on the clone are answered by the root of the clone chain.
    ///
    /// # Errors
    ///
    /// * [`MissingGeometry`](Error::MissingGeometry) if this mesh has no vertices or indices
    pub fn clone_mesh(&self, name: impl Into<String>) -> Result<TriMesh, Error> {
        let Some(vertices) = &self.buffers.vertices else {
            return self.reject(self.missing(Required::Vertices));
        };
        let Some(indices) = &self.buffers.indices else {
            return self.reject(self.missing(Required::Indices));
        };

        let shared = |store: &Option<Store<f32>>| store.as_ref().map(|s| Store::Shared(s.view()));
        let clone = TriMesh {
            spatial: Spatial::with_transform(name, *self.spatial.local()),
            config: self.config,
            draw_mode: self.draw_mode,
            vertex_count: self.vertex_count,
            center: self.center,
            buffers: Buffers {
                vertices: Some(Store::Shared(vertices.view())),
                indices: Some(Store::Shared(indices.view())),
                normals: shared(&self.buffers.normals),
                colors: self
                    .buffers
                    .colors
                    .as_ref()
                    .map(|s| Store::Shared(s.view())),
                texcoords: shared(&self.buffers.texcoords),
            },
            bound: self.bound.delegate(),
        };
        tracing::debug!(source = %self.spatial.name(), clone = %clone.spatial.name(), "mesh cloned");
        Ok(clone)
    }

    /// [clone_mesh](Self::clone_mesh), keeping this mesh's name.
    pub fn clone_mesh_same_name(&self) -> Result<TriMesh, Error> {
        self.clone_mesh(self.spatial.name())
    }
}
