//! [TriMesh], a scene node holding indexed triangle geometry.

mod bounds;
mod clone;
mod draw;
mod geometry;

pub use bounds::*;
pub use geometry::*;

use std::{cell::Ref, fmt::Display};

use nalgebra::{point, Matrix4, Point3};
use tessel_buffer::{Buffer, BufferView, Element};

use crate::{render::DrawContext, render::DrawMode, Error, Spatial, SpatialNode};

/// What to do with attribute buffers which no longer match the vertex count after
/// [set_vertices](TriMesh::set_vertices).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StaleAttributePolicy {
    /// Drop mismatched normal, color & texture coordinate buffers.
    #[default]
    Clear,
    /// Leave them in place, logging a warning. The mesh may then draw with attribute streams
    /// sized for an old vertex count.
    Keep,
}

/// Per-mesh behaviour switches, copied into every clone.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshConfig {
    /// Applied by [set_vertices](TriMesh::set_vertices) when the vertex count changes.
    pub stale_attributes: StaleAttributePolicy,
}

/// Optional per-vertex attribute arrays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Normal,
    TexCoord,
    Color,
}

impl Attribute {
    /// Number of components each vertex contributes to this attribute's array.
    pub const fn components(self) -> usize {
        match self {
            Attribute::Normal => 3,
            Attribute::TexCoord => 2,
            Attribute::Color => 4,
        }
    }
}

impl Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Attribute::Normal => "normal",
            Attribute::TexCoord => "texture coordinate",
            Attribute::Color => "color",
        })
    }
}

/// Buffers a mesh can't be cloned or drawn without.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Required {
    Vertices,
    Indices,
}

impl Display for Required {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Required::Vertices => "Vertices",
            Required::Indices => "Indices",
        })
    }
}

/// A geometry buffer, either owned by this mesh or aliased read-only from a clone source.
#[derive(Debug)]
pub(crate) enum Store<T: Element> {
    Owned(Buffer<T>),
    Shared(BufferView<T>),
}

impl<T: Element> Store<T> {
    #[inline]
    pub(crate) fn read(&self) -> Ref<'_, [T]> {
        match self {
            Store::Owned(b) => b.read(),
            Store::Shared(v) => v.read(),
        }
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        match self {
            Store::Owned(b) => b.len(),
            Store::Shared(v) => v.len(),
        }
    }

    #[inline]
    pub(crate) fn view(&self) -> BufferView<T> {
        match self {
            Store::Owned(b) => b.view(),
            Store::Shared(v) => v.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct Buffers {
    pub(crate) vertices: Option<Store<f32>>,
    pub(crate) indices: Option<Store<u16>>,
    pub(crate) normals: Option<Store<f32>>,
    pub(crate) colors: Option<Store<u8>>,
    pub(crate) texcoords: Option<Store<f32>>,
}

/// A renderable node of indexed triangles.
///
/// Geometry is set through validating setters; rejected input leaves the mesh unchanged. The
/// model bound is computed lazily from the vertex buffer. [Clones](TriMesh::clone_mesh) share
/// geometry read-only but have their own transforms.
#[derive(Debug)]
pub struct TriMesh {
    spatial: Spatial,
    config: MeshConfig,
    draw_mode: DrawMode,
    vertex_count: usize,
    /// Local center point of this geometry.
    center: Point3<f32>,
    buffers: Buffers,
    bound: BoundCache,
}

impl TriMesh {
    /// Construct an empty mesh.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, MeshConfig::default())
    }

    /// Construct an empty mesh with non-default behaviour.
    pub fn with_config(name: impl Into<String>, config: MeshConfig) -> Self {
        Self {
            spatial: Spatial::new(name),
            config,
            draw_mode: DrawMode::default(),
            vertex_count: 0,
            center: point![0.0, 0.0, 0.0],
            buffers: Buffers::default(),
            bound: BoundCache::new_owner(),
        }
    }

    /// Construct a mesh from initial vertex & index arrays.
    ///
    /// # Errors
    ///
    /// * [`VertexLength`](Error::VertexLength) if `vertices.len()` is not a multiple of 3
    pub fn with_geometry(
        name: impl Into<String>,
        vertices: &[f32],
        indices: &[u16],
    ) -> Result<Self, Error> {
        let mut res = Self::new(name);
        res.set_vertices(vertices)?;
        res.set_indices(indices)?;
        Ok(res)
    }

    /// The configuration this mesh was constructed with.
    #[inline]
    pub fn config(&self) -> &MeshConfig {
        &self.config
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertex_count
    }

    #[inline]
    pub fn index_count(&self) -> usize {
        self.buffers.indices.as_ref().map_or(0, Store::len)
    }

    #[inline]
    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    #[inline]
    pub fn center(&self) -> &Point3<f32> {
        &self.center
    }

    /// Set the local center hint. This is never derived from the geometry.
    #[inline]
    pub fn set_center(&mut self, center: Point3<f32>) {
        self.center = center;
    }

    /// Whether this mesh shares its geometry with a clone source.
    #[inline]
    pub fn is_clone(&self) -> bool {
        self.bound.is_delegate()
    }

    #[inline]
    pub fn vertices(&self) -> Option<Ref<'_, [f32]>> {
        self.buffers.vertices.as_ref().map(Store::read)
    }

    #[inline]
    pub fn indices(&self) -> Option<Ref<'_, [u16]>> {
        self.buffers.indices.as_ref().map(Store::read)
    }

    #[inline]
    pub fn normals(&self) -> Option<Ref<'_, [f32]>> {
        self.buffers.normals.as_ref().map(Store::read)
    }

    #[inline]
    pub fn colors(&self) -> Option<Ref<'_, [u8]>> {
        self.buffers.colors.as_ref().map(Store::read)
    }

    #[inline]
    pub fn texcoords(&self) -> Option<Ref<'_, [f32]>> {
        self.buffers.texcoords.as_ref().map(Store::read)
    }

    /// The owning handle of this mesh's vertex storage; `None` for clones.
    ///
    /// Writes through this handle are visible to clones but do not invalidate the model bound;
    /// follow them with [invalidate_model_bound](Self::invalidate_model_bound), or use
    /// [modify_vertices](Self::modify_vertices) instead.
    pub fn vertex_buffer(&self) -> Option<&Buffer<f32>> {
        match &self.buffers.vertices {
            Some(Store::Owned(b)) => Some(b),
            _ => None,
        }
    }

    /// Log `err` against this mesh and return it.
    pub(crate) fn reject<T>(&self, err: Error) -> Result<T, Error> {
        tracing::error!(mesh = %self.spatial.name(), "{err}");
        Err(err)
    }

    pub(crate) fn missing(&self, missing: Required) -> Error {
        Error::MissingGeometry {
            mesh: self.spatial.name().to_owned(),
            missing,
        }
    }
}

impl SpatialNode for TriMesh {
    #[inline]
    fn spatial(&self) -> &Spatial {
        &self.spatial
    }

    #[inline]
    fn spatial_mut(&mut self) -> &mut Spatial {
        &mut self.spatial
    }

    fn update_model_bound(&mut self) {
        // already reported at warn level where it was raised
        if let Err(e) = self.try_update_model_bound() {
            tracing::trace!(mesh = %self.spatial.name(), "model bound left as is: {e}");
        }
    }

    fn update_world_bound(&mut self, propagate: bool) {
        let Ok(model) = self.try_update_model_bound() else {
            return;
        };
        let world = model.transform(self.spatial.world_matrix());
        self.spatial.set_world_bound(Some(world));
        if propagate {
            self.spatial.notify_parent(&world);
        }
    }

    fn draw(&self, ctx: &mut dyn DrawContext) -> Result<(), Error> {
        self.render(ctx)
    }
}

impl TriMesh {
    /// The world matrix this mesh is drawn with.
    #[inline]
    pub fn world_matrix(&self) -> &Matrix4<f32> {
        self.spatial.world_matrix()
    }
}
