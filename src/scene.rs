//! The parts of a scene graph which a mesh node depends on: local & world transforms, world
//! bounds, and a non-owning link to a parent which aggregates child bounds.

mod group;
pub use group::*;

use std::{
    cell::RefCell,
    fmt,
    rc::{Rc, Weak},
};

use nalgebra::{Matrix4, UnitQuaternion, Vector3};

use crate::{render::DrawContext, Aabb, Error, Transform};

/// A node which can be positioned, bounded, and drawn within a scene graph.
pub trait SpatialNode {
    fn spatial(&self) -> &Spatial;
    fn spatial_mut(&mut self) -> &mut Spatial;

    #[inline]
    fn name(&self) -> &str {
        self.spatial().name()
    }

    /// Recompose this node's world matrix from its local transform and its parent's world
    /// matrix.
    fn update_transform(&mut self, parent_world: Option<&Matrix4<f32>>) {
        self.spatial_mut().update_world_matrix(parent_world);
    }

    /// Bring this node's model-space bound up to date.
    fn update_model_bound(&mut self);

    /// Recompute this node's world-space bound and, if `propagate` is set, tell the parent.
    ///
    /// Uses the current world matrix, so call [update_transform](Self::update_transform) first
    /// if the node has moved.
    fn update_world_bound(&mut self, propagate: bool);

    fn draw(&self, ctx: &mut dyn DrawContext) -> Result<(), Error>;
}

impl fmt::Debug for dyn SpatialNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("SpatialNode").field(&self.name()).finish()
    }
}

/// A node which maintains a world bound over its children.
pub trait BoundAggregate {
    /// Incorporate a child's freshly computed world bound.
    fn child_bound_updated(&mut self, bound: &Aabb<f32>);
}

/// Transform & bound state shared by all scene nodes.
pub struct Spatial {
    name: String,
    local: Transform,
    world: Matrix4<f32>,
    world_bound: Option<Aabb<f32>>,
    parent: Option<Weak<RefCell<dyn BoundAggregate>>>,
}

impl fmt::Debug for Spatial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Spatial")
            .field("name", &self.name)
            .field("local", &self.local)
            .field("world_bound", &self.world_bound)
            .field("has_parent", &self.parent().is_some())
            .finish_non_exhaustive()
    }
}

impl Spatial {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_transform(name, Transform::identity())
    }

    pub fn with_transform(name: impl Into<String>, local: Transform) -> Self {
        Self {
            name: name.into(),
            local,
            world: Matrix4::identity(),
            world_bound: None,
            parent: None,
        }
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn local(&self) -> &Transform {
        &self.local
    }

    #[inline]
    pub fn set_local(&mut self, local: Transform) {
        self.local = local;
    }

    #[inline]
    pub fn set_local_translation(&mut self, translation: Vector3<f32>) {
        self.local.translation = translation;
    }

    #[inline]
    pub fn set_local_rotation(&mut self, rotation: UnitQuaternion<f32>) {
        self.local.rotation = rotation;
    }

    #[inline]
    pub fn set_local_scale(&mut self, scale: Vector3<f32>) {
        self.local.scale = scale;
    }

    /// The composed world matrix, as of the last [update](Self::update_world_matrix).
    #[inline]
    pub fn world_matrix(&self) -> &Matrix4<f32> {
        &self.world
    }

    pub fn update_world_matrix(&mut self, parent_world: Option<&Matrix4<f32>>) {
        let local = self.local.to_matrix();
        self.world = match parent_world {
            Some(p) => p * local,
            None => local,
        };
    }

    #[inline]
    pub fn world_bound(&self) -> Option<&Aabb<f32>> {
        self.world_bound.as_ref()
    }

    #[inline]
    pub fn set_world_bound(&mut self, bound: Option<Aabb<f32>>) {
        self.world_bound = bound;
    }

    /// The parent of this node, if it has one and it's still alive.
    pub fn parent(&self) -> Option<Rc<RefCell<dyn BoundAggregate>>> {
        self.parent.as_ref().and_then(Weak::upgrade)
    }

    #[inline]
    pub fn set_parent(&mut self, parent: Option<Weak<RefCell<dyn BoundAggregate>>>) {
        self.parent = parent;
    }

    /// Pass `bound` to the parent of this node, if any.
    pub fn notify_parent(&self, bound: &Aabb<f32>) {
        let Some(parent) = self.parent() else {
            return;
        };
        match parent.try_borrow_mut() {
            Ok(mut parent) => parent.child_bound_updated(bound),
            Err(_) => tracing::warn!(
                node = %self.name,
                "parent is busy; world bound not propagated"
            ),
        };
    }
}
