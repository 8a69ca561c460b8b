use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use nalgebra::point;
use tessel_buffer::BufferView;

use crate::{Aabb, Error};

use super::{Required, TriMesh};

/// Validity of a model bound.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundState {
    /// No vertex data, and no explicit bound.
    Fresh,
    /// Vertex data changed since the bound was last computed.
    Dirty,
    Valid(Aabb<f32>),
}

/// The model bound of a clone-chain root, along with the vertex data it's computed from.
#[derive(Debug)]
pub(crate) struct BoundSource {
    vertices: Option<BufferView<f32>>,
    state: BoundState,
}

impl BoundSource {
    /// Recompute the bound if it's dirty. Returns the state afterwards.
    fn refresh(&mut self, mesh: &str) -> BoundState {
        if let BoundState::Dirty = self.state {
            if let Some(vertices) = &self.vertices {
                let data = vertices.read();
                let bound = Aabb::from_points(
                    data.chunks_exact(3)
                        .map(|v| point![v[0], v[1], v[2]]),
                )
                .unwrap_or_default();
                tracing::trace!(mesh, vertices = data.len() / 3, ?bound, "model bound recomputed");
                self.state = BoundState::Valid(bound);
            }
        }
        self.state
    }
}

/// Where a mesh's model bound lives.
///
/// An original mesh owns its bound; a clone only ever delegates to the root of its clone chain,
/// so it can't hold a bound of its own that has gone stale.
#[derive(Debug)]
pub(crate) enum BoundCache {
    Owner(Rc<RefCell<BoundSource>>),
    DelegatesTo(Weak<RefCell<BoundSource>>),
}

impl BoundCache {
    pub(crate) fn new_owner() -> Self {
        Self::Owner(Rc::new(RefCell::new(BoundSource {
            vertices: None,
            state: BoundState::Fresh,
        })))
    }

    #[inline]
    pub(crate) fn is_delegate(&self) -> bool {
        matches!(self, Self::DelegatesTo(_))
    }

    /// The root source this cache refers to, if it still exists.
    pub(crate) fn source(&self) -> Option<Rc<RefCell<BoundSource>>> {
        match self {
            Self::Owner(src) => Some(Rc::clone(src)),
            Self::DelegatesTo(src) => src.upgrade(),
        }
    }

    /// A cache for a clone of the mesh holding `self`.
    pub(crate) fn delegate(&self) -> Self {
        match self {
            Self::Owner(src) => Self::DelegatesTo(Rc::downgrade(src)),
            Self::DelegatesTo(src) => Self::DelegatesTo(Weak::clone(src)),
        }
    }

    /// Point the cache at new vertex storage and mark it dirty. Only meaningful on an owner.
    pub(crate) fn replace_vertices(&self, vertices: BufferView<f32>) {
        if let Self::Owner(src) = self {
            let mut src = src.borrow_mut();
            src.vertices = Some(vertices);
            src.state = BoundState::Dirty;
        }
    }
}

impl TriMesh {
    fn bound_source(&self) -> Result<Rc<RefCell<BoundSource>>, Error> {
        match self.bound.source() {
            Some(src) => Ok(src),
            None => {
                let err = Error::DetachedClone {
                    mesh: self.spatial.name().to_owned(),
                };
                tracing::warn!(mesh = %self.spatial.name(), "{err}");
                Err(err)
            }
        }
    }

    /// The state of this mesh's model bound, or of its clone source's if this is a clone.
    ///
    /// `None` if this is a clone whose source has been dropped.
    pub fn bound_state(&self) -> Option<BoundState> {
        self.bound.source().map(|src| src.borrow().state)
    }

    /// The current model bound, if it's valid.
    pub fn model_bound(&self) -> Option<Aabb<f32>> {
        match self.bound_state() {
            Some(BoundState::Valid(bound)) => Some(bound),
            _ => None,
        }
    }

    /// Bring the model bound up to date and return it.
    ///
    /// The vertex buffer is scanned at most once per change. Clones delegate to the root of
    /// their clone chain, so the result reflects the root's *current* vertices.
    ///
    /// # Errors
    ///
    /// * [`MissingGeometry`](Error::MissingGeometry) if there are no vertices and no explicit
    ///   bound has been set
    /// * [`DetachedClone`](Error::DetachedClone) if this is a clone whose source was dropped
    pub fn try_update_model_bound(&self) -> Result<Aabb<f32>, Error> {
        let src = self.bound_source()?;
        let state = src.borrow_mut().refresh(self.spatial.name());
        match state {
            BoundState::Valid(bound) => Ok(bound),
            BoundState::Fresh | BoundState::Dirty => {
                let err = self.missing(Required::Vertices);
                tracing::warn!(mesh = %self.spatial.name(), "model bound not updated: {err}");
                Err(err)
            }
        }
    }

    /// Override the model bound, e.g. with a precomputed or hand-authored one.
    ///
    /// On a clone this sets the bound of the clone chain's root.
    ///
    /// # Errors
    ///
    /// * [`DetachedClone`](Error::DetachedClone) if this is a clone whose source was dropped
    pub fn set_model_bound(&mut self, bound: Aabb<f32>) -> Result<(), Error> {
        self.bound_source()?.borrow_mut().state = BoundState::Valid(bound);
        Ok(())
    }

    /// Mark the model bound dirty, forcing the next update to rescan the vertices.
    ///
    /// Has no effect on a mesh without vertices.
    pub fn invalidate_model_bound(&mut self) {
        if let Some(src) = self.bound.source() {
            let mut src = src.borrow_mut();
            if src.vertices.is_some() {
                src.state = BoundState::Dirty;
            }
        }
    }
}
