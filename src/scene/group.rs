use std::{
    cell::RefCell,
    rc::{Rc, Weak},
};

use nalgebra::Matrix4;

use crate::{render::DrawContext, Aabb, Error};

use super::{BoundAggregate, Spatial, SpatialNode};

/// A scene node with no geometry of its own, whose world bound covers all of its children.
#[derive(Debug)]
pub struct Group {
    spatial: Spatial,
    children: Vec<Rc<RefCell<dyn SpatialNode>>>,
}

impl Group {
    pub fn new(name: impl Into<String>) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            spatial: Spatial::new(name),
            children: Vec::new(),
        }))
    }

    /// Add `child` to `group`, making `group` the child's parent.
    ///
    /// # Panics
    ///
    /// * if `child` is currently borrowed
    pub fn attach(group: &Rc<RefCell<Self>>, child: Rc<RefCell<dyn SpatialNode>>) {
        let parent: Weak<RefCell<Self>> = Rc::downgrade(group);
        let parent: Weak<RefCell<dyn BoundAggregate>> = parent;
        child.borrow_mut().spatial_mut().set_parent(Some(parent));
        group.borrow_mut().children.push(child);
    }

    /// Remove the child at `index`, clearing its parent link.
    ///
    /// The world bound is rebuilt from the remaining children's current world bounds; it is
    /// not propagated further up.
    pub fn detach(&mut self, index: usize) -> Option<Rc<RefCell<dyn SpatialNode>>> {
        if index >= self.children.len() {
            return None;
        }
        let child = self.children.remove(index);
        child.borrow_mut().spatial_mut().set_parent(None);
        let bound = self.aggregate(None);
        self.spatial.set_world_bound(bound);
        Some(child)
    }

    /// Merge the current world bounds of all children.
    ///
    /// A child which is borrowed elsewhere is the one reporting `updated`, so `updated` stands in
    /// for its bound.
    fn aggregate(&self, updated: Option<&Aabb<f32>>) -> Option<Aabb<f32>> {
        let mut res: Option<Aabb<f32>> = None;
        let mut merge = |b: &Aabb<f32>| {
            res = Some(match res {
                Some(r) => r.merged(b),
                None => *b,
            });
        };
        for child in &self.children {
            match child.try_borrow() {
                Ok(child) => {
                    if let Some(b) = child.spatial().world_bound() {
                        merge(b);
                    }
                }
                Err(_) => match updated {
                    Some(b) => merge(b),
                    None => tracing::warn!(
                        group = %self.spatial.name(),
                        "child is busy; its bound is left out"
                    ),
                },
            }
        }
        res
    }

    #[inline]
    pub fn children(&self) -> &[Rc<RefCell<dyn SpatialNode>>] {
        &self.children
    }
}

impl BoundAggregate for Group {
    fn child_bound_updated(&mut self, bound: &Aabb<f32>) {
        let Some(aggregate) = self.aggregate(Some(bound)) else {
            return;
        };
        self.spatial.set_world_bound(Some(aggregate));
        self.spatial.notify_parent(&aggregate);
    }
}

impl SpatialNode for Group {
    #[inline]
    fn spatial(&self) -> &Spatial {
        &self.spatial
    }

    #[inline]
    fn spatial_mut(&mut self) -> &mut Spatial {
        &mut self.spatial
    }

    fn update_transform(&mut self, parent_world: Option<&Matrix4<f32>>) {
        self.spatial.update_world_matrix(parent_world);
        let world = *self.spatial.world_matrix();
        for child in &self.children {
            child.borrow_mut().update_transform(Some(&world));
        }
    }

    fn update_model_bound(&mut self) {
        for child in &self.children {
            child.borrow_mut().update_model_bound();
        }
    }

    fn update_world_bound(&mut self, propagate: bool) {
        for child in &self.children {
            child.borrow_mut().update_world_bound(false);
        }
        let bound = self.aggregate(None);
        self.spatial.set_world_bound(bound);
        if let (true, Some(b)) = (propagate, bound) {
            self.spatial.notify_parent(&b);
        }
    }

    /// Draw every child in order. A child which fails to draw doesn't stop its siblings; the
    /// first failure is returned.
    fn draw(&self, ctx: &mut dyn DrawContext) -> Result<(), Error> {
        let mut res = Ok(());
        for child in &self.children {
            if let Err(e) = child.borrow().draw(ctx) {
                if res.is_ok() {
                    res = Err(e);
                }
            }
        }
        res
    }
}
