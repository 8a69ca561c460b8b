use nalgebra::{point, Matrix4, Point3};

use super::Float;

/// Axis-Aligned Bounding Box
///
/// Generic over the Real type; meshes use `Aabb<f32>`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb<Real: Float> {
    pub mins: Point3<Real>,
    pub maxs: Point3<Real>,
}

impl<Real: Float> Default for Aabb<Real> {
    /// A degenerate box at the origin.
    fn default() -> Self {
        let o = point![Real::ZERO, Real::ZERO, Real::ZERO];
        Self { mins: o, maxs: o }
    }
}

impl<Real: Float> Aabb<Real> {
    #[inline]
    pub fn new(mins: Point3<Real>, maxs: Point3<Real>) -> Self {
        Self { mins, maxs }
    }

    /// A box which contains nothing, and which becomes the bound of the first point it is
    /// [expanded](Self::expand_to) to.
    pub fn new_invalid() -> Self {
        Self {
            mins: point![Real::MAX, Real::MAX, Real::MAX],
            maxs: point![Real::MIN, Real::MIN, Real::MIN],
        }
    }

    /// Construct the smallest box containing every point in `points`.
    ///
    /// The first point seeds both extrema; every later point widens each axis independently.
    /// Returns `None` if `points` is empty.
    pub fn from_points(points: impl IntoIterator<Item = Point3<Real>>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let mut res = Self::new(first, first);
        for p in points {
            res.expand_to(&p);
        }
        Some(res)
    }

    /// Whether `mins <= maxs` on every axis.
    #[inline]
    pub fn is_valid(&self) -> bool {
        let Self { mins: i, maxs: a } = self;
        i.x <= a.x && i.y <= a.y && i.z <= a.z
    }

    #[inline]
    pub fn contains(&self, p: &Point3<Real>) -> bool {
        let Self { mins: i, maxs: a } = self;
        (p.x >= i.x && p.y >= i.y && p.z >= i.z) && (p.x <= a.x && p.y <= a.y && p.z <= a.z)
    }

    /// Determine the center of `self`.
    #[inline]
    pub fn center(&self) -> Point3<Real> {
        let Self { mins: i, maxs: a } = self;
        point![
            (i.x + a.x) / Real::TWO,
            (i.y + a.y) / Real::TWO,
            (i.z + a.z) / Real::TWO
        ]
    }

    /// Grow `self` such that it contains `p`.
    pub fn expand_to(&mut self, p: &Point3<Real>) {
        if p.x < self.mins.x {
            self.mins.x = p.x;
        }
        if p.y < self.mins.y {
            self.mins.y = p.y;
        }
        if p.z < self.mins.z {
            self.mins.z = p.z;
        }
        if p.x > self.maxs.x {
            self.maxs.x = p.x;
        }
        if p.y > self.maxs.y {
            self.maxs.y = p.y;
        }
        if p.z > self.maxs.z {
            self.maxs.z = p.z;
        }
    }

    /// Construct the smallest box containing both `self` and `other`.
    pub fn merged(&self, other: &Self) -> Self {
        let mut res = *self;
        res.expand_to(&other.mins);
        res.expand_to(&other.maxs);
        res
    }

    /// The eight corners of `self`, x major, z minor.
    #[rustfmt::skip]
    pub fn corners(&self) -> [Point3<Real>; 8] {
        let Self { mins: i, maxs: a } = self;
        [
            point![i.x, i.y, i.z],
            point![i.x, i.y, a.z],
            point![i.x, a.y, i.z],
            point![i.x, a.y, a.z],
            point![a.x, i.y, i.z],
            point![a.x, i.y, a.z],
            point![a.x, a.y, i.z],
            point![a.x, a.y, a.z],
        ]
    }

    /// Construct the axis-aligned box containing `self` after it has been transformed by `m`.
    ///
    /// All eight corners are transformed, so the result stays conservative under rotation.
    pub fn transform(&self, m: &Matrix4<Real>) -> Self {
        let mut res = Self::new_invalid();
        for c in self.corners() {
            res.expand_to(&m.transform_point(&c));
        }
        res
    }
}
