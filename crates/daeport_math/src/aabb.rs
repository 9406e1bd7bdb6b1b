use crate::{Interval, Vec3};

/// Axis-aligned bounding box, one [`Interval`] per axis.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct Aabb {
    pub x: Interval,
    pub y: Interval,
    pub z: Interval,
}

impl Aabb {
    /// Create an empty AABB (contains nothing).
    pub fn empty() -> Self {
        Self {
            x: Interval::EMPTY,
            y: Interval::EMPTY,
            z: Interval::EMPTY,
        }
    }

    /// Create an AABB from two corner points.
    pub fn from_points(a: Vec3, b: Vec3) -> Self {
        Self {
            x: Interval::new(a.x.min(b.x), a.x.max(b.x)),
            y: Interval::new(a.y.min(b.y), a.y.max(b.y)),
            z: Interval::new(a.z.min(b.z), a.z.max(b.z)),
        }
    }

    /// Smallest box containing every point, or an empty box for no points.
    pub fn from_point_cloud<'a>(points: impl IntoIterator<Item = &'a Vec3>) -> Self {
        points
            .into_iter()
            .fold(Self::empty(), |aabb, point| aabb.include(*point))
    }

    /// Grow the box so that it contains `point`.
    pub fn include(&self, point: Vec3) -> Self {
        Self {
            x: self.x.include(point.x),
            y: self.y.include(point.y),
            z: self.z.include(point.z),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty() || self.y.is_empty() || self.z.is_empty()
    }

    /// Returns the center point of the bounding box.
    pub fn centroid(&self) -> Vec3 {
        Vec3::new(
            (self.x.min + self.x.max) * 0.5,
            (self.y.min + self.y.max) * 0.5,
            (self.z.min + self.z.max) * 0.5,
        )
    }

    /// Per-axis extent of the box.
    pub fn size(&self) -> Vec3 {
        Vec3::new(self.x.size(), self.y.size(), self.z.size())
    }
}
