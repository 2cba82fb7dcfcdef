// This Source Code Form is subject to the terms of the Mozilla Public License, v. 2.0.
// If a copy of the MPL was not distributed with this file,
// You can obtain one at <https://mozilla.org/MPL/2.0/>.

use ultraviolet::Vec3;

/// An axis-aligned bounding box defined by two opposite corners (`min` and `max`).
/// For a non-empty box `min.x <= max.x`, `min.y <= max.y`, `min.z <= max.z`.  The empty box
/// has `min` at +infinity and `max` at -infinity, so it contains nothing and enclosing any
/// point makes it the degenerate box around that point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct BoundingBox {
    pub min: Vec3,
    pub max: Vec3,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self::empty()
    }
}

impl BoundingBox {
    pub fn empty() -> Self {
        Self {
            min: Vec3::broadcast(f32::INFINITY),
            max: Vec3::broadcast(f32::NEG_INFINITY),
        }
    }

    /// The smallest box containing every point yielded by `points`.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Self {
        let mut bounds = Self::empty();
        for point in points {
            bounds.enclose_point(point);
        }
        bounds
    }

    /// True until at least one point has been enclosed.
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Returns the smallest `BoundingBox` that would contain both `self` and `other`.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            min: self.min.min_by_component(other.min),
            max: self.max.max_by_component(other.max),
        }
    }

    /// Returns true if the provided `point` is inside this `BoundingBox`, faces included.
    pub fn contains(&self, point: Vec3) -> bool {
        self.min.x <= point.x
            && point.x <= self.max.x
            && self.min.y <= point.y
            && point.y <= self.max.y
            && self.min.z <= point.z
            && point.z <= self.max.z
    }

    /// Grows this `BoundingBox` in-place to ensure that it will contain a given `point`.
    pub fn enclose_point(&mut self, point: Vec3) {
        self.min = self.min.min_by_component(point);
        self.max = self.max.max_by_component(point);
    }

    /// A copy grown by `padding` on every side.  The empty box stays empty.
    pub fn padded(&self, padding: f32) -> Self {
        if self.is_empty() {
            return *self;
        }
        let pad = Vec3::broadcast(padding);
        Self {
            min: self.min - pad,
            max: self.max + pad,
        }
    }
}


// End of File
