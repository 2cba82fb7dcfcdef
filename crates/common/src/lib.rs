// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Geometry shared between the molecule model and the selection engine.

mod bounding_box;

pub use bounding_box::BoundingBox;

/// Squared Euclidean distance between two points.
#[inline]
pub fn distance_sq(a: ultraviolet::Vec3, b: ultraviolet::Vec3) -> f32 {
    (a - b).mag_sq()
}

// End of File
