// Copyright 2026 the Polysync Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Polygon geometry.
//!
//! A polygon is described by one or more closed [rings](Ring). The order of
//! rings and of points within a ring is significant: it defines the shape the
//! provider draws (outer boundary first, holes after).
//!
//! Geometry can change in two ways, reported as a [`GeometryChange`]:
//!
//! - **Replaced**: The host supplies a whole new set of rings.
//! - **Mutated**: Points or rings are inserted, removed or moved in place
//!   through the [`Paths`] editing methods.
//!
//! Coordinates are not validated here; the provider owns that.

use alloc::vec::Vec;

use kurbo::{Point, Rect};

/// A geographic coordinate in degrees.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LatLng {
    /// Latitude.
    pub lat: f64,
    /// Longitude.
    pub lng: f64,
}

impl LatLng {
    /// Creates a coordinate from latitude and longitude.
    #[inline]
    #[must_use]
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns the coordinate as a planar point (`x` = longitude, `y` = latitude).
    #[inline]
    #[must_use]
    pub const fn to_point(self) -> Point {
        Point::new(self.lng, self.lat)
    }
}

/// One closed ring of coordinates.
pub type Ring = Vec<LatLng>;

/// How a polygon's geometry changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub enum GeometryChange {
    /// The whole ring set was replaced.
    Replaced,
    /// Rings or points were edited in place.
    Mutated,
}

/// Resolved location of a click, in both coordinate spaces.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClickLocation {
    /// Geographic position under the pointer.
    pub position: LatLng,
    /// Screen position in pixels, relative to the map's viewport.
    pub pixel: Point,
}

/// The ordered ring set of a polygon.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Paths {
    rings: Vec<Ring>,
}

impl Paths {
    /// Creates an empty ring set.
    #[must_use]
    pub const fn new() -> Self {
        Self { rings: Vec::new() }
    }

    /// Creates a ring set holding a single ring.
    #[must_use]
    pub fn single(ring: Ring) -> Self {
        Self {
            rings: alloc::vec![ring],
        }
    }

    /// Returns the rings.
    #[must_use]
    pub fn rings(&self) -> &[Ring] {
        &self.rings
    }

    /// Returns the number of rings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rings.len()
    }

    /// Returns whether there are no rings.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rings.is_empty()
    }

    /// Returns the total number of points across all rings.
    #[must_use]
    pub fn point_count(&self) -> usize {
        self.rings.iter().map(Vec::len).sum()
    }

    /// Returns the longitude/latitude bounding box, or `None` if there are no
    /// points.
    #[must_use]
    pub fn bounds(&self) -> Option<Rect> {
        let mut points = self.rings.iter().flatten().map(|p| p.to_point());
        let first = points.next()?;
        Some(points.fold(Rect::from_points(first, first), |r, p| r.union_pt(p)))
    }

    // -- In-place editing --

    /// Appends a ring.
    pub fn push_ring(&mut self, ring: Ring) {
        self.rings.push(ring);
    }

    /// Removes and returns the ring at `ring`.
    ///
    /// # Panics
    ///
    /// Panics if `ring` is out of range.
    pub fn remove_ring(&mut self, ring: usize) -> Ring {
        self.rings.remove(ring)
    }

    /// Inserts `point` at `index` within ring `ring`.
    ///
    /// # Panics
    ///
    /// Panics if `ring` or `index` is out of range.
    pub fn insert_point(&mut self, ring: usize, index: usize, point: LatLng) {
        self.rings[ring].insert(index, point);
    }

    /// Removes and returns the point at `index` within ring `ring`.
    ///
    /// # Panics
    ///
    /// Panics if `ring` or `index` is out of range.
    pub fn remove_point(&mut self, ring: usize, index: usize) -> LatLng {
        self.rings[ring].remove(index)
    }

    /// Replaces the point at `index` within ring `ring`, returning the old one.
    ///
    /// # Panics
    ///
    /// Panics if `ring` or `index` is out of range.
    pub fn set_point(&mut self, ring: usize, index: usize, point: LatLng) -> LatLng {
        core::mem::replace(&mut self.rings[ring][index], point)
    }
}

impl From<Vec<Ring>> for Paths {
    fn from(rings: Vec<Ring>) -> Self {
        Self { rings }
    }
}

impl FromIterator<Ring> for Paths {
    fn from_iter<I: IntoIterator<Item = Ring>>(iter: I) -> Self {
        Self {
            rings: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec;

    use super::*;

    fn square() -> Ring {
        vec![
            LatLng::new(0.0, 0.0),
            LatLng::new(0.0, 2.0),
            LatLng::new(1.0, 2.0),
            LatLng::new(1.0, 0.0),
        ]
    }

    #[test]
    fn bounds_cover_all_rings() {
        let mut paths = Paths::single(square());
        paths.push_ring(vec![LatLng::new(-3.0, 5.0)]);
        let b = paths.bounds().expect("non-empty geometry has bounds");
        assert_eq!(b, Rect::new(0.0, -3.0, 5.0, 1.0));
    }

    #[test]
    fn empty_paths_have_no_bounds() {
        assert!(Paths::new().bounds().is_none(), "no points, no bounds");
        assert!(
            Paths::from(vec![Ring::new()]).bounds().is_none(),
            "empty ring has no bounds"
        );
    }

    #[test]
    fn in_place_edits() {
        let mut paths = Paths::single(square());
        paths.insert_point(0, 1, LatLng::new(0.0, 1.0));
        assert_eq!(paths.point_count(), 5);

        let old = paths.set_point(0, 0, LatLng::new(0.5, 0.5));
        assert_eq!(old, LatLng::new(0.0, 0.0));

        let removed = paths.remove_point(0, 1);
        assert_eq!(removed, LatLng::new(0.0, 1.0));
        assert_eq!(paths.point_count(), 4);
        assert_eq!(paths.rings()[0][0], LatLng::new(0.5, 0.5));
    }

    #[test]
    fn ring_order_is_preserved() {
        let a = square();
        let b = vec![LatLng::new(9.0, 9.0)];
        let paths: Paths = [a.clone(), b.clone()].into_iter().collect();
        assert_eq!(paths.rings(), &[a, b]);
    }
}
