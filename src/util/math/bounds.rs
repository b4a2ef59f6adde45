use super::vec3d::Vec3D;
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box expressed in some local reference frame.
///
/// Vessels describe the hazard region behind their engines ("exhaust volume")
/// with one of these, relative to their own [`Transform`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    /// Center of the box.
    center: (f64, f64, f64),
    /// Half-size of the box along each local axis, never negative.
    extents: (f64, f64, f64),
}

impl Bounds {
    /// Creates a box from its center and full size.
    pub fn new(center: Vec3D<f64>, size: Vec3D<f64>) -> Self {
        Self {
            center: (center.x(), center.y(), center.z()),
            extents: (size.x().abs() / 2.0, size.y().abs() / 2.0, size.z().abs() / 2.0),
        }
    }

    /// A zero-sized box at the local origin, i.e. "no exhaust".
    pub fn empty() -> Self { Self::default() }

    pub fn center(&self) -> Vec3D<f64> { Vec3D::from(self.center) }

    pub fn extents(&self) -> Vec3D<f64> { Vec3D::from(self.extents) }

    pub fn min(&self) -> Vec3D<f64> { self.center() - self.extents() }

    pub fn max(&self) -> Vec3D<f64> { self.center() + self.extents() }

    /// Returns `true` if the point lies inside or on the surface of the box.
    pub fn contains(&self, point: Vec3D<f64>) -> bool { self.sqr_distance(point) <= 0.0 }

    /// Squared distance from `point` to the closest point of the box.
    ///
    /// Points inside the box are at distance zero.
    pub fn sqr_distance(&self, point: Vec3D<f64>) -> f64 {
        let (min, max) = (self.min(), self.max());
        let dx = axis_gap(point.x(), min.x(), max.x());
        let dy = axis_gap(point.y(), min.y(), max.y());
        let dz = axis_gap(point.z(), min.z(), max.z());
        dx * dx + dy * dy + dz * dz
    }
}

fn axis_gap(v: f64, min: f64, max: f64) -> f64 {
    if v < min {
        min - v
    } else if v > max {
        v - max
    } else {
        0.0
    }
}

/// A rigid reference frame: an origin plus an orthonormal basis, all in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    origin: Vec3D<f64>,
    right: Vec3D<f64>,
    up: Vec3D<f64>,
    forward: Vec3D<f64>,
}

impl Transform {
    /// Creates a frame from an origin and two (not necessarily unit) axes.
    ///
    /// `forward` is orthogonalized against `up`, the third axis is derived so the basis
    /// stays right-handed. Returns `None` if the axes are degenerate.
    pub fn new(origin: Vec3D<f64>, up: Vec3D<f64>, forward: Vec3D<f64>) -> Option<Self> {
        let up = up.normalize();
        let forward = forward.exclude(up).normalize();
        if up.is_zero() || forward.is_zero() {
            return None;
        }
        let right = up.cross(forward);
        Some(Self { origin, right, up, forward })
    }

    /// A frame aligned with the world axes at `origin` (y up, z forward).
    pub fn translation(origin: Vec3D<f64>) -> Self {
        Self { origin, right: Vec3D::unit_x(), up: Vec3D::unit_y(), forward: Vec3D::unit_z() }
    }

    pub fn origin(&self) -> Vec3D<f64> { self.origin }
    pub fn up(&self) -> Vec3D<f64> { self.up }
    pub fn forward(&self) -> Vec3D<f64> { self.forward }
    pub fn right(&self) -> Vec3D<f64> { self.right }

    /// Moves the frame to a new origin while keeping its orientation.
    pub fn with_origin(self, origin: Vec3D<f64>) -> Self { Self { origin, ..self } }

    /// Maps a world-space point into this frame's local coordinates.
    pub fn inverse_transform_point(&self, point: Vec3D<f64>) -> Vec3D<f64> {
        let rel = point - self.origin;
        Vec3D::new(rel.dot(self.right), rel.dot(self.up), rel.dot(self.forward))
    }

    /// Maps a local point into world space.
    pub fn transform_point(&self, local: Vec3D<f64>) -> Vec3D<f64> {
        self.origin + self.right * local.x() + self.up * local.y() + self.forward * local.z()
    }
}
