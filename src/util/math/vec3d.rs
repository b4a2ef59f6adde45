use num::traits::{Float, NumAssignOps};
use std::fmt::Display;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// A 3D vector generic over floating point types.
///
/// Used for world-space positions, velocities and the avoidance corrections
/// produced by the collision prevention system.
///
/// # Type Parameters
/// * `T` - The component type, usually `f64`.
#[derive(Debug, PartialEq, Clone, Copy, Default)]
pub struct Vec3D<T> {
    /// The x-component of the vector.
    x: T,
    /// The y-component of the vector.
    y: T,
    /// The z-component of the vector.
    z: T,
}

impl<T: Copy> Vec3D<T> {
    /// Creates a new vector with the given components.
    pub const fn new(x: T, y: T, z: T) -> Self { Self { x, y, z } }

    pub const fn x(&self) -> T { self.x }
    pub const fn y(&self) -> T { self.y }
    pub const fn z(&self) -> T { self.z }
}

impl<T> Vec3D<T>
where
    T: Float + NumAssignOps,
{
    /// Creates a zero vector.
    pub fn zero() -> Self { Self::new(T::zero(), T::zero(), T::zero()) }

    /// Unit vector along the x axis.
    pub fn unit_x() -> Self { Self::new(T::one(), T::zero(), T::zero()) }

    /// Unit vector along the y axis.
    pub fn unit_y() -> Self { Self::new(T::zero(), T::one(), T::zero()) }

    /// Unit vector along the z axis.
    pub fn unit_z() -> Self { Self::new(T::zero(), T::zero(), T::one()) }

    /// Returns `true` if all components are exactly zero.
    pub fn is_zero(&self) -> bool { self.x.is_zero() && self.y.is_zero() && self.z.is_zero() }

    /// Returns `true` if no component is `NaN` or infinite.
    pub fn is_finite(&self) -> bool { self.x.is_finite() && self.y.is_finite() && self.z.is_finite() }

    /// Computes the dot product with another vector.
    pub fn dot(self, other: Self) -> T { self.x * other.x + self.y * other.y + self.z * other.z }

    /// Computes the right-handed cross product `self x other`.
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Computes the squared magnitude of the vector.
    pub fn sqr_abs(&self) -> T { self.dot(*self) }

    /// Computes the magnitude (euclidean length) of the vector.
    pub fn abs(&self) -> T { self.sqr_abs().sqrt() }

    /// Normalizes the vector to have a magnitude of 1.
    /// If the magnitude is zero, the original vector is returned unmodified.
    pub fn normalize(self) -> Self {
        let magnitude = self.abs();
        if magnitude.is_zero() { self } else { self / magnitude }
    }

    /// Creates a vector pointing from `self` to `other`.
    pub fn to(&self, other: &Self) -> Self { *other - *self }

    /// Computes the euclidean distance between two points.
    pub fn euclid_distance(&self, other: &Self) -> T { self.to(other).abs() }

    /// Projects the vector onto the direction of `normal`.
    pub fn project_on(self, normal: Self) -> Self {
        let sqr_n = normal.sqr_abs();
        if sqr_n.is_zero() { Self::zero() } else { normal * (self.dot(normal) / sqr_n) }
    }

    /// Removes the component along `normal`, leaving the part of the vector
    /// lying in the plane orthogonal to it.
    pub fn exclude(self, normal: Self) -> Self { self - self.project_on(normal) }

    /// Clamps every component into `[min, max]`.
    pub fn clamp_components(self, min: T, max: T) -> Self {
        Self::new(
            self.x.max(min).min(max),
            self.y.max(min).min(max),
            self.z.max(min).min(max),
        )
    }

    /// Returns a unit vector orthogonal to `self`.
    ///
    /// The result is built against the world axis least aligned with `self`, so it is
    /// stable for any non-zero input. A zero input yields a zero vector.
    pub fn any_orthogonal(self) -> Self {
        if self.is_zero() {
            return Self::zero();
        }
        let (ax, ay, az) = (self.x.abs(), self.y.abs(), self.z.abs());
        let helper = if ax <= ay && ax <= az {
            Self::unit_x()
        } else if ay <= az {
            Self::unit_y()
        } else {
            Self::unit_z()
        };
        self.cross(helper).normalize()
    }

    /// Component-wise absolute maximum, useful for bounds checks in tests and telemetry.
    pub fn max_abs_component(&self) -> T { self.x.abs().max(self.y.abs()).max(self.z.abs()) }

    /// Linear interpolation towards `other` by factor `t` (not clamped).
    pub fn lerp(self, other: Self, t: T) -> Self { self + (other - self) * t }
}

impl<T: Float> Add for Vec3D<T> {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output { Self { x: self.x + rhs.x, y: self.y + rhs.y, z: self.z + rhs.z } }
}

impl<T: Float> Sub for Vec3D<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output { Self { x: self.x - rhs.x, y: self.y - rhs.y, z: self.z - rhs.z } }
}

impl<T: Float> Neg for Vec3D<T> {
    type Output = Self;

    fn neg(self) -> Self::Output { Self { x: -self.x, y: -self.y, z: -self.z } }
}

impl<T: Float> Mul<T> for Vec3D<T> {
    type Output = Self;

    /// Implements the `*` operator for a `Vec3D` and a scalar.
    fn mul(self, rhs: T) -> Self::Output { Self { x: self.x * rhs, y: self.y * rhs, z: self.z * rhs } }
}

impl<T: Float> Div<T> for Vec3D<T> {
    type Output = Self;

    /// Implements the `/` operator for a `Vec3D` and a scalar.
    fn div(self, rhs: T) -> Self::Output { Self { x: self.x / rhs, y: self.y / rhs, z: self.z / rhs } }
}

impl<T: Float> AddAssign for Vec3D<T> {
    fn add_assign(&mut self, rhs: Self) { *self = *self + rhs; }
}

impl<T: Float> SubAssign for Vec3D<T> {
    fn sub_assign(&mut self, rhs: Self) { *self = *self - rhs; }
}

impl<T: Float> Sum for Vec3D<T> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self { x: T::zero(), y: T::zero(), z: T::zero() }, |acc, v| acc + v)
    }
}

impl<'a, T: Float> Sum<&'a Vec3D<T>> for Vec3D<T> {
    fn sum<I: Iterator<Item = &'a Self>>(iter: I) -> Self { iter.copied().sum() }
}

impl<T> From<(T, T, T)> for Vec3D<T> {
    /// Creates a `Vec3D` from a tuple of (x, y, z) values.
    fn from(tuple: (T, T, T)) -> Self { Self { x: tuple.0, y: tuple.1, z: tuple.2 } }
}

impl<T: Display> Display for Vec3D<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}, {}]", self.x, self.y, self.z)
    }
}

#[cfg(test)]
mod tests {
    use super::Vec3D;

    #[test]
    fn test_cross_is_right_handed() {
        let z = Vec3D::<f64>::unit_x().cross(Vec3D::unit_y());
        assert_eq!(z, Vec3D::unit_z());
    }

    #[test]
    fn test_exclude_removes_axis() {
        let v = Vec3D::<f64>::new(3.0, 4.0, 5.0);
        let flat = v.exclude(Vec3D::unit_z());
        assert!((flat.z()).abs() < 1e-12);
        assert!((flat.x() - 3.0).abs() < 1e-12);
        assert!((flat.y() - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_any_orthogonal() {
        for v in [Vec3D::<f64>::new(1.0, 0.0, 0.0), Vec3D::new(0.3, -2.0, 7.5), Vec3D::new(0.0, 0.0, -4.0)] {
            let o = v.any_orthogonal();
            assert!(o.dot(v).abs() < 1e-9);
            assert!((o.abs() - 1.0).abs() < 1e-9);
        }
        assert!(Vec3D::<f64>::zero().any_orthogonal().is_zero());
    }

    #[test]
    fn test_clamp_components() {
        let v = Vec3D::new(-5.0, 50.0, 500.0).clamp_components(0.0, 100.0);
        assert_eq!(v, Vec3D::new(0.0, 50.0, 100.0));
    }
}
