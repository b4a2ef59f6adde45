use crate::util::Vec3D;

/// Exponential smoothing of a 3D correction vector.
///
/// Every update moves the held value towards the input by `factor`, so for
/// `factor` in `(0, 1]` the output always lies on the segment between the previous
/// value and the input and never overshoots either.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LowPassFilterV {
    value: Vec3D<f64>,
    factor: f64,
}

impl LowPassFilterV {
    /// Creates a filter with a zero value. `factor` is clamped into `(0, 1]`.
    pub fn new(factor: f64) -> Self {
        Self { value: Vec3D::zero(), factor: factor.clamp(f64::MIN_POSITIVE, 1.0) }
    }

    /// Feeds a new sample and returns the smoothed value.
    pub fn update(&mut self, input: Vec3D<f64>) -> Vec3D<f64> {
        self.value = self.value.lerp(input, self.factor);
        self.value
    }

    pub fn value(&self) -> Vec3D<f64> { self.value }

    pub fn factor(&self) -> f64 { self.factor }

    /// Drops all smoothing history.
    pub fn reset(&mut self) { self.value = Vec3D::zero(); }
}

#[cfg(test)]
mod tests {
    use super::LowPassFilterV;
    use crate::util::Vec3D;

    #[test]
    fn test_converges_to_constant_input() {
        let mut f = LowPassFilterV::new(0.5);
        let target = Vec3D::new(10.0, 0.0, -4.0);
        for _ in 0..60 {
            f.update(target);
        }
        assert!(f.value().euclid_distance(&target) < 1e-9);
    }

    #[test]
    fn test_first_step_is_half_way() {
        let mut f = LowPassFilterV::new(0.5);
        let v = f.update(Vec3D::new(2.0, 4.0, 6.0));
        assert_eq!(v, Vec3D::new(1.0, 2.0, 3.0));
        f.reset();
        assert!(f.value().is_zero());
    }

    #[test]
    fn test_unit_factor_passes_through() {
        let mut f = LowPassFilterV::new(1.0);
        let v = Vec3D::new(3.0, -1.0, 0.5);
        assert_eq!(f.update(v), v);
    }
}
