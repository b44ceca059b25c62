use approx::{AbsDiffEq, RelativeEq};
use serde::{Deserialize, Serialize};

use crate::cartesian::CartesianPoint2d;

/// A single position: planar `x`, `y` plus optional elevation `z` and measure `m`.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Coord {
    /// X coordinate (longitude for geographic data).
    pub x: f64,
    /// Y coordinate (latitude for geographic data).
    pub y: f64,
    /// Elevation.
    pub z: Option<f64>,
    /// Measure.
    pub m: Option<f64>,
}

impl Coord {
    /// Creates a 2d coordinate.
    pub const fn new(x: f64, y: f64) -> Self {
        Self {
            x,
            y,
            z: None,
            m: None,
        }
    }

    /// Creates a 3d coordinate.
    pub const fn new_3d(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z: Some(z),
            m: None,
        }
    }

    /// Sets the elevation.
    pub fn with_z(mut self, z: f64) -> Self {
        self.z = Some(z);
        self
    }

    /// Sets the measure.
    pub fn with_m(mut self, m: f64) -> Self {
        self.m = Some(m);
        self
    }

    /// Returns true if the coordinate has elevation.
    pub fn has_z(&self) -> bool {
        self.z.is_some()
    }

    /// Returns true if the coordinate has a measure.
    pub fn is_measured(&self) -> bool {
        self.m.is_some()
    }

    /// Ordinates in `x, y[, z][, m]` order.
    pub fn as_array(&self) -> Vec<f64> {
        let mut arr = vec![self.x, self.y];
        arr.extend(self.z);
        arr.extend(self.m);
        arr
    }

    pub(crate) fn z_or_zero(&self) -> f64 {
        self.z.unwrap_or(0.0)
    }
}

impl CartesianPoint2d for Coord {
    type Num = f64;

    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }
}

impl AbsDiffEq for Coord {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        f64::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        fn opt_eq(a: Option<f64>, b: Option<f64>, epsilon: f64) -> bool {
            match (a, b) {
                (Some(a), Some(b)) => a.abs_diff_eq(&b, epsilon),
                (None, None) => true,
                _ => false,
            }
        }

        self.x.abs_diff_eq(&other.x, epsilon)
            && self.y.abs_diff_eq(&other.y, epsilon)
            && opt_eq(self.z, other.z, epsilon)
            && opt_eq(self.m, other.m, epsilon)
    }
}

impl RelativeEq for Coord {
    fn default_max_relative() -> f64 {
        f64::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        fn opt_eq(a: Option<f64>, b: Option<f64>, epsilon: f64, max_relative: f64) -> bool {
            match (a, b) {
                (Some(a), Some(b)) => a.relative_eq(&b, epsilon, max_relative),
                (None, None) => true,
                _ => false,
            }
        }

        self.x.relative_eq(&other.x, epsilon, max_relative)
            && self.y.relative_eq(&other.y, epsilon, max_relative)
            && opt_eq(self.z, other.z, epsilon, max_relative)
            && opt_eq(self.m, other.m, epsilon, max_relative)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_array() {
        assert_eq!(Coord::new(1.0, 2.0).as_array(), vec![1.0, 2.0]);
        assert_eq!(Coord::new_3d(1.0, 2.0, 3.0).as_array(), vec![1.0, 2.0, 3.0]);
        assert_eq!(
            Coord::new(1.0, 2.0).with_m(4.0).as_array(),
            vec![1.0, 2.0, 4.0]
        );
        assert_eq!(
            Coord::new_3d(1.0, 2.0, 3.0).with_m(4.0).as_array(),
            vec![1.0, 2.0, 3.0, 4.0]
        );
    }

    #[test]
    fn approx_eq() {
        approx::assert_abs_diff_eq!(
            Coord::new_3d(1.0, 2.0, 3.0),
            Coord::new_3d(1.0 + 1e-12, 2.0, 3.0),
            epsilon = 1e-9
        );
        assert!(!Coord::new(1.0, 2.0).abs_diff_eq(&Coord::new_3d(1.0, 2.0, 0.0), 1e-9));
    }
}
