/// Semi-major axis of the WGS84 ellipsoid in meters.
pub const WGS84_SEMI_MAJOR_AXIS: f64 = 6_378_137.0;
/// Inverse flattening of the WGS84 ellipsoid.
pub const WGS84_INVERSE_FLATTENING: f64 = 298.257_223_563;
/// Flattening of the WGS84 ellipsoid.
pub const WGS84_FLATTENING: f64 = 1.0 / WGS84_INVERSE_FLATTENING;
/// Semi-minor axis of the WGS84 ellipsoid in meters.
pub const WGS84_SEMI_MINOR_AXIS: f64 = WGS84_SEMI_MAJOR_AXIS * (1.0 - WGS84_FLATTENING);

/// Reference ellipsoid.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Datum {
    semimajor: f64,
    inv_flattening: f64,
}

impl Datum {
    /// World Geodetic System 1984.
    pub const WGS84: Self = Datum {
        semimajor: WGS84_SEMI_MAJOR_AXIS,
        inv_flattening: WGS84_INVERSE_FLATTENING,
    };

    /// Creates a custom ellipsoid.
    pub const fn new(semimajor: f64, inv_flattening: f64) -> Self {
        Self {
            semimajor,
            inv_flattening,
        }
    }

    /// Equatorial radius.
    pub fn semimajor(&self) -> f64 {
        self.semimajor
    }

    /// Polar radius.
    pub fn semiminor(&self) -> f64 {
        self.semimajor * (1.0 - self.flattening())
    }

    /// Inverse flattening.
    pub fn inv_flattening(&self) -> f64 {
        self.inv_flattening
    }

    /// Flattening.
    pub fn flattening(&self) -> f64 {
        1.0 / self.inv_flattening
    }
}

impl Default for Datum {
    fn default() -> Self {
        Self::WGS84
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn wgs84_semiminor() {
        assert_abs_diff_eq!(Datum::WGS84.semiminor(), 6_356_752.314_245, epsilon = 1e-6);
        assert_abs_diff_eq!(WGS84_SEMI_MINOR_AXIS, Datum::WGS84.semiminor());
    }
}
