use crate::geo::Datum;
use crate::Coord;

/// Maximum number of iterations of the Vincenty inverse formula.
pub const VINCENTY_MAX_ITERATIONS: usize = 100;
/// Convergence threshold of the Vincenty inverse formula, in radians of longitude on the auxiliary sphere.
pub const VINCENTY_TOLERANCE: f64 = 1e-12;

/// Great circle distance between two positions on a sphere with the given radius.
///
/// Uses the `atan2` form of the spherical Vincenty formula, which stays accurate for both small and antipodal
/// distances. If the first position has elevation, the elevation difference is combined with the surface distance
/// (a missing elevation of the second position is taken as zero).
pub fn great_circle_distance(a: &Coord, b: &Coord, radius: f64) -> f64 {
    let lat1 = a.y.to_radians();
    let lat2 = b.y.to_radians();
    let delta_lon = (b.x - a.x).to_radians();

    let (sin_lat1, cos_lat1) = lat1.sin_cos();
    let (sin_lat2, cos_lat2) = lat2.sin_cos();
    let (sin_dlon, cos_dlon) = delta_lon.sin_cos();

    let y = ((cos_lat2 * sin_dlon).powi(2)
        + (cos_lat1 * sin_lat2 - sin_lat1 * cos_lat2 * cos_dlon).powi(2))
    .sqrt();
    let x = sin_lat1 * sin_lat2 + cos_lat1 * cos_lat2 * cos_dlon;
    let d = radius * y.atan2(x);

    match a.z {
        Some(z) => d.hypot(b.z_or_zero() - z),
        None => d,
    }
}

/// Haversine (spherical law of cosines) distance between two positions on the WGS84 equatorial sphere, in meters.
///
/// The result may be `NaN` for nearly identical positions due to rounding of the `acos` argument.
pub fn haversine_distance(a: &Coord, b: &Coord) -> f64 {
    let lat1 = a.y.to_radians();
    let lat2 = b.y.to_radians();
    let dlon = (a.x - b.x).abs().to_radians();

    Datum::WGS84.semimajor()
        * (lat1.sin() * lat2.sin() + lat1.cos() * lat2.cos() * dlon.cos()).acos()
}

/// Distance between two positions on the ellipsoid, computed with the inverse Vincenty formula.
///
/// Returns `None` if the iteration does not converge within [`VINCENTY_MAX_ITERATIONS`], which can happen for nearly
/// antipodal positions. Coincident positions give zero.
pub fn vincenty_distance(a: &Coord, b: &Coord, datum: &Datum) -> Option<f64> {
    let semimajor = datum.semimajor();
    let semiminor = datum.semiminor();
    let f = datum.flattening();

    let l = (b.x - a.x).to_radians();
    let u1 = ((1.0 - f) * a.y.to_radians().tan()).atan();
    let u2 = ((1.0 - f) * b.y.to_radians().tan()).atan();
    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;
    let mut converged = false;
    let mut sin_sigma = 0.0;
    let mut cos_sigma = 0.0;
    let mut sigma = 0.0;
    let mut cos_sq_alpha = 0.0;
    let mut cos_2_sigma_m = 0.0;

    for _ in 0..VINCENTY_MAX_ITERATIONS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();
        sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();
        if sin_sigma == 0.0 {
            return Some(0.0);
        }

        cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        sigma = sin_sigma.atan2(cos_sigma);
        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        cos_sq_alpha = 1.0 - sin_alpha * sin_alpha;
        // equatorial line
        cos_2_sigma_m = if cos_sq_alpha != 0.0 {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos_sq_alpha
        } else {
            0.0
        };

        let c = f / 16.0 * cos_sq_alpha * (4.0 + f * (4.0 - 3.0 * cos_sq_alpha));
        let prev = lambda;
        lambda = l
            + (1.0 - c)
                * f
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2_sigma_m + c * cos_sigma * (-1.0 + 2.0 * cos_2_sigma_m.powi(2))));

        if (lambda - prev).abs() <= VINCENTY_TOLERANCE {
            converged = true;
            break;
        }
    }

    if !converged {
        log::debug!("Vincenty formula did not converge between {a:?} and {b:?}");
        return None;
    }

    let u_sq = cos_sq_alpha * (semimajor.powi(2) - semiminor.powi(2)) / semiminor.powi(2);
    let big_a = 1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
    let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));
    let delta_sigma = big_b
        * sin_sigma
        * (cos_2_sigma_m
            + big_b / 4.0
                * (cos_sigma * (-1.0 + 2.0 * cos_2_sigma_m.powi(2))
                    - big_b / 6.0
                        * cos_2_sigma_m
                        * (-3.0 + 4.0 * sin_sigma.powi(2))
                        * (-3.0 + 4.0 * cos_2_sigma_m.powi(2))));

    Some(semiminor * big_a * (sigma - delta_sigma))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::WGS84_SEMI_MAJOR_AXIS;
    use approx::assert_abs_diff_eq;

    const ONE_DEGREE: f64 = 111_319.490_793_273_57;

    #[test]
    fn great_circle_one_degree() {
        let a = Coord::new(0.0, 0.0);
        let b = Coord::new(0.0, 1.0);
        assert_abs_diff_eq!(
            great_circle_distance(&a, &b, WGS84_SEMI_MAJOR_AXIS),
            ONE_DEGREE,
            epsilon = 1e-6
        );
        assert_abs_diff_eq!(great_circle_distance(&a, &b, 1.0), 1f64.to_radians());
    }

    #[test]
    fn great_circle_with_elevation() {
        let a = Coord::new_3d(10.0, 20.0, 0.0);
        let b = Coord::new_3d(10.0, 20.0, 100.0);
        assert_abs_diff_eq!(
            great_circle_distance(&a, &b, WGS84_SEMI_MAJOR_AXIS),
            100.0,
            epsilon = 1e-6
        );
    }

    #[test]
    fn haversine_one_degree() {
        let d = haversine_distance(&Coord::new(0.0, 0.0), &Coord::new(1.0, 0.0));
        assert_abs_diff_eq!(d, ONE_DEGREE, epsilon = 1e-3);
    }

    #[test]
    fn vincenty_flinders_peak_to_buninyong() {
        let flinders_peak = Coord::new(144.424_867_888_888_89, -37.951_033_416_666_67);
        let buninyong = Coord::new(143.926_495_527_777_78, -37.652_821_138_888_89);

        let d = vincenty_distance(&flinders_peak, &buninyong, &Datum::WGS84).unwrap();
        assert_abs_diff_eq!(d, 54_972.271, epsilon = 1e-3);
    }

    #[test]
    fn vincenty_coincident() {
        let p = Coord::new(12.0, 34.0);
        assert_eq!(vincenty_distance(&p, &p, &Datum::WGS84), Some(0.0));
    }

    #[test]
    fn vincenty_antipodal_does_not_converge() {
        let a = Coord::new(2.0, 4.0);
        let b = Coord::new(-178.0, -4.0);
        assert_eq!(vincenty_distance(&a, &b, &Datum::WGS84), None);
    }
}
