//! WGS84 inverse geodesic problem
use crate::constants::{WGS84_FLATTENING, WGS84_MEAN_RADIUS_M, WGS84_SEMI_MAJOR_AXIS_M};

const MAX_ITERATIONS: usize = 200;
const LAMBDA_CONVERGENCE_RAD: f64 = 1.0E-12;

/// Ellipsoidal distance in meters between two (latitude, longitude)
/// points, both in degrees, along the WGS84 surface (Vincenty inverse
/// formula). Planar or spherical approximations are off by too much at
/// aviation ranges, where tens of kilometers separate the sensors.
///
/// The iteration does not converge for near antipodal pairs; those fall
/// back to the spherical great-circle distance, which is well beyond any
/// geometry this solver is asked about.
pub fn distance_m(lat1_deg: f64, lon1_deg: f64, lat2_deg: f64, lon2_deg: f64) -> f64 {
    let a = WGS84_SEMI_MAJOR_AXIS_M;
    let f = WGS84_FLATTENING;
    let b = a * (1.0 - f);

    let u1 = ((1.0 - f) * lat1_deg.to_radians().tan()).atan();
    let u2 = ((1.0 - f) * lat2_deg.to_radians().tan()).atan();
    let l = (lon2_deg - lon1_deg).to_radians();

    let (sin_u1, cos_u1) = u1.sin_cos();
    let (sin_u2, cos_u2) = u2.sin_cos();

    let mut lambda = l;

    for _ in 0..MAX_ITERATIONS {
        let (sin_lambda, cos_lambda) = lambda.sin_cos();

        let sin_sigma = ((cos_u2 * sin_lambda).powi(2)
            + (cos_u1 * sin_u2 - sin_u1 * cos_u2 * cos_lambda).powi(2))
        .sqrt();

        if sin_sigma == 0.0 {
            // coincident (or numerically coincident) points
            return 0.0;
        }

        let cos_sigma = sin_u1 * sin_u2 + cos_u1 * cos_u2 * cos_lambda;
        let sigma = sin_sigma.atan2(cos_sigma);

        let sin_alpha = cos_u1 * cos_u2 * sin_lambda / sin_sigma;
        let cos2_alpha = 1.0 - sin_alpha * sin_alpha;

        // equatorial line: cos²α = 0
        let cos_2sigma_m = if cos2_alpha.abs() < f64::EPSILON {
            0.0
        } else {
            cos_sigma - 2.0 * sin_u1 * sin_u2 / cos2_alpha
        };

        let c = f / 16.0 * cos2_alpha * (4.0 + f * (4.0 - 3.0 * cos2_alpha));

        let lambda_prev = lambda;
        lambda = l
            + (1.0 - c)
                * f
                * sin_alpha
                * (sigma
                    + c * sin_sigma
                        * (cos_2sigma_m
                            + c * cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)));

        if (lambda - lambda_prev).abs() < LAMBDA_CONVERGENCE_RAD {
            let u_sq = cos2_alpha * (a * a - b * b) / (b * b);
            let big_a =
                1.0 + u_sq / 16384.0 * (4096.0 + u_sq * (-768.0 + u_sq * (320.0 - 175.0 * u_sq)));
            let big_b = u_sq / 1024.0 * (256.0 + u_sq * (-128.0 + u_sq * (74.0 - 47.0 * u_sq)));

            let delta_sigma = big_b
                * sin_sigma
                * (cos_2sigma_m
                    + big_b / 4.0
                        * (cos_sigma * (-1.0 + 2.0 * cos_2sigma_m * cos_2sigma_m)
                            - big_b / 6.0
                                * cos_2sigma_m
                                * (-3.0 + 4.0 * sin_sigma * sin_sigma)
                                * (-3.0 + 4.0 * cos_2sigma_m * cos_2sigma_m)));

            return b * big_a * (sigma - delta_sigma);
        }
    }

    haversine_m(lat1_deg, lon1_deg, lat2_deg, lon2_deg)
}

/// Spherical great-circle distance in meters (mean Earth radius).
fn haversine_m(lat1_deg: f64, lon1_deg: f64, lat2_deg: f64, lon2_deg: f64) -> f64 {
    let lat1 = lat1_deg.to_radians();
    let lat2 = lat2_deg.to_radians();
    let delta_lat = (lat2_deg - lat1_deg).to_radians();
    let delta_lon = (lon2_deg - lon1_deg).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    WGS84_MEAN_RADIUS_M * c
}

#[cfg(test)]
mod test {
    use super::distance_m;

    #[test]
    fn coincident_points() {
        assert_eq!(distance_m(47.0, 8.0, 47.0, 8.0), 0.0);
    }

    #[test]
    fn one_degree_longitude_at_equator() {
        // 1° of longitude along the equator: a/360 * 2π = 111 319.49 m
        let d = distance_m(0.0, 0.0, 0.0, 1.0);
        assert!((d - 111_319.49).abs() < 1.0, "got {d}");
    }

    #[test]
    fn one_degree_meridian_arc() {
        // meridian arc from the equator to 1°N ≈ 110 574.4 m
        let d = distance_m(0.0, 0.0, 1.0, 0.0);
        assert!((d - 110_574.4).abs() < 5.0, "got {d}");
    }

    #[test]
    fn symmetric() {
        let forward = distance_m(46.8, 7.7, 47.25, 8.25);
        let backward = distance_m(47.25, 8.25, 46.8, 7.7);
        assert!((forward - backward).abs() < 1.0E-6);
    }

    #[test]
    fn aviation_range_plausible() {
        // sensor baselines in the tens of km range
        let d = distance_m(46.8, 7.7, 47.2, 7.75);
        assert!(d > 40_000.0 && d < 50_000.0, "got {d}");
    }

    #[test]
    fn antipodal_does_not_hang() {
        let d = distance_m(0.0, 0.0, 0.5, 179.7);
        assert!(d.is_finite() && d > 19_000_000.0);
    }
}
