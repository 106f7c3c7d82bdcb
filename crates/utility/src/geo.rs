pub const EARTH_RADIUS_KM: f64 = 6371.0;

fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

fn to_degrees(radians: f64) -> f64 {
    radians * 180.0 / std::f64::consts::PI
}

/// Latitude/longitude rectangle, in degrees, containing every point within
/// `radius_km` of the center. Only meant to pre-select candidates, the exact
/// check has to be done with `haversine_distance` afterwards.
///
/// The edges are measured from the untouched center coordinates, so a zero
/// radius yields exactly the center. `None` if the area reaches over a pole
/// (every longitude is inside then) or the radius is not usable.
pub fn calculate_bounding_box(
    lat: f64,
    lon: f64,
    radius_km: f64,
) -> Option<((f64, f64), (f64, f64))> {
    // angular radius of the spherical cap
    let delta = radius_km / EARTH_RADIUS_KM;
    if !delta.is_finite() || delta < 0.0 || delta >= std::f64::consts::FRAC_PI_2 {
        return None;
    }

    let lat_cos = to_radians(lat).cos();
    if delta.sin() >= lat_cos {
        return None;
    }

    // widest east/west extent of the cap, reached north of the center's
    // parallel in the northern hemisphere (south in the southern)
    let lat_delta = to_degrees(delta);
    let lon_delta = to_degrees((delta.sin() / lat_cos).asin());

    Some((
        (lat - lat_delta, lon - lon_delta),
        (lat + lat_delta, lon + lon_delta),
    ))
}

/// Great-circle distance in kilometers on a sphere with `EARTH_RADIUS_KM`.
pub fn haversine_distance(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    let lat1_rad = to_radians(latitude_1);
    let lat2_rad = to_radians(latitude_2);

    let dlat = to_radians(latitude_2 - latitude_1);
    let dlon = to_radians(longitude_2 - longitude_1);

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    // rounding may push `a` a tiny bit past 1 for antipodal points
    let a = a.clamp(0.0, 1.0);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    const RUCKER_PARK: (f64, f64) = (40.7580, -73.9855);
    const MARCUS_GARVEY_PARK: (f64, f64) = (40.7614, -73.9776);

    #[test]
    fn known_distance_between_parks() {
        let distance = haversine_distance(
            RUCKER_PARK.0,
            RUCKER_PARK.1,
            MARCUS_GARVEY_PARK.0,
            MARCUS_GARVEY_PARK.1,
        );
        assert!((distance - 0.75).abs() <= 0.05, "got {distance}");
    }

    #[test]
    fn distance_is_symmetric() {
        let points = [
            (0.0, 0.0),
            (54.3233, 10.1228),
            (-33.8688, 151.2093),
            (89.9, -179.9),
            (-90.0, 180.0),
        ];
        for a in points {
            for b in points {
                let ab = haversine_distance(a.0, a.1, b.0, b.1);
                let ba = haversine_distance(b.0, b.1, a.0, a.1);
                assert!((ab - ba).abs() <= 1e-9 * ab.max(1.0), "{a:?} {b:?}");
            }
        }
    }

    #[test]
    fn distance_to_itself_is_zero() {
        for (lat, lon) in [(0.0, 0.0), (40.7580, -73.9855), (-90.0, 180.0)] {
            assert_eq!(haversine_distance(lat, lon, lat, lon), 0.0);
        }
    }

    #[test]
    fn one_degree_of_latitude() {
        let distance = haversine_distance(0.0, 0.0, 1.0, 0.0);
        let expected = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;
        assert!((distance - expected).abs() < 1e-9);
    }

    #[test]
    fn antipodal_points_are_half_the_circumference() {
        let distance = haversine_distance(0.0, 0.0, 0.0, 180.0);
        let expected = EARTH_RADIUS_KM * std::f64::consts::PI;
        assert!(!distance.is_nan());
        assert!((distance - expected).abs() < 1e-6);
    }

    #[test]
    fn out_of_range_input_does_not_produce_nan() {
        let distance = haversine_distance(120.0, 400.0, -95.0, -200.0);
        assert!(distance.is_finite());
        assert!(distance >= 0.0);
    }

    #[test]
    fn bounding_box_latitude_edges_are_at_radius() {
        let (lat, lon, radius) = (54.3233, 10.1228, 5.0);
        let ((min_lat, min_lon), (max_lat, max_lon)) =
            calculate_bounding_box(lat, lon, radius).unwrap();
        assert!(min_lat < lat && lat < max_lat);
        assert!(min_lon < lon && lon < max_lon);
        assert!((haversine_distance(lat, lon, max_lat, lon) - radius).abs() < 1e-9);
        assert!((haversine_distance(lat, lon, min_lat, lon) - radius).abs() < 1e-9);
    }

    #[test]
    fn zero_radius_box_is_the_center() {
        for (lat, lon) in [(-88.9109, -178.8209), (40.7580, -73.9855), (0.1, 0.3)] {
            assert_eq!(
                calculate_bounding_box(lat, lon, 0.0),
                Some(((lat, lon), (lat, lon)))
            );
        }
    }

    #[test]
    fn bounding_box_covers_the_cap_at_high_latitude() {
        let (lat, lon, radius) = (70.0, 0.0, 1000.0);
        let ((min_lat, min_lon), (max_lat, max_lon)) =
            calculate_bounding_box(lat, lon, radius).unwrap();

        // just under 1000 km away, further east than the center's parallel
        // would suggest
        let (east_lat, east_lon) = (72.06, 27.0);
        assert!(haversine_distance(lat, lon, east_lat, east_lon) <= radius);
        assert!(min_lon <= east_lon && east_lon <= max_lon);

        let mut inside = 0;
        for i in 0..=120 {
            for j in 0..=200 {
                let point_lat = 58.0 + i as f64 * 0.2;
                let point_lon = -50.0 + j as f64 * 0.5;
                if haversine_distance(lat, lon, point_lat, point_lon) <= radius {
                    inside += 1;
                    assert!(
                        (min_lat..=max_lat).contains(&point_lat)
                            && (min_lon..=max_lon).contains(&point_lon),
                        "({point_lat}, {point_lon}) is outside of the box"
                    );
                }
            }
        }
        assert!(inside > 0);
    }

    #[test]
    fn no_bounding_box_over_the_poles() {
        assert_eq!(calculate_bounding_box(89.5, 0.0, 100.0), None);
        assert_eq!(calculate_bounding_box(-89.5, 0.0, 100.0), None);
        assert_eq!(calculate_bounding_box(0.0, 0.0, f64::NAN), None);
        assert_eq!(calculate_bounding_box(0.0, 0.0, 20_000.0), None);
    }
}
