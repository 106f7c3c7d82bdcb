use model::{court::Court, geo_point::GeoPoint, WithId};
use utility::id::Id;

/// (id, name, address, latitude offset, longitude offset, rating)
const DEMO_COURTS: [(&str, &str, &str, f64, f64, f64); 3] = [
    (
        "court_1",
        "Rucker Park",
        "155th St & Frederick Douglass Blvd, New York, NY",
        0.001,
        0.001,
        4.8,
    ),
    (
        "court_2",
        "Marcus Garvey Park",
        "E 120th St & Madison Ave, New York, NY",
        -0.002,
        0.002,
        4.5,
    ),
    (
        "court_3",
        "West 4th Street Courts",
        "W 4th St & 6th Ave, New York, NY",
        0.003,
        -0.001,
        4.2,
    ),
];

/// A handful of well known courts placed a few hundred meters around
/// `center`, so the map is never empty while there is no real data.
pub fn courts_around(center: &GeoPoint) -> Vec<WithId<Court>> {
    DEMO_COURTS
        .iter()
        .map(|(id, name, address, lat_offset, lon_offset, rating)| {
            WithId::new(
                Id::from(*id),
                Court {
                    name: (*name).to_owned(),
                    address: (*address).to_owned(),
                    location: center.offset(*lat_offset, *lon_offset),
                    rating: *rating,
                    amenities: vec![],
                    photos: vec![],
                    created_at: None,
                },
            )
        })
        .collect()
}
