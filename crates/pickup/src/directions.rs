use model::geo_point::GeoPoint;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Builds a link that opens turn-by-turn directions in a maps app.
pub trait DirectionsProvider {
    fn directions_url(&self, destination: &GeoPoint) -> String;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AppleMaps;

impl DirectionsProvider for AppleMaps {
    fn directions_url(&self, destination: &GeoPoint) -> String {
        format!(
            "maps://maps.apple.com/?daddr={},{}&dirflg=w",
            destination.latitude, destination.longitude
        )
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct GoogleMaps;

impl DirectionsProvider for GoogleMaps {
    fn directions_url(&self, destination: &GeoPoint) -> String {
        format!(
            "https://www.google.com/maps/dir/?api=1&destination={},{}",
            destination.latitude, destination.longitude
        )
    }
}

/// Provider choice as made by the caller, e.g. a client on an Apple device.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum MapProvider {
    Apple,
    #[default]
    Google,
}

impl DirectionsProvider for MapProvider {
    fn directions_url(&self, destination: &GeoPoint) -> String {
        match self {
            MapProvider::Apple => AppleMaps.directions_url(destination),
            MapProvider::Google => GoogleMaps.directions_url(destination),
        }
    }
}
