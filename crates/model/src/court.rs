use chrono::{DateTime, TimeZone, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::HasId;

use crate::{
    geo_point::{GeoPoint, Geotagged},
    ExampleData,
};

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Court {
    pub name: String,
    pub address: String,
    pub location: GeoPoint,
    pub rating: f64,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub photos: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl HasId for Court {
    type IdType = String;
}

impl Geotagged for Court {
    fn location(&self) -> &GeoPoint {
        &self.location
    }
}

impl ExampleData for Court {
    fn example_data() -> Self {
        Self {
            name: "Rucker Park".to_owned(),
            address: "155th St & Frederick Douglass Blvd, New York, NY".to_owned(),
            location: GeoPoint::example_data(),
            rating: 4.8,
            amenities: vec!["Lights".to_owned(), "Bleachers".to_owned()],
            photos: vec![],
            created_at: Utc.with_ymd_and_hms(2025, 5, 1, 12, 0, 0).single(),
        }
    }
}
