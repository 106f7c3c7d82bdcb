use std::{fs, io, path::Path};

use model::{court::Court, game::Game};
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SeedError {
    #[error("could not read seed file: {0}")]
    Io(#[from] io::Error),
    #[error("malformed seed file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Initial content of the store, as exported from the document database.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seed {
    #[serde(default)]
    pub games: Vec<Game>,
    #[serde(default)]
    pub courts: Vec<Court>,
}

impl Seed {
    pub fn from_file(path: &Path) -> Result<Self, SeedError> {
        let content = fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self, SeedError> {
        Ok(serde_json::from_str(content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_courts_only() {
        let seed = Seed::from_json(
            r#"{
                "courts": [{
                    "name": "Central Park Courts",
                    "address": "Central Park, New York, NY",
                    "location": { "latitude": 40.7812, "longitude": -73.9665 },
                    "rating": 4.1
                }]
            }"#,
        )
        .unwrap();
        assert!(seed.games.is_empty());
        assert_eq!(seed.courts.len(), 1);
        assert!(seed.courts[0].amenities.is_empty());
        assert!(seed.courts[0].created_at.is_none());
    }

    #[test]
    fn keeps_malformed_locations_for_the_filter_to_skip() {
        let seed = Seed::from_json(
            r#"{
                "courts": [{
                    "name": "Nowhere",
                    "address": "",
                    "location": { "latitude": 123.0, "longitude": 0.0 },
                    "rating": 0.0
                }]
            }"#,
        )
        .unwrap();
        assert!(!seed.courts[0].location.is_valid());
    }

    #[test]
    fn rejects_garbage() {
        assert!(matches!(Seed::from_json("{"), Err(SeedError::Json(_))));
    }
}
