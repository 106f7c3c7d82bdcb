use chrono::{DateTime, Duration, TimeZone, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utility::id::HasId;

use crate::{
    geo_point::{GeoPoint, GeoPointError, Geotagged},
    ExampleData,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    #[error("already joined this game")]
    AlreadyJoined,
    #[error("game is full")]
    GameFull,
    #[error("invalid game location: {0}")]
    InvalidLocation(#[from] GeoPointError),
    #[error("a game needs room for at least one player")]
    NoPlayerSlots,
    #[error("a game can not end before it starts")]
    EndsBeforeStart,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub enum SkillLevel {
    Rookie,
    Pro,
    Elite,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    #[default]
    Upcoming,
    Active,
    Completed,
    Cancelled,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Game {
    pub court_name: String,
    pub address: String,
    pub location: GeoPoint,
    pub organizer_id: String,
    pub organizer_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub max_players: u32,
    pub current_players: Vec<String>,
    pub skill_level: SkillLevel,
    pub rules: Vec<String>,
    pub status: GameStatus,
    pub created_at: DateTime<Utc>,
}

impl HasId for Game {
    type IdType = String;
}

impl Geotagged for Game {
    fn location(&self) -> &GeoPoint {
        &self.location
    }
}

impl Game {
    pub fn has_player(&self, user_id: &str) -> bool {
        self.current_players.iter().any(|player| player == user_id)
    }

    pub fn is_full(&self) -> bool {
        self.current_players.len() >= self.max_players as usize
    }

    pub fn add_player<S: Into<String>>(&mut self, user_id: S) -> Result<(), GameError> {
        let user_id = user_id.into();
        if self.has_player(&user_id) {
            return Err(GameError::AlreadyJoined);
        }
        if self.is_full() {
            return Err(GameError::GameFull);
        }
        self.current_players.push(user_id);
        Ok(())
    }

    /// Leaving a game one never joined is not an error.
    pub fn remove_player(&mut self, user_id: &str) {
        self.current_players.retain(|player| player != user_id);
    }
}

impl ExampleData for Game {
    fn example_data() -> Self {
        let start_time = Utc
            .with_ymd_and_hms(2025, 7, 12, 18, 0, 0)
            .single()
            .unwrap_or_default();
        NewGame {
            court_name: "Rucker Park".to_owned(),
            address: "155th St & Frederick Douglass Blvd, New York, NY".to_owned(),
            location: GeoPoint::example_data(),
            organizer_id: "user_1".to_owned(),
            organizer_name: "Marcus Johnson".to_owned(),
            start_time,
            end_time: start_time + Duration::hours(2),
            max_players: 10,
            current_players: vec!["user_1".to_owned()],
            skill_level: SkillLevel::Elite,
            rules: vec!["Make it, take it".to_owned(), "Games to 21".to_owned()],
            status: GameStatus::Upcoming,
        }
        .into_game(start_time - Duration::days(1))
    }
}

/// Everything the organizer provides when posting a game.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewGame {
    pub court_name: String,
    pub address: String,
    pub location: GeoPoint,
    pub organizer_id: String,
    pub organizer_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub max_players: u32,
    #[serde(default)]
    pub current_players: Vec<String>,
    pub skill_level: SkillLevel,
    #[serde(default)]
    pub rules: Vec<String>,
    #[serde(default)]
    pub status: GameStatus,
}

impl NewGame {
    pub fn validate(&self) -> Result<(), GameError> {
        self.location.validate()?;
        if self.max_players == 0 {
            return Err(GameError::NoPlayerSlots);
        }
        if self.end_time < self.start_time {
            return Err(GameError::EndsBeforeStart);
        }
        Ok(())
    }

    pub fn into_game(self, created_at: DateTime<Utc>) -> Game {
        Game {
            court_name: self.court_name,
            address: self.address,
            location: self.location,
            organizer_id: self.organizer_id,
            organizer_name: self.organizer_name,
            start_time: self.start_time,
            end_time: self.end_time,
            max_players: self.max_players,
            current_players: self.current_players,
            skill_level: self.skill_level,
            rules: self.rules,
            status: self.status,
            created_at,
        }
    }
}
