use std::{error, result};

use async_trait::async_trait;
use model::{
    court::Court,
    game::{Game, GameError},
    geo_point::GeoPoint,
    WithId,
};
use thiserror::Error;
use utility::id::Id;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Rejected(#[from] GameError),
    #[error(transparent)]
    Other(Box<dyn error::Error + Send + Sync>),
}

impl DatabaseError {
    pub fn other<E: error::Error + Send + Sync + 'static>(why: E) -> Self {
        Self::Other(Box::new(why))
    }
}

pub type Result<T> = result::Result<T, DatabaseError>;

#[async_trait]
pub trait GameRepo: Send + Sync {
    async fn get_game(&self, id: &Id<Game>) -> Result<WithId<Game>>;

    async fn get_games(&self) -> Result<Vec<WithId<Game>>>;

    /// Games with status `upcoming`, earliest start time first, at most
    /// `limit` of them.
    async fn upcoming_games(&self, limit: usize) -> Result<Vec<WithId<Game>>>;

    async fn insert_game(&self, game: Game) -> Result<WithId<Game>>;

    /// Applies `update` to the stored game. Nothing is written if `update`
    /// fails, and no other write to the same game may interleave.
    async fn update_game<F>(&self, id: &Id<Game>, update: F) -> Result<WithId<Game>>
    where
        F: FnOnce(&mut Game) -> result::Result<(), GameError> + Send;
}

#[async_trait]
pub trait CourtRepo: Send + Sync {
    async fn get_court(&self, id: &Id<Court>) -> Result<WithId<Court>>;

    async fn get_courts(&self) -> Result<Vec<WithId<Court>>>;

    async fn insert_court(&self, court: Court) -> Result<WithId<Court>>;

    async fn put_court(&self, court: WithId<Court>) -> Result<WithId<Court>>;

    /// Coarse pre-selection for a proximity query. May contain courts outside
    /// the radius but must not miss any inside of it.
    async fn court_candidates(
        &self,
        origin: &GeoPoint,
        radius_km: f64,
    ) -> Result<Vec<WithId<Court>>>;
}

/// Backing store of the app. Cloning must be cheap and every clone must see
/// the same data.
pub trait Database: GameRepo + CourtRepo + Clone + Sized + 'static {}

impl<T> Database for T where T: GameRepo + CourtRepo + Clone + Sized + 'static {}
