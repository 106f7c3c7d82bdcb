use std::error::Error;

use model::{game::GameError, geo_point::GeoPointError};
use proximity::ProximityError;
use thiserror::Error;

pub mod client;
pub mod database;
pub mod directions;
pub mod proximity;

#[derive(Debug, Error)]
pub enum RequestError {
    #[error("the requested item does not exist")]
    NotFound,
    #[error(transparent)]
    Rejected(#[from] GameError),
    #[error(transparent)]
    InvalidQuery(#[from] ProximityError),
    #[error(transparent)]
    InvalidLocation(#[from] GeoPointError),
    #[error(transparent)]
    Other(Box<dyn Error + Send + Sync>),
}

impl RequestError {
    pub fn other<T: Error + Send + Sync + 'static>(why: T) -> Self {
        Self::Other(Box::new(why))
    }
}

impl From<database::DatabaseError> for RequestError {
    fn from(value: database::DatabaseError) -> Self {
        match value {
            database::DatabaseError::NotFound => Self::NotFound,
            database::DatabaseError::Rejected(why) => Self::Rejected(why),
            database::DatabaseError::Other(why) => Self::Other(why),
        }
    }
}

pub type RequestResult<O> = Result<O, RequestError>;
