use std::{env, path::PathBuf, result, sync::Arc};

use async_trait::async_trait;
use indexmap::IndexMap;
use itertools::Itertools;
use model::{
    court::Court,
    game::{Game, GameError, GameStatus},
    geo_point::GeoPoint,
    WithId,
};
use pickup::database::{CourtRepo, DatabaseError, GameRepo, Result};
use tokio::sync::RwLock;
use utility::{
    geo,
    id::{HasId, Id},
};

pub mod demo;
pub mod seed;

/// Radius above which the bounding box pre-selection is skipped entirely.
const BOUNDING_BOX_MAX_RADIUS_KM: f64 = 1000.0;

/// Relative padding of the radius, so rounding in the distance calculation
/// never puts a court inside the radius but outside of the box.
const BOUNDING_BOX_PADDING: f64 = 1.01;

/// Absolute padding of the box edges (about 0.1 mm), covers a zero radius.
const BOUNDING_BOX_EPSILON_DEGREES: f64 = 1e-9;

/// Where the initial content of the store comes from.
#[derive(Debug, Clone, Default)]
pub struct StoreConfig {
    pub seed_file: Option<PathBuf>,
    pub demo_center: Option<GeoPoint>,
}

impl StoreConfig {
    pub fn from_env() -> Self {
        let seed_file = env::var("WGN_SEED_FILE").ok().map(PathBuf::from);
        let demo_center = env::var("WGN_DEMO_LATITUDE")
            .ok()
            .zip(env::var("WGN_DEMO_LONGITUDE").ok())
            .and_then(|(lat, lon)| Some((lat.parse::<f64>().ok()?, lon.parse::<f64>().ok()?)))
            .and_then(|(lat, lon)| GeoPoint::new(lat, lon).ok());
        Self {
            seed_file,
            demo_center,
        }
    }
}

#[derive(Debug, Default)]
struct Collections {
    games: IndexMap<Id<Game>, Game>,
    courts: IndexMap<Id<Court>, Court>,
}

/// Document store keeping games and courts in memory, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    collections: Arc<RwLock<Collections>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store and fills it according to `config`. A seed file wins
    /// over demo data.
    pub async fn open(config: StoreConfig) -> result::Result<Self, seed::SeedError> {
        let database = Self::new();
        if let Some(path) = config.seed_file {
            let seed = seed::Seed::from_file(&path)?;
            log::info!(
                "seeding {} games and {} courts from {}",
                seed.games.len(),
                seed.courts.len(),
                path.display()
            );
            database.seed(seed).await;
        } else if let Some(center) = config.demo_center {
            log::info!(
                "no seed file given, placing demo courts around ({}, {})",
                center.latitude,
                center.longitude
            );
            let mut collections = database.collections.write().await;
            for court in demo::courts_around(&center) {
                collections.courts.insert(court.id, court.content);
            }
        }
        Ok(database)
    }

    pub async fn seed(&self, seed: seed::Seed) {
        let mut collections = self.collections.write().await;
        for game in seed.games {
            collections.games.insert(generate_id(), game);
        }
        for court in seed.courts {
            collections.courts.insert(generate_id(), court);
        }
    }
}

fn generate_id<T>() -> Id<T>
where
    T: HasId<IdType = String>,
{
    Id::new(uuid::Uuid::new_v4().simple().to_string())
}

#[async_trait]
impl GameRepo for MemoryDatabase {
    async fn get_game(&self, id: &Id<Game>) -> Result<WithId<Game>> {
        let collections = self.collections.read().await;
        collections
            .games
            .get(id)
            .map(|game| WithId::new(id.clone(), game.clone()))
            .ok_or(DatabaseError::NotFound)
    }

    async fn get_games(&self) -> Result<Vec<WithId<Game>>> {
        let collections = self.collections.read().await;
        Ok(collections
            .games
            .iter()
            .map(|(id, game)| WithId::new(id.clone(), game.clone()))
            .collect())
    }

    async fn upcoming_games(&self, limit: usize) -> Result<Vec<WithId<Game>>> {
        let collections = self.collections.read().await;
        Ok(collections
            .games
            .iter()
            .filter(|(_, game)| game.status == GameStatus::Upcoming)
            .sorted_by_key(|(_, game)| game.start_time)
            .take(limit)
            .map(|(id, game)| WithId::new(id.clone(), game.clone()))
            .collect())
    }

    async fn insert_game(&self, game: Game) -> Result<WithId<Game>> {
        let id = generate_id();
        let mut collections = self.collections.write().await;
        collections.games.insert(id.clone(), game.clone());
        Ok(WithId::new(id, game))
    }

    async fn update_game<F>(&self, id: &Id<Game>, update: F) -> Result<WithId<Game>>
    where
        F: FnOnce(&mut Game) -> result::Result<(), GameError> + Send,
    {
        // the write lock is held for the whole read-modify-write
        let mut collections = self.collections.write().await;
        let stored = collections.games.get_mut(id).ok_or(DatabaseError::NotFound)?;
        let mut updated = stored.clone();
        update(&mut updated)?;
        *stored = updated.clone();
        Ok(WithId::new(id.clone(), updated))
    }
}

#[async_trait]
impl CourtRepo for MemoryDatabase {
    async fn get_court(&self, id: &Id<Court>) -> Result<WithId<Court>> {
        let collections = self.collections.read().await;
        collections
            .courts
            .get(id)
            .map(|court| WithId::new(id.clone(), court.clone()))
            .ok_or(DatabaseError::NotFound)
    }

    async fn get_courts(&self) -> Result<Vec<WithId<Court>>> {
        let collections = self.collections.read().await;
        Ok(collections
            .courts
            .iter()
            .map(|(id, court)| WithId::new(id.clone(), court.clone()))
            .collect())
    }

    async fn insert_court(&self, court: Court) -> Result<WithId<Court>> {
        self.put_court(WithId::new(generate_id(), court)).await
    }

    async fn put_court(&self, court: WithId<Court>) -> Result<WithId<Court>> {
        let mut collections = self.collections.write().await;
        collections
            .courts
            .insert(court.id.clone(), court.content.clone());
        Ok(court)
    }

    async fn court_candidates(
        &self,
        origin: &GeoPoint,
        radius_km: f64,
    ) -> Result<Vec<WithId<Court>>> {
        let Some(((min_lat, min_lon), (max_lat, max_lon))) =
            bounding_box(origin, radius_km)
        else {
            return self.get_courts().await;
        };
        let collections = self.collections.read().await;
        Ok(collections
            .courts
            .iter()
            .filter(|(_, court)| {
                (min_lat..=max_lat).contains(&court.location.latitude)
                    && (min_lon..=max_lon).contains(&court.location.longitude)
            })
            .map(|(id, court)| WithId::new(id.clone(), court.clone()))
            .collect())
    }
}

/// `None` where a latitude/longitude rectangle can not describe the area,
/// i.e. around the poles, across the antimeridian or for huge radii.
fn bounding_box(origin: &GeoPoint, radius_km: f64) -> Option<((f64, f64), (f64, f64))> {
    if radius_km > BOUNDING_BOX_MAX_RADIUS_KM {
        return None;
    }
    let ((min_lat, min_lon), (max_lat, max_lon)) = geo::calculate_bounding_box(
        origin.latitude,
        origin.longitude,
        radius_km * BOUNDING_BOX_PADDING,
    )?;
    let (min_lat, max_lat) = (
        min_lat - BOUNDING_BOX_EPSILON_DEGREES,
        max_lat + BOUNDING_BOX_EPSILON_DEGREES,
    );
    let (min_lon, max_lon) = (
        min_lon - BOUNDING_BOX_EPSILON_DEGREES,
        max_lon + BOUNDING_BOX_EPSILON_DEGREES,
    );
    // a point on a pole or the antimeridian has more than one spelling
    let touches_pole = min_lat <= -90.0 || max_lat >= 90.0;
    let touches_antimeridian = min_lon <= -180.0 || max_lon >= 180.0;
    if touches_pole || touches_antimeridian {
        return None;
    }
    Some(((min_lat, min_lon), (max_lat, max_lon)))
}
