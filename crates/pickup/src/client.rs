use chrono::Utc;
use model::{
    court::Court,
    game::{Game, NewGame},
    geo_point::GeoPoint,
    WithDistance, WithId,
};
use utility::id::Id;

use crate::{
    database::Database,
    directions::DirectionsProvider,
    proximity::ProximityQuery,
    RequestError, RequestResult,
};

/// Only the first upcoming games (by start time) are considered when looking
/// for games nearby.
pub const NEARBY_GAME_CANDIDATES: usize = 50;
pub const DEFAULT_GAME_RADIUS_KM: f64 = 10.0;
pub const DEFAULT_COURT_RADIUS_KM: f64 = 5.0;

#[derive(Debug, Clone)]
pub struct Nearby {
    pub games: Vec<WithDistance<WithId<Game>>>,
    pub courts: Vec<WithDistance<WithId<Court>>>,
}

#[derive(Debug, Clone)]
pub struct Client<D>
where
    D: Database,
{
    pub database: D,
}

impl<D> Client<D>
where
    D: Database,
{
    pub fn new(database: D) -> Self {
        Self { database }
    }

    /// Games and courts around `origin` at once. `radius_km` overrides both
    /// default radii.
    pub async fn find_nearby(
        &self,
        origin: GeoPoint,
        radius_km: Option<f64>,
    ) -> RequestResult<Nearby> {
        let (games, courts) = futures::try_join!(
            self.find_nearby_games(origin, radius_km),
            self.find_nearby_courts(origin, radius_km),
        )?;
        Ok(Nearby { games, courts })
    }
}

impl<D> Client<D>
where
    D: Database,
{
    pub async fn get_games(&self) -> RequestResult<Vec<WithId<Game>>> {
        Ok(self.database.get_games().await?)
    }

    pub async fn get_game(&self, id: &Id<Game>) -> RequestResult<WithId<Game>> {
        Ok(self.database.get_game(id).await?)
    }

    /// Upcoming games within `radius_km` (10 km if not given), in order of
    /// their start time.
    pub async fn find_nearby_games(
        &self,
        origin: GeoPoint,
        radius_km: Option<f64>,
    ) -> RequestResult<Vec<WithDistance<WithId<Game>>>> {
        let query =
            ProximityQuery::new(origin, radius_km.unwrap_or(DEFAULT_GAME_RADIUS_KM))?;
        let candidates = self.database.upcoming_games(NEARBY_GAME_CANDIDATES).await?;
        let num_candidates = candidates.len();
        let games = query.with_distances(candidates);
        log::debug!(
            "{} of {} upcoming games within {} km of ({}, {})",
            games.len(),
            num_candidates,
            query.radius_km(),
            origin.latitude,
            origin.longitude
        );
        Ok(games)
    }

    pub async fn create_game(&self, new_game: NewGame) -> RequestResult<WithId<Game>> {
        new_game.validate()?;
        let game = self
            .database
            .insert_game(new_game.into_game(Utc::now()))
            .await?;
        log::info!("game {} at {} created", game.id, game.content.court_name);
        Ok(game)
    }

    pub async fn join_game(
        &self,
        id: &Id<Game>,
        user_id: &str,
    ) -> RequestResult<WithId<Game>> {
        let user_id = user_id.to_owned();
        self.database
            .update_game(id, move |game| game.add_player(user_id))
            .await
            .map_err(RequestError::from)
    }

    pub async fn leave_game(
        &self,
        id: &Id<Game>,
        user_id: &str,
    ) -> RequestResult<WithId<Game>> {
        let user_id = user_id.to_owned();
        self.database
            .update_game(id, move |game| {
                game.remove_player(&user_id);
                Ok(())
            })
            .await
            .map_err(RequestError::from)
    }
}

impl<D> Client<D>
where
    D: Database,
{
    pub async fn get_courts(&self) -> RequestResult<Vec<WithId<Court>>> {
        Ok(self.database.get_courts().await?)
    }

    pub async fn get_court(&self, id: &Id<Court>) -> RequestResult<WithId<Court>> {
        Ok(self.database.get_court(id).await?)
    }

    pub async fn add_court(&self, court: Court) -> RequestResult<WithId<Court>> {
        court.location.validate()?;
        Ok(self.database.insert_court(court).await?)
    }

    /// Courts within `radius_km` (5 km if not given), in store order.
    pub async fn find_nearby_courts(
        &self,
        origin: GeoPoint,
        radius_km: Option<f64>,
    ) -> RequestResult<Vec<WithDistance<WithId<Court>>>> {
        let query =
            ProximityQuery::new(origin, radius_km.unwrap_or(DEFAULT_COURT_RADIUS_KM))?;
        let candidates = self
            .database
            .court_candidates(query.origin(), query.radius_km())
            .await?;
        Ok(query.with_distances(candidates))
    }

    pub async fn directions_to_court<P: DirectionsProvider>(
        &self,
        id: &Id<Court>,
        provider: &P,
    ) -> RequestResult<String> {
        let court = self.get_court(id).await?;
        Ok(provider.directions_url(&court.content.location))
    }
}

#[cfg(test)]
mod tests {
    use std::{
        result,
        sync::{
            atomic::{AtomicUsize, Ordering},
            Arc, Mutex,
        },
    };

    use async_trait::async_trait;
    use chrono::Duration;
    use model::{
        game::{GameError, GameStatus},
        ExampleData,
    };

    use super::*;
    use crate::{
        database::{CourtRepo, DatabaseError, GameRepo, Result},
        directions::MapProvider,
        proximity::ProximityError,
    };

    /// Plain vectors behind a mutex, good enough to drive the client.
    #[derive(Clone, Default)]
    struct FakeDatabase {
        games: Arc<Mutex<Vec<WithId<Game>>>>,
        courts: Arc<Mutex<Vec<WithId<Court>>>>,
        next_id: Arc<AtomicUsize>,
    }

    impl FakeDatabase {
        fn next_id(&self) -> String {
            format!("id-{}", self.next_id.fetch_add(1, Ordering::SeqCst))
        }
    }

    #[async_trait]
    impl GameRepo for FakeDatabase {
        async fn get_game(&self, id: &Id<Game>) -> Result<WithId<Game>> {
            let games = self.games.lock().unwrap();
            games
                .iter()
                .find(|game| &game.id == id)
                .cloned()
                .ok_or(DatabaseError::NotFound)
        }

        async fn get_games(&self) -> Result<Vec<WithId<Game>>> {
            Ok(self.games.lock().unwrap().clone())
        }

        async fn upcoming_games(&self, limit: usize) -> Result<Vec<WithId<Game>>> {
            let mut games: Vec<_> = self
                .games
                .lock()
                .unwrap()
                .iter()
                .filter(|game| game.content.status == GameStatus::Upcoming)
                .cloned()
                .collect();
            games.sort_by_key(|game| game.content.start_time);
            games.truncate(limit);
            Ok(games)
        }

        async fn insert_game(&self, game: Game) -> Result<WithId<Game>> {
            let game = WithId::new(Id::new(self.next_id()), game);
            self.games.lock().unwrap().push(game.clone());
            Ok(game)
        }

        async fn update_game<F>(&self, id: &Id<Game>, update: F) -> Result<WithId<Game>>
        where
            F: FnOnce(&mut Game) -> result::Result<(), GameError> + Send,
        {
            let mut games = self.games.lock().unwrap();
            let stored = games
                .iter_mut()
                .find(|game| &game.id == id)
                .ok_or(DatabaseError::NotFound)?;
            let mut updated = stored.content.clone();
            update(&mut updated)?;
            stored.content = updated;
            Ok(stored.clone())
        }
    }

    #[async_trait]
    impl CourtRepo for FakeDatabase {
        async fn get_court(&self, id: &Id<Court>) -> Result<WithId<Court>> {
            let courts = self.courts.lock().unwrap();
            courts
                .iter()
                .find(|court| &court.id == id)
                .cloned()
                .ok_or(DatabaseError::NotFound)
        }

        async fn get_courts(&self) -> Result<Vec<WithId<Court>>> {
            Ok(self.courts.lock().unwrap().clone())
        }

        async fn insert_court(&self, court: Court) -> Result<WithId<Court>> {
            self.put_court(WithId::new(Id::new(self.next_id()), court)).await
        }

        async fn put_court(&self, court: WithId<Court>) -> Result<WithId<Court>> {
            self.courts.lock().unwrap().push(court.clone());
            Ok(court)
        }

        async fn court_candidates(
            &self,
            _origin: &GeoPoint,
            _radius_km: f64,
        ) -> Result<Vec<WithId<Court>>> {
            self.get_courts().await
        }
    }

    const RUCKER_PARK: GeoPoint = GeoPoint::new_unchecked(40.7580, -73.9855);
    // roughly 350 km away
    const BOSTON: GeoPoint = GeoPoint::new_unchecked(42.3601, -71.0589);

    fn game_at(location: GeoPoint, starts_in_hours: i64) -> Game {
        let mut game = Game::example_data();
        game.location = location;
        game.start_time = Utc::now() + Duration::hours(starts_in_hours);
        game.end_time = game.start_time + Duration::hours(2);
        game
    }

    fn new_game(max_players: u32) -> NewGame {
        let game = Game::example_data();
        NewGame {
            court_name: game.court_name,
            address: game.address,
            location: game.location,
            organizer_id: game.organizer_id,
            organizer_name: game.organizer_name,
            start_time: game.start_time,
            end_time: game.end_time,
            max_players,
            current_players: vec![],
            skill_level: game.skill_level,
            rules: game.rules,
            status: GameStatus::Upcoming,
        }
    }

    async fn client_with_games(games: Vec<Game>) -> Client<FakeDatabase> {
        let client = Client::new(FakeDatabase::default());
        for game in games {
            client.database.insert_game(game).await.unwrap();
        }
        client
    }

    #[tokio::test]
    async fn nearby_games_are_upcoming_close_and_ordered_by_start() {
        let mut cancelled = game_at(RUCKER_PARK, 1);
        cancelled.status = GameStatus::Cancelled;
        let client = client_with_games(vec![
            game_at(RUCKER_PARK.offset(0.01, 0.0), 5),
            game_at(BOSTON, 1),
            cancelled,
            game_at(RUCKER_PARK, 2),
        ])
        .await;

        let nearby = client.find_nearby_games(RUCKER_PARK, None).await.unwrap();
        let ids: Vec<_> = nearby.iter().map(|game| game.content.id.raw()).collect();
        assert_eq!(ids, vec!["id-3", "id-0"]);
        assert_eq!(nearby[0].distance_km, 0.0);
        assert!((nearby[1].distance_km - 1.112).abs() < 0.01);
    }

    #[tokio::test]
    async fn nearby_games_respect_radius() {
        let client = client_with_games(vec![game_at(BOSTON, 1)]).await;
        assert!(client
            .find_nearby_games(RUCKER_PARK, None)
            .await
            .unwrap()
            .is_empty());
        assert_eq!(
            client
                .find_nearby_games(RUCKER_PARK, Some(400.0))
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn nearby_games_only_look_at_first_candidates() {
        // 50 far away games start before the one close by
        let mut games: Vec<_> = (0..NEARBY_GAME_CANDIDATES as i64)
            .map(|hours| game_at(BOSTON, hours + 1))
            .collect();
        games.push(game_at(RUCKER_PARK, 100));
        let client = client_with_games(games).await;
        assert!(client
            .find_nearby_games(RUCKER_PARK, None)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn invalid_query_is_reported() {
        let client = client_with_games(vec![]).await;
        let result = client.find_nearby_games(RUCKER_PARK, Some(-3.0)).await;
        assert!(matches!(
            result,
            Err(RequestError::InvalidQuery(ProximityError::InvalidRadius(_)))
        ));
        let origin = GeoPoint::new_unchecked(100.0, 0.0);
        let result = client.find_nearby_courts(origin, None).await;
        assert!(matches!(
            result,
            Err(RequestError::InvalidQuery(ProximityError::InvalidOrigin(_)))
        ));
    }

    #[tokio::test]
    async fn join_and_leave() {
        let client = client_with_games(vec![]).await;
        let game = client.create_game(new_game(2)).await.unwrap();

        let joined = client.join_game(&game.id, "a").await.unwrap();
        assert_eq!(joined.content.current_players, vec!["a"]);

        let again = client.join_game(&game.id, "a").await;
        assert!(matches!(again, Err(RequestError::Rejected(GameError::AlreadyJoined))));

        client.join_game(&game.id, "b").await.unwrap();
        let full = client.join_game(&game.id, "c").await;
        assert!(matches!(full, Err(RequestError::Rejected(GameError::GameFull))));

        let left = client.leave_game(&game.id, "a").await.unwrap();
        assert_eq!(left.content.current_players, vec!["b"]);

        let stored = client.get_game(&game.id).await.unwrap();
        assert_eq!(stored.content.current_players, vec!["b"]);
    }

    #[tokio::test]
    async fn unknown_game_is_not_found() {
        let client = client_with_games(vec![]).await;
        let id = Id::from("nope");
        assert!(matches!(
            client.join_game(&id, "a").await,
            Err(RequestError::NotFound)
        ));
        assert!(matches!(
            client.leave_game(&id, "a").await,
            Err(RequestError::NotFound)
        ));
        assert!(matches!(
            client.get_game(&id).await,
            Err(RequestError::NotFound)
        ));
    }

    #[tokio::test]
    async fn create_game_validates() {
        let client = client_with_games(vec![]).await;
        let result = client.create_game(new_game(0)).await;
        assert!(matches!(result, Err(RequestError::Rejected(GameError::NoPlayerSlots))));
        assert!(client.get_games().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn nearby_courts_and_directions() {
        let client = client_with_games(vec![]).await;
        let close = client.add_court(Court::example_data()).await.unwrap();
        let mut far = Court::example_data();
        far.location = BOSTON;
        client.add_court(far).await.unwrap();

        let nearby = client.find_nearby(RUCKER_PARK, None).await.unwrap();
        assert!(nearby.games.is_empty());
        assert_eq!(nearby.courts.len(), 1);
        assert_eq!(nearby.courts[0].content.id, close.id);

        let url = client
            .directions_to_court(&close.id, &MapProvider::Apple)
            .await
            .unwrap();
        assert!(url.starts_with("maps://maps.apple.com/"));
    }
}
