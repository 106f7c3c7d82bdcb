use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::{Method, StatusCode},
    routing::{get, on, post},
    Extension, Json, Router,
};
use model::{
    game::{Game, NewGame},
    WithDistance, WithId,
};
use pickup::directions::{DirectionsProvider, MapProvider};
use serde::Deserialize;
use utility::{id::Id, let_also::LetAlso};

use super::NearbyQuery;
use crate::{
    common::{
        route_not_found, schema, HateoasResult, RouteErrorResponse, RouteResult,
        VecResponse, METHOD_FILTER_ALL,
    },
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::v1::resource!("/games{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema::<Game>))
        .route("/nearby", get(nearby))
        .route("/", get(get_games).post(create_game))
        .route("/:id", get(get_game))
        .route("/:id/join", post(join_game))
        .route("/:id/leave", post(leave_game))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PlayerRequest {
    user_id: String,
}

async fn get_games(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { pickup_client }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<VecResponse<hateoas::Response<WithId<Game>>>> {
    pickup_client
        .get_games()
        .await
        .map(|games| {
            games
                .into_iter()
                .map(|game| game_hateoas(game, base_url.clone()))
                .collect::<Vec<_>>()
                .let_owned(|data| VecResponse::new(data).hateoas().json())
        })
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

async fn get_game(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<String>,
    State(WebState { pickup_client }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<WithId<Game>> {
    pickup_client
        .get_game(&Id::new(id))
        .await
        .map(|game| game_hateoas(game, base_url).json())
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

async fn create_game(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { pickup_client }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    Json(new_game): Json<NewGame>,
) -> RouteResult<(StatusCode, Json<hateoas::Response<WithId<Game>>>)> {
    pickup_client
        .create_game(new_game)
        .await
        .map(|game| (StatusCode::CREATED, game_hateoas(game, base_url).json()))
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::POST)
                .with_uri(original_uri.path())
        })
}

async fn nearby(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { pickup_client }): State<WebState>,
    Query(params): Query<NearbyQuery>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<VecResponse<hateoas::Response<WithDistance<WithId<Game>>>>> {
    pickup_client
        .find_nearby_games(params.origin(), params.radius)
        .await
        .map(|games| {
            games
                .into_iter()
                .map(|game| game_with_distance_hateoas(game, base_url.clone()))
                .collect::<Vec<_>>()
                .let_owned(|data| VecResponse::new(data).hateoas().json())
        })
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

async fn join_game(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<String>,
    State(WebState { pickup_client }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    Json(request): Json<PlayerRequest>,
) -> HateoasResult<WithId<Game>> {
    pickup_client
        .join_game(&Id::new(id), &request.user_id)
        .await
        .map(|game| game_hateoas(game, base_url).json())
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::POST)
                .with_uri(original_uri.path())
        })
}

async fn leave_game(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<String>,
    State(WebState { pickup_client }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    Json(request): Json<PlayerRequest>,
) -> HateoasResult<WithId<Game>> {
    pickup_client
        .leave_game(&Id::new(id), &request.user_id)
        .await
        .map(|game| game_hateoas(game, base_url).json())
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::POST)
                .with_uri(original_uri.path())
        })
}

pub(crate) fn game_hateoas(
    game: WithId<Game>,
    base_url: Arc<BaseUrl>,
) -> hateoas::Response<WithId<Game>> {
    let id = game.id.raw();
    let location = game.content.location;
    hateoas::Response::builder(game, base_url)
        .link("self", resource!("/{}", id))
        .link("join", resource!("/{}/join", id))
        .link("leave", resource!("/{}/leave", id))
        .link(
            "nearby",
            resource!(
                "/nearby?latitude={}&longitude={}",
                location.latitude,
                location.longitude
            ),
        )
        .link_extern("directions", MapProvider::default().directions_url(&location))
        .build()
}

pub(crate) fn game_with_distance_hateoas(
    game: WithDistance<WithId<Game>>,
    base_url: Arc<BaseUrl>,
) -> hateoas::Response<WithDistance<WithId<Game>>> {
    let id = game.content.id.raw();
    hateoas::Response::builder(game, base_url)
        .link("self", resource!("/{}", id))
        .link("join", resource!("/{}/join", id))
        .build()
}
