use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Query, State},
    http::Method,
    routing::{get, on},
    Extension, Router,
};
use courts::court_with_distance_hateoas;
use games::game_with_distance_hateoas;
use model::{court::Court, game::Game, geo_point::GeoPoint, WithDistance, WithId};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    common::{
        route_not_found, schema_no_example, HateoasResult, RouteErrorResponse,
        METHOD_FILTER_ALL,
    },
    hateoas,
    middleware::base_url::{base_url_middleware, BaseUrl},
    WebState,
};

mod courts;
mod games;

macro_rules! resource {
    ($($arg:tt)*) => {
        crate::api::resource!("/v1{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/nearby", get(nearby))
        .route("/nearby/schema", get(schema_no_example::<NearbyDto>))
        .nest_service("/games", games::routes(state.clone()))
        .nest_service("/courts", courts::routes(state.clone()))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

/// Query parameters shared by all `nearby` routes. `radius` is in kilometers.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct NearbyQuery {
    pub latitude: f64,
    pub longitude: f64,
    pub radius: Option<f64>,
}

impl NearbyQuery {
    /// Not validated here, the proximity query rejects malformed origins.
    pub fn origin(&self) -> GeoPoint {
        GeoPoint::new_unchecked(self.latitude, self.longitude)
    }
}

#[derive(Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NearbyDto {
    latitude: f64,
    longitude: f64,
    radius: Option<f64>,
    games: Vec<hateoas::Response<WithDistance<WithId<Game>>>>,
    courts: Vec<hateoas::Response<WithDistance<WithId<Court>>>>,
}

async fn nearby(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { pickup_client }): State<WebState>,
    Query(params): Query<NearbyQuery>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<NearbyDto> {
    let nearby = pickup_client
        .find_nearby(params.origin(), params.radius)
        .await
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })?;

    let dto = NearbyDto {
        latitude: params.latitude,
        longitude: params.longitude,
        radius: params.radius,
        games: nearby
            .games
            .into_iter()
            .map(|game| game_with_distance_hateoas(game, base_url.clone()))
            .collect(),
        courts: nearby
            .courts
            .into_iter()
            .map(|court| court_with_distance_hateoas(court, base_url.clone()))
            .collect(),
    };
    Ok(nearby_hateoas(dto, params, base_url).json())
}

fn nearby_hateoas(
    dto: NearbyDto,
    params: NearbyQuery,
    base_url: Arc<BaseUrl>,
) -> hateoas::Response<NearbyDto> {
    let radius = params
        .radius
        .map(|radius| format!("&radius={}", radius))
        .unwrap_or_default();
    let (games, courts) = (dto.games.len(), dto.courts.len());
    hateoas::Response::builder(dto, base_url)
        .link(
            "games",
            games::resource!(
                "/nearby?latitude={}&longitude={}{}",
                params.latitude,
                params.longitude,
                radius
            ),
        )
        .link(
            "courts",
            courts::resource!(
                "/nearby?latitude={}&longitude={}{}",
                params.latitude,
                params.longitude,
                radius
            ),
        )
        .debug_info("counts", json!({ "games": games, "courts": courts }))
        .build()
}
