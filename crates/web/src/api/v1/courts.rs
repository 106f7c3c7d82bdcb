use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Path, Query, State},
    http::{Method, StatusCode},
    routing::{get, on},
    Extension, Json, Router,
};
use model::{court::Court, WithDistance, WithId};
use pickup::directions::MapProvider;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
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
        crate::api::v1::resource!("/courts{}", format_args!($($arg)*))
    };
}
pub(crate) use resource;

pub(crate) fn routes(state: WebState) -> Router {
    Router::new()
        .route("/schema", get(schema::<Court>))
        .route("/nearby", get(nearby))
        .route("/", get(get_courts).post(add_court))
        .route("/:id", get(get_court))
        .route("/:id/directions", get(directions))
        .layer(axum::middleware::from_fn(base_url_middleware))
        .with_state(state)
        .fallback_service(on(METHOD_FILTER_ALL, route_not_found))
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DirectionsQuery {
    #[serde(default)]
    provider: MapProvider,
}

#[derive(Debug, Serialize, JsonSchema)]
pub(crate) struct DirectionsDto {
    provider: MapProvider,
    url: String,
}

async fn get_courts(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { pickup_client }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<VecResponse<hateoas::Response<WithId<Court>>>> {
    pickup_client
        .get_courts()
        .await
        .map(|courts| {
            courts
                .into_iter()
                .map(|court| court_hateoas(court, base_url.clone()))
                .collect::<Vec<_>>()
                .let_owned(|data| VecResponse::new(data).hateoas().json())
        })
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

async fn get_court(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<String>,
    State(WebState { pickup_client }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<WithId<Court>> {
    pickup_client
        .get_court(&Id::new(id))
        .await
        .map(|court| court_hateoas(court, base_url).json())
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

async fn add_court(
    OriginalUri(original_uri): OriginalUri,
    State(WebState { pickup_client }): State<WebState>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
    Json(court): Json<Court>,
) -> RouteResult<(StatusCode, Json<hateoas::Response<WithId<Court>>>)> {
    pickup_client
        .add_court(court)
        .await
        .map(|court| (StatusCode::CREATED, court_hateoas(court, base_url).json()))
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
) -> HateoasResult<VecResponse<hateoas::Response<WithDistance<WithId<Court>>>>> {
    pickup_client
        .find_nearby_courts(params.origin(), params.radius)
        .await
        .map(|courts| {
            courts
                .into_iter()
                .map(|court| court_with_distance_hateoas(court, base_url.clone()))
                .collect::<Vec<_>>()
                .let_owned(|data| VecResponse::new(data).hateoas().json())
        })
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

async fn directions(
    OriginalUri(original_uri): OriginalUri,
    Path(id): Path<String>,
    State(WebState { pickup_client }): State<WebState>,
    Query(params): Query<DirectionsQuery>,
    Extension(base_url): Extension<Arc<BaseUrl>>,
) -> HateoasResult<DirectionsDto> {
    let id = Id::<Court>::new(id);
    pickup_client
        .directions_to_court(&id, &params.provider)
        .await
        .map(|url| {
            let dto = DirectionsDto {
                provider: params.provider,
                url,
            };
            hateoas::Response::builder(dto, base_url)
                .link("court", resource!("/{}", id.raw()))
                .build()
                .json()
        })
        .map_err(|why| {
            RouteErrorResponse::from(why)
                .with_method(&Method::GET)
                .with_uri(original_uri.path())
        })
}

fn court_hateoas(
    court: WithId<Court>,
    base_url: Arc<BaseUrl>,
) -> hateoas::Response<WithId<Court>> {
    let id = court.id.raw();
    let location = court.content.location;
    hateoas::Response::builder(court, base_url)
        .link("self", resource!("/{}", id))
        .link("directions", resource!("/{}/directions", id))
        .link(
            "games",
            crate::api::v1::games::resource!(
                "/nearby?latitude={}&longitude={}",
                location.latitude,
                location.longitude
            ),
        )
        .build()
}

pub(crate) fn court_with_distance_hateoas(
    court: WithDistance<WithId<Court>>,
    base_url: Arc<BaseUrl>,
) -> hateoas::Response<WithDistance<WithId<Court>>> {
    let id = court.content.id.raw();
    hateoas::Response::builder(court, base_url)
        .link("self", resource!("/{}", id))
        .link("directions", resource!("/{}/directions", id))
        .build()
}
