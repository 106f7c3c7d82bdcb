pub use crate::common::RouteResult;

use std::{env, path::PathBuf};

use axum::{extract::FromRef, routing::get_service, Router};
use pickup::client::Client;
use store::MemoryDatabase;
use tokio::net::TcpListener;
use tower_http::{
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};

pub mod api;
pub mod common;
pub mod hateoas;
pub mod middleware;

pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
pub const DEFAULT_STATIC_DIR: &str = "./resources/www/";

#[derive(Debug, Clone)]
pub struct WebConfig {
    pub bind_address: String,
    pub static_dir: PathBuf,
}

impl WebConfig {
    pub fn from_env() -> Self {
        let bind_address = env::var("WGN_BIND_ADDRESS")
            .unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_owned());
        let static_dir = env::var("WGN_STATIC_DIR")
            .unwrap_or_else(|_| DEFAULT_STATIC_DIR.to_owned())
            .into();
        Self {
            bind_address,
            static_dir,
        }
    }
}

#[derive(Clone, FromRef)]
pub struct WebState {
    pub pickup_client: Client<MemoryDatabase>,
}

pub fn router(state: WebState, config: &WebConfig) -> Router {
    Router::new()
        .nest_service("/api", api::routes(state))
        .fallback_service(static_content_router(config))
        .layer(TraceLayer::new_for_http())
}

pub async fn start_web_server(state: WebState, config: WebConfig) -> std::io::Result<()> {
    let routes = router(state, &config);

    let listener = TcpListener::bind(&config.bind_address).await?;
    log::info!("listening on {}", config.bind_address);
    axum::serve(listener, routes.into_make_service()).await?;

    Ok(())
}

/// Serves the single page client. Unknown paths get the index page, so the
/// client side router can take over.
fn static_content_router(config: &WebConfig) -> Router {
    Router::new().nest_service(
        "/",
        get_service(
            ServeDir::new(&config.static_dir)
                .not_found_service(ServeFile::new(config.static_dir.join("index.html"))),
        ),
    )
}
