mod handlers;
mod state;

use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

pub use state::{AppState, SharedValidator};

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/validate", get(handlers::validate))
        .route("/api/itinerary", post(handlers::check_itinerary))
        .route("/api/countries", get(handlers::country_list))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn start(addr: &str, state: Arc<AppState>) -> std::io::Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("destcheck server listening on http://{}", addr);
    axum::serve(listener, app).await
}
