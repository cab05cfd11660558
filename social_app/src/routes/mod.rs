mod follow_routes;
mod profile_routes;
mod settings_routes;

use crate::app::App;

use axum::routing::{get, Router};
use axum::Json;
use entrait::Impl;

/// Axum API router for the real app.
pub fn api_router() -> axum::Router {
    Router::new()
        .route("/", get(banner))
        .route("/health", get(health))
        .merge(profile_routes::ProfileRoutes::<Impl<App>>::router())
        .merge(follow_routes::FollowRoutes::<Impl<App>>::router())
        .merge(settings_routes::SettingsRoutes::<Impl<App>>::router())
}

async fn banner() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Social service is running" }))
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}
