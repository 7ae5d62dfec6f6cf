// rest/mod.rs — HTTP REST API server.
//
// Endpoints:
//   GET    /api/health
//   GET    /api/tasks/            (optional ?category= exact filter)
//   POST   /api/tasks/
//   GET    /api/tasks/{id}/
//   PUT    /api/tasks/{id}/
//   PATCH  /api/tasks/{id}/
//   DELETE /api/tasks/{id}/
//   GET    /api/categories/
//   POST   /api/categories/

pub mod routes;

use anyhow::Result;
use axum::{
    routing::get,
    Router,
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::error::ApiError;
use crate::AppContext;

pub async fn serve(ctx: Arc<AppContext>) -> Result<()> {
    let bind = format!("{}:{}", ctx.config.bind_address, ctx.config.port);
    let listener = tokio::net::TcpListener::bind(&bind).await?;
    info!("REST API listening on http://{}", listener.local_addr()?);
    axum::serve(listener, build_router(ctx)).await?;
    Ok(())
}

pub fn build_router(ctx: Arc<AppContext>) -> Router {
    Router::new()
        .route("/api/health", get(routes::health::health))
        .route(
            "/api/tasks/",
            get(routes::tasks::list_tasks).post(routes::tasks::create_task),
        )
        .route(
            "/api/tasks/{id}/",
            get(routes::tasks::get_task)
                .put(routes::tasks::replace_task)
                .patch(routes::tasks::replace_task)
                .delete(routes::tasks::delete_task),
        )
        .route(
            "/api/categories/",
            get(routes::categories::list_categories).post(routes::categories::create_category),
        )
        .layer(CorsLayer::permissive())
        .with_state(ctx)
}

/// Deserialize a JSON body into a payload type, turning any shape mismatch
/// into a field-level 400 rather than a framework rejection.
pub(crate) fn parse_body<T: DeserializeOwned>(body: serde_json::Value) -> Result<T, ApiError> {
    serde_json::from_value(body).map_err(|e| ApiError::invalid("body", e.to_string()))
}
