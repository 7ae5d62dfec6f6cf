// rest/routes/categories.rs — Category REST routes.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::categories::{Category, CategoryPayload};
use crate::error::ApiError;
use crate::rest::parse_body;
use crate::AppContext;

pub async fn list_categories(
    State(ctx): State<Arc<AppContext>>,
) -> Result<Json<Vec<Category>>, ApiError> {
    Ok(Json(ctx.categories.list().await?))
}

pub async fn create_category(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<Category>), ApiError> {
    let name = parse_body::<CategoryPayload>(body)?.into_name()?;
    let category = ctx.categories.create(&name).await?;
    Ok((StatusCode::CREATED, Json(category)))
}
