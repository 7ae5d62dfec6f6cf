// rest/routes/tasks.rs — Task REST routes.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::rest::parse_body;
use crate::tasks::{Task, TaskPayload};
use crate::AppContext;

#[derive(Debug, Default, Deserialize)]
pub struct TaskListQuery {
    /// Exact category name filter.
    pub category: Option<String>,
}

pub async fn list_tasks(
    State(ctx): State<Arc<AppContext>>,
    Query(q): Query<TaskListQuery>,
) -> Result<Json<Vec<Task>>, ApiError> {
    let tasks = ctx.tasks.list(q.category.as_deref()).await?;
    Ok(Json(tasks))
}

pub async fn create_task(
    State(ctx): State<Arc<AppContext>>,
    Json(body): Json<serde_json::Value>,
) -> Result<(StatusCode, Json<Task>), ApiError> {
    let params = parse_body::<TaskPayload>(body)?.into_create()?;
    let task = ctx.tasks.create(params).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

pub async fn get_task(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_task_id(&id)?;
    Ok(Json(ctx.tasks.get(id).await?))
}

pub async fn replace_task(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
    Json(body): Json<serde_json::Value>,
) -> Result<Json<Task>, ApiError> {
    let id = parse_task_id(&id)?;
    let params = parse_body::<TaskPayload>(body)?.into_update()?;
    Ok(Json(ctx.tasks.replace(id, params).await?))
}

pub async fn delete_task(
    State(ctx): State<Arc<AppContext>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_task_id(&id)?;
    ctx.tasks.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// A path segment that is not a UUID identifies no task — 404, never a 500.
fn parse_task_id(raw: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw).map_err(|_| ApiError::not_found("task"))
}
