// SPDX-License-Identifier: MIT
//! Task wire/row types and payload validation.
//!
//! The inbound body shape is shared by create and replace; what each
//! operation requires is enforced by `into_create` / `into_update`.
//! Dates travel as `YYYY-MM-DD` strings, timestamps as RFC 3339.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::categories::{Category, CategoryRef, MAX_CATEGORY_NAME_LEN};
use crate::error::{ApiError, FieldErrors};

pub const MAX_TASK_NAME_LEN: usize = 100;

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Raw task row as persisted. Categories live in the join table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TaskRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub completed: bool,
    pub date: String,
    pub deadline: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Outbound task representation — the row plus its resolved category set.
#[derive(Debug, Clone, Serialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub description: String,
    pub completed: bool,
    pub categories: Vec<Category>,
    pub date: String,
    pub deadline: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl Task {
    pub fn from_row(row: TaskRow, categories: Vec<Category>) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            completed: row.completed,
            categories,
            date: row.date,
            deadline: row.deadline,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Inbound create/replace body.
#[derive(Debug, Default, Deserialize)]
pub struct TaskPayload {
    pub name: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub categories: Option<Vec<CategoryRef>>,
    pub date: Option<String>,
    pub deadline: Option<String>,
}

/// Validated input for `TaskStore::create`.
#[derive(Debug, Clone)]
pub struct CreateTaskParams {
    pub name: String,
    pub description: String,
    pub completed: bool,
    /// None = default to the server's current UTC date.
    pub date: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
    /// Distinct category names, first-mention order.
    pub categories: Vec<String>,
}

/// Validated input for `TaskStore::replace`. Scalar fields left `None` keep
/// their stored value; the category set is always rebuilt from `categories`.
#[derive(Debug, Clone, Default)]
pub struct UpdateTaskParams {
    pub name: Option<String>,
    pub description: Option<String>,
    pub completed: Option<bool>,
    pub date: Option<NaiveDate>,
    pub deadline: Option<NaiveDate>,
    pub categories: Vec<String>,
}

impl TaskPayload {
    pub fn into_create(self) -> Result<CreateTaskParams, ApiError> {
        let mut errors = FieldErrors::new();
        let name = match self.name {
            Some(n) => checked_name(n, &mut errors),
            None => {
                push(&mut errors, "name", "this field is required");
                None
            }
        };
        let date = parse_date("date", self.date.as_deref(), &mut errors);
        let deadline = parse_date("deadline", self.deadline.as_deref(), &mut errors);
        let categories = category_names(self.categories, &mut errors);

        match (errors.is_empty(), name) {
            (true, Some(name)) => Ok(CreateTaskParams {
                name,
                description: self.description.unwrap_or_default(),
                completed: self.completed.unwrap_or(false),
                date,
                deadline,
                categories,
            }),
            _ => Err(ApiError::Validation(errors)),
        }
    }

    pub fn into_update(self) -> Result<UpdateTaskParams, ApiError> {
        let mut errors = FieldErrors::new();
        let name = match self.name {
            Some(n) => checked_name(n, &mut errors),
            None => None,
        };
        let date = parse_date("date", self.date.as_deref(), &mut errors);
        let deadline = parse_date("deadline", self.deadline.as_deref(), &mut errors);
        let categories = category_names(self.categories, &mut errors);

        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }
        Ok(UpdateTaskParams {
            name,
            description: self.description,
            completed: self.completed,
            date,
            deadline,
            categories,
        })
    }
}

fn push(errors: &mut FieldErrors, field: &str, message: impl Into<String>) {
    errors.entry(field.to_string()).or_default().push(message.into());
}

fn checked_name(value: String, errors: &mut FieldErrors) -> Option<String> {
    let value = value.trim().to_string();
    if value.is_empty() {
        push(errors, "name", "this field may not be blank");
        return None;
    }
    if value.chars().count() > MAX_TASK_NAME_LEN {
        push(
            errors,
            "name",
            format!("ensure this field has no more than {MAX_TASK_NAME_LEN} characters"),
        );
        return None;
    }
    Some(value)
}

fn parse_date(field: &str, value: Option<&str>, errors: &mut FieldErrors) -> Option<NaiveDate> {
    let value = value?;
    match NaiveDate::parse_from_str(value, DATE_FORMAT) {
        Ok(d) => Some(d),
        Err(_) => {
            push(errors, field, "expected a date in YYYY-MM-DD format");
            None
        }
    }
}

/// Distinct trimmed names in first-mention order. A missing array means an
/// empty set — on replace this clears every association.
fn category_names(refs: Option<Vec<CategoryRef>>, errors: &mut FieldErrors) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();
    for r in refs.unwrap_or_default() {
        let name = r.name.trim().to_string();
        if name.is_empty() {
            push(errors, "categories", "category names may not be blank");
        } else if name.chars().count() > MAX_CATEGORY_NAME_LEN {
            push(
                errors,
                "categories",
                format!("ensure category names have no more than {MAX_CATEGORY_NAME_LEN} characters"),
            );
        } else if seen.insert(name.clone()) {
            names.push(name);
        }
    }
    names
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(json: serde_json::Value) -> TaskPayload {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_create_requires_name() {
        let err = payload(serde_json::json!({})).into_create().unwrap_err();
        match err {
            ApiError::Validation(fields) => assert!(fields.contains_key("name")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_create_defaults() {
        let params = payload(serde_json::json!({ "name": "Write spec" }))
            .into_create()
            .unwrap();
        assert_eq!(params.name, "Write spec");
        assert_eq!(params.description, "");
        assert!(!params.completed);
        assert!(params.date.is_none());
        assert!(params.deadline.is_none());
        assert!(params.categories.is_empty());
    }

    #[test]
    fn test_bad_date_collects_field_error() {
        let err = payload(serde_json::json!({ "name": "x", "deadline": "not-a-date" }))
            .into_create()
            .unwrap_err();
        match err {
            ApiError::Validation(fields) => assert!(fields.contains_key("deadline")),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_name_length_limit() {
        let long = "x".repeat(MAX_TASK_NAME_LEN + 1);
        let err = payload(serde_json::json!({ "name": long })).into_create().unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn test_category_names_deduped_in_order() {
        let params = payload(serde_json::json!({
            "name": "x",
            "categories": [
                { "name": "work" },
                { "name": "home" },
                { "name": "work" }
            ]
        }))
        .into_create()
        .unwrap();
        assert_eq!(params.categories, vec!["work", "home"]);
    }

    #[test]
    fn test_nested_category_extra_keys_ignored() {
        let params = payload(serde_json::json!({
            "name": "x",
            "categories": [{ "name": "work", "id": 42, "color": "#fff" }]
        }))
        .into_create()
        .unwrap();
        assert_eq!(params.categories, vec!["work"]);
    }

    #[test]
    fn test_update_absent_categories_means_empty() {
        let params = payload(serde_json::json!({ "completed": true }))
            .into_update()
            .unwrap();
        assert!(params.name.is_none());
        assert_eq!(params.completed, Some(true));
        assert!(params.categories.is_empty());
    }
}
