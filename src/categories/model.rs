// SPDX-License-Identifier: MIT
//! Category wire/row types.

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

pub const MAX_CATEGORY_NAME_LEN: usize = 30;

/// A named category attachable to many tasks. `name` is unique store-wide.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Inbound category reference nested in a task body.
/// Only `name` is read; any other keys are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryRef {
    pub name: String,
}

/// Body of `POST /api/categories/`.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryPayload {
    pub name: Option<String>,
}

impl CategoryPayload {
    /// Validate the payload down to the category name.
    pub fn into_name(self) -> Result<String, ApiError> {
        let name = match self.name {
            Some(n) => n.trim().to_string(),
            None => return Err(ApiError::invalid("name", "this field is required")),
        };
        if name.is_empty() {
            return Err(ApiError::invalid("name", "this field may not be blank"));
        }
        if name.chars().count() > MAX_CATEGORY_NAME_LEN {
            return Err(ApiError::invalid(
                "name",
                format!("ensure this field has no more than {MAX_CATEGORY_NAME_LEN} characters"),
            ));
        }
        Ok(name)
    }
}
