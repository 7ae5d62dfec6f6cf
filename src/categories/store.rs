// SPDX-License-Identifier: MIT
//! Category SQLite operations.

use sqlx::{SqliteConnection, SqlitePool};

use super::model::Category;
use crate::error::ApiError;

#[derive(Clone)]
pub struct CategoryStore {
    pool: SqlitePool,
}

impl CategoryStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<Category>, ApiError> {
        Ok(
            sqlx::query_as("SELECT id, name FROM categories ORDER BY id")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    /// Strict create — a duplicate name is a conflict, not a lookup.
    pub async fn create(&self, name: &str) -> Result<Category, ApiError> {
        let result = sqlx::query("INSERT INTO categories (name) VALUES (?)")
            .bind(name)
            .execute(&self.pool)
            .await;
        match result {
            Ok(done) => Ok(Category {
                id: done.last_insert_rowid(),
                name: name.to_string(),
            }),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => Err(
                ApiError::conflict(format!("category \"{name}\" already exists")),
            ),
            Err(e) => Err(e.into()),
        }
    }
}

/// Get-or-create by exact (case-sensitive) name, inside the caller's
/// transaction. INSERT .. ON CONFLICT DO NOTHING followed by a SELECT keeps
/// the lookup idempotent under concurrent writers.
pub(crate) async fn find_or_create(
    conn: &mut SqliteConnection,
    name: &str,
) -> Result<Category, sqlx::Error> {
    sqlx::query("INSERT INTO categories (name) VALUES (?) ON CONFLICT(name) DO NOTHING")
        .bind(name)
        .execute(&mut *conn)
        .await?;
    sqlx::query_as("SELECT id, name FROM categories WHERE name = ?")
        .bind(name)
        .fetch_one(&mut *conn)
        .await
}

// ─── Tests ────────────────────────────────────────────────────────────────────
