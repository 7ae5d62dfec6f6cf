// SPDX-License-Identifier: MIT
//! Task SQLite operations.
//!
//! Every mutation runs in a single transaction so the category
//! clear-and-relink step is atomic — a concurrent read never observes a task
//! with a half-rebuilt category set.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use uuid::Uuid;

use super::model::{CreateTaskParams, Task, TaskRow, UpdateTaskParams, DATE_FORMAT};
use crate::categories::store::find_or_create;
use crate::categories::Category;
use crate::error::ApiError;

#[derive(Clone)]
pub struct TaskStore {
    pool: SqlitePool,
}

impl TaskStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// List all tasks, optionally narrowed to those linked to a category with
    /// the exact given name. Insertion order for determinism.
    pub async fn list(&self, category: Option<&str>) -> Result<Vec<Task>, ApiError> {
        let rows: Vec<TaskRow> = match category {
            Some(name) => {
                sqlx::query_as(
                    "SELECT t.* FROM tasks t \
                     JOIN task_categories tc ON tc.task_id = t.id \
                     JOIN categories c ON c.id = tc.category_id \
                     WHERE c.name = ? \
                     ORDER BY t.created_at, t.id",
                )
                .bind(name)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as("SELECT * FROM tasks ORDER BY created_at, id")
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        let mut tasks = Vec::with_capacity(rows.len());
        for row in rows {
            let categories = self.categories_of(&row.id).await?;
            tasks.push(Task::from_row(row, categories));
        }
        Ok(tasks)
    }

    pub async fn create(&self, params: CreateTaskParams) -> Result<Task, ApiError> {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let date = params.date.unwrap_or_else(|| now.date_naive());
        let stamp = now.to_rfc3339();

        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "INSERT INTO tasks (id, name, description, completed, date, deadline, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id.to_string())
        .bind(&params.name)
        .bind(&params.description)
        .bind(params.completed)
        .bind(date.format(DATE_FORMAT).to_string())
        .bind(params.deadline.map(|d| d.format(DATE_FORMAT).to_string()))
        .bind(&stamp)
        .bind(&stamp)
        .execute(&mut *tx)
        .await?;
        link_categories(&mut tx, &id.to_string(), &params.categories).await?;
        tx.commit().await?;

        self.get(id).await
    }

    pub async fn get(&self, id: Uuid) -> Result<Task, ApiError> {
        let row: Option<TaskRow> = sqlx::query_as("SELECT * FROM tasks WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await?;
        let row = row.ok_or(ApiError::NotFound("task"))?;
        let categories = self.categories_of(&row.id).await?;
        Ok(Task::from_row(row, categories))
    }

    /// Overwrite provided scalar fields (unset fields keep their stored
    /// value), rebuild the category set from scratch, refresh `updated_at`.
    pub async fn replace(&self, id: Uuid, params: UpdateTaskParams) -> Result<Task, ApiError> {
        let updated_at = Utc::now().to_rfc3339();

        let mut tx = self.pool.begin().await?;
        let rows = sqlx::query(
            "UPDATE tasks SET \
             name = COALESCE(?, name), \
             description = COALESCE(?, description), \
             completed = COALESCE(?, completed), \
             date = COALESCE(?, date), \
             deadline = COALESCE(?, deadline), \
             updated_at = ? \
             WHERE id = ?",
        )
        .bind(&params.name)
        .bind(&params.description)
        .bind(params.completed)
        .bind(params.date.map(|d| d.format(DATE_FORMAT).to_string()))
        .bind(params.deadline.map(|d| d.format(DATE_FORMAT).to_string()))
        .bind(&updated_at)
        .bind(id.to_string())
        .execute(&mut *tx)
        .await?
        .rows_affected();
        if rows == 0 {
            return Err(ApiError::not_found("task"));
        }

        sqlx::query("DELETE FROM task_categories WHERE task_id = ?")
            .bind(id.to_string())
            .execute(&mut *tx)
            .await?;
        link_categories(&mut tx, &id.to_string(), &params.categories).await?;
        tx.commit().await?;

        self.get(id).await
    }

    /// Remove the task and its join rows. Category rows are untouched.
    pub async fn delete(&self, id: Uuid) -> Result<(), ApiError> {
        let rows = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id.to_string())
            .execute(&self.pool)
            .await?
            .rows_affected();
        if rows == 0 {
            return Err(ApiError::not_found("task"));
        }
        Ok(())
    }

    async fn categories_of(&self, task_id: &str) -> Result<Vec<Category>, sqlx::Error> {
        sqlx::query_as(
            "SELECT c.id, c.name FROM categories c \
             JOIN task_categories tc ON tc.category_id = c.id \
             WHERE tc.task_id = ? \
             ORDER BY c.id",
        )
        .bind(task_id)
        .fetch_all(&self.pool)
        .await
    }
}

/// Resolve each name get-or-create and link it to the task, all on the
/// caller's transaction connection.
async fn link_categories(
    conn: &mut SqliteConnection,
    task_id: &str,
    names: &[String],
) -> Result<(), sqlx::Error> {
    for name in names {
        let category = find_or_create(&mut *conn, name).await?;
        sqlx::query("INSERT OR IGNORE INTO task_categories (task_id, category_id) VALUES (?, ?)")
            .bind(task_id)
            .bind(category.id)
            .execute(&mut *conn)
            .await?;
    }
    Ok(())
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::categories::CategoryStore;
    use crate::storage::test_support::make_pool;
    use chrono::NaiveDate;

    fn create_params(name: &str, categories: &[&str]) -> CreateTaskParams {
        CreateTaskParams {
            name: name.to_string(),
            description: String::new(),
            completed: false,
            date: None,
            deadline: None,
            categories: categories.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn task_id(task: &Task) -> Uuid {
        Uuid::parse_str(&task.id).unwrap()
    }

    #[tokio::test]
    async fn test_create_links_distinct_categories() {
        let s = TaskStore::new(make_pool().await);
        let task = s
            .create(create_params("Write spec", &["work", "docs"]))
            .await
            .unwrap();
        let mut names: Vec<_> = task.categories.iter().map(|c| c.name.clone()).collect();
        names.sort();
        assert_eq!(names, vec!["docs", "work"]);

        // Re-fetching yields the same set
        let again = s.get(task_id(&task)).await.unwrap();
        assert_eq!(again.categories.len(), 2);
    }

    #[tokio::test]
    async fn test_create_defaults_date_to_today() {
        let s = TaskStore::new(make_pool().await);
        let task = s.create(create_params("x", &[])).await.unwrap();
        assert_eq!(task.date, Utc::now().date_naive().format(DATE_FORMAT).to_string());
        assert!(!task.completed);
        assert_eq!(task.created_at, task.updated_at);
    }

    #[tokio::test]
    async fn test_shared_category_is_one_row() {
        let pool = make_pool().await;
        let s = TaskStore::new(pool.clone());
        s.create(create_params("a", &["work"])).await.unwrap();
        s.create(create_params("b", &["work"])).await.unwrap();

        let categories = CategoryStore::new(pool).list().await.unwrap();
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].name, "work");
    }

    #[tokio::test]
    async fn test_list_filters_by_category_name() {
        let s = TaskStore::new(make_pool().await);
        s.create(create_params("a", &["work"])).await.unwrap();
        s.create(create_params("b", &["home"])).await.unwrap();
        s.create(create_params("c", &["work", "home"])).await.unwrap();

        let work = s.list(Some("work")).await.unwrap();
        let mut names: Vec<_> = work.iter().map(|t| t.name.clone()).collect();
        names.sort();
        assert_eq!(names, vec!["a", "c"]);

        assert!(s.list(Some("missing")).await.unwrap().is_empty());
        assert_eq!(s.list(None).await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_replace_overwrites_scalars_and_keeps_unset() {
        let s = TaskStore::new(make_pool().await);
        let task = s
            .create(CreateTaskParams {
                description: "original".to_string(),
                deadline: NaiveDate::from_ymd_opt(2024, 1, 1),
                ..create_params("before", &[])
            })
            .await
            .unwrap();

        let updated = s
            .replace(
                task_id(&task),
                UpdateTaskParams {
                    name: Some("after".to_string()),
                    completed: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "after");
        assert!(updated.completed);
        // Unset fields keep their stored values
        assert_eq!(updated.description, "original");
        assert_eq!(updated.deadline.as_deref(), Some("2024-01-01"));
        assert_eq!(updated.created_at, task.created_at);
        assert!(updated.updated_at >= task.updated_at);
    }

    #[tokio::test]
    async fn test_replace_rebuilds_category_set() {
        let pool = make_pool().await;
        let s = TaskStore::new(pool.clone());
        let task = s.create(create_params("x", &["work", "docs"])).await.unwrap();

        let updated = s
            .replace(
                task_id(&task),
                UpdateTaskParams {
                    categories: vec!["home".to_string()],
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let names: Vec<_> = updated.categories.iter().map(|c| c.name.clone()).collect();
        assert_eq!(names, vec!["home"]);

        // Unlinked category rows survive in the store
        let categories = CategoryStore::new(pool).list().await.unwrap();
        assert_eq!(categories.len(), 3);
    }

    #[tokio::test]
    async fn test_replace_with_empty_set_clears_associations() {
        let pool = make_pool().await;
        let s = TaskStore::new(pool.clone());
        let task = s.create(create_params("x", &["work"])).await.unwrap();

        let updated = s
            .replace(task_id(&task), UpdateTaskParams::default())
            .await
            .unwrap();
        assert!(updated.categories.is_empty());
        assert_eq!(CategoryStore::new(pool).list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_replace_missing_is_not_found() {
        let s = TaskStore::new(make_pool().await);
        let err = s
            .replace(Uuid::new_v4(), UpdateTaskParams::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_removes_task_but_not_categories() {
        let pool = make_pool().await;
        let s = TaskStore::new(pool.clone());
        let task = s.create(create_params("x", &["work"])).await.unwrap();

        s.delete(task_id(&task)).await.unwrap();
        let err = s.get(task_id(&task)).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));

        // Join rows are gone, category rows are not
        let categories = CategoryStore::new(pool).list().await.unwrap();
        assert_eq!(categories.len(), 1);
        assert!(s.list(Some("work")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found() {
        let s = TaskStore::new(make_pool().await);
        let err = s.delete(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, ApiError::NotFound(_)));
    }
}
