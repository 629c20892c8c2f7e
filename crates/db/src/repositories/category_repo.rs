//! Repository for the `categories` table.

use sqlx::PgPool;
use timetrack_core::types::DbId;

use crate::models::category::{Category, CreateCategory, UpdateCategory};

const COLUMNS: &str = "id, project_id, name, slug, description, created_at, updated_at";

/// Provides CRUD operations for categories. Every lookup is scoped to a project.
pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a new category into `project_id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        slug: &str,
        input: &CreateCategory,
    ) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (project_id, name, slug, description)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(project_id)
            .bind(input.name.trim())
            .bind(slug)
            .bind(input.description.is_some())
            .bind(input.description.as_deref())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_slug(
        pool: &PgPool,
        project_id: DbId,
        slug: &str,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM categories WHERE project_id = $1 AND slug = $2");
        sqlx::query_as::<_, Category>(&query)
            .bind(project_id)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Id of the project's category holding `slug`, if any.
    pub async fn find_id_by_slug(
        pool: &PgPool,
        project_id: DbId,
        slug: &str,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM categories WHERE project_id = $1 AND slug = $2")
            .bind(project_id)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Whether `id` names a category of `project_id`.
    pub async fn exists_in_project(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1 AND project_id = $2)",
        )
        .bind(id)
        .bind(project_id)
        .fetch_one(pool)
        .await
    }

    /// List a project's categories ordered by name.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Category>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM categories WHERE project_id = $1 ORDER BY name");
        sqlx::query_as::<_, Category>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update a category. Only non-`None` fields are applied; `Some(None)`
    /// clears the description.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        slug: Option<&str>,
        input: &UpdateCategory,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE categories SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = CASE WHEN $4 THEN $5 ELSE description END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(slug)
            .bind(input.description.is_some())
            .bind(input.description.as_ref().and_then(|v| v.as_deref()))
            .fetch_optional(pool)
            .await
    }

    /// Delete a category. Records filed under it become uncategorised.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
