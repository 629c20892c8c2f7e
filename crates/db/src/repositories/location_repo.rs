//! Repository for the `locations` table.

use sqlx::PgPool;
use timetrack_core::types::DbId;

use crate::models::location::{CreateLocation, Location, UpdateLocation};

const COLUMNS: &str =
    "id, project_id, name, slug, address, description, created_at, updated_at";

/// Provides CRUD operations for locations, scoped to a project.
pub struct LocationRepo;

impl LocationRepo {
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        slug: &str,
        input: &CreateLocation,
    ) -> Result<Location, sqlx::Error> {
        let query = format!(
            "INSERT INTO locations (project_id, name, slug, address, description)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(project_id)
            .bind(input.name.trim())
            .bind(slug)
            .bind(input.address.is_some())
            .bind(input.address.as_deref())
            .bind(input.description.is_some())
            .bind(input.description.as_deref())
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_slug(
        pool: &PgPool,
        project_id: DbId,
        slug: &str,
    ) -> Result<Option<Location>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM locations WHERE project_id = $1 AND slug = $2");
        sqlx::query_as::<_, Location>(&query)
            .bind(project_id)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_id_by_slug(
        pool: &PgPool,
        project_id: DbId,
        slug: &str,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM locations WHERE project_id = $1 AND slug = $2")
            .bind(project_id)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    pub async fn exists_in_project(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM locations WHERE id = $1 AND project_id = $2)",
        )
        .bind(id)
        .bind(project_id)
        .fetch_one(pool)
        .await
    }

    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Location>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM locations WHERE project_id = $1 ORDER BY name");
        sqlx::query_as::<_, Location>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Update a location. Only non-`None` fields are applied; `Some(None)`
    /// clears address or description.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        slug: Option<&str>,
        input: &UpdateLocation,
    ) -> Result<Option<Location>, sqlx::Error> {
        let query = format!(
            "UPDATE locations SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                address = CASE WHEN $4 THEN $5 ELSE address END,
                description = CASE WHEN $6 THEN $7 ELSE description END
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Location>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(slug)
            .bind(input.address.is_some())
            .bind(input.address.as_ref().and_then(|v| v.as_deref()))
            .bind(input.description.is_some())
            .bind(input.description.as_ref().and_then(|v| v.as_deref()))
            .fetch_optional(pool)
            .await
    }

    /// Delete a location. Records tagged with it lose the tag.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM locations WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
