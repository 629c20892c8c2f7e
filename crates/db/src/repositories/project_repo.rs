//! Repository for the `projects` table.

use sqlx::PgPool;
use timetrack_core::types::DbId;

use crate::models::project::{CreateProject, Project, UpdateProject};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str =
    "id, owner_id, name, slug, description, is_template, created_at, updated_at";

/// Provides CRUD operations for projects. Every lookup is scoped to an owner.
pub struct ProjectRepo;

impl ProjectRepo {
    /// Insert a new project under `owner_id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        owner_id: DbId,
        slug: &str,
        input: &CreateProject,
    ) -> Result<Project, sqlx::Error> {
        let query = format!(
            "INSERT INTO projects (owner_id, name, slug, description, is_template)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(owner_id)
            .bind(input.name.trim())
            .bind(slug)
            .bind(input.description.is_some())
            .bind(input.description.as_deref())
            .bind(input.is_template)
            .fetch_one(pool)
            .await
    }

    /// Find one of the owner's projects by slug.
    pub async fn find_by_slug(
        pool: &PgPool,
        owner_id: DbId,
        slug: &str,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM projects WHERE owner_id = $1 AND slug = $2");
        sqlx::query_as::<_, Project>(&query)
            .bind(owner_id)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Id of the owner's project holding `slug`, if any. Used for uniqueness checks.
    pub async fn find_id_by_slug(
        pool: &PgPool,
        owner_id: DbId,
        slug: &str,
    ) -> Result<Option<DbId>, sqlx::Error> {
        sqlx::query_scalar("SELECT id FROM projects WHERE owner_id = $1 AND slug = $2")
            .bind(owner_id)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// List the owner's projects with the given template flag, ordered by name.
    pub async fn list_by_owner(
        pool: &PgPool,
        owner_id: DbId,
        is_template: bool,
    ) -> Result<Vec<Project>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM projects
             WHERE owner_id = $1 AND is_template = $2
             ORDER BY name"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(owner_id)
            .bind(is_template)
            .fetch_all(pool)
            .await
    }

    /// Update a project. Only non-`None` fields in `input` are applied;
    /// `slug` must accompany a new name.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        slug: Option<&str>,
        input: &UpdateProject,
    ) -> Result<Option<Project>, sqlx::Error> {
        let query = format!(
            "UPDATE projects SET
                name = COALESCE($2, name),
                slug = COALESCE($3, slug),
                description = CASE WHEN $4 THEN $5 ELSE description END,
                is_template = COALESCE($6, is_template)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Project>(&query)
            .bind(id)
            .bind(input.name.as_deref().map(str::trim))
            .bind(slug)
            .bind(input.description.is_some())
            .bind(input.description.as_ref().and_then(|v| v.as_deref()))
            .bind(input.is_template)
            .fetch_optional(pool)
            .await
    }

    /// Delete a project by ID. Categories, locations and records cascade.
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Create a new project and copy every category of `source_id` into it.
    ///
    /// Both steps run in one transaction. Returns the new project and the
    /// number of categories copied.
    pub async fn copy_with_categories(
        pool: &PgPool,
        owner_id: DbId,
        source_id: DbId,
        slug: &str,
        input: &CreateProject,
    ) -> Result<(Project, u64), sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO projects (owner_id, name, slug, description, is_template)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let project = sqlx::query_as::<_, Project>(&query)
            .bind(owner_id)
            .bind(input.name.trim())
            .bind(slug)
            .bind(input.description.is_some())
            .bind(input.description.as_deref())
            .bind(input.is_template)
            .fetch_one(&mut *tx)
            .await?;

        let copied = sqlx::query(
            "INSERT INTO categories (project_id, name, slug, description)
             SELECT $1, name, slug, description FROM categories
             WHERE project_id = $2
             ORDER BY name",
        )
        .bind(project.id)
        .bind(source_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        tx.commit().await?;

        Ok((project, copied))
    }
}
