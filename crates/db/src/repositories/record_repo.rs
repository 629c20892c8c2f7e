//! Repository for the `records` table.

use sqlx::PgPool;
use timetrack_core::types::{DbId, Timestamp};

use crate::models::record::{Record, RecordFields};

const COLUMNS: &str = "id, project_id, brief_description, description, \
    start_time, start_time_tz, end_time, end_time_tz, category_id, location_id, \
    created_at, updated_at";

/// Provides CRUD and close operations for time records.
pub struct RecordRepo;

impl RecordRepo {
    /// Insert a record into `project_id`, returning the created row.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        fields: &RecordFields,
    ) -> Result<Record, sqlx::Error> {
        let query = format!(
            "INSERT INTO records
                (project_id, brief_description, description, start_time, start_time_tz,
                 end_time, end_time_tz, category_id, location_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Record>(&query)
            .bind(project_id)
            .bind(&fields.brief_description)
            .bind(&fields.description)
            .bind(fields.start_time)
            .bind(&fields.start_time_tz)
            .bind(fields.end_time)
            .bind(&fields.end_time_tz)
            .bind(fields.category_id)
            .bind(fields.location_id)
            .fetch_one(pool)
            .await
    }

    /// Find a record by id within a project.
    pub async fn find_by_id(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
    ) -> Result<Option<Record>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM records WHERE id = $1 AND project_id = $2");
        sqlx::query_as::<_, Record>(&query)
            .bind(id)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// All records of a project, ordered by start then end time.
    pub async fn list_by_project(
        pool: &PgPool,
        project_id: DbId,
    ) -> Result<Vec<Record>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM records WHERE project_id = $1
             ORDER BY start_time, end_time NULLS LAST, id"
        );
        sqlx::query_as::<_, Record>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Records filed under a category, ordered by start then end time.
    pub async fn list_by_category(
        pool: &PgPool,
        category_id: DbId,
    ) -> Result<Vec<Record>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM records WHERE category_id = $1
             ORDER BY start_time, end_time NULLS LAST, id"
        );
        sqlx::query_as::<_, Record>(&query)
            .bind(category_id)
            .fetch_all(pool)
            .await
    }

    /// Records tagged with a location, ordered by start then end time.
    pub async fn list_by_location(
        pool: &PgPool,
        location_id: DbId,
    ) -> Result<Vec<Record>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM records WHERE location_id = $1
             ORDER BY start_time, end_time NULLS LAST, id"
        );
        sqlx::query_as::<_, Record>(&query)
            .bind(location_id)
            .fetch_all(pool)
            .await
    }

    /// Overwrite every editable column of a record.
    ///
    /// Returns `None` if no such record exists in the project.
    pub async fn update(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
        fields: &RecordFields,
    ) -> Result<Option<Record>, sqlx::Error> {
        let query = format!(
            "UPDATE records SET
                brief_description = $3,
                description = $4,
                start_time = $5,
                start_time_tz = $6,
                end_time = $7,
                end_time_tz = $8,
                category_id = $9,
                location_id = $10
             WHERE id = $1 AND project_id = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Record>(&query)
            .bind(id)
            .bind(project_id)
            .bind(&fields.brief_description)
            .bind(&fields.description)
            .bind(fields.start_time)
            .bind(&fields.start_time_tz)
            .bind(fields.end_time)
            .bind(&fields.end_time_tz)
            .bind(fields.category_id)
            .bind(fields.location_id)
            .fetch_optional(pool)
            .await
    }

    /// Set the end time of a still-open record.
    ///
    /// The row is only touched while `end_time` is NULL and `start_time` is
    /// not after `end_time`, so concurrent closes cannot overwrite each other.
    /// Returns the updated row, or `None` when nothing changed.
    pub async fn close(
        pool: &PgPool,
        id: DbId,
        end_time: Timestamp,
        end_time_tz: &str,
    ) -> Result<Option<Record>, sqlx::Error> {
        let query = format!(
            "UPDATE records SET end_time = $2, end_time_tz = $3
             WHERE id = $1 AND end_time IS NULL AND start_time <= $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Record>(&query)
            .bind(id)
            .bind(end_time)
            .bind(end_time_tz)
            .fetch_optional(pool)
            .await
    }

    /// Delete a record from a project. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, project_id: DbId, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM records WHERE id = $1 AND project_id = $2")
            .bind(id)
            .bind(project_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
