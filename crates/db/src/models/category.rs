//! Category entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use timetrack_core::types::{DbId, Timestamp};
use validator::Validate;

use crate::models::record::RecordResponse;

/// A category row from the `categories` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new category.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCategory {
    pub name: String,
    #[validate(length(max = 10000))]
    pub description: Option<String>,
}

/// DTO for updating an existing category. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateCategory {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::models::nullable")]
    #[validate(length(max = 10000))]
    pub description: Option<Option<String>>,
}

/// A category together with the records filed under it.
#[derive(Debug, Serialize)]
pub struct CategoryDetailResponse {
    pub category: Category,
    pub open_records: Vec<RecordResponse>,
    pub closed_records: Vec<RecordResponse>,
    pub total_seconds: f64,
}
