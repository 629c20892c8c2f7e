//! Project entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use timetrack_core::report::CategoryTotal;
use timetrack_core::types::{DbId, Timestamp};
use validator::Validate;

use crate::models::category::Category;
use crate::models::location::Location;
use crate::models::record::RecordResponse;

/// A project row from the `projects` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Project {
    pub id: DbId,
    pub owner_id: DbId,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    /// Template projects only serve as a source of categories for copies.
    pub is_template: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new project (also used as the target of a copy).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateProject {
    pub name: String,
    #[validate(length(max = 10000))]
    pub description: Option<String>,
    #[serde(default)]
    pub is_template: bool,
}

/// DTO for updating an existing project. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProject {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::models::nullable")]
    #[validate(length(max = 10000))]
    pub description: Option<Option<String>>,
    pub is_template: Option<bool>,
}

/// The owner's projects, split on the template flag.
#[derive(Debug, Serialize)]
pub struct ProjectListResponse {
    pub active: Vec<Project>,
    pub templates: Vec<Project>,
}

/// Project overview: records split by state plus per-category totals.
#[derive(Debug, Serialize)]
pub struct ProjectDetailResponse {
    pub project: Project,
    pub open_records: Vec<RecordResponse>,
    pub closed_records: Vec<RecordResponse>,
    pub categories: Vec<Category>,
    pub locations: Vec<Location>,
    pub category_totals: Vec<CategoryTotal>,
}
