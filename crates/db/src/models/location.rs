//! Location entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use timetrack_core::types::{DbId, Timestamp};
use validator::Validate;

use crate::models::record::RecordResponse;

/// A location row from the `locations` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Location {
    pub id: DbId,
    pub project_id: DbId,
    pub name: String,
    pub slug: String,
    pub address: Option<String>,
    pub description: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a new location.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLocation {
    pub name: String,
    #[validate(length(max = 255))]
    pub address: Option<String>,
    #[validate(length(max = 10000))]
    pub description: Option<String>,
}

/// DTO for updating an existing location. All fields are optional.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateLocation {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "crate::models::nullable")]
    #[validate(length(max = 255))]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::models::nullable")]
    #[validate(length(max = 10000))]
    pub description: Option<Option<String>>,
}

/// A location together with the records tagged with it.
#[derive(Debug, Serialize)]
pub struct LocationDetailResponse {
    pub location: Location,
    pub records: Vec<RecordResponse>,
}
