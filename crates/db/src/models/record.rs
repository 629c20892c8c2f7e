//! Time record entity model and DTOs.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use timetrack_core::record::{duration_seconds, CloseOutcome, RecordTimes};
use timetrack_core::report::TrackedInterval;
use timetrack_core::timezone::ClockReading;
use timetrack_core::types::{DbId, Timestamp};
use validator::Validate;

/// A record row from the `records` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Record {
    pub id: DbId,
    pub project_id: DbId,
    pub brief_description: String,
    pub description: Option<String>,
    pub start_time: Timestamp,
    pub start_time_tz: String,
    pub end_time: Option<Timestamp>,
    pub end_time_tz: String,
    pub category_id: Option<DbId>,
    pub location_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Record {
    pub fn duration_seconds(&self) -> f64 {
        duration_seconds(self.start_time, self.end_time)
    }

    /// The interval part of the row, for applying close/interval rules.
    pub fn times(&self) -> RecordTimes {
        RecordTimes {
            start_time: self.start_time,
            start_time_tz: self.start_time_tz.clone(),
            end_time: self.end_time,
            end_time_tz: self.end_time_tz.clone(),
        }
    }
}

impl TrackedInterval for Record {
    fn category_id(&self) -> Option<DbId> {
        self.category_id
    }

    fn start_time(&self) -> Timestamp {
        self.start_time
    }

    fn end_time(&self) -> Option<Timestamp> {
        self.end_time
    }
}

/// DTO for creating a record.
///
/// Timestamps are clock readings; they are re-attached to `start_time_tz` /
/// `end_time_tz` before storage. `start_time` defaults to now.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateRecord {
    pub start_time: Option<ClockReading>,
    #[validate(length(max = 50))]
    pub start_time_tz: Option<String>,
    pub end_time: Option<ClockReading>,
    #[validate(length(max = 50))]
    pub end_time_tz: Option<String>,
    #[validate(length(max = 255))]
    pub brief_description: Option<String>,
    pub description: Option<String>,
    pub category_id: Option<DbId>,
    pub location_id: Option<DbId>,
}

/// DTO for editing a record. Omitted fields keep their stored values.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateRecord {
    pub start_time: Option<ClockReading>,
    #[validate(length(max = 50))]
    pub start_time_tz: Option<String>,
    #[serde(default, deserialize_with = "crate::models::nullable")]
    pub end_time: Option<Option<ClockReading>>,
    #[validate(length(max = 50))]
    pub end_time_tz: Option<String>,
    #[validate(length(max = 255))]
    pub brief_description: Option<String>,
    #[serde(default, deserialize_with = "crate::models::nullable")]
    pub description: Option<Option<String>>,
    #[serde(default, deserialize_with = "crate::models::nullable")]
    pub category_id: Option<Option<DbId>>,
    #[serde(default, deserialize_with = "crate::models::nullable")]
    pub location_id: Option<Option<DbId>>,
}

/// Fully resolved column values written by insert and update.
#[derive(Debug, Clone)]
pub struct RecordFields {
    pub brief_description: String,
    pub description: Option<String>,
    pub start_time: Timestamp,
    pub start_time_tz: String,
    pub end_time: Option<Timestamp>,
    pub end_time_tz: String,
    pub category_id: Option<DbId>,
    pub location_id: Option<DbId>,
}

/// A record as returned by the API, with its computed duration.
#[derive(Debug, Clone, Serialize)]
pub struct RecordResponse {
    #[serde(flatten)]
    pub record: Record,
    pub duration_seconds: f64,
}

impl From<Record> for RecordResponse {
    fn from(record: Record) -> Self {
        let duration_seconds = record.duration_seconds();
        Self {
            record,
            duration_seconds,
        }
    }
}

/// Response to a close request.
#[derive(Debug, Serialize)]
pub struct CloseRecordResponse {
    pub outcome: CloseOutcome,
    pub record: RecordResponse,
}
