//! Handlers for time records nested under `/projects/{project_slug}/records`.
//!
//! Submitted `start_time` / `end_time` values are clock readings in the
//! server's current zone. Before storage each is re-attached to the zone the
//! user picked for it (`start_time_tz` / `end_time_tz`).

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use chrono_tz::Tz;
use sqlx::PgPool;
use timetrack_core::error::CoreError;
use timetrack_core::record::{validate_interval, CloseOutcome};
use timetrack_core::timezone::{convert_time, parse_zone, ClockReading};
use timetrack_core::types::{DbId, Timestamp};
use timetrack_db::models::record::{
    CloseRecordResponse, CreateRecord, Record, RecordFields, RecordResponse, UpdateRecord,
};
use timetrack_db::repositories::{CategoryRepo, LocationRepo, RecordRepo};
use validator::Validate;

use crate::error::AppResult;
use crate::handlers::project::ensure_project;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

async fn ensure_record(pool: &PgPool, project_id: DbId, id: DbId) -> AppResult<Record> {
    let record = RecordRepo::find_by_id(pool, project_id, id)
        .await?
        .ok_or_else(|| CoreError::not_found("Record", id))?;
    Ok(record)
}

/// Resolve a zone field: blank or missing falls back to `default`.
fn resolve_zone(
    field: &'static str,
    submitted: Option<&str>,
    default: Tz,
) -> Result<Tz, CoreError> {
    match submitted.map(str::trim) {
        Some(name) if !name.is_empty() => parse_zone(field, name),
        _ => Ok(default),
    }
}

/// Category and location references must point into the same project.
async fn check_references(
    pool: &PgPool,
    project_id: DbId,
    category_id: Option<DbId>,
    location_id: Option<DbId>,
) -> AppResult<()> {
    if let Some(id) = category_id {
        if !CategoryRepo::exists_in_project(pool, project_id, id).await? {
            return Err(
                CoreError::invalid("category_id", "Category does not belong to this project").into(),
            );
        }
    }
    if let Some(id) = location_id {
        if !LocationRepo::exists_in_project(pool, project_id, id).await? {
            return Err(
                CoreError::invalid("location_id", "Location does not belong to this project").into(),
            );
        }
    }
    Ok(())
}

/// Re-attach a submitted clock reading to its chosen zone, if one was given.
fn normalize(
    field: &'static str,
    value: Option<ClockReading>,
    current: Tz,
    target: Tz,
) -> Result<Option<Timestamp>, CoreError> {
    value
        .map(|v| convert_time(field, v, current, target))
        .transpose()
}

fn build_fields(input: CreateRecord, current: Tz) -> Result<RecordFields, CoreError> {
    let start_tz = resolve_zone("start_time_tz", input.start_time_tz.as_deref(), current)?;

    // An omitted start means "now"; it is already an instant, not a reading.
    let start_time = match input.start_time {
        Some(value) => convert_time("start_time", value, current, start_tz)?,
        None => Utc::now(),
    };

    let end_tz = resolve_zone("end_time_tz", input.end_time_tz.as_deref(), current)?;
    let end_time = normalize("end_time", input.end_time, current, end_tz)?;
    validate_interval(start_time, end_time)?;

    let end_time_tz = match (&end_time, input.end_time_tz.as_deref().map(str::trim)) {
        (None, None | Some("")) => String::new(),
        _ => end_tz.name().to_string(),
    };

    Ok(RecordFields {
        brief_description: input.brief_description.unwrap_or_default(),
        description: input.description,
        start_time,
        start_time_tz: start_tz.name().to_string(),
        end_time,
        end_time_tz,
        category_id: input.category_id,
        location_id: input.location_id,
    })
}

fn merge_fields(
    record: Record,
    input: UpdateRecord,
    current: Tz,
) -> Result<RecordFields, CoreError> {
    let start_tz = match input.start_time_tz.as_deref() {
        Some(name) => Some(resolve_zone("start_time_tz", Some(name), current)?),
        None => None,
    };
    let end_tz = match input.end_time_tz.as_deref() {
        Some(name) => Some(resolve_zone("end_time_tz", Some(name), current)?),
        None => None,
    };

    // Supplied readings are re-attached to the supplied zone, else the stored one.
    let stored_start_tz =
        resolve_zone("start_time_tz", Some(record.start_time_tz.as_str()), current)?;
    let stored_end_tz = resolve_zone("end_time_tz", Some(record.end_time_tz.as_str()), current)?;

    let start_time = match input.start_time {
        Some(value) => {
            convert_time("start_time", value, current, start_tz.unwrap_or(stored_start_tz))?
        }
        None => record.start_time,
    };
    // `Some(None)` is an explicit clear, which reopens the record.
    let end_time = match input.end_time {
        Some(Some(value)) => Some(convert_time(
            "end_time",
            value,
            current,
            end_tz.unwrap_or(stored_end_tz),
        )?),
        Some(None) => None,
        None => record.end_time,
    };
    validate_interval(start_time, end_time)?;

    let start_time_tz = start_tz
        .map(|tz| tz.name().to_string())
        .unwrap_or(record.start_time_tz);
    let end_time_tz = match (&input.end_time, end_tz) {
        (Some(None), _) => String::new(),
        (_, Some(tz)) => tz.name().to_string(),
        (Some(Some(_)), None) if record.end_time_tz.is_empty() => current.name().to_string(),
        _ => record.end_time_tz,
    };

    Ok(RecordFields {
        brief_description: input
            .brief_description
            .unwrap_or(record.brief_description),
        description: input.description.unwrap_or(record.description),
        start_time,
        start_time_tz,
        end_time,
        end_time_tz,
        category_id: input.category_id.unwrap_or(record.category_id),
        location_id: input.location_id.unwrap_or(record.location_id),
    })
}

/// GET /api/v1/projects/{project_slug}/records
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_slug): Path<String>,
) -> AppResult<Json<DataResponse<Vec<RecordResponse>>>> {
    let project = ensure_project(&state.pool, auth.user_id, &project_slug).await?;
    let records = RecordRepo::list_by_project(&state.pool, project.id).await?;
    Ok(Json(DataResponse {
        data: records.into_iter().map(RecordResponse::from).collect(),
    }))
}

/// POST /api/v1/projects/{project_slug}/records
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_slug): Path<String>,
    Json(input): Json<CreateRecord>,
) -> AppResult<(StatusCode, Json<DataResponse<RecordResponse>>)> {
    input.validate()?;
    let project = ensure_project(&state.pool, auth.user_id, &project_slug).await?;

    let fields = build_fields(input, state.config.time_zone)?;
    check_references(&state.pool, project.id, fields.category_id, fields.location_id).await?;

    let record = RecordRepo::create(&state.pool, project.id, &fields).await?;

    tracing::info!(
        project_id = project.id,
        record_id = record.id,
        open = record.end_time.is_none(),
        "Record created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: record.into() })))
}

/// GET /api/v1/projects/{project_slug}/records/{id}
pub async fn get_detail(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((project_slug, id)): Path<(String, DbId)>,
) -> AppResult<Json<DataResponse<RecordResponse>>> {
    let project = ensure_project(&state.pool, auth.user_id, &project_slug).await?;
    let record = ensure_record(&state.pool, project.id, id).await?;
    Ok(Json(DataResponse { data: record.into() }))
}

/// PUT /api/v1/projects/{project_slug}/records/{id}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((project_slug, id)): Path<(String, DbId)>,
    Json(input): Json<UpdateRecord>,
) -> AppResult<Json<DataResponse<RecordResponse>>> {
    input.validate()?;
    let project = ensure_project(&state.pool, auth.user_id, &project_slug).await?;
    let record = ensure_record(&state.pool, project.id, id).await?;

    let fields = merge_fields(record, input, state.config.time_zone)?;
    check_references(&state.pool, project.id, fields.category_id, fields.location_id).await?;

    let updated = RecordRepo::update(&state.pool, project.id, id, &fields)
        .await?
        .ok_or_else(|| CoreError::not_found("Record", id))?;

    tracing::info!(project_id = project.id, record_id = id, "Record updated");

    Ok(Json(DataResponse { data: updated.into() }))
}

/// DELETE /api/v1/projects/{project_slug}/records/{id}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((project_slug, id)): Path<(String, DbId)>,
) -> AppResult<StatusCode> {
    let project = ensure_project(&state.pool, auth.user_id, &project_slug).await?;

    if !RecordRepo::delete(&state.pool, project.id, id).await? {
        return Err(CoreError::not_found("Record", id).into());
    }

    tracing::info!(project_id = project.id, record_id = id, "Record deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/projects/{project_slug}/records/{id}/close
///
/// Ends an open record at the current instant. Closing an already closed
/// record, or one that starts in the future, changes nothing.
pub async fn close(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((project_slug, id)): Path<(String, DbId)>,
) -> AppResult<Json<DataResponse<CloseRecordResponse>>> {
    let project = ensure_project(&state.pool, auth.user_id, &project_slug).await?;
    let record = ensure_record(&state.pool, project.id, id).await?;

    let mut times = record.times();
    let outcome = times.close(Utc::now(), state.config.time_zone);

    let (outcome, record) = match (outcome, times.end_time) {
        (CloseOutcome::Closed, Some(end_time)) => {
            match RecordRepo::close(&state.pool, id, end_time, &times.end_time_tz).await? {
                Some(closed) => (CloseOutcome::Closed, closed),
                // Lost a race with another close or edit; report what is stored now.
                None => {
                    let current = ensure_record(&state.pool, project.id, id).await?;
                    let outcome = if current.end_time.is_some() {
                        CloseOutcome::AlreadyClosed
                    } else {
                        CloseOutcome::StartsInFuture
                    };
                    (outcome, current)
                }
            }
        }
        (outcome, _) => (outcome, record),
    };

    tracing::info!(
        project_id = project.id,
        record_id = id,
        outcome = ?outcome,
        "Record close requested"
    );

    Ok(Json(DataResponse {
        data: CloseRecordResponse {
            outcome,
            record: record.into(),
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> Timestamp {
        Utc.with_ymd_and_hms(2024, 1, 15, h, m, 0).unwrap()
    }

    fn stored(start: Timestamp, end: Option<Timestamp>) -> Record {
        Record {
            id: 1,
            project_id: 1,
            brief_description: "standup".into(),
            description: None,
            start_time: start,
            start_time_tz: "Europe/Berlin".into(),
            end_time: end,
            end_time_tz: if end.is_some() { "Europe/Berlin".into() } else { String::new() },
            category_id: Some(7),
            location_id: None,
            created_at: start,
            updated_at: start,
        }
    }

    #[test]
    fn create_defaults_zones_to_current() {
        let input = CreateRecord {
            start_time: Some(at(9, 0).into()),
            end_time: Some(at(10, 0).into()),
            ..Default::default()
        };
        let fields = build_fields(input, Tz::UTC).unwrap();
        assert_eq!(fields.start_time_tz, "UTC");
        assert_eq!(fields.end_time_tz, "UTC");
        assert_eq!(fields.start_time, at(9, 0));
        assert_eq!(fields.brief_description, "");
    }

    #[test]
    fn create_open_record_leaves_end_zone_blank() {
        let input = CreateRecord {
            start_time: Some(at(9, 0).into()),
            ..Default::default()
        };
        let fields = build_fields(input, Tz::UTC).unwrap();
        assert!(fields.end_time.is_none());
        assert_eq!(fields.end_time_tz, "");
    }

    #[test]
    fn create_reattaches_each_reading_to_its_zone() {
        let input = CreateRecord {
            start_time: Some(at(9, 0).into()),
            start_time_tz: Some("America/New_York".into()),
            end_time: Some(at(18, 0).into()),
            end_time_tz: Some("Europe/Berlin".into()),
            ..Default::default()
        };
        let fields = build_fields(input, Tz::UTC).unwrap();
        // 09:00 New York (EST) is 14:00 UTC; 18:00 Berlin (CET) is 17:00 UTC.
        assert_eq!(fields.start_time, at(14, 0));
        assert_eq!(fields.end_time, Some(at(17, 0)));
        assert_eq!(fields.start_time_tz, "America/New_York");
    }

    #[test]
    fn create_rejects_end_before_start_after_conversion() {
        // 10:00 Tokyo is 01:00 UTC, earlier than 09:00 UTC.
        let input = CreateRecord {
            start_time: Some(at(9, 0).into()),
            end_time: Some(at(10, 0).into()),
            end_time_tz: Some("Asia/Tokyo".into()),
            ..Default::default()
        };
        assert_matches!(
            build_fields(input, Tz::UTC),
            Err(CoreError::InvalidField { field: "end_time", .. })
        );
    }

    #[test]
    fn create_rejects_unknown_zone() {
        let input = CreateRecord {
            start_time_tz: Some("Nowhere/Special".into()),
            ..Default::default()
        };
        assert_matches!(
            build_fields(input, Tz::UTC),
            Err(CoreError::InvalidField { field: "start_time_tz", .. })
        );
    }

    #[test]
    fn update_keeps_omitted_fields() {
        let record = stored(at(8, 0), Some(at(9, 0)));
        let input = UpdateRecord {
            brief_description: Some("retro".into()),
            ..Default::default()
        };
        let fields = merge_fields(record, input, Tz::UTC).unwrap();
        assert_eq!(fields.brief_description, "retro");
        assert_eq!(fields.start_time, at(8, 0));
        assert_eq!(fields.end_time, Some(at(9, 0)));
        assert_eq!(fields.start_time_tz, "Europe/Berlin");
        assert_eq!(fields.category_id, Some(7));
    }

    #[test]
    fn update_uses_stored_zone_for_new_reading() {
        let record = stored(at(8, 0), None);
        let input = UpdateRecord {
            end_time: Some(Some(at(12, 0).into())),
            ..Default::default()
        };
        let fields = merge_fields(record, input, Tz::UTC).unwrap();
        // Open record had no end zone, so the current zone is used and recorded.
        assert_eq!(fields.end_time, Some(at(12, 0)));
        assert_eq!(fields.end_time_tz, "UTC");
    }

    #[test]
    fn update_rejects_end_before_stored_start() {
        let record = stored(at(8, 0), None);
        let input = UpdateRecord {
            end_time: Some(Some(at(7, 0).into())),
            end_time_tz: Some("UTC".into()),
            ..Default::default()
        };
        assert_matches!(
            merge_fields(record, input, Tz::UTC),
            Err(CoreError::InvalidField { field: "end_time", .. })
        );
    }

    #[test]
    fn update_nulls_clear_nullable_fields() {
        let mut record = stored(at(8, 0), Some(at(9, 0)));
        record.location_id = Some(3);
        record.description = Some("d".into());

        let input: UpdateRecord = serde_json::from_str(
            r#"{"category_id":null,"location_id":null,"end_time":null,"description":null}"#,
        )
        .unwrap();
        let fields = merge_fields(record, input, Tz::UTC).unwrap();

        assert_eq!(fields.category_id, None);
        assert_eq!(fields.location_id, None);
        assert_eq!(fields.description, None);
        assert_eq!(fields.end_time, None);
        assert_eq!(fields.end_time_tz, "");
        assert_eq!(fields.start_time, at(8, 0));
    }

    #[test]
    fn naive_reading_is_taken_on_the_chosen_zone() {
        let input: CreateRecord = serde_json::from_str(
            r#"{"start_time":"2024-01-15T09:00:00","start_time_tz":"America/New_York"}"#,
        )
        .unwrap();
        let fields = build_fields(input, Tz::Europe__Berlin).unwrap();
        assert_eq!(fields.start_time, at(14, 0));
        assert_eq!(fields.start_time_tz, "America/New_York");
    }
}
