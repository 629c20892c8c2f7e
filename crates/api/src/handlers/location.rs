//! Handlers for locations nested under `/projects/{project_slug}/locations`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use sqlx::PgPool;
use timetrack_core::error::CoreError;
use timetrack_core::slug::{ensure_slug_available, validate_name};
use timetrack_core::types::DbId;
use timetrack_db::models::location::{
    CreateLocation, Location, LocationDetailResponse, UpdateLocation,
};
use timetrack_db::models::record::RecordResponse;
use timetrack_db::repositories::{LocationRepo, RecordRepo};
use validator::Validate;

use crate::error::AppResult;
use crate::handlers::project::ensure_project;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

async fn ensure_location(pool: &PgPool, project_id: DbId, slug: &str) -> AppResult<Location> {
    let location = LocationRepo::find_by_slug(pool, project_id, slug)
        .await?
        .ok_or_else(|| CoreError::not_found("Location", slug))?;
    Ok(location)
}

async fn claim_slug(
    pool: &PgPool,
    project_id: DbId,
    name: &str,
    current: Option<DbId>,
) -> AppResult<String> {
    let slug = validate_name("Location", name)?;
    let existing = LocationRepo::find_id_by_slug(pool, project_id, &slug).await?;
    ensure_slug_available("Location", existing, current)?;
    Ok(slug)
}

/// GET /api/v1/projects/{project_slug}/locations
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_slug): Path<String>,
) -> AppResult<Json<DataResponse<Vec<Location>>>> {
    let project = ensure_project(&state.pool, auth.user_id, &project_slug).await?;
    let locations = LocationRepo::list_by_project(&state.pool, project.id).await?;
    Ok(Json(DataResponse { data: locations }))
}

/// POST /api/v1/projects/{project_slug}/locations
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_slug): Path<String>,
    Json(input): Json<CreateLocation>,
) -> AppResult<(StatusCode, Json<DataResponse<Location>>)> {
    input.validate()?;
    let project = ensure_project(&state.pool, auth.user_id, &project_slug).await?;
    let slug = claim_slug(&state.pool, project.id, &input.name, None).await?;

    let location = LocationRepo::create(&state.pool, project.id, &slug, &input).await?;

    tracing::info!(
        project_id = project.id,
        location_id = location.id,
        slug = %location.slug,
        "Location created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: location })))
}

/// GET /api/v1/projects/{project_slug}/locations/{location_slug}
pub async fn get_detail(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((project_slug, location_slug)): Path<(String, String)>,
) -> AppResult<Json<DataResponse<LocationDetailResponse>>> {
    let project = ensure_project(&state.pool, auth.user_id, &project_slug).await?;
    let location = ensure_location(&state.pool, project.id, &location_slug).await?;

    let records = RecordRepo::list_by_location(&state.pool, location.id).await?;

    Ok(Json(DataResponse {
        data: LocationDetailResponse {
            location,
            records: records.into_iter().map(RecordResponse::from).collect(),
        },
    }))
}

/// PUT /api/v1/projects/{project_slug}/locations/{location_slug}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((project_slug, location_slug)): Path<(String, String)>,
    Json(input): Json<UpdateLocation>,
) -> AppResult<Json<DataResponse<Location>>> {
    input.validate()?;
    let project = ensure_project(&state.pool, auth.user_id, &project_slug).await?;
    let location = ensure_location(&state.pool, project.id, &location_slug).await?;

    let slug = match &input.name {
        Some(name) => Some(claim_slug(&state.pool, project.id, name, Some(location.id)).await?),
        None => None,
    };

    let updated = LocationRepo::update(&state.pool, location.id, slug.as_deref(), &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Location", &location_slug))?;

    tracing::info!(project_id = project.id, location_id = updated.id, "Location updated");

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/projects/{project_slug}/locations/{location_slug}
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((project_slug, location_slug)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    let project = ensure_project(&state.pool, auth.user_id, &project_slug).await?;
    let location = ensure_location(&state.pool, project.id, &location_slug).await?;

    if !LocationRepo::delete(&state.pool, location.id).await? {
        return Err(CoreError::not_found("Location", &location_slug).into());
    }

    tracing::info!(project_id = project.id, location_id = location.id, "Location deleted");

    Ok(StatusCode::NO_CONTENT)
}
