//! Handlers for the `/projects` resource.
//!
//! Every project is looked up by the requesting owner plus its slug, so one
//! owner can never see or touch another owner's projects.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use sqlx::PgPool;
use timetrack_core::error::CoreError;
use timetrack_core::report::{category_totals, split_open_closed};
use timetrack_core::slug::{ensure_slug_available, validate_name};
use timetrack_core::types::DbId;
use timetrack_db::models::project::{
    CreateProject, Project, ProjectDetailResponse, ProjectListResponse, UpdateProject,
};
use timetrack_db::models::record::RecordResponse;
use timetrack_db::repositories::{CategoryRepo, LocationRepo, ProjectRepo, RecordRepo};
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Fetch one of the owner's projects by slug or return 404.
pub(crate) async fn ensure_project(
    pool: &PgPool,
    owner_id: DbId,
    slug: &str,
) -> AppResult<Project> {
    let project = ProjectRepo::find_by_slug(pool, owner_id, slug)
        .await?
        .ok_or_else(|| CoreError::not_found("Project", slug))?;
    Ok(project)
}

/// Validate a project name and check its slug is free for the owner.
async fn claim_slug(
    pool: &PgPool,
    owner_id: DbId,
    name: &str,
    current: Option<DbId>,
) -> AppResult<String> {
    let slug = validate_name("Project", name)?;
    let existing = ProjectRepo::find_id_by_slug(pool, owner_id, &slug).await?;
    ensure_slug_available("Project", existing, current)?;
    Ok(slug)
}

/// GET /api/v1/projects
///
/// The owner's projects, split into active projects and templates.
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<ProjectListResponse>>> {
    let active = ProjectRepo::list_by_owner(&state.pool, auth.user_id, false).await?;
    let templates = ProjectRepo::list_by_owner(&state.pool, auth.user_id, true).await?;
    Ok(Json(DataResponse {
        data: ProjectListResponse { active, templates },
    }))
}

/// POST /api/v1/projects
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    input.validate()?;
    let slug = claim_slug(&state.pool, auth.user_id, &input.name, None).await?;

    let project = ProjectRepo::create(&state.pool, auth.user_id, &slug, &input).await?;

    tracing::info!(
        owner_id = auth.user_id,
        project_id = project.id,
        slug = %project.slug,
        "Project created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}

/// GET /api/v1/projects/{project_slug}
///
/// Project overview: open and closed records, categories, locations, and
/// the time spent per category over closed records.
pub async fn get_detail(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_slug): Path<String>,
) -> AppResult<Json<DataResponse<ProjectDetailResponse>>> {
    let project = ensure_project(&state.pool, auth.user_id, &project_slug).await?;

    let records = RecordRepo::list_by_project(&state.pool, project.id).await?;
    let totals = category_totals(&records);
    let (open, closed) = split_open_closed(records);

    let categories = CategoryRepo::list_by_project(&state.pool, project.id).await?;
    let locations = LocationRepo::list_by_project(&state.pool, project.id).await?;

    Ok(Json(DataResponse {
        data: ProjectDetailResponse {
            project,
            open_records: open.into_iter().map(RecordResponse::from).collect(),
            closed_records: closed.into_iter().map(RecordResponse::from).collect(),
            categories,
            locations,
            category_totals: totals,
        },
    }))
}

/// PUT /api/v1/projects/{project_slug}
///
/// Renaming recomputes the slug; keeping the same name is never a conflict.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_slug): Path<String>,
    Json(input): Json<UpdateProject>,
) -> AppResult<Json<DataResponse<Project>>> {
    input.validate()?;
    let project = ensure_project(&state.pool, auth.user_id, &project_slug).await?;

    let slug = match &input.name {
        Some(name) => Some(claim_slug(&state.pool, auth.user_id, name, Some(project.id)).await?),
        None => None,
    };

    let updated = ProjectRepo::update(&state.pool, project.id, slug.as_deref(), &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Project", &project_slug))?;

    tracing::info!(
        owner_id = auth.user_id,
        project_id = updated.id,
        slug = %updated.slug,
        "Project updated"
    );

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/projects/{project_slug}
///
/// Removes the project together with its categories, locations and records.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_slug): Path<String>,
) -> AppResult<StatusCode> {
    let project = ensure_project(&state.pool, auth.user_id, &project_slug).await?;

    if !ProjectRepo::delete(&state.pool, project.id).await? {
        return Err(CoreError::not_found("Project", &project_slug).into());
    }

    tracing::info!(owner_id = auth.user_id, project_id = project.id, "Project deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/v1/projects/{project_slug}/copy
///
/// Create a new project for the owner carrying over every category of the
/// source project (usually a template). Records and locations are not copied.
pub async fn copy(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_slug): Path<String>,
    Json(input): Json<CreateProject>,
) -> AppResult<(StatusCode, Json<DataResponse<Project>>)> {
    input.validate()?;
    let source = ensure_project(&state.pool, auth.user_id, &project_slug).await?;
    let slug = claim_slug(&state.pool, auth.user_id, &input.name, None).await?;

    let (project, copied) =
        ProjectRepo::copy_with_categories(&state.pool, auth.user_id, source.id, &slug, &input)
            .await?;

    tracing::info!(
        owner_id = auth.user_id,
        source_project_id = source.id,
        project_id = project.id,
        categories_copied = copied,
        "Project copied"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: project })))
}
