//! Handlers for categories nested under `/projects/{project_slug}/categories`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use sqlx::PgPool;
use timetrack_core::error::CoreError;
use timetrack_core::report::split_open_closed;
use timetrack_core::slug::{ensure_slug_available, validate_name};
use timetrack_core::types::DbId;
use timetrack_db::models::category::{
    Category, CategoryDetailResponse, CreateCategory, UpdateCategory,
};
use timetrack_db::models::record::RecordResponse;
use timetrack_db::repositories::{CategoryRepo, RecordRepo};
use validator::Validate;

use crate::error::AppResult;
use crate::handlers::project::ensure_project;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

async fn ensure_category(pool: &PgPool, project_id: DbId, slug: &str) -> AppResult<Category> {
    let category = CategoryRepo::find_by_slug(pool, project_id, slug)
        .await?
        .ok_or_else(|| CoreError::not_found("Category", slug))?;
    Ok(category)
}

async fn claim_slug(
    pool: &PgPool,
    project_id: DbId,
    name: &str,
    current: Option<DbId>,
) -> AppResult<String> {
    let slug = validate_name("Category", name)?;
    let existing = CategoryRepo::find_id_by_slug(pool, project_id, &slug).await?;
    ensure_slug_available("Category", existing, current)?;
    Ok(slug)
}

/// GET /api/v1/projects/{project_slug}/categories
pub async fn list(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_slug): Path<String>,
) -> AppResult<Json<DataResponse<Vec<Category>>>> {
    let project = ensure_project(&state.pool, auth.user_id, &project_slug).await?;
    let categories = CategoryRepo::list_by_project(&state.pool, project.id).await?;
    Ok(Json(DataResponse { data: categories }))
}

/// POST /api/v1/projects/{project_slug}/categories
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(project_slug): Path<String>,
    Json(input): Json<CreateCategory>,
) -> AppResult<(StatusCode, Json<DataResponse<Category>>)> {
    input.validate()?;
    let project = ensure_project(&state.pool, auth.user_id, &project_slug).await?;
    let slug = claim_slug(&state.pool, project.id, &input.name, None).await?;

    let category = CategoryRepo::create(&state.pool, project.id, &slug, &input).await?;

    tracing::info!(
        project_id = project.id,
        category_id = category.id,
        slug = %category.slug,
        "Category created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: category })))
}

/// GET /api/v1/projects/{project_slug}/categories/{category_slug}
///
/// The category with its open and closed records and their summed duration.
pub async fn get_detail(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((project_slug, category_slug)): Path<(String, String)>,
) -> AppResult<Json<DataResponse<CategoryDetailResponse>>> {
    let project = ensure_project(&state.pool, auth.user_id, &project_slug).await?;
    let category = ensure_category(&state.pool, project.id, &category_slug).await?;

    let records = RecordRepo::list_by_category(&state.pool, category.id).await?;
    let total_seconds: f64 = records.iter().map(|r| r.duration_seconds()).sum();
    let (open, closed) = split_open_closed(records);

    Ok(Json(DataResponse {
        data: CategoryDetailResponse {
            category,
            open_records: open.into_iter().map(RecordResponse::from).collect(),
            closed_records: closed.into_iter().map(RecordResponse::from).collect(),
            total_seconds,
        },
    }))
}

/// PUT /api/v1/projects/{project_slug}/categories/{category_slug}
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((project_slug, category_slug)): Path<(String, String)>,
    Json(input): Json<UpdateCategory>,
) -> AppResult<Json<DataResponse<Category>>> {
    input.validate()?;
    let project = ensure_project(&state.pool, auth.user_id, &project_slug).await?;
    let category = ensure_category(&state.pool, project.id, &category_slug).await?;

    let slug = match &input.name {
        Some(name) => Some(claim_slug(&state.pool, project.id, name, Some(category.id)).await?),
        None => None,
    };

    let updated = CategoryRepo::update(&state.pool, category.id, slug.as_deref(), &input)
        .await?
        .ok_or_else(|| CoreError::not_found("Category", &category_slug))?;

    tracing::info!(
        project_id = project.id,
        category_id = updated.id,
        slug = %updated.slug,
        "Category updated"
    );

    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/projects/{project_slug}/categories/{category_slug}
///
/// Records filed under the category stay, uncategorised.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path((project_slug, category_slug)): Path<(String, String)>,
) -> AppResult<StatusCode> {
    let project = ensure_project(&state.pool, auth.user_id, &project_slug).await?;
    let category = ensure_category(&state.pool, project.id, &category_slug).await?;

    if !CategoryRepo::delete(&state.pool, category.id).await? {
        return Err(CoreError::not_found("Category", &category_slug).into());
    }

    tracing::info!(project_id = project.id, category_id = category.id, "Category deleted");

    Ok(StatusCode::NO_CONTENT)
}
