pub mod health;
pub mod project;

use axum::routing::get;
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /timezones                                       zone choices for records
///
/// /projects                                        list, create
/// /projects/{project_slug}                         detail, update, delete
/// /projects/{project_slug}/copy                    copy categories (POST)
/// /projects/{project_slug}/categories[/{slug}]     category CRUD
/// /projects/{project_slug}/locations[/{slug}]      location CRUD
/// /projects/{project_slug}/records[/{id}]          record CRUD
/// /projects/{project_slug}/records/{id}/close      close an open record (POST)
/// ```
///
/// Every route requires a Bearer token; `/health` is mounted separately at
/// the root.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/timezones", get(handlers::timezone::list))
        .nest("/projects", project::router())
}
