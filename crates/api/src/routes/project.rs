//! Route definitions for the `/projects` resource.
//!
//! Categories, locations and records live under a project and are nested
//! beneath `/projects/{project_slug}/...`.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{category, location, project, record};
use crate::state::AppState;

/// Routes mounted at `/projects`.
///
/// ```text
/// GET    /                                       -> list
/// POST   /                                       -> create
/// GET    /{project_slug}                         -> get_detail
/// PUT    /{project_slug}                         -> update
/// DELETE /{project_slug}                         -> delete
/// POST   /{project_slug}/copy                    -> copy
///
/// GET    /{project_slug}/categories              -> list
/// POST   /{project_slug}/categories              -> create
/// GET    /{project_slug}/categories/{slug}       -> get_detail
/// PUT    /{project_slug}/categories/{slug}       -> update
/// DELETE /{project_slug}/categories/{slug}       -> delete
///
/// GET    /{project_slug}/locations               -> list
/// POST   /{project_slug}/locations               -> create
/// GET    /{project_slug}/locations/{slug}        -> get_detail
/// PUT    /{project_slug}/locations/{slug}        -> update
/// DELETE /{project_slug}/locations/{slug}        -> delete
///
/// GET    /{project_slug}/records                 -> list
/// POST   /{project_slug}/records                 -> create
/// GET    /{project_slug}/records/{id}            -> get_detail
/// PUT    /{project_slug}/records/{id}            -> update
/// DELETE /{project_slug}/records/{id}            -> delete
/// POST   /{project_slug}/records/{id}/close      -> close
/// ```
pub fn router() -> Router<AppState> {
    let category_routes = Router::new()
        .route("/", get(category::list).post(category::create))
        .route(
            "/{category_slug}",
            get(category::get_detail)
                .put(category::update)
                .delete(category::delete),
        );

    let location_routes = Router::new()
        .route("/", get(location::list).post(location::create))
        .route(
            "/{location_slug}",
            get(location::get_detail)
                .put(location::update)
                .delete(location::delete),
        );

    let record_routes = Router::new()
        .route("/", get(record::list).post(record::create))
        .route(
            "/{id}",
            get(record::get_detail)
                .put(record::update)
                .delete(record::delete),
        )
        .route("/{id}/close", post(record::close));

    Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{project_slug}",
            get(project::get_detail)
                .put(project::update)
                .delete(project::delete),
        )
        .route("/{project_slug}/copy", post(project::copy))
        .nest("/{project_slug}/categories", category_routes)
        .nest("/{project_slug}/locations", location_routes)
        .nest("/{project_slug}/records", record_routes)
}
