use axum::extract::State;
use axum::Json;
use serde::Serialize;
use timetrack_core::timezone::common_timezones;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Zone choices for the `start_time_tz` / `end_time_tz` fields.
#[derive(Debug, Serialize)]
pub struct TimezoneList {
    /// The server's current zone, used as the default for both fields.
    pub current: &'static str,
    pub zones: Vec<&'static str>,
}

/// GET /api/v1/timezones
pub async fn list(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<TimezoneList>>> {
    Ok(Json(DataResponse {
        data: TimezoneList {
            current: state.config.time_zone.name(),
            zones: common_timezones(),
        },
    }))
}
