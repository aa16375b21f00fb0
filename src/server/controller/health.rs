use axum::{extract::State, Json};

use crate::{model::api::HealthDto, server::model::app::AppState};

pub static HEALTH_TAG: &str = "health";

/// Report service health
#[utoipa::path(
    get,
    path = "/health",
    tag = HEALTH_TAG,
    responses(
        (status = 200, description = "Service is up", body = HealthDto)
    ),
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthDto> {
    Json(HealthDto {
        status: "ok".to_string(),
        mock_mode: state.config.flags.enable_mock_mode,
    })
}
