use axum::{extract::State, http::StatusCode, response::IntoResponse, response::Response, Json};
use serde::Serialize;
use serde_json::Value;

use crate::auth::AuthUser;
use crate::state::AppState;
use crate::utils::error::AppError;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingResponse {
    pub success: bool,
    pub trending_events: Value,
}

pub async fn trending_events(
    State(state): State<AppState>,
    _user: AuthUser,
) -> Result<Response, AppError> {
    let snapshot = state.trending.trending().await?;
    tracing::debug!(source = ?snapshot.source, "Serving trending events");

    let body = TrendingResponse {
        success: true,
        trending_events: snapshot.events,
    };
    Ok((StatusCode::OK, Json(body)).into_response())
}
