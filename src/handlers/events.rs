use axum::{
    extract::{Path, Query, State},
    response::Response,
};
use chrono::{NaiveTime, Utc};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::success;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// Events from today onwards. Anything dated after the start of the current
/// UTC day is listed, so events later today still show up.
pub async fn upcoming_events(State(state): State<AppState>) -> Result<Response, AppError> {
    let start_of_day = Utc::now()
        .date_naive()
        .and_time(NaiveTime::default())
        .and_utc();
    let events = state.store.upcoming_events(start_of_day).await?;
    Ok(success(events, "Events fetched successfully"))
}

pub async fn search_events(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Response, AppError> {
    let query = params
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or_else(|| AppError::ValidationError("Search query is required".to_string()))?;

    let events = state.store.search_events(query).await?;
    Ok(success(events, "Search completed"))
}

pub async fn event_details(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(event_name): Path<String>,
) -> Result<Response, AppError> {
    let event = state
        .store
        .event_by_name(&event_name)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;
    Ok(success(event, "Event fetched successfully"))
}

/// Events the calling admin created, for the admin dashboard.
pub async fn admin_events(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Response, AppError> {
    user.require_admin()?;
    let events = state.store.events_created_by(user.id).await?;
    Ok(success(events, "Events fetched successfully"))
}
