use axum::{
    extract::{Path, State},
    response::Response,
    Json,
};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::models::{Registration, RegistrationForm, MAX_FIELD_LEN};
use crate::state::AppState;
use crate::utils::error::AppError;
use crate::utils::response::{created, success};

/// Registers the caller for an event looked up by name.
///
/// The trending cache is left alone; new registrations show up in trending
/// once the current snapshot expires.
pub async fn register_for_event(
    State(state): State<AppState>,
    user: AuthUser,
    Path(event_name): Path<String>,
    Json(form): Json<RegistrationForm>,
) -> Result<Response, AppError> {
    if let Some(field) = form.oversized_field() {
        return Err(AppError::ValidationError(format!(
            "{field} must be at most {MAX_FIELD_LEN} characters"
        )));
    }

    let event = state
        .store
        .event_by_name(&event_name)
        .await?
        .ok_or_else(|| AppError::NotFound("Event not found".to_string()))?;

    let registration = Registration::from_form(event.id, user.id, form);
    state.store.insert_registration(&registration).await?;

    tracing::info!(
        event_id = %event.id,
        registration_id = %registration.id,
        user_id = %user.id,
        "Registration created"
    );
    Ok(created(registration, "Registration successful"))
}

/// Registrant list for an event. Admins only.
pub async fn registrations_for_event(
    State(state): State<AppState>,
    user: AuthUser,
    Path(event_id): Path<Uuid>,
) -> Result<Response, AppError> {
    user.require_admin()?;
    let registrations = state.store.registrations_for_event(event_id).await?;
    Ok(success(registrations, "Students fetched successfully"))
}

pub async fn registration_history(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Response, AppError> {
    let history = state.store.registrations_for_user(user.id).await?;
    Ok(success(history, "History fetched successfully"))
}
