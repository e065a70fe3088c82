use axum::response::Response;
use serde::Serialize;

use crate::utils::response::success;

pub mod events;
pub mod registrations;
pub mod trending;

pub use events::{admin_events, event_details, search_events, upcoming_events};
pub use registrations::{registration_history, register_for_event, registrations_for_event};
pub use trending::trending_events;

#[derive(Serialize)]
struct HealthPayload {
    status: &'static str,
    service: &'static str,
}

pub async fn health_check() -> Response {
    let payload = HealthPayload {
        status: "ok",
        service: "campus-events-api",
    };

    success(payload, "Health check successful")
}
