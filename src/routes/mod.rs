use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::config::{create_cors_layer, with_security_headers, HttpConfig};
use crate::handlers::{
    admin_events, event_details, health_check, register_for_event, registration_history,
    registrations_for_event, search_events, trending_events, upcoming_events,
};
use crate::state::AppState;

pub fn create_routes(state: AppState, http: &HttpConfig) -> Router {
    let api = Router::new()
        .route("/search", get(search_events))
        .route("/event", get(upcoming_events))
        .route("/event/event-details/:event_name", get(event_details))
        .route("/admin-dashboard", get(admin_events))
        .route("/register-event/:event_name", post(register_for_event))
        .route("/registrations/:event_id", get(registrations_for_event))
        .route("/history", get(registration_history))
        .route("/trending", get(trending_events));

    let router = Router::new()
        .route("/health", get(health_check))
        .nest("/api", api)
        .with_state(state);

    with_security_headers(router, http.include_hsts)
        .layer(create_cors_layer(&http.allowed_origins))
        .layer(TraceLayer::new_for_http())
}
