// HTTP routes configuration

use crate::core::state::AppState;
use crate::handlers::{auth, client, fallback, health, operator};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Public endpoints
        .route("/", get(auth::login_page).post(auth::login_handler))
        .route("/signup", get(auth::signup_page).post(auth::signup_handler))
        .route("/logout", get(auth::logout_handler))
        .route("/health", get(health::health_handler))

        // Citizen endpoints
        .route(
            "/client_dashboard",
            get(client::client_dashboard_handler).post(client::submit_complaint_handler),
        )
        .route("/delete_complaint/{id}", get(client::delete_complaint_handler))

        // Operator endpoints
        .route("/operator_dashboard", get(operator::operator_dashboard_handler))
        .route("/update_status/{id}", post(operator::update_status_handler))
        .route("/operator_delete/{id}", get(operator::operator_delete_handler))

        .fallback(fallback::fallback_handler)

        .with_state(state)
}
