use crate::core::error::RequestError;
use crate::core::state::AppState;
use crate::models::user::Role;
use crate::models::views::FormView;
use crate::security::session::Identity;
use crate::utils::auth::{hash_password, verify_password};
use crate::validation::forms::CredentialsForm;
use axum::{
    extract::State,
    http::HeaderMap,
    response::{IntoResponse, Json, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::SignedCookieJar;
use std::sync::Arc;
use tracing::{info, warn};

const LOGIN_FAILED: &str = "Invalid username or password";

/// Argon2 is CPU-bound, keep it off the async workers
async fn hash_off_thread(password: String) -> Result<String, RequestError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| RequestError::Internal(format!("password hashing task failed: {}", e)))?
        .map_err(RequestError::from)
}

async fn verify_off_thread(password: String, stored: String) -> Result<bool, RequestError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &stored))
        .await
        .map_err(|e| RequestError::Internal(format!("password check task failed: {}", e)))
}

/// GET /
pub async fn login_page() -> Json<FormView> {
    Json(FormView::login(None))
}

/// Start a session and send the user to their role's dashboard.
/// Bad credentials re-render the login view.
///
/// POST /
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<CredentialsForm>,
) -> Result<Response, RequestError> {
    let Ok(credentials) = form.validate() else {
        return Ok(Json(FormView::login(Some(LOGIN_FAILED.to_string()))).into_response());
    };

    let user = match state.users.find_by_username(&credentials.username).await? {
        Some(user) => {
            let verified = verify_off_thread(credentials.password, user.password_hash.clone()).await?;
            verified.then_some(user)
        }
        None => None,
    };

    match user {
        Some(user) => {
            let identity = Identity {
                user_id: user.id,
                role: user.role,
            };
            let jar = state.sessions.login(state.sessions.jar(&headers), identity);

            info!(user_id = user.id, role = %user.role, "User logged in");

            Ok((jar, Redirect::to(user.role.home())).into_response())
        }
        None => {
            warn!(username = %credentials.username, "Failed login attempt");
            Ok(Json(FormView::login(Some(LOGIN_FAILED.to_string()))).into_response())
        }
    }
}

/// GET /signup
pub async fn signup_page() -> Json<FormView> {
    Json(FormView::signup())
}

/// Create a citizen account
///
/// POST /signup
pub async fn signup_handler(
    State(state): State<Arc<AppState>>,
    Form(form): Form<CredentialsForm>,
) -> Result<Redirect, RequestError> {
    let credentials = form.validate()?;
    let password_hash = hash_off_thread(credentials.password).await?;

    let user = state
        .users
        .create(&credentials.username, &password_hash, Role::Citizen)
        .await?;

    info!(user_id = user.id, username = %user.username, "Citizen account created");

    Ok(Redirect::to("/"))
}

/// GET /logout
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> (SignedCookieJar, Redirect) {
    (state.sessions.logout(state.sessions.jar(&headers)), Redirect::to("/"))
}
