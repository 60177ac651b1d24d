//! Shared fixtures for handler tests

use crate::classifier::TextClassifier;
use crate::core::config::{Config, SESSION_KEY_LEN};
use crate::core::startup::seed_admin;
use crate::core::state::AppState;
use crate::models::complaint::{Complaint, NewComplaint, Priority};
use crate::models::user::Role;
use crate::security::session::{Identity, SessionManager};
use crate::stores::database::connect_in_memory;
use crate::utils::auth::hash_password;
use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{HeaderMap, Method, Request};
use axum::response::{IntoResponse, Response};
use http_body_util::BodyExt;
use serde::Serialize;
use std::sync::Arc;
use tower::ServiceExt;

pub const TEST_CATEGORY: &str = "Sanitation";

/// Always answers with the same label
pub struct FixedClassifier(pub &'static str);

impl TextClassifier for FixedClassifier {
    fn predict(&self, _cleaned_text: &str) -> String {
        self.0.to_string()
    }
}

pub fn create_test_config() -> Config {
    let toml = format!(
        "[server]\nport = 8080\nnum_threads = 2\n[session]\nsecret = \"{}\"\n",
        "42".repeat(SESSION_KEY_LEN)
    );
    Config::from_toml(&toml).unwrap()
}

/// In-memory database with the default admin (id 1) already seeded
pub async fn create_test_state() -> Arc<AppState> {
    let config = create_test_config();
    let pool = connect_in_memory().await.unwrap();
    let sessions = SessionManager::from_config(&config.session).unwrap();
    let state = AppState::new(config, pool, Arc::new(FixedClassifier(TEST_CATEGORY)), sessions);

    seed_admin(&state.users, &state.config.admin).await.unwrap();

    Arc::new(state)
}

pub async fn create_citizen(state: &AppState, username: &str) -> Identity {
    let user = state
        .users
        .create(username, &hash_password("password").unwrap(), Role::Citizen)
        .await
        .unwrap();

    Identity {
        user_id: user.id,
        role: user.role,
    }
}

pub async fn file_complaint(state: &AppState, user_id: i64) -> Complaint {
    state
        .complaints
        .insert(&NewComplaint {
            text: "Garbage not collected for a week".to_string(),
            category: TEST_CATEGORY.to_string(),
            priority: Priority::Low,
            location: "Ward 4".to_string(),
            user_id,
        })
        .await
        .unwrap()
}

/// Request headers carrying the Set-Cookie values of `response`
pub fn cookies_from(response: &Response) -> HeaderMap {
    let mut headers = HeaderMap::new();
    for value in response.headers().get_all(SET_COOKIE) {
        let pair = value.to_str().unwrap().split(';').next().unwrap().to_string();
        headers.append(COOKIE, pair.parse().unwrap());
    }
    headers
}

/// Headers for a request made inside a signed session for `identity`
pub fn cookie_headers(state: &AppState, identity: Identity) -> HeaderMap {
    let jar = state.sessions.login(state.sessions.jar(&HeaderMap::new()), identity);
    cookies_from(&jar.into_response())
}

/// Log in through the real form with the seeded credentials
pub async fn login_as_admin(state: &Arc<AppState>) -> HeaderMap {
    let app = crate::core::routes::build_router(state.clone());

    #[derive(Serialize)]
    struct Login<'a> {
        username: &'a str,
        password: &'a str,
    }

    let response = app
        .oneshot(form_request("/", None, &Login { username: "admin", password: "admin" }))
        .await
        .unwrap();

    cookies_from(&response)
}

pub fn get_request(uri: &str, headers: Option<&HeaderMap>) -> Request<Body> {
    let mut request = Request::builder().method(Method::GET).uri(uri);
    for (name, value) in headers.into_iter().flatten() {
        request = request.header(name, value);
    }
    request.body(Body::empty()).unwrap()
}

pub fn form_request<T: Serialize>(uri: &str, headers: Option<&HeaderMap>, form: &T) -> Request<Body> {
    let mut request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded");
    for (name, value) in headers.into_iter().flatten() {
        request = request.header(name, value);
    }
    request
        .body(Body::from(serde_urlencoded::to_string(form).unwrap()))
        .unwrap()
}

pub async fn body_string(response: Response) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}
