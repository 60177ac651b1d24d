use crate::core::error::RequestError;
use crate::core::state::AppState;
use crate::models::views::OperatorDashboardView;
use crate::security::gate::{Admin, RequireRole};
use crate::validation::forms::StatusForm;
use crate::validation::path::ComplaintId;
use axum::{
    extract::State,
    response::{Json, Redirect},
    Form,
};
use std::sync::Arc;
use tracing::{debug, info};

const DASHBOARD: &str = "/operator_dashboard";

/// Every complaint plus aggregate counts
///
/// GET /operator_dashboard
pub async fn operator_dashboard_handler(
    State(state): State<Arc<AppState>>,
    _admin: RequireRole<Admin>,
) -> Result<Json<OperatorDashboardView>, RequestError> {
    let complaints = state.complaints.list_all().await?;
    let stats = state.complaints.stats().await?;

    Ok(Json(OperatorDashboardView { complaints, stats }))
}

/// Set a complaint's status. A missing field keeps the current status and an
/// unknown id is ignored.
///
/// POST /update_status/{id}
pub async fn update_status_handler(
    State(state): State<Arc<AppState>>,
    admin: RequireRole<Admin>,
    ComplaintId(id): ComplaintId,
    Form(form): Form<StatusForm>,
) -> Result<Redirect, RequestError> {
    let Some(status) = form.validate()? else {
        return Ok(Redirect::to(DASHBOARD));
    };

    if state.complaints.update_status(id, status).await? {
        info!(
            complaint_id = id,
            admin_id = admin.identity.user_id,
            status = %status,
            "Complaint status updated"
        );
    } else {
        debug!(complaint_id = id, "Status update for unknown complaint ignored");
    }

    Ok(Redirect::to(DASHBOARD))
}

/// Delete a complaint, but only once it is Resolved. Anything else is a silent no-op.
///
/// GET /operator_delete/{id}
pub async fn operator_delete_handler(
    State(state): State<Arc<AppState>>,
    admin: RequireRole<Admin>,
    ComplaintId(id): ComplaintId,
) -> Result<Redirect, RequestError> {
    if state.complaints.delete_if_resolved(id).await? {
        info!(complaint_id = id, admin_id = admin.identity.user_id, "Resolved complaint deleted");
    } else {
        debug!(complaint_id = id, "Operator delete skipped, complaint missing or not resolved");
    }

    Ok(Redirect::to(DASHBOARD))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::test_utils::{
        body_string, cookie_headers, create_citizen, create_test_state, file_complaint, form_request,
        get_request, login_as_admin,
    };
    use crate::models::complaint::Status;
    use crate::models::user::Role;
    use crate::models::views::DashboardStats;
    use crate::security::session::Identity;
    use axum::http::StatusCode;
    use serde_json::Value;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_seeded_admin_reaches_dashboard() {
        let state = create_test_state().await;
        let headers = login_as_admin(&state).await;
        let app = crate::core::routes::build_router(state);

        let response = app
            .clone()
            .oneshot(get_request("/operator_dashboard", Some(&headers)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // the same session cannot enter the citizen area
        let response = app
            .oneshot(get_request("/client_dashboard", Some(&headers)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get("location").unwrap(), "/");
    }

    #[tokio::test]
    async fn test_citizen_is_redirected_from_operator_dashboard() {
        let state = create_test_state().await;
        let alice = create_citizen(&state, "alice").await;
        let headers = cookie_headers(&state, alice);
        let app = crate::core::routes::build_router(state);

        let response = app
            .oneshot(get_request("/operator_dashboard", Some(&headers)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn test_dashboard_includes_stats() {
        let state = create_test_state().await;
        let alice = create_citizen(&state, "alice").await;
        let bob = create_citizen(&state, "bob").await;
        file_complaint(&state, alice.user_id).await;
        let resolved = file_complaint(&state, bob.user_id).await;
        state.complaints.update_status(resolved.id, Status::Resolved).await.unwrap();

        let headers = cookie_headers(&state, Identity { user_id: 1, role: Role::Admin });
        let app = crate::core::routes::build_router(state);

        let response = app
            .oneshot(get_request("/operator_dashboard", Some(&headers)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let view: Value = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(view["complaints"].as_array().unwrap().len(), 2);

        let stats: DashboardStats = serde_json::from_value(view["stats"].clone()).unwrap();
        assert_eq!(stats.total, 2);
        assert_eq!(stats.pending, 1);
        assert_eq!(stats.in_progress, 0);
        assert_eq!(stats.resolved, 1);
        assert_eq!(stats.statuses.labels, vec!["Pending", "Resolved"]);
    }

    #[tokio::test]
    async fn test_update_status() {
        let state = create_test_state().await;
        let alice = create_citizen(&state, "alice").await;
        let complaint = file_complaint(&state, alice.user_id).await;
        let headers = cookie_headers(&state, Identity { user_id: 1, role: Role::Admin });
        let app = crate::core::routes::build_router(state.clone());

        let response = app
            .oneshot(form_request(
                &format!("/update_status/{}", complaint.id),
                Some(&headers),
                &StatusForm { status: Some("In Progress".to_string()) },
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get("location").unwrap(), DASHBOARD);
        let updated = state.complaints.get(complaint.id).await.unwrap().unwrap();
        assert_eq!(updated.status, Status::InProgress);
        assert_eq!(updated.category, complaint.category);
        assert_eq!(updated.priority, complaint.priority);
    }

    #[tokio::test]
    async fn test_update_status_without_field_keeps_status() {
        let state = create_test_state().await;
        let alice = create_citizen(&state, "alice").await;
        let complaint = file_complaint(&state, alice.user_id).await;
        let headers = cookie_headers(&state, Identity { user_id: 1, role: Role::Admin });
        let app = crate::core::routes::build_router(state.clone());

        let response = app
            .oneshot(form_request(
                &format!("/update_status/{}", complaint.id),
                Some(&headers),
                &StatusForm { status: None },
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let unchanged = state.complaints.get(complaint.id).await.unwrap().unwrap();
        assert_eq!(unchanged.status, Status::Pending);
    }

    #[tokio::test]
    async fn test_update_status_rejects_unknown_value() {
        let state = create_test_state().await;
        let alice = create_citizen(&state, "alice").await;
        let complaint = file_complaint(&state, alice.user_id).await;
        let headers = cookie_headers(&state, Identity { user_id: 1, role: Role::Admin });
        let app = crate::core::routes::build_router(state.clone());

        let response = app
            .oneshot(form_request(
                &format!("/update_status/{}", complaint.id),
                Some(&headers),
                &StatusForm { status: Some("Closed".to_string()) },
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let unchanged = state.complaints.get(complaint.id).await.unwrap().unwrap();
        assert_eq!(unchanged.status, Status::Pending);
    }

    #[tokio::test]
    async fn test_update_missing_complaint_is_noop_redirect() {
        let state = create_test_state().await;
        let headers = cookie_headers(&state, Identity { user_id: 1, role: Role::Admin });
        let app = crate::core::routes::build_router(state);

        let response = app
            .oneshot(form_request(
                "/update_status/999",
                Some(&headers),
                &StatusForm { status: Some("Resolved".to_string()) },
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get("location").unwrap(), DASHBOARD);
    }

    #[tokio::test]
    async fn test_update_status_requires_admin() {
        let state = create_test_state().await;
        let alice = create_citizen(&state, "alice").await;
        let complaint = file_complaint(&state, alice.user_id).await;
        let headers = cookie_headers(&state, alice);
        let app = crate::core::routes::build_router(state.clone());

        let response = app
            .oneshot(form_request(
                &format!("/update_status/{}", complaint.id),
                Some(&headers),
                &StatusForm { status: Some("Resolved".to_string()) },
            ))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get("location").unwrap(), "/");
        let unchanged = state.complaints.get(complaint.id).await.unwrap().unwrap();
        assert_eq!(unchanged.status, Status::Pending);
    }

    #[tokio::test]
    async fn test_operator_delete_pending_is_noop() {
        let state = create_test_state().await;
        let alice = create_citizen(&state, "alice").await;
        let complaint = file_complaint(&state, alice.user_id).await;
        let headers = cookie_headers(&state, Identity { user_id: 1, role: Role::Admin });
        let app = crate::core::routes::build_router(state.clone());

        let response = app
            .oneshot(get_request(&format!("/operator_delete/{}", complaint.id), Some(&headers)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(state.complaints.get(complaint.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_operator_delete_resolved_removes_row() {
        let state = create_test_state().await;
        let alice = create_citizen(&state, "alice").await;
        let complaint = file_complaint(&state, alice.user_id).await;
        state.complaints.update_status(complaint.id, Status::Resolved).await.unwrap();
        let headers = cookie_headers(&state, Identity { user_id: 1, role: Role::Admin });
        let app = crate::core::routes::build_router(state.clone());

        let response = app
            .oneshot(get_request(&format!("/operator_delete/{}", complaint.id), Some(&headers)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert!(state.complaints.get(complaint.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_malformed_id_is_not_found() {
        let state = create_test_state().await;
        let headers = cookie_headers(&state, Identity { user_id: 1, role: Role::Admin });
        let app = crate::core::routes::build_router(state);

        for uri in ["/operator_delete/abc", "/operator_delete/-3"] {
            let response = app.clone().oneshot(get_request(uri, Some(&headers))).await.unwrap();
            assert_eq!(response.status(), StatusCode::NOT_FOUND, "{}", uri);
        }

        let response = app
            .oneshot(form_request(
                "/update_status/xyz",
                Some(&headers),
                &StatusForm { status: Some("Resolved".to_string()) },
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
