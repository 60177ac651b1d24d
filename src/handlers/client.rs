use crate::classifier::categorize;
use crate::core::error::{RequestError, ValidationError};
use crate::core::state::AppState;
use crate::models::complaint::NewComplaint;
use crate::models::views::ClientDashboardView;
use crate::security::gate::{Citizen, RequireRole};
use crate::triage::{assign_priority, is_spam};
use crate::validation::forms::ComplaintForm;
use crate::validation::path::ComplaintId;
use axum::{
    extract::State,
    response::{Json, Redirect},
    Form,
};
use std::sync::Arc;
use tracing::{info, warn};

async fn render_dashboard(state: &AppState, user_id: i64) -> Result<Json<ClientDashboardView>, RequestError> {
    let complaints = state.complaints.list_for_user(user_id).await?;
    Ok(Json(ClientDashboardView { user_id, complaints }))
}

/// The citizen's own complaints
///
/// GET /client_dashboard
pub async fn client_dashboard_handler(
    State(state): State<Arc<AppState>>,
    citizen: RequireRole<Citizen>,
) -> Result<Json<ClientDashboardView>, RequestError> {
    render_dashboard(&state, citizen.identity.user_id).await
}

/// File a complaint, then re-render the dashboard
///
/// POST /client_dashboard
pub async fn submit_complaint_handler(
    State(state): State<Arc<AppState>>,
    citizen: RequireRole<Citizen>,
    Form(form): Form<ComplaintForm>,
) -> Result<Json<ClientDashboardView>, RequestError> {
    let user_id = citizen.identity.user_id;
    let submission = form.validate()?;

    if is_spam(&submission.text) {
        warn!(user_id = user_id, "Rejected spam complaint");
        return Err(ValidationError::Spam.into());
    }

    let complaint = NewComplaint {
        category: categorize(state.classifier.as_ref(), &submission.text),
        priority: assign_priority(&submission.text),
        text: submission.text,
        location: submission.location,
        user_id,
    };

    let complaint = state.complaints.insert(&complaint).await?;

    info!(
        complaint_id = complaint.id,
        user_id = user_id,
        category = %complaint.category,
        priority = %complaint.priority,
        "Complaint filed"
    );

    render_dashboard(&state, user_id).await
}

/// Delete one of the citizen's own complaints, whatever its status
///
/// GET /delete_complaint/{id}
pub async fn delete_complaint_handler(
    State(state): State<Arc<AppState>>,
    citizen: RequireRole<Citizen>,
    ComplaintId(id): ComplaintId,
) -> Result<Redirect, RequestError> {
    let user_id = citizen.identity.user_id;

    if !state.complaints.delete_owned(id, user_id).await? {
        warn!(complaint_id = id, user_id = user_id, "Refused delete of complaint not owned by user");
        return Err(RequestError::Forbidden);
    }

    info!(complaint_id = id, user_id = user_id, "Complaint deleted by owner");

    Ok(Redirect::to("/client_dashboard"))
}
