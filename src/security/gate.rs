use crate::core::error::RequestError;
use crate::core::state::AppState;
use crate::models::user::Role;
use crate::security::session::Identity;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::debug;

/// Let a request through when it has a session and, if a role is required, the session
/// holds exactly that role. Every failure looks the same to the client.
pub fn authorize(identity: Option<Identity>, required: Option<Role>) -> Result<Identity, RequestError> {
    let Some(identity) = identity else {
        debug!("Rejected request without session");
        return Err(RequestError::Unauthorized);
    };

    match required {
        Some(role) if !identity.role.satisfies(role) => {
            debug!(
                user_id = identity.user_id,
                role = %identity.role,
                required = %role,
                "Rejected request with wrong role"
            );
            Err(RequestError::Unauthorized)
        }
        _ => Ok(identity),
    }
}

/// Type-level role for [`RequireRole`]
pub trait RequiredRole: Send + Sync {
    const ROLE: Role;
}

pub struct Citizen;

impl RequiredRole for Citizen {
    const ROLE: Role = Role::Citizen;
}

pub struct Admin;

impl RequiredRole for Admin {
    const ROLE: Role = Role::Admin;
}

/// Extractor that gates a handler on `R`; rejected requests are redirected to login
pub struct RequireRole<R: RequiredRole> {
    pub identity: Identity,
    _role: PhantomData<R>,
}

impl<R: RequiredRole> FromRequestParts<Arc<AppState>> for RequireRole<R> {
    type Rejection = RequestError;

    async fn from_request_parts(parts: &mut Parts, state: &Arc<AppState>) -> Result<Self, Self::Rejection> {
        let identity = authorize(state.sessions.identity(&parts.headers), Some(R::ROLE))?;

        Ok(Self {
            identity,
            _role: PhantomData,
        })
    }
}
