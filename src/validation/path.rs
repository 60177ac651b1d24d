use crate::core::error::RequestError;
use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use tracing::debug;

/// Complaint id from the `{id}` path segment. Anything that is not a
/// non-negative integer is answered with 404, like an unmatched route.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ComplaintId(pub i64);

impl<S: Send + Sync> FromRequestParts<S> for ComplaintId {
    type Rejection = RequestError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| RequestError::NotFound)?;

        parse_id(&raw).map(ComplaintId).ok_or_else(|| {
            debug!(id = %raw, "Rejected malformed complaint id");
            RequestError::NotFound
        })
    }
}

fn parse_id(raw: &str) -> Option<i64> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse().ok()
}
