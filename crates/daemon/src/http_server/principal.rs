//! Identity of the caller, as established by whatever authenticates
//!  requests in front of this service.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::response::{IntoResponse, Response};
use axum::Json;
use http::request::Parts;
use http::StatusCode;

use common::prelude::PrincipalId;

/// Header carrying the authenticated account id
pub const PRINCIPAL_HEADER: &str = "x-principal-id";

/// The authenticated account making the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentPrincipal(pub PrincipalId);

#[derive(Debug, thiserror::Error)]
pub enum PrincipalRejection {
    #[error("missing x-principal-id header")]
    Missing,
    #[error("invalid x-principal-id header")]
    Malformed,
}

impl IntoResponse for PrincipalRejection {
    fn into_response(self) -> Response {
        let msg = serde_json::json!({"msg": self.to_string()});
        (StatusCode::UNAUTHORIZED, Json(msg)).into_response()
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentPrincipal
where
    S: Send + Sync,
{
    type Rejection = PrincipalRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get(PRINCIPAL_HEADER)
            .ok_or(PrincipalRejection::Missing)?;
        let value = value
            .to_str()
            .map_err(|_| PrincipalRejection::Malformed)?;
        let principal = value
            .trim()
            .parse()
            .map_err(|_| PrincipalRejection::Malformed)?;
        Ok(CurrentPrincipal(principal))
    }
}
