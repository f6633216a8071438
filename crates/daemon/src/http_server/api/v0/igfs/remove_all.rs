use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::IgfsError;

use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::http_server::principal::CurrentPrincipal;
use crate::ServiceState;

/// Delete every IGFS configuration in the caller's spaces and empty the
///  membership of their clusters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoveAllRequest {}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveAllResponse {
    /// Number of IGFS configurations deleted
    pub removed: u64,
}

pub async fn handler(
    State(state): State<ServiceState>,
    CurrentPrincipal(principal): CurrentPrincipal,
) -> Result<impl IntoResponse, RemoveAllError> {
    let removed = state.manager().remove_all(principal).await?;
    Ok((http::StatusCode::OK, Json(RemoveAllResponse { removed })).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum RemoveAllError {
    #[error(transparent)]
    Igfs(#[from] IgfsError<sqlx::Error>),
}

impl IntoResponse for RemoveAllError {
    fn into_response(self) -> Response {
        match self {
            RemoveAllError::Igfs(e) => super::igfs_error_response(&e),
        }
    }
}

impl ApiRequest for RemoveAllRequest {
    type Response = RemoveAllResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/igfs/remove/all")?;
        Ok(client.post(full_url).json(&self))
    }
}
