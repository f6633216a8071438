use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{IgfsError, IgfsId};

use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::ServiceState;

/// Delete one IGFS configuration and every cluster reference to it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveRequest {
    #[serde(rename = "_id")]
    pub id: IgfsId,
}

/// `removed` is false when no IGFS had the id; that is not an error
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemoveResponse {
    pub removed: bool,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(req): Json<RemoveRequest>,
) -> Result<impl IntoResponse, RemoveError> {
    let removed = state.manager().remove(req.id).await?;
    Ok((http::StatusCode::OK, Json(RemoveResponse { removed })).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum RemoveError {
    #[error(transparent)]
    Igfs(#[from] IgfsError<sqlx::Error>),
}

impl IntoResponse for RemoveError {
    fn into_response(self) -> Response {
        match self {
            RemoveError::Igfs(e) => super::igfs_error_response(&e),
        }
    }
}

impl ApiRequest for RemoveRequest {
    type Response = RemoveResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/igfs/remove")?;
        Ok(client.post(full_url).json(&self))
    }
}
