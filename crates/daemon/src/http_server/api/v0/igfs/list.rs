use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{IgfsError, IgfsListing};

use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::http_server::principal::CurrentPrincipal;
use crate::ServiceState;

/// Request the caller's spaces, their clusters and their IGFS configurations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListRequest {}

pub type ListResponse = IgfsListing;

pub async fn handler(
    State(state): State<ServiceState>,
    CurrentPrincipal(principal): CurrentPrincipal,
) -> Result<impl IntoResponse, ListError> {
    let listing = state.manager().list(principal).await?;
    Ok((http::StatusCode::OK, Json(listing)).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum ListError {
    #[error(transparent)]
    Igfs(#[from] IgfsError<sqlx::Error>),
}

impl IntoResponse for ListError {
    fn into_response(self) -> Response {
        match self {
            ListError::Igfs(e) => super::igfs_error_response(&e),
        }
    }
}

impl ApiRequest for ListRequest {
    type Response = ListResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/igfs/list")?;
        Ok(client.post(full_url).json(&self))
    }
}
