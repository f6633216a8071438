use reqwest::{header::HeaderMap, header::HeaderValue, Client};
use url::Url;

use common::prelude::PrincipalId;

use super::error::ApiError;
use super::ApiRequest;
use crate::http_server::principal::PRINCIPAL_HEADER;

#[derive(Debug, Clone)]
pub struct ApiClient {
    pub remote: Url,
    client: Client,
    principal: Option<PrincipalId>,
}

impl ApiClient {
    pub fn new(remote: &Url) -> Result<Self, ApiError> {
        let mut default_headers = HeaderMap::new();
        default_headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder().default_headers(default_headers).build()?;

        Ok(Self {
            remote: remote.clone(),
            client,
            principal: None,
        })
    }

    /// Act as `principal` on every request
    pub fn with_principal(mut self, principal: Option<PrincipalId>) -> Self {
        self.principal = principal;
        self
    }

    pub fn principal(&self) -> Option<PrincipalId> {
        self.principal
    }

    pub async fn call<T: ApiRequest>(&mut self, request: T) -> Result<T::Response, ApiError> {
        let mut request_builder = request.build_request(&self.remote, &self.client)?;
        if let Some(principal) = self.principal {
            request_builder = request_builder.header(PRINCIPAL_HEADER, principal.to_string());
        }
        let response = request_builder.send().await?;

        if response.status().is_success() {
            Ok(response.json::<T::Response>().await?)
        } else {
            Err(ApiError::HttpStatus(
                response.status(),
                response.text().await?,
            ))
        }
    }

    /// Get the base URL for API requests
    pub fn base_url(&self) -> &Url {
        &self.remote
    }

    /// Get the underlying HTTP client for custom requests
    pub fn http_client(&self) -> &Client {
        &self.client
    }
}
