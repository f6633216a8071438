use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{IgfsError, IgfsId, IgfsPayload};

use crate::http_server::api::client::{ApiError, ApiRequest};
use crate::ServiceState;

/// Create (no `_id`) or replace (with `_id`) an IGFS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaveRequest(pub IgfsPayload);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveResponse {
    #[serde(rename = "_id")]
    pub id: IgfsId,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Json(SaveRequest(payload)): Json<SaveRequest>,
) -> Result<impl IntoResponse, SaveError> {
    let id = state.manager().save(payload).await?;
    Ok((http::StatusCode::OK, Json(SaveResponse { id })).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error(transparent)]
    Igfs(#[from] IgfsError<sqlx::Error>),
}

impl IntoResponse for SaveError {
    fn into_response(self) -> Response {
        match self {
            SaveError::Igfs(e) => super::igfs_error_response(&e),
        }
    }
}

impl ApiRequest for SaveRequest {
    type Response = SaveResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> Result<RequestBuilder, ApiError> {
        let full_url = base_url.join("/api/v0/igfs/save")?;
        Ok(client.post(full_url).json(&self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    use common::prelude::{DocumentStore, Space};

    use crate::http_server::api::v0::igfs::tests::*;

    async fn save(state: &ServiceState, payload: IgfsPayload) -> Response {
        handler(State(state.clone()), Json(SaveRequest(payload)))
            .await
            .into_response()
    }

    #[tokio::test]
    async fn test_create_links_clusters() {
        let env = setup_state().await;
        let c1 = &env.clusters[0];

        let response = save(
            &env.state,
            IgfsPayload::new("fs", env.space.id)
                .with_clusters([c1.id])
                .with_setting("blockSize", 65536),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let SaveResponse { id } = body_json(response).await;

        let db = env.state.database();
        let igfs = db.get_igfs(id).await.unwrap().unwrap();
        assert_eq!(igfs.clusters, vec![c1.id]);
        assert_eq!(igfs.settings["blockSize"], 65536);
        let cluster = db.get_cluster(c1.id).await.unwrap().unwrap();
        assert_eq!(cluster.igfss, vec![id]);
    }

    #[tokio::test]
    async fn test_duplicate_name_is_conflict() {
        let env = setup_state().await;
        let first = save(&env.state, IgfsPayload::new("A", env.space.id)).await;
        assert_eq!(first.status(), StatusCode::OK);

        let second = save(&env.state, IgfsPayload::new("A", env.space.id)).await;
        assert_eq!(second.status(), StatusCode::CONFLICT);
        assert_eq!(body_text(second).await, "IGFS with name: \"A\" already exist.");

        // Same name in another space is fine
        let other = Space::new("other", env.owner);
        env.state.database().insert_space(&other).await.unwrap();
        let third = save(&env.state, IgfsPayload::new("A", other.id)).await;
        assert_eq!(third.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_update_reassigns_clusters() {
        let env = setup_state().await;
        let (c1, c2) = (&env.clusters[0], &env.clusters[1]);

        let response = save(
            &env.state,
            IgfsPayload::new("fs", env.space.id).with_clusters([c1.id]),
        )
        .await;
        let SaveResponse { id } = body_json(response).await;

        let response = save(
            &env.state,
            IgfsPayload::new("fs", env.space.id)
                .with_id(id)
                .with_clusters([c2.id]),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let SaveResponse { id: updated } = body_json(response).await;
        assert_eq!(updated, id);

        let db = env.state.database();
        assert!(db.get_cluster(c1.id).await.unwrap().unwrap().igfss.is_empty());
        assert_eq!(db.get_cluster(c2.id).await.unwrap().unwrap().igfss, vec![id]);
    }

    #[test]
    fn test_request_accepts_document_json() {
        let space = common::prelude::SpaceId::new();
        let json = serde_json::json!({
            "name": "fs",
            "space": space,
            "clusters": [],
            "defaultMode": "PRIMARY",
        });
        let SaveRequest(payload) = serde_json::from_value(json).unwrap();
        assert!(payload.id.is_none());
        assert_eq!(payload.space, space);
        assert_eq!(payload.settings["defaultMode"], "PRIMARY");
    }
}
