//! IGFS configuration endpoints
//!
//! Every route is a POST. `list` and `remove/all` act on behalf of the
//!  principal named in the `x-principal-id` header.

use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::Router;
use http::StatusCode;

use common::prelude::IgfsError;

use crate::ServiceState;

pub mod list;
pub mod remove;
pub mod remove_all;
pub mod save;

pub use list::{ListRequest, ListResponse};
pub use remove::{RemoveRequest, RemoveResponse};
pub use remove_all::{RemoveAllRequest, RemoveAllResponse};
pub use save::{SaveRequest, SaveResponse};

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/list", post(list::handler))
        .route("/save", post(save::handler))
        .route("/remove", post(remove::handler))
        .route("/remove/all", post(remove_all::handler))
        .with_state(state)
}

/// Name conflicts are the caller's problem, anything else is ours
fn igfs_error_response(err: &IgfsError<sqlx::Error>) -> Response {
    let status = if err.is_conflict() {
        StatusCode::CONFLICT
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, err.to_string()).into_response()
}

#[cfg(test)]
pub(crate) mod tests {
    use axum::body::to_bytes;
    use axum::response::Response;
    use serde::de::DeserializeOwned;

    use common::prelude::{Cluster, PrincipalId, Space};

    use crate::database::Database;
    use crate::ServiceState;

    pub(crate) struct TestState {
        pub state: ServiceState,
        pub owner: PrincipalId,
        pub space: Space,
        pub clusters: Vec<Cluster>,
    }

    /// One space owned by a fresh principal, with clusters c1 and c2
    pub(crate) async fn setup_state() -> TestState {
        let db = Database::connect(&url::Url::parse("sqlite::memory:").unwrap())
            .await
            .unwrap();

        let owner = PrincipalId::new();
        let space = Space::new("space", owner);
        db.insert_space(&space).await.unwrap();

        let clusters = vec![Cluster::new("c1", space.id), Cluster::new("c2", space.id)];
        for cluster in &clusters {
            db.insert_cluster(cluster).await.unwrap();
        }

        TestState {
            state: ServiceState::from_database(db),
            owner,
            space,
            clusters,
        }
    }

    pub(crate) async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    pub(crate) async fn body_json<T: DeserializeOwned>(response: Response) -> T {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }
}
