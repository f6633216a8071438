use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::time::Duration;
use tokio::time::timeout;

use super::data_source::*;

const HEALTH_CHECK_TIMEOUT: Duration = Duration::from_secs(10);

/// Readiness body: overall status plus the outcome of the database check
#[derive(Debug, Serialize)]
struct ReadinessReport {
    status: &'static str,
    database: String,
}

impl ReadinessReport {
    fn ready() -> Self {
        Self {
            status: "ok",
            database: "ok".to_string(),
        }
    }

    fn unavailable(database: String) -> Self {
        Self {
            status: "unavailable",
            database,
        }
    }
}

impl IntoResponse for ReadinessReport {
    fn into_response(self) -> Response {
        let code = if self.status == "ok" {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        };
        (code, Json(self)).into_response()
    }
}

#[tracing::instrument]
pub async fn handler(data_src: StateDataSource) -> Response {
    let report = match timeout(HEALTH_CHECK_TIMEOUT, data_src.is_ready()).await {
        Ok(Ok(())) => ReadinessReport::ready(),
        Ok(Err(e)) => ReadinessReport::unavailable(e.to_string()),
        Err(_) => ReadinessReport::unavailable(format!(
            "no answer within {}s",
            HEALTH_CHECK_TIMEOUT.as_secs()
        )),
    };
    report.into_response()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::to_bytes;

    use super::*;

    use crate::database::Database;
    use crate::http_server::health::data_source::tests::*;

    async fn body(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_report_names_the_database_check() {
        let response = handler(StateDataSource::new(Arc::new(MockReadiness::Ready))).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            body(response).await,
            serde_json::json!({"status": "ok", "database": "ok"})
        );

        let response = handler(StateDataSource::new(Arc::new(MockReadiness::DatabaseDown))).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            body(response).await,
            serde_json::json!({
                "status": "unavailable",
                "database": "database unavailable: connection refused",
            })
        );
    }

    #[tokio::test]
    async fn test_handler_tracks_database() {
        let db = Database::connect(&url::Url::parse("sqlite::memory:").unwrap())
            .await
            .unwrap();

        let response = handler(StateDataSource::new(Arc::new(DbSource::new(db.clone())))).await;
        assert_eq!(response.status(), StatusCode::OK);

        db.close().await;
        let response = handler(StateDataSource::new(Arc::new(DbSource::new(db)))).await;
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        let report = body(response).await;
        assert_eq!(report["status"], "unavailable");
        assert!(report["database"]
            .as_str()
            .unwrap()
            .starts_with("database unavailable"));
    }
}
