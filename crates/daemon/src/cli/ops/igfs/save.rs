use clap::Args;
use serde_json::{Map, Value};

use common::model::RESERVED_KEYS;
use common::prelude::{ClusterId, IgfsId, IgfsPayload, SpaceId};
use igfs_daemon::http_server::api::client::ApiError;
use igfs_daemon::http_server::api::v0::igfs::SaveRequest;

#[derive(Args, Debug, Clone)]
pub struct Save {
    /// Id of the IGFS to replace (creates a new one if not set)
    #[arg(long)]
    pub id: Option<IgfsId>,

    /// IGFS name, unique within its space
    #[arg(long)]
    pub name: String,

    /// Space the IGFS belongs to
    #[arg(long)]
    pub space: SpaceId,

    /// Cluster to assign the IGFS to (repeatable)
    #[arg(long = "cluster")]
    pub clusters: Vec<ClusterId>,

    /// Remaining IGFS settings as a JSON object
    #[arg(long)]
    pub settings: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum IgfsSaveError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("settings must be a JSON object: {0}")]
    InvalidSettings(#[from] serde_json::Error),
    #[error("settings may not set {0:?}; use the matching flag instead")]
    ReservedSetting(String),
}

impl Save {
    fn payload(&self) -> Result<IgfsPayload, IgfsSaveError> {
        let mut payload = IgfsPayload::new(self.name.clone(), self.space)
            .with_clusters(self.clusters.iter().copied());
        payload.id = self.id;
        if let Some(settings) = &self.settings {
            let settings = serde_json::from_str::<Map<String, Value>>(settings)?;
            if let Some(key) = RESERVED_KEYS.iter().find(|key| settings.contains_key(**key)) {
                return Err(IgfsSaveError::ReservedSetting(key.to_string()));
            }
            payload.settings = settings;
        }
        Ok(payload)
    }
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Save {
    type Error = IgfsSaveError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response = client.call(SaveRequest(self.payload()?)).await?;
        Ok(format!("saved igfs {}", response.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn save_args(settings: Option<&str>) -> Save {
        Save {
            id: None,
            name: "fs".to_string(),
            space: SpaceId::new(),
            clusters: vec![ClusterId::new()],
            settings: settings.map(str::to_string),
        }
    }

    #[test]
    fn test_payload_carries_settings() {
        let args = save_args(Some(r#"{"blockSize": 65536}"#));
        let payload = args.payload().unwrap();
        assert_eq!(payload.name, "fs");
        assert_eq!(payload.clusters, args.clusters);
        assert_eq!(payload.settings["blockSize"], 65536);
    }

    #[test]
    fn test_payload_rejects_non_object_settings() {
        let err = save_args(Some("[1, 2]")).payload().unwrap_err();
        assert!(matches!(err, IgfsSaveError::InvalidSettings(_)));
    }

    #[test]
    fn test_payload_rejects_reserved_settings() {
        let err = save_args(Some(r#"{"name": "x", "blockSize": 1}"#))
            .payload()
            .unwrap_err();
        assert!(matches!(err, IgfsSaveError::ReservedSetting(key) if key == "name"));
    }
}
