use clap::Args;

use igfs_daemon::http_server::api::client::ApiError;
use igfs_daemon::http_server::api::v0::igfs::RemoveAllRequest;

#[derive(Args, Debug, Clone)]
pub struct RemoveAll;

#[derive(Debug, thiserror::Error)]
pub enum IgfsRemoveAllError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("--principal is required to remove IGFS configurations")]
    NoPrincipal,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for RemoveAll {
    type Error = IgfsRemoveAllError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        if client.principal().is_none() {
            return Err(IgfsRemoveAllError::NoPrincipal);
        }

        let response = client.call(RemoveAllRequest::default()).await?;
        Ok(format!("removed {} igfs configurations", response.removed))
    }
}
