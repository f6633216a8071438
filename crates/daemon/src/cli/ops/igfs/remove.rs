use clap::Args;

use common::prelude::IgfsId;
use igfs_daemon::http_server::api::client::ApiError;
use igfs_daemon::http_server::api::v0::igfs::RemoveRequest;

#[derive(Args, Debug, Clone)]
pub struct Remove {
    /// Id of the IGFS to delete
    #[arg(long)]
    pub id: IgfsId,
}

#[derive(Debug, thiserror::Error)]
pub enum IgfsRemoveError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Remove {
    type Error = IgfsRemoveError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let response = client.call(RemoveRequest { id: self.id }).await?;

        if response.removed {
            Ok(format!("removed igfs {}", self.id))
        } else {
            Ok(format!("no igfs with id {}", self.id))
        }
    }
}
