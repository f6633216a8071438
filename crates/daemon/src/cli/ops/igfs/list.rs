use clap::Args;

use igfs_daemon::http_server::api::client::ApiError;
use igfs_daemon::http_server::api::v0::igfs::{ListRequest, ListResponse};

#[derive(Args, Debug, Clone)]
pub struct List;

#[derive(Debug, thiserror::Error)]
pub enum IgfsListError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("--principal is required to list IGFS configurations")]
    NoPrincipal,
}

fn render(listing: &ListResponse) -> String {
    let mut lines = vec!["Spaces:".to_string()];
    lines.extend(
        listing
            .spaces
            .iter()
            .map(|space| format!("  {} ({})", space.name, space.id)),
    );

    lines.push("Clusters:".to_string());
    lines.extend(
        listing
            .clusters
            .iter()
            .map(|cluster| format!("  {} ({})", cluster.label, cluster.value)),
    );

    lines.push("IGFS:".to_string());
    lines.extend(listing.igfss.iter().map(|igfs| {
        let clusters = igfs
            .clusters
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "  {} ({}) space={} clusters=[{}]",
            igfs.name, igfs.id, igfs.space, clusters
        )
    }));

    lines.join("\n")
}

#[async_trait::async_trait]
impl crate::cli::op::Op for List {
    type Error = IgfsListError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        if client.principal().is_none() {
            return Err(IgfsListError::NoPrincipal);
        }

        let listing = client.call(ListRequest::default()).await?;
        Ok(render(&listing))
    }
}
