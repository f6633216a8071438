pub use clap::Parser;

use std::path::PathBuf;
use url::Url;

use common::prelude::PrincipalId;

#[derive(Parser, Debug)]
#[command(name = "igfs")]
#[command(about = "Manage IGFS configurations and their cluster assignments")]
pub struct Args {
    /// Daemon API URL (defaults to the configured api_port on localhost)
    #[arg(long, global = true)]
    pub remote: Option<Url>,

    /// Path to the igfs config directory (defaults to ~/.igfs)
    #[arg(long, global = true)]
    pub config_path: Option<PathBuf>,

    /// Account to act as, sent in the x-principal-id header
    #[arg(long, global = true)]
    pub principal: Option<PrincipalId>,

    #[command(subcommand)]
    pub command: crate::Command,
}
