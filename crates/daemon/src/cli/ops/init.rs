use clap::Args;

use igfs_daemon::state::{AppConfig, AppState, StateError};

#[derive(Args, Debug, Clone)]
pub struct Init {
    /// API server port
    #[arg(long, default_value_t = igfs_daemon::state::DEFAULT_API_PORT)]
    pub api_port: u16,

    /// Default daemon log level
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error("init failed: {0}")]
    StateFailed(#[from] StateError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Init {
    type Error = InitError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let config = AppConfig {
            api_port: self.api_port,
            log_level: self.log_level.clone(),
        };

        let state = AppState::init(ctx.config_path.clone(), Some(config))?;

        let output = format!(
            "Initialized igfs directory at: {}\n\
             - Database: {}\n\
             - Config: {}\n\
             - API port: {}\n\
             - Log level: {}",
            state.igfs_dir.display(),
            state.db_path.display(),
            state.config_path.display(),
            state.config.api_port,
            state.config.log_level,
        );

        Ok(output)
    }
}
