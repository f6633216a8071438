// Service modules (daemon functionality)
pub mod database;
pub mod http_server;
pub mod process;
pub mod service_config;
pub mod service_state;

// App state (configuration, paths)
pub mod state;

pub use database::{Database, DatabaseSetupError};
pub use process::{spawn_service, start_service, ServiceError, ShutdownHandle};
pub use service_config::Config as ServiceConfig;
pub use service_state::State as ServiceState;
pub use state::{AppConfig, AppState, StateError};
