use axum::extract::FromRef;
use url::Url;

use common::Manager;

use crate::database::{Database, DatabaseSetupError};
use crate::ServiceConfig;

/// Shared state handed to every request handler
#[derive(Clone, Debug)]
pub struct State {
    database: Database,
    manager: Manager<Database>,
}

impl State {
    pub async fn from_config(config: &ServiceConfig) -> Result<Self, StateSetupError> {
        let sqlite_database_url = match config.sqlite_path {
            Some(ref path) => {
                // check that the path exists
                if !path.exists() {
                    return Err(StateSetupError::DatabasePathDoesNotExist);
                }
                // parse the path into a URL
                Url::parse(&format!("sqlite://{}", path.display()))
                    .map_err(|_| StateSetupError::InvalidDatabaseUrl)
            }
            // otherwise just set up an in-memory database
            None => Url::parse("sqlite::memory:").map_err(|_| StateSetupError::InvalidDatabaseUrl),
        }?;
        tracing::info!("Database URL: {:?}", sqlite_database_url);
        let database = Database::connect(&sqlite_database_url).await?;

        Ok(Self::from_database(database))
    }

    pub fn from_database(database: Database) -> Self {
        let manager = Manager::new(database.clone());
        Self { database, manager }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    pub fn manager(&self) -> &Manager<Database> {
        &self.manager
    }
}

impl FromRef<State> for Database {
    fn from_ref(state: &State) -> Self {
        state.database.clone()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StateSetupError {
    #[error("Database path does not exist")]
    DatabasePathDoesNotExist,
    #[error("Database setup error: {0}")]
    DatabaseSetupError(#[from] DatabaseSetupError),
    #[error("Invalid database URL")]
    InvalidDatabaseUrl,
}
