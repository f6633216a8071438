use axum::Router;

pub mod igfs;

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .nest("/igfs", igfs::router(state.clone()))
        .with_state(state)
}
