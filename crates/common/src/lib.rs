/**
 * Space, cluster and IGFS documents and their
 *  identifiers.
 */
pub mod model;
/**
 * Document store interface consumed by the core,
 *  plus an in-memory implementation.
 */
pub mod store;

pub mod cascade;
pub mod error;
pub mod listing;
pub mod ownership;
pub mod sync;
pub mod uniqueness;

mod manager;
/**
 * Helper for setting build version information
 *  at compile time.
 */
pub mod version;

pub use manager::Manager;

pub mod prelude {
    pub use crate::error::{IgfsError, Step};
    pub use crate::listing::IgfsListing;
    pub use crate::manager::Manager;
    pub use crate::model::{
        Cluster, ClusterId, ClusterOption, ClusterRef, Igfs, IgfsId, IgfsPayload, PrincipalId,
        Space, SpaceId, SpaceUser,
    };
    pub use crate::store::{DocumentStore, StoreError};
    pub use crate::version::build_info;
}
