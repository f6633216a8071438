//! Documents handled by the IGFS control service
//!
//! - **[`Space`]**: tenant container, read-only to this crate
//! - **[`Cluster`]**: named entity holding the forward `igfss` references
//! - **[`Igfs`]**: filesystem configuration holding the back `clusters` references
//!
//! For any IGFS `f` and cluster `c`, `f.clusters` contains `c.id` exactly
//!  when `c.igfss` contains `f.id`.

mod cluster;
mod ids;
mod igfs;
mod space;

pub use cluster::{Cluster, ClusterOption, ClusterRef};
pub use ids::{ClusterId, IgfsId, PrincipalId, SpaceId};
pub use igfs::{Igfs, IgfsPayload, RESERVED_KEYS};
pub use space::{Space, SpaceUser};
