//! Which spaces a principal may act on

use std::collections::BTreeSet;

use crate::error::{AtStep, IgfsError, Step};
use crate::model::{PrincipalId, Space, SpaceId};
use crate::store::DocumentStore;

/// Spaces owned by `principal` or shared with it through `usedBy`
pub async fn accessible_spaces<S: DocumentStore>(
    store: &S,
    principal: PrincipalId,
) -> Result<Vec<Space>, IgfsError<S::Error>> {
    store
        .spaces_for_principal(principal)
        .await
        .at_step(Step::ResolveSpaces)
}

/// Ids of the spaces `principal` may access
pub async fn resolve_accessible_spaces<S: DocumentStore>(
    store: &S,
    principal: PrincipalId,
) -> Result<BTreeSet<SpaceId>, IgfsError<S::Error>> {
    let spaces = accessible_spaces(store, principal).await?;
    Ok(space_ids(&spaces))
}

pub(crate) fn space_ids(spaces: &[Space]) -> BTreeSet<SpaceId> {
    spaces.iter().map(|s| s.id).collect()
}
