//! Per-space IGFS name uniqueness
//!
//! The lookup here and the insert that follows it are separate store
//!  calls, so two concurrent creates can both pass the check. Stores are
//!  expected to close that gap with their own constraint, reported as
//!  `StoreError::DuplicateName` and surfaced as the same conflict once
//!  the holder of the name has been looked up.

use crate::error::{AtStep, IgfsError, Step};
use crate::model::SpaceId;
use crate::store::{DocumentStore, StoreError};

/// Fail with `IgfsError::NameConflict` if `space` already holds an IGFS
///  called `name`
pub async fn ensure_name_available<S: DocumentStore>(
    store: &S,
    space: SpaceId,
    name: &str,
) -> Result<(), IgfsError<S::Error>> {
    match store
        .find_igfs_by_name(space, name)
        .await
        .at_step(Step::CheckName)?
    {
        Some(existing) => {
            tracing::warn!(
                space = %space,
                name = %existing.name,
                existing = %existing.id,
                "IGFS name already in use"
            );
            Err(IgfsError::NameConflict {
                name: existing.name,
                existing: Some(existing.id),
            })
        }
        None => Ok(()),
    }
}

/// Turn a write rejected by the store's own name constraint into a
///  conflict naming the IGFS that holds the name. Any other store error
///  is reported against `step`.
pub async fn identify_conflict<S: DocumentStore>(
    store: &S,
    step: Step,
    err: StoreError<S::Error>,
) -> IgfsError<S::Error> {
    let StoreError::DuplicateName { space, name } = err else {
        return IgfsError::from_store(step, err);
    };

    let existing = match store.find_igfs_by_name(space, &name).await {
        Ok(found) => found.map(|igfs| igfs.id),
        Err(e) => {
            tracing::warn!(
                error = %e,
                space = %space,
                name = %name,
                "failed to look up conflicting igfs"
            );
            None
        }
    };
    tracing::warn!(
        space = %space,
        name = %name,
        existing = ?existing,
        "store rejected duplicate igfs name"
    );

    IgfsError::NameConflict { name, existing }
}
