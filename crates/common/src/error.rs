use std::fmt;

use crate::model::IgfsId;
use crate::store::StoreError;

/// A single storage call within a multi-record operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    ResolveSpaces,
    CheckName,
    InsertIgfs,
    UpsertIgfs,
    LinkClusters,
    UnlinkClusters,
    RemoveIgfs,
    StripClusters,
    RemoveSpaceIgfss,
    ResetClusters,
    ListClusters,
    ListIgfss,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::ResolveSpaces => "resolve accessible spaces",
            Step::CheckName => "check igfs name",
            Step::InsertIgfs => "insert igfs",
            Step::UpsertIgfs => "upsert igfs",
            Step::LinkClusters => "link clusters",
            Step::UnlinkClusters => "unlink clusters",
            Step::RemoveIgfs => "remove igfs",
            Step::StripClusters => "strip igfs from clusters",
            Step::RemoveSpaceIgfss => "remove space igfss",
            Step::ResetClusters => "reset cluster igfss",
            Step::ListClusters => "list clusters",
            Step::ListIgfss => "list igfss",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Failure of an IGFS operation.
///
/// Steps already applied before a `Storage` failure stay applied. Every
///  step is idempotent, so the whole operation can be retried as is.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IgfsError<T> {
    /// `existing` is `None` only when the store rejected the name but the
    ///  record holding it could not be looked up afterwards
    #[error("IGFS with name: \"{name}\" already exist.")]
    NameConflict {
        name: String,
        existing: Option<IgfsId>,
    },
    #[error("storage failure during {step}: {source}")]
    Storage {
        step: Step,
        #[source]
        source: T,
    },
}

impl<T> IgfsError<T> {
    pub fn is_conflict(&self) -> bool {
        matches!(self, IgfsError::NameConflict { .. })
    }

    /// The step that failed, for storage failures
    pub fn step(&self) -> Option<Step> {
        match self {
            IgfsError::Storage { step, .. } => Some(*step),
            IgfsError::NameConflict { .. } => None,
        }
    }

    pub(crate) fn from_store(step: Step, err: StoreError<T>) -> Self {
        match err {
            StoreError::Provider(source) => IgfsError::Storage { step, source },
            StoreError::DuplicateName { name, .. } => IgfsError::NameConflict {
                name,
                existing: None,
            },
        }
    }
}

/// Tag a store result with the step that issued it
pub(crate) trait AtStep<V, T> {
    fn at_step(self, step: Step) -> Result<V, IgfsError<T>>;
}

impl<V, T> AtStep<V, T> for Result<V, StoreError<T>> {
    fn at_step(self, step: Step) -> Result<V, IgfsError<T>> {
        self.map_err(|e| IgfsError::from_store(step, e))
    }
}
