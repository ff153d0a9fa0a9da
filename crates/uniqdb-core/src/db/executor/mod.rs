mod delete;
mod guard;
mod load;
mod upsert;

pub(super) use delete::DeleteExecutor;
pub(super) use load::LoadExecutor;
pub(super) use upsert::UpsertExecutor;

// Design notes:
// - Secondary identity is resolved through the store's query path, never an
//   in-process index; the store is the single source of truth.
// - Resolution and the write it guards run inside one `atomically` call.
// - The batch guard is purely intra-batch and runs before any store call.

use crate::error::{ErrorClass, ErrorOrigin, InternalError};
use thiserror::Error as ThisError;

///
/// UpsertError
///

#[derive(Debug, ThisError)]
pub enum UpsertError {
    #[error("secondary identity lookup on {entity} matched {rows} rows")]
    AmbiguousLookup { entity: &'static str, rows: usize },

    #[error("stored key {stored} on {entity} does not match requested key {requested}")]
    IdentityConflict {
        entity: &'static str,
        stored: String,
        requested: String,
    },

    #[error("records in one batch share identity {identity} on {entity}")]
    DuplicateBatchIdentity {
        entity: &'static str,
        identity: String,
    },

    #[error("records in one batch share primary key {key} on {entity}")]
    DuplicatePrimaryKey { entity: &'static str, key: String },
}

impl UpsertError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::IdentityConflict { .. } => ErrorClass::IdentityConflict,
            Self::AmbiguousLookup { .. }
            | Self::DuplicateBatchIdentity { .. }
            | Self::DuplicatePrimaryKey { .. } => ErrorClass::DuplicateIdentity,
        }
    }

    pub(crate) const fn origin(&self) -> ErrorOrigin {
        match self {
            Self::AmbiguousLookup { .. } | Self::IdentityConflict { .. } => ErrorOrigin::Executor,
            Self::DuplicateBatchIdentity { .. } | Self::DuplicatePrimaryKey { .. } => {
                ErrorOrigin::Guard
            }
        }
    }
}

impl From<UpsertError> for InternalError {
    fn from(err: UpsertError) -> Self {
        Self::new(err.class(), err.origin(), err.to_string())
    }
}
