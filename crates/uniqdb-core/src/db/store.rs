//! Module: store
//! Responsibility: the storage collaborator boundary.
//! Does not own: storage, indexing, or durability; implementors do.

use crate::{
    db::query::SqlQuery,
    error::{ErrorClass, ErrorOrigin, InternalError},
    traits::EntityKind,
};
use std::collections::BTreeMap;
use thiserror::Error as ThisError;

///
/// StoreError
///

#[derive(Debug, ThisError)]
pub enum StoreError {
    #[error("store failure: {0}")]
    Backend(String),

    #[error("store cannot assign keys for {entity}")]
    KeyAssignmentUnsupported { entity: &'static str },
}

impl StoreError {
    /// Wrap a backend failure message.
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend(message.into())
    }

    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::Backend(_) => ErrorClass::Store,
            Self::KeyAssignmentUnsupported { .. } => ErrorClass::InvalidArgument,
        }
    }
}

impl From<StoreError> for InternalError {
    fn from(err: StoreError) -> Self {
        Self::new(err.class(), ErrorOrigin::Store, err.to_string())
    }
}

///
/// EntityStore
///
/// Key/value table for one entity type that can also execute rendered
/// predicates. Handles are shared, so every method takes `&self`.
///

pub trait EntityStore<E: EntityKind> {
    fn get(&self, key: &E::Key) -> Result<Option<E>, StoreError>;

    fn put(&self, key: &E::Key, entity: &E) -> Result<(), StoreError>;

    fn put_all(&self, entries: &BTreeMap<E::Key, E>) -> Result<(), StoreError>;

    /// Remove one row; returns whether a row was present.
    fn remove(&self, key: &E::Key) -> Result<bool, StoreError>;

    fn remove_all(&self, keys: &[E::Key]) -> Result<(), StoreError>;

    /// Execute a rendered select predicate and return matching rows.
    fn query(&self, query: &SqlQuery) -> Result<Vec<(E::Key, E)>, StoreError>;

    /// Execute a derived COUNT predicate; one element per result row.
    fn query_count(&self, query: &SqlQuery) -> Result<Vec<u64>, StoreError>;

    /// Total number of stored rows.
    fn size(&self) -> Result<u64, StoreError>;

    /// Insert a record without a primary key, letting the store assign one.
    ///
    /// Returns the stored record carrying its new key.
    fn insert_assigned(&self, entity: E) -> Result<E, StoreError> {
        let _ = entity;

        Err(StoreError::KeyAssignmentUnsupported { entity: E::PATH })
    }

    /// Run `f` inside the store's write boundary.
    fn atomically<T>(
        &self,
        f: impl FnOnce() -> Result<T, InternalError>,
    ) -> Result<T, InternalError> {
        f()
    }
}
