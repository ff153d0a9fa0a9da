use crate::{
    db::{
        query::{Sort, SqlQuery},
        store::EntityStore,
    },
    error::InternalError,
    obs::sink::{ExecKind, Span},
    traits::EntityKind,
};
use std::{collections::BTreeSet, marker::PhantomData};
use tracing::debug;

///
/// DeleteExecutor
///

pub(crate) struct DeleteExecutor<'a, E: EntityKind, S: EntityStore<E>> {
    store: &'a S,
    debug: bool,
    _marker: PhantomData<E>,
}

impl<'a, E: EntityKind, S: EntityStore<E>> DeleteExecutor<'a, E, S> {
    #[must_use]
    pub(crate) const fn new(store: &'a S, debug: bool) -> Self {
        Self {
            store,
            debug,
            _marker: PhantomData,
        }
    }

    /// Delete one row by primary key; returns whether it existed.
    pub(crate) fn delete_by_id(&self, key: &E::Key) -> Result<bool, InternalError> {
        let mut span = Span::<E>::new(ExecKind::Delete);
        if self.debug {
            debug!(entity = E::PATH, ?key, "delete by id");
        }

        let removed = self.store.remove(key)?;
        span.set_rows(u64::from(removed));

        Ok(removed)
    }

    /// Delete every record by its required primary key, in one store call.
    ///
    /// Keys are deduplicated; a record without a key fails before any removal.
    pub(crate) fn delete_all<'e>(
        &self,
        entities: impl IntoIterator<Item = &'e E>,
    ) -> Result<usize, InternalError> {
        let keys = entities
            .into_iter()
            .map(|entity| entity.required_primary_key())
            .collect::<Result<BTreeSet<_>, _>>()?;
        if keys.is_empty() {
            return Ok(0);
        }

        let mut span = Span::<E>::new(ExecKind::Delete);
        let keys: Vec<E::Key> = keys.into_iter().collect();
        if self.debug {
            debug!(entity = E::PATH, keys = keys.len(), "delete all");
        }

        self.store.remove_all(&keys)?;
        span.set_rows(keys.len() as u64);

        Ok(keys.len())
    }

    /// Delete every stored row; returns how many were removed.
    ///
    /// The keys come from an unfiltered listing, and the listing and removal
    /// share one `atomically` call.
    pub(crate) fn clear(&self) -> Result<usize, InternalError> {
        let mut span = Span::<E>::new(ExecKind::Delete);
        let listing = SqlQuery::sorted(E::MODEL, &Sort::unsorted());

        let removed = self.store.atomically(|| {
            let keys: Vec<E::Key> = self
                .store
                .query(&listing)?
                .into_iter()
                .map(|(key, _)| key)
                .collect();
            if keys.is_empty() {
                return Ok(0);
            }
            if self.debug {
                debug!(entity = E::PATH, keys = keys.len(), "clear");
            }

            self.store.remove_all(&keys)?;

            Ok(keys.len())
        })?;
        span.set_rows(removed as u64);

        Ok(removed)
    }
}
