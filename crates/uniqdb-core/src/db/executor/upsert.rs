use crate::{
    config::UniqueLookup,
    db::{
        executor::{UpsertError, guard},
        identity::KeyRegistry,
        store::EntityStore,
    },
    error::InternalError,
    obs::sink::{self, ExecKind, MetricsEvent, Span},
    traits::EntityKind,
};
use std::{collections::BTreeMap, marker::PhantomData};
use tracing::{debug, warn};

///
/// UpsertExecutor
///
/// Resolves a record's target primary key through its secondary identity,
/// then writes it.
///

pub(crate) struct UpsertExecutor<'a, E: EntityKind, S: EntityStore<E>> {
    store: &'a S,
    registry: &'a KeyRegistry,
    lookup: UniqueLookup,
    debug: bool,
    _marker: PhantomData<E>,
}

impl<'a, E: EntityKind, S: EntityStore<E>> UpsertExecutor<'a, E, S> {
    #[must_use]
    pub(crate) const fn new(
        store: &'a S,
        registry: &'a KeyRegistry,
        lookup: UniqueLookup,
        debug: bool,
    ) -> Self {
        Self {
            store,
            registry,
            lookup,
            debug,
            _marker: PhantomData,
        }
    }

    // ======================================================================
    // Lookups
    // ======================================================================

    /// The stored row sharing `entity`'s secondary identity, if any.
    ///
    /// More than one matching row is a data-integrity failure.
    pub(crate) fn find_by_secondary_identity(
        &self,
        entity: &E,
    ) -> Result<Option<(E::Key, E)>, InternalError> {
        let classification = self.registry.classification::<E>()?;
        let identity = classification.lookup_identity(entity, self.lookup);
        if identity.is_empty() {
            return Ok(None);
        }

        let query = identity.into_condition::<E>()?.into_sql_query();
        if self.debug {
            debug!(entity = E::PATH, %query, "secondary identity lookup");
        }

        let mut rows = self.store.query(&query)?;
        sink::record(MetricsEvent::IdentityLookup {
            entity_path: E::PATH,
            matched: !rows.is_empty(),
        });

        if rows.len() > 1 {
            sink::record(MetricsEvent::DuplicateIdentity {
                entity_path: E::PATH,
            });
            warn!(entity = E::PATH, rows = rows.len(), "secondary identity is not unique in store");

            return Err(UpsertError::AmbiguousLookup {
                entity: E::PATH,
                rows: rows.len(),
            }
            .into());
        }

        Ok(rows.pop())
    }

    /// By primary key when present and stored, otherwise by secondary identity.
    pub(crate) fn find_by_unique_identifiers(
        &self,
        entity: &E,
    ) -> Result<Option<(E::Key, E)>, InternalError> {
        if let Some(key) = entity.primary_key()
            && let Some(found) = self.store.get(&key)?
        {
            return Ok(Some((key, found)));
        }

        self.find_by_secondary_identity(entity)
    }

    // ======================================================================
    // Writes
    // ======================================================================

    /// Resolve the target key for `entity` and write it.
    ///
    /// A match adopts the stored key when `intended` is absent; a different
    /// `intended` key is an identity conflict and nothing is written. With no
    /// match and no key, the store assigns one.
    pub(crate) fn resolve_and_save(
        &self,
        intended: Option<E::Key>,
        entity: E,
    ) -> Result<E, InternalError> {
        let mut span = Span::<E>::new(ExecKind::Save);

        let saved = self.store.atomically(move || {
            let mut entity = entity;

            match self.resolve_key(intended, &mut entity)? {
                Some(key) => {
                    self.store.put(&key, &entity)?;
                    Ok(entity)
                }
                None => Ok(self.store.insert_assigned(entity)?),
            }
        })?;
        span.set_rows(1);

        Ok(saved)
    }

    /// Guard the batch, resolve each record against its map key, then write
    /// every record in one `put_all`.
    pub(crate) fn resolve_and_save_all(
        &self,
        entries: BTreeMap<E::Key, E>,
    ) -> Result<Vec<E>, InternalError> {
        let classification = self.registry.classification::<E>()?;
        guard::assert_no_internal_collisions::<E>(&classification, entries.values())?;

        if entries.is_empty() {
            return Ok(Vec::new());
        }

        let mut span = Span::<E>::new(ExecKind::Save);
        let saved = self.store.atomically(move || {
            for (key, entity) in &entries {
                if let Some((found, _)) = self.find_by_secondary_identity(entity)? {
                    self.check_found(key, &found)?;
                }
            }
            self.store.put_all(&entries)?;

            Ok(entries)
        })?;
        span.set_rows(saved.len() as u64);

        Ok(saved.into_values().collect())
    }

    /// Batch save keyed by each record's own primary key.
    pub(crate) fn save_all(
        &self,
        entities: impl IntoIterator<Item = E>,
    ) -> Result<Vec<E>, InternalError> {
        let mut entries = BTreeMap::new();

        for entity in entities {
            let key = entity.required_primary_key()?;
            if entries.contains_key(&key) {
                sink::record(MetricsEvent::DuplicateIdentity {
                    entity_path: E::PATH,
                });

                return Err(UpsertError::DuplicatePrimaryKey {
                    entity: E::PATH,
                    key: format!("{key:?}"),
                }
                .into());
            }
            entries.insert(key, entity);
        }

        self.resolve_and_save_all(entries)
    }

    // ======================================================================
    // Resolution
    // ======================================================================

    // Target key for a single write; None asks the store to assign one.
    fn resolve_key(
        &self,
        intended: Option<E::Key>,
        entity: &mut E,
    ) -> Result<Option<E::Key>, InternalError> {
        let Some((found, _)) = self.find_by_secondary_identity(entity)? else {
            return Ok(intended);
        };

        match intended {
            None => {
                entity.set_primary_key(found.clone());
                sink::record(MetricsEvent::IdentityAdopted {
                    entity_path: E::PATH,
                });
                if self.debug {
                    debug!(entity = E::PATH, key = ?found, "adopted stored key");
                }

                Ok(Some(found))
            }
            Some(key) => {
                self.check_found(&key, &found)?;

                Ok(Some(key))
            }
        }
    }

    fn check_found(&self, intended: &E::Key, found: &E::Key) -> Result<(), InternalError> {
        if intended == found {
            return Ok(());
        }

        sink::record(MetricsEvent::IdentityConflict {
            entity_path: E::PATH,
        });
        warn!(
            entity = E::PATH,
            stored = ?found,
            requested = ?intended,
            "secondary identity belongs to another key"
        );

        Err(UpsertError::IdentityConflict {
            entity: E::PATH,
            stored: format!("{found:?}"),
            requested: format!("{intended:?}"),
        }
        .into())
    }
}
