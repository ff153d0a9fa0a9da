use crate::{
    config::RepositoryConfig,
    db::{
        executor::{DeleteExecutor, LoadExecutor, UpsertExecutor},
        identity::KeyRegistry,
        query::{ConditionModel, Page, Pageable, Sort},
        store::EntityStore,
    },
    error::InternalError,
    obs::sink::{MetricsSink, with_metrics_sink},
    traits::EntityKind,
};
use std::{collections::BTreeMap, marker::PhantomData, rc::Rc};

///
/// Repository
///
/// Session-scoped handle binding one entity type to its store, the shared
/// key registry, and repository policy (debug, paging limits, lookup policy).
///

pub struct Repository<'a, E: EntityKind, S: EntityStore<E>> {
    store: &'a S,
    registry: &'a KeyRegistry,
    config: RepositoryConfig,
    metrics: Option<Rc<dyn MetricsSink>>,
    _marker: PhantomData<E>,
}

impl<'a, E: EntityKind, S: EntityStore<E>> Repository<'a, E, S> {
    #[must_use]
    pub fn new(store: &'a S, registry: &'a KeyRegistry) -> Self {
        Self {
            store,
            registry,
            config: RepositoryConfig::default(),
            metrics: None,
            _marker: PhantomData,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: RepositoryConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn debug(mut self) -> Self {
        self.config.debug = true;
        self
    }

    /// Route this repository's metrics events into `sink`.
    #[must_use]
    pub fn metrics_sink(mut self, sink: Rc<dyn MetricsSink>) -> Self {
        self.metrics = Some(sink);
        self
    }

    #[must_use]
    pub const fn config(&self) -> &RepositoryConfig {
        &self.config
    }

    fn with_metrics<T>(&self, f: impl FnOnce() -> T) -> T {
        match &self.metrics {
            Some(sink) => with_metrics_sink(Rc::clone(sink), f),
            None => f(),
        }
    }

    // ======================================================================
    // Executor factories
    // ======================================================================

    const fn upsert(&self) -> UpsertExecutor<'_, E, S> {
        UpsertExecutor::new(
            self.store,
            self.registry,
            self.config.unique_lookup,
            self.config.debug,
        )
    }

    const fn load(&self) -> LoadExecutor<'_, E, S> {
        LoadExecutor::new(self.store, self.config.max_page_size, self.config.debug)
    }

    const fn deleter(&self) -> DeleteExecutor<'_, E, S> {
        DeleteExecutor::new(self.store, self.config.debug)
    }

    // ======================================================================
    // Writes
    // ======================================================================

    /// Save under the record's own primary key, resolving secondary identity.
    pub fn save(&self, entity: E) -> Result<E, InternalError> {
        self.with_metrics(|| {
            let key = entity.primary_key();
            self.upsert().resolve_and_save(key, entity)
        })
    }

    /// Save under an explicit intended key, resolving secondary identity.
    pub fn save_with_key(&self, key: E::Key, entity: E) -> Result<E, InternalError> {
        self.with_metrics(|| self.upsert().resolve_and_save(Some(key), entity))
    }

    /// Batch save of `key → record` entries in one write.
    pub fn save_map(&self, entries: BTreeMap<E::Key, E>) -> Result<Vec<E>, InternalError> {
        self.with_metrics(|| self.upsert().resolve_and_save_all(entries))
    }

    /// Batch save keyed by each record's required primary key.
    pub fn save_all(&self, entities: impl IntoIterator<Item = E>) -> Result<Vec<E>, InternalError> {
        self.with_metrics(|| self.upsert().save_all(entities))
    }

    /// Remove the stored row `entity` resolves to; returns whether one was removed.
    pub fn delete(&self, entity: &E) -> Result<bool, InternalError> {
        self.with_metrics(|| match self.upsert().find_by_unique_identifiers(entity)? {
            Some((key, _)) => self.deleter().delete_by_id(&key),
            None => Ok(false),
        })
    }

    pub fn delete_by_id(&self, key: &E::Key) -> Result<bool, InternalError> {
        self.with_metrics(|| self.deleter().delete_by_id(key))
    }

    /// Remove every record by its required primary key.
    pub fn delete_all<'e>(
        &self,
        entities: impl IntoIterator<Item = &'e E>,
    ) -> Result<usize, InternalError> {
        self.with_metrics(|| self.deleter().delete_all(entities))
    }

    /// Remove every stored row; returns how many were removed.
    pub fn clear(&self) -> Result<usize, InternalError> {
        self.with_metrics(|| self.deleter().clear())
    }

    // ======================================================================
    // Reads
    // ======================================================================

    pub fn find_by_id(&self, key: &E::Key) -> Result<Option<E>, InternalError> {
        self.with_metrics(|| self.load().find_by_id(key))
    }

    pub fn exists_by_id(&self, key: &E::Key) -> Result<bool, InternalError> {
        self.load().exists_by_id(key)
    }

    /// Stored rows for `keys`; keys with no row are skipped.
    pub fn find_all_by_id<'k>(
        &self,
        keys: impl IntoIterator<Item = &'k E::Key>,
    ) -> Result<Vec<E>, InternalError> {
        self.with_metrics(|| self.load().find_all_by_id(keys))
    }

    /// Find the stored record by primary key, falling back to secondary identity.
    pub fn find_by_unique_identifiers(&self, entity: &E) -> Result<Option<E>, InternalError> {
        self.with_metrics(|| {
            Ok(self
                .upsert()
                .find_by_unique_identifiers(entity)?
                .map(|(_, found)| found))
        })
    }

    pub fn find_all_sorted(&self, sort: &Sort) -> Result<Vec<E>, InternalError> {
        self.with_metrics(|| self.load().find_all_sorted(sort))
    }

    /// One page of every row; an unpaged request is rejected.
    pub fn find_page(&self, page: &Pageable) -> Result<Page<E>, InternalError> {
        self.with_metrics(|| self.load().find_page(page))
    }

    /// Filtered listing built from a condition model.
    pub fn query(&self, model: ConditionModel) -> Result<Page<E>, InternalError> {
        self.with_metrics(|| self.load().query(model))
    }

    pub fn count(&self) -> Result<u64, InternalError> {
        self.load().count()
    }
}
