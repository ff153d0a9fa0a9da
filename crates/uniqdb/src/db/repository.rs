use crate::{
    db::{ConditionModel, EntityStore, KeyRegistry, Page, Pageable, Sort},
    error::Error,
};
use std::{collections::BTreeMap, rc::Rc};
use uniqdb_core::{self as core, config::RepositoryConfig, traits::EntityKind};

///
/// Repository
/// Public facade over the core repository.
/// Converts core errors into `uniqdb::Error`.
///

pub struct Repository<'a, E: EntityKind, S: EntityStore<E>> {
    inner: core::db::Repository<'a, E, S>,
}

impl<'a, E: EntityKind, S: EntityStore<E>> Repository<'a, E, S> {
    #[must_use]
    pub fn new(store: &'a S, registry: &'a KeyRegistry) -> Self {
        Self {
            inner: core::db::Repository::new(store, registry),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: RepositoryConfig) -> Self {
        self.inner = self.inner.with_config(config);
        self
    }

    /// Enable debug logging of rendered queries and resolution decisions.
    #[must_use]
    pub fn debug(mut self) -> Self {
        self.inner = self.inner.debug();
        self
    }

    /// Override the metrics sink for operations executed through this repository.
    #[must_use]
    pub fn metrics_sink(mut self, sink: Rc<dyn core::obs::sink::MetricsSink>) -> Self {
        self.inner = self.inner.metrics_sink(sink);
        self
    }

    #[must_use]
    pub const fn config(&self) -> &RepositoryConfig {
        self.inner.config()
    }

    //
    // Writes
    //

    pub fn save(&self, entity: E) -> Result<E, Error> {
        Ok(self.inner.save(entity)?)
    }

    pub fn save_with_key(&self, key: E::Key, entity: E) -> Result<E, Error> {
        Ok(self.inner.save_with_key(key, entity)?)
    }

    pub fn save_map(&self, entries: BTreeMap<E::Key, E>) -> Result<Vec<E>, Error> {
        Ok(self.inner.save_map(entries)?)
    }

    pub fn save_all(&self, entities: impl IntoIterator<Item = E>) -> Result<Vec<E>, Error> {
        Ok(self.inner.save_all(entities)?)
    }

    pub fn delete(&self, entity: &E) -> Result<bool, Error> {
        Ok(self.inner.delete(entity)?)
    }

    pub fn delete_by_id(&self, key: &E::Key) -> Result<bool, Error> {
        Ok(self.inner.delete_by_id(key)?)
    }

    pub fn delete_all<'e>(&self, entities: impl IntoIterator<Item = &'e E>) -> Result<usize, Error> {
        Ok(self.inner.delete_all(entities)?)
    }

    pub fn clear(&self) -> Result<usize, Error> {
        Ok(self.inner.clear()?)
    }

    //
    // Reads
    //

    pub fn find_by_id(&self, key: &E::Key) -> Result<Option<E>, Error> {
        Ok(self.inner.find_by_id(key)?)
    }

    pub fn exists_by_id(&self, key: &E::Key) -> Result<bool, Error> {
        Ok(self.inner.exists_by_id(key)?)
    }

    pub fn find_all_by_id<'k>(
        &self,
        keys: impl IntoIterator<Item = &'k E::Key>,
    ) -> Result<Vec<E>, Error> {
        Ok(self.inner.find_all_by_id(keys)?)
    }

    pub fn find_by_unique_identifiers(&self, entity: &E) -> Result<Option<E>, Error> {
        Ok(self.inner.find_by_unique_identifiers(entity)?)
    }

    pub fn find_all_sorted(&self, sort: &Sort) -> Result<Vec<E>, Error> {
        Ok(self.inner.find_all_sorted(sort)?)
    }

    pub fn find_page(&self, page: &Pageable) -> Result<Page<E>, Error> {
        Ok(self.inner.find_page(page)?)
    }

    pub fn query(&self, model: ConditionModel) -> Result<Page<E>, Error> {
        Ok(self.inner.query(model)?)
    }

    pub fn count(&self) -> Result<u64, Error> {
        Ok(self.inner.count()?)
    }
}
