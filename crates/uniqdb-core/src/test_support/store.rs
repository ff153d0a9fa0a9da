use crate::{
    db::{
        query::SqlQuery,
        store::{EntityStore, StoreError},
    },
    error::InternalError,
    traits::EntityKind,
};
use std::{
    cell::{Cell, RefCell},
    collections::{BTreeMap, VecDeque},
};

///
/// StoreCall
///
/// One recorded interaction with the mock store.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum StoreCall<K> {
    Get(K),
    Put(K),
    PutAll(Vec<K>),
    Remove(K),
    RemoveAll(Vec<K>),
    Query(SqlQuery),
    QueryCount(SqlQuery),
    Size,
    InsertAssigned,
    Atomically,
}

///
/// MockStore
///
/// In-memory rows plus scripted query results. Every call is logged so
/// tests can assert which storage interactions happened, and in what order.
/// `atomically` restores the rows when the closure fails.
///

pub(crate) struct MockStore<E: EntityKind> {
    rows: RefCell<BTreeMap<E::Key, E>>,
    query_results: RefCell<VecDeque<Vec<(E::Key, E)>>>,
    count_results: RefCell<VecDeque<Vec<u64>>>,
    assigned_keys: RefCell<VecDeque<E::Key>>,
    size_override: Cell<Option<u64>>,
    fail_puts: Cell<bool>,
    calls: RefCell<Vec<StoreCall<E::Key>>>,
}

impl<E: EntityKind + Clone> MockStore<E> {
    pub(crate) fn new() -> Self {
        Self {
            rows: RefCell::default(),
            query_results: RefCell::default(),
            count_results: RefCell::default(),
            assigned_keys: RefCell::default(),
            size_override: Cell::new(None),
            fail_puts: Cell::new(false),
            calls: RefCell::default(),
        }
    }

    /// Seed a stored row without logging a call.
    pub(crate) fn seed(&self, key: E::Key, entity: E) {
        self.rows.borrow_mut().insert(key, entity);
    }

    /// Queue the rows returned by the next `query`.
    pub(crate) fn script_query(&self, rows: Vec<(E::Key, E)>) {
        self.query_results.borrow_mut().push_back(rows);
    }

    /// Queue the rows returned by the next `query_count`.
    pub(crate) fn script_count(&self, rows: Vec<u64>) {
        self.count_results.borrow_mut().push_back(rows);
    }

    /// Allow `insert_assigned` to hand out `key` next.
    pub(crate) fn script_assigned_key(&self, key: E::Key) {
        self.assigned_keys.borrow_mut().push_back(key);
    }

    pub(crate) fn set_size(&self, size: u64) {
        self.size_override.set(Some(size));
    }

    pub(crate) fn fail_puts(&self) {
        self.fail_puts.set(true);
    }

    pub(crate) fn calls(&self) -> Vec<StoreCall<E::Key>> {
        self.calls.borrow().clone()
    }

    pub(crate) fn rows(&self) -> BTreeMap<E::Key, E> {
        self.rows.borrow().clone()
    }

    /// Rendered SQL of every select query, in call order.
    pub(crate) fn queries(&self) -> Vec<SqlQuery> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                StoreCall::Query(query) => Some(query.clone()),
                _ => None,
            })
            .collect()
    }

    pub(crate) fn count_queries(&self) -> Vec<SqlQuery> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                StoreCall::QueryCount(query) => Some(query.clone()),
                _ => None,
            })
            .collect()
    }

    /// Whether any write reached the store.
    pub(crate) fn wrote(&self) -> bool {
        self.calls.borrow().iter().any(|call| {
            matches!(
                call,
                StoreCall::Put(_)
                    | StoreCall::PutAll(_)
                    | StoreCall::Remove(_)
                    | StoreCall::RemoveAll(_)
                    | StoreCall::InsertAssigned
            )
        })
    }

    fn log(&self, call: StoreCall<E::Key>) {
        self.calls.borrow_mut().push(call);
    }

    fn check_put(&self) -> Result<(), StoreError> {
        if self.fail_puts.get() {
            return Err(StoreError::backend("put rejected"));
        }

        Ok(())
    }
}

impl<E: EntityKind + Clone> EntityStore<E> for MockStore<E> {
    fn get(&self, key: &E::Key) -> Result<Option<E>, StoreError> {
        self.log(StoreCall::Get(key.clone()));

        Ok(self.rows.borrow().get(key).cloned())
    }

    fn put(&self, key: &E::Key, entity: &E) -> Result<(), StoreError> {
        self.log(StoreCall::Put(key.clone()));
        self.check_put()?;
        self.rows.borrow_mut().insert(key.clone(), entity.clone());

        Ok(())
    }

    fn put_all(&self, entries: &BTreeMap<E::Key, E>) -> Result<(), StoreError> {
        self.log(StoreCall::PutAll(entries.keys().cloned().collect()));
        self.check_put()?;
        self.rows
            .borrow_mut()
            .extend(entries.iter().map(|(k, v)| (k.clone(), v.clone())));

        Ok(())
    }

    fn remove(&self, key: &E::Key) -> Result<bool, StoreError> {
        self.log(StoreCall::Remove(key.clone()));

        Ok(self.rows.borrow_mut().remove(key).is_some())
    }

    fn remove_all(&self, keys: &[E::Key]) -> Result<(), StoreError> {
        self.log(StoreCall::RemoveAll(keys.to_vec()));
        let mut rows = self.rows.borrow_mut();
        for key in keys {
            rows.remove(key);
        }

        Ok(())
    }

    fn query(&self, query: &SqlQuery) -> Result<Vec<(E::Key, E)>, StoreError> {
        self.log(StoreCall::Query(query.clone()));

        Ok(self.query_results.borrow_mut().pop_front().unwrap_or_default())
    }

    fn query_count(&self, query: &SqlQuery) -> Result<Vec<u64>, StoreError> {
        self.log(StoreCall::QueryCount(query.clone()));

        Ok(self.count_results.borrow_mut().pop_front().unwrap_or_default())
    }

    fn size(&self) -> Result<u64, StoreError> {
        self.log(StoreCall::Size);

        Ok(self
            .size_override
            .get()
            .unwrap_or(self.rows.borrow().len() as u64))
    }

    fn insert_assigned(&self, mut entity: E) -> Result<E, StoreError> {
        self.log(StoreCall::InsertAssigned);
        self.check_put()?;

        let key = self
            .assigned_keys
            .borrow_mut()
            .pop_front()
            .ok_or(StoreError::KeyAssignmentUnsupported { entity: E::PATH })?;
        entity.set_primary_key(key.clone());
        self.rows.borrow_mut().insert(key, entity.clone());

        Ok(entity)
    }

    fn atomically<T>(
        &self,
        f: impl FnOnce() -> Result<T, InternalError>,
    ) -> Result<T, InternalError> {
        self.log(StoreCall::Atomically);

        let snapshot = self.rows.borrow().clone();
        let result = f();
        if result.is_err() {
            *self.rows.borrow_mut() = snapshot;
        }

        result
    }
}
