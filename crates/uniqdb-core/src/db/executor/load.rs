use crate::{
    db::{
        query::{
            ConditionModel, Page, PageRequest, Pageable, QueryError, Sort, SqlQuery,
            validate_field,
        },
        store::EntityStore,
    },
    error::InternalError,
    obs::sink::{self, ExecKind, MetricsEvent, Span},
    traits::EntityKind,
};
use std::marker::PhantomData;
use tracing::debug;

///
/// LoadExecutor
///

pub(crate) struct LoadExecutor<'a, E: EntityKind, S: EntityStore<E>> {
    store: &'a S,
    max_page_size: Option<u32>,
    debug: bool,
    _marker: PhantomData<E>,
}

impl<'a, E: EntityKind, S: EntityStore<E>> LoadExecutor<'a, E, S> {
    #[must_use]
    pub(crate) const fn new(store: &'a S, max_page_size: Option<u32>, debug: bool) -> Self {
        Self {
            store,
            max_page_size,
            debug,
            _marker: PhantomData,
        }
    }

    pub(crate) fn find_by_id(&self, key: &E::Key) -> Result<Option<E>, InternalError> {
        let mut span = Span::<E>::new(ExecKind::Load);
        let found = self.store.get(key)?;
        span.set_rows(u64::from(found.is_some()));

        Ok(found)
    }

    pub(crate) fn exists_by_id(&self, key: &E::Key) -> Result<bool, InternalError> {
        Ok(self.store.get(key)?.is_some())
    }

    /// Stored rows for `keys`, in the order given; missing keys are skipped.
    pub(crate) fn find_all_by_id<'k>(
        &self,
        keys: impl IntoIterator<Item = &'k E::Key>,
    ) -> Result<Vec<E>, InternalError> {
        let mut span = Span::<E>::new(ExecKind::Load);
        let mut found = Vec::new();
        for key in keys {
            if let Some(entity) = self.store.get(key)? {
                found.push(entity);
            }
        }
        span.set_rows(found.len() as u64);

        Ok(found)
    }

    /// Every row, ordered by `sort`.
    pub(crate) fn find_all_sorted(&self, sort: &Sort) -> Result<Vec<E>, InternalError> {
        for order in sort.orders() {
            validate_field(E::MODEL, order.field())?;
        }

        let query = SqlQuery::sorted(E::MODEL, sort);
        self.fetch(&query)
    }

    /// One page of every row; the total comes from the store size when the
    /// page is full.
    pub(crate) fn find_page(&self, page: &Pageable) -> Result<Page<E>, InternalError> {
        let request = page.request().ok_or_else(|| QueryError::Unpaged {
            entity: E::PATH.to_string(),
        })?;
        self.check_request(request)?;
        for order in request.sort().orders() {
            validate_field(E::MODEL, order.field())?;
        }

        let query = SqlQuery::pagination(E::MODEL, page);
        let content = self.fetch(&query)?;
        let total = match short_page_total(request, content.len()) {
            Some(total) => total,
            None => self.store.size()?,
        };

        Ok(Page::new(content, page.clone(), total))
    }

    /// Filtered listing. A full page issues the derived COUNT query; an
    /// unpaged model returns everything as a single page.
    pub(crate) fn query(&self, model: ConditionModel) -> Result<Page<E>, InternalError> {
        if model.entity().path != E::PATH {
            return Err(QueryError::EntityMismatch {
                expected: E::PATH.to_string(),
                found: model.entity().path.to_string(),
            }
            .into());
        }

        let page = model.pageable().clone();
        if let Some(request) = page.request() {
            self.check_request(request)?;
        }

        let query = model.into_sql_query();
        let content = self.fetch(&query)?;

        let Some(request) = page.request() else {
            return Ok(Page::unpaged(content));
        };
        let total = match short_page_total(request, content.len()) {
            Some(total) => total,
            None => self.count_matching(&query)?,
        };

        Ok(Page::new(content, page, total))
    }

    /// Total stored rows.
    pub(crate) fn count(&self) -> Result<u64, InternalError> {
        Ok(self.store.size()?)
    }

    // Run the COUNT variant of `query`; exactly one result row is expected.
    fn count_matching(&self, query: &SqlQuery) -> Result<u64, InternalError> {
        let count = query.count();
        if self.debug {
            debug!(entity = E::PATH, query = %count, "count query");
        }

        sink::record(MetricsEvent::CountQuery {
            entity_path: E::PATH,
        });
        let rows = self.store.query_count(&count)?;

        match rows.as_slice() {
            [total] => Ok(*total),
            [] => Err(QueryError::CountMissing {
                entity: E::PATH.to_string(),
            }
            .into()),
            _ => Err(QueryError::CountNotUnique {
                entity: E::PATH.to_string(),
                rows: rows.len(),
            }
            .into()),
        }
    }

    fn fetch(&self, query: &SqlQuery) -> Result<Vec<E>, InternalError> {
        if self.debug {
            debug!(entity = E::PATH, %query, "load query");
        }

        let mut span = Span::<E>::new(ExecKind::Load);
        let rows = self.store.query(query)?;
        span.set_rows(rows.len() as u64);

        Ok(rows.into_iter().map(|(_, entity)| entity).collect())
    }

    fn check_request(&self, request: &PageRequest) -> Result<(), QueryError> {
        if request.size() == 0 {
            return Err(QueryError::ZeroPageSize);
        }
        if let Some(max) = self.max_page_size
            && request.size() > max
        {
            return Err(QueryError::PageSizeExceeded {
                requested: request.size(),
                max,
            });
        }

        Ok(())
    }
}

// Total implied by a short page, or None when the page came back full.
fn short_page_total(request: &PageRequest, len: usize) -> Option<u64> {
    let len = len as u64;

    (len < u64::from(request.size())).then(|| request.offset() + len)
}
