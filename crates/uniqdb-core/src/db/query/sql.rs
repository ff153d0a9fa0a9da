use crate::{
    db::query::{Pageable, Sort},
    model::entity::EntityModel,
    value::Value,
};
use std::fmt::{self, Display};

const COUNT_PREFIX: &str = "COUNT (*) ";

///
/// SqlQuery
///
/// A rendered predicate (plus any ordering and pagination tail) with its
/// positional arguments, addressed to one entity's table.
///
/// `predicate_len` marks where the predicate ends and the builder's own
/// ordering/pagination tail begins.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SqlQuery {
    entity: &'static str,
    sql: String,
    args: Vec<Value>,
    predicate_len: usize,
}

impl SqlQuery {
    pub(crate) fn new(
        entity: &'static str,
        predicate: String,
        tail: &str,
        args: Vec<Value>,
    ) -> Self {
        let predicate_len = predicate.len();
        let mut sql = predicate;
        sql.push_str(tail);

        Self {
            entity,
            sql,
            args,
            predicate_len,
        }
    }

    /// Unfiltered listing with a pagination tail.
    ///
    /// Sort fields must already be validated against `entity`.
    pub(crate) fn pagination(entity: &'static EntityModel, page: &Pageable) -> Self {
        Self::new(entity.entity_name, String::new(), &page.render(), Vec::new())
    }

    /// Unfiltered listing with an ordering tail.
    ///
    /// Sort fields must already be validated against `entity`.
    pub(crate) fn sorted(entity: &'static EntityModel, sort: &Sort) -> Self {
        Self::new(entity.entity_name, String::new(), &sort.render(), Vec::new())
    }

    #[must_use]
    pub const fn entity(&self) -> &'static str {
        self.entity
    }

    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    #[must_use]
    pub fn args(&self) -> &[Value] {
        &self.args
    }

    /// Derive the matching COUNT query.
    ///
    /// The ordering/pagination tail is dropped at the recorded predicate
    /// boundary, so field names never affect where the cut lands. Arguments
    /// are carried over unchanged.
    #[must_use]
    pub fn count(&self) -> Self {
        let predicate = format!("{COUNT_PREFIX}{}", &self.sql[..self.predicate_len]);

        Self::new(self.entity, predicate, "", self.args.clone())
    }
}

impl Display for SqlQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [", self.sql)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{arg}")?;
        }
        f.write_str("]")
    }
}
