//! Module: query
//! Responsibility: condition model, pagination value objects, and rendering
//! into parameterized predicate strings.
//! Does not own: query execution (that is the store collaborator's job).

mod condition;
mod page;
mod sql;

#[cfg(test)]
mod tests;

use crate::error::{ErrorClass, ErrorOrigin, InternalError};
use thiserror::Error as ThisError;

// re-exports
pub use condition::{Condition, ConditionBuilder, ConditionModel, JoinOperator};
pub use page::{NullHandling, Order, OrderDirection, Page, PageRequest, Pageable, Sort};
pub use sql::SqlQuery;

pub(crate) use condition::validate_field;

///
/// QueryError
///

#[derive(Debug, ThisError)]
pub enum QueryError {
    #[error("query builder requires an entity model")]
    MissingEntity,

    #[error("query built for {found} cannot run against {expected}")]
    EntityMismatch { expected: String, found: String },

    #[error("field '{field}' is not declared on {entity}")]
    UnknownField { entity: String, field: String },

    #[error("field name '{0}' is not a plain identifier")]
    InvalidFieldName(String),

    #[error("range comparison on '{field}' requires a non-null value")]
    NullComparison { field: String },

    #[error("paged listing of {entity} requires a paged request")]
    Unpaged { entity: String },

    #[error("page size must be greater than zero")]
    ZeroPageSize,

    #[error("page size {requested} exceeds the configured maximum of {max}")]
    PageSizeExceeded { requested: u32, max: u32 },

    #[error("expected count result for {entity}")]
    CountMissing { entity: String },

    #[error("expected one count row for {entity}, found {rows}")]
    CountNotUnique { entity: String, rows: usize },
}

impl QueryError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::MissingEntity
            | Self::EntityMismatch { .. }
            | Self::UnknownField { .. }
            | Self::InvalidFieldName(_)
            | Self::NullComparison { .. }
            | Self::Unpaged { .. }
            | Self::ZeroPageSize
            | Self::PageSizeExceeded { .. } => ErrorClass::InvalidArgument,
            Self::CountMissing { .. } => ErrorClass::NotFound,
            Self::CountNotUnique { .. } => ErrorClass::Internal,
        }
    }
}

impl From<QueryError> for InternalError {
    fn from(err: QueryError) -> Self {
        Self::new(err.class(), ErrorOrigin::Query, err.to_string())
    }
}
