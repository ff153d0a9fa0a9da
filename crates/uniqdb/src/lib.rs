//! ## Crate layout
//! - `core`: runtime entity traits, values, key classification, the query
//!   builder, executors, and observability.
//! - `db`: the public repository facade and query vocabulary.
//! - `error`: the public error type every facade call returns.
//!
//! The `prelude` module carries the vocabulary needed to declare entities
//! and build queries.

pub use uniqdb_core as core;

pub mod db;
pub mod error;

/// Workspace version re-export for downstream tooling/tests.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use crate::core::{config::RepositoryConfig, impl_field_value};
pub use error::{Error, ErrorKind, ErrorOrigin};

///
/// Prelude
/// using _ brings traits into scope and avoids name conflicts
///

pub mod prelude {
    pub use crate::{
        core::{
            model::{entity::EntityModel, field::EntityFieldModel},
            traits::{
                EntityKey, EntityKind as _, EntitySchema, EntityValue, FieldValue, FieldValues,
                Path,
            },
            value::Value,
        },
        db::{
            Condition, ConditionBuilder, JoinOperator, Order, Page, PageRequest, Pageable,
            Repository, Sort,
        },
    };
}
