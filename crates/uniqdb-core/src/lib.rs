//! Core runtime for uniqdb: entity traits, values, the condition/query
//! builder, secondary-identity resolution, and the repository surface.
#![warn(unreachable_pub)]

// public exports are one module level down
pub mod config;
pub mod db;
pub mod error;
pub mod model;
pub mod obs;
pub mod traits;
pub mod value;

// test
#[cfg(test)]
pub(crate) mod test_support;

///
/// CONSTANTS
///

/// Maximum number of fields allowed in one composite-unique group.
///
/// Keeps lookup predicates flat and bounded; schemas with wider groups are
/// rejected at registration.
pub const MAX_COMPOSITE_FIELDS: usize = 8;

///
/// Prelude
///
/// Prelude contains only domain vocabulary.
/// No errors, executors, stores, or helpers are re-exported here.
///

pub mod prelude {
    pub use crate::{
        db::query::{
            Condition, ConditionBuilder, ConditionModel, JoinOperator, Order, OrderDirection,
            Page, PageRequest, Pageable, Sort,
        },
        model::{entity::EntityModel, field::EntityFieldModel},
        traits::{EntityKind, EntityValue, FieldValue, FieldValues, Path},
        value::Value,
    };
}
