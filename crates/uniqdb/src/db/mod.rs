mod repository;

pub use repository::Repository;
pub use uniqdb_core::db::{
    EntityStore, KeyClassification, KeyRegistry, StoreError,
    query::{
        Condition, ConditionBuilder, ConditionModel, JoinOperator, NullHandling, Order,
        OrderDirection, Page, PageRequest, Pageable, Sort, SqlQuery,
    },
};
