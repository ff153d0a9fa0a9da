//! Module: db
//! Responsibility: repository surface over an entity store: secondary-identity
//! upserts, filtered and paged listings, deletes.

mod executor;
pub mod identity;
pub mod query;
mod session;
pub mod store;

pub use executor::UpsertError;
pub use identity::{KeyClassification, KeyRegistry, RegistryError};
pub use session::Repository;
pub use store::{EntityStore, StoreError};
