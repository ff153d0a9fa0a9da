//! Test-only fixtures: static-model entities and a scripted store.

mod entity;
mod store;

pub(crate) use entity::{Account, Listing, Membership, Wide};
pub(crate) use store::{MockStore, StoreCall};
