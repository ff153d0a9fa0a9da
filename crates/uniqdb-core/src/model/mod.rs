//! Runtime data model definitions.
//!
//! Types in `model` are the statically declared schema of a record type:
//! which field is the primary key, and which fields carry index roles
//! (plain index, single-field unique, named composite-unique group).
//! They are built at compile time and read by key classification, the
//! query builder's field validation, and the executors.
pub mod entity;
pub mod field;
