use crate::{
    error::{ErrorOrigin, InternalError},
    model::entity::EntityModel,
    value::Value,
};
use std::{fmt::Debug, hash::Hash};
use ulid::Ulid;

// ============================================================================
// PLACEMENT
// ============================================================================

///
/// Path
/// Fully-qualified schema path.
///

pub trait Path {
    const PATH: &'static str;
}

// ============================================================================
// ENTITY IDENTITY & SCHEMA
// ============================================================================
//
// These traits describe *what an entity is*, not how it is stored.
//

///
/// EntityKey
///
/// Associates an entity with the type used as its primary key.
/// Keys are plain values (Ulid, u64, String, …) and are ordered so batch
/// writes can be keyed deterministically.
///

pub trait EntityKey {
    type Key: Clone + Debug + Eq + Ord + Hash + FieldValue + 'static;
}

///
/// EntitySchema
///
/// Declared schema facts for an entity.
///

pub trait EntitySchema: EntityKey {
    const MODEL: &'static EntityModel;
}

// ============================================================================
// ENTITY VALUES
// ============================================================================

///
/// EntityValue
///
/// A concrete entity value whose primary key may be absent on write intent.
///

pub trait EntityValue: EntityKey + FieldValues + Sized {
    fn primary_key(&self) -> Option<Self::Key>;

    fn set_primary_key(&mut self, key: Self::Key);
}

///
/// EntityKind
///
/// Fully bound entity; the maximum contract required by executors.
///

pub trait EntityKind: Path + EntitySchema + EntityValue + 'static {
    /// Primary key, failing when the record does not carry one.
    fn required_primary_key(&self) -> Result<Self::Key, InternalError> {
        self.primary_key().ok_or_else(|| {
            InternalError::invalid_argument(
                ErrorOrigin::Executor,
                format!(
                    "required primary key '{}' missing on {}",
                    Self::MODEL.primary_key.name,
                    Self::PATH
                ),
            )
        })
    }
}

impl<T> EntityKind for T where T: Path + EntitySchema + EntityValue + 'static {}

///
/// FieldValues
///
/// Read access to named fields. `None` means the field is not declared on
/// this entity; a declared but empty field returns `Some(Value::Null)`.
///

pub trait FieldValues {
    fn get_value(&self, field: &str) -> Option<Value>;
}

///
/// FieldValue
///
/// Conversion boundary for values used in query predicates.
///

pub trait FieldValue {
    fn to_value(&self) -> Value;
}

impl FieldValue for Value {
    fn to_value(&self) -> Value {
        self.clone()
    }
}

impl FieldValue for &str {
    fn to_value(&self) -> Value {
        Value::Text((*self).to_string())
    }
}

impl FieldValue for String {
    fn to_value(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl FieldValue for Ulid {
    fn to_value(&self) -> Value {
        Value::Ulid(*self)
    }
}

impl<T: FieldValue> FieldValue for Option<T> {
    fn to_value(&self) -> Value {
        match self {
            Some(v) => v.to_value(),
            None => Value::Null,
        }
    }
}

// impl_field_value
#[macro_export]
macro_rules! impl_field_value {
    ( $( $type:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl $crate::traits::FieldValue for $type {
                fn to_value(&self) -> $crate::value::Value {
                    $crate::value::Value::$variant((*self).into())
                }
            }
        )*
    };
}

impl_field_value!(
    i8 => Int,
    i16 => Int,
    i32 => Int,
    i64 => Int,
    u8 => Uint,
    u16 => Uint,
    u32 => Uint,
    u64 => Uint,
    bool => Bool,
);
