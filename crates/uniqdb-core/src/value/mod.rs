
use serde::{Deserialize, Serialize};
use std::fmt;
use ulid::Ulid;

///
/// Value
/// can be used in WHERE statements and as positional query arguments
///
/// Null → the field's value is Option::None (i.e., SQL NULL).
///
/// Values are Eq + Hash because secondary identities are compared and
/// deduplicated by value; floating-point fields cannot act as identity.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Uint(u64),
    Text(String),
    Ulid(Ulid),
}

impl Value {
    /// Whether this value renders as `IS NULL` rather than a placeholder.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_uint(&self) -> Option<u64> {
        match self {
            Self::Uint(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Bool(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
            Self::Uint(v) => write!(f, "{v}"),
            // SQL literal quoting: embedded quotes are doubled
            Self::Text(v) => write!(f, "'{}'", v.replace('\'', "''")),
            Self::Ulid(v) => write!(f, "{v}"),
        }
    }
}

// from
macro_rules! impl_value_from {
    ( $( $type:ty => $variant:ident ),* $(,)? ) => {
        $(
            impl From<$type> for Value {
                fn from(v: $type) -> Self {
                    Self::$variant(v.into())
                }
            }
        )*
    };
}

impl_value_from!(
    bool => Bool,
    i32 => Int,
    i64 => Int,
    u32 => Uint,
    u64 => Uint,
    String => Text,
    &str => Text,
    Ulid => Ulid,
);

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}
