use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;
use uniqdb_core::{
    config::ConfigError,
    error::{ErrorClass, ErrorOrigin as CoreErrorOrigin, InternalError},
};

///
/// Error
/// Public error type with a stable kind + origin taxonomy.
///

#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize, ThisError)]
#[error("{message}")]
pub struct Error {
    pub kind: ErrorKind,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl Error {
    pub fn new(kind: ErrorKind, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            kind,
            origin,
            message: message.into(),
        }
    }
}

impl From<InternalError> for Error {
    fn from(err: InternalError) -> Self {
        Self::new(err.class.into(), err.origin.into(), err.message)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        InternalError::from(err).into()
    }
}

///
/// ErrorKind
/// Public error taxonomy for callers.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorKind {
    /// Two records claim the same secondary identity.
    DuplicateIdentity,

    /// The requested key disagrees with the key stored for the same identity.
    IdentityConflict,

    /// An aggregate lookup returned no row.
    NotFound,

    /// The request is malformed; the caller can fix it.
    InvalidArgument,

    /// The backing store failed.
    Store,

    /// The caller cannot remediate this.
    Internal,
}

impl From<ErrorClass> for ErrorKind {
    fn from(class: ErrorClass) -> Self {
        match class {
            ErrorClass::DuplicateIdentity => Self::DuplicateIdentity,
            ErrorClass::IdentityConflict => Self::IdentityConflict,
            ErrorClass::NotFound => Self::NotFound,
            ErrorClass::InvalidArgument => Self::InvalidArgument,
            ErrorClass::Store => Self::Store,
            ErrorClass::Internal => Self::Internal,
        }
    }
}

///
/// ErrorOrigin
/// Public origin taxonomy.
///

#[derive(Clone, Copy, Debug, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum ErrorOrigin {
    Config,
    Executor,
    Guard,
    Query,
    Registry,
    Store,
}

impl From<CoreErrorOrigin> for ErrorOrigin {
    fn from(origin: CoreErrorOrigin) -> Self {
        match origin {
            CoreErrorOrigin::Config => Self::Config,
            CoreErrorOrigin::Executor => Self::Executor,
            CoreErrorOrigin::Guard => Self::Guard,
            CoreErrorOrigin::Query => Self::Query,
            CoreErrorOrigin::Registry => Self::Registry,
            CoreErrorOrigin::Store => Self::Store,
        }
    }
}
