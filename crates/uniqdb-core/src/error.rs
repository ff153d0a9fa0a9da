use std::fmt;
use thiserror::Error as ThisError;

///
/// InternalError
///
/// Structured runtime error with a stable internal classification.
/// Not a stable API; the facade crate maps it into the public error type.
///

#[derive(Debug, ThisError)]
#[error("{message}")]
pub struct InternalError {
    pub class: ErrorClass,
    pub origin: ErrorOrigin,
    pub message: String,
}

impl InternalError {
    pub fn new(class: ErrorClass, origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self {
            class,
            origin,
            message: message.into(),
        }
    }

    /// Construct an invalid-argument error for a specific origin.
    pub(crate) fn invalid_argument(origin: ErrorOrigin, message: impl Into<String>) -> Self {
        Self::new(ErrorClass::InvalidArgument, origin, message)
    }

    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self.class, ErrorClass::NotFound)
    }

    #[must_use]
    pub const fn is_duplicate_identity(&self) -> bool {
        matches!(self.class, ErrorClass::DuplicateIdentity)
    }

    #[must_use]
    pub const fn is_identity_conflict(&self) -> bool {
        matches!(self.class, ErrorClass::IdentityConflict)
    }

    #[must_use]
    pub fn display_with_class(&self) -> String {
        format!("{}:{}: {}", self.origin, self.class, self.message)
    }
}

///
/// ErrorClass
/// Internal error taxonomy for runtime classification.
///
/// DuplicateIdentity : two records claim one secondary identity (batch or store)
/// IdentityConflict  : caller key disagrees with the key found by secondary lookup
/// NotFound          : an aggregate lookup expected one row and got none
/// InvalidArgument   : malformed request or missing required configuration
/// Store             : failure surfaced by the storage collaborator
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorClass {
    DuplicateIdentity,
    IdentityConflict,
    NotFound,
    InvalidArgument,
    Store,
    Internal,
}

impl fmt::Display for ErrorClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::DuplicateIdentity => "duplicate_identity",
            Self::IdentityConflict => "identity_conflict",
            Self::NotFound => "not_found",
            Self::InvalidArgument => "invalid_argument",
            Self::Store => "store",
            Self::Internal => "internal",
        };
        write!(f, "{label}")
    }
}

///
/// ErrorOrigin
/// Internal origin taxonomy for runtime classification.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ErrorOrigin {
    Config,
    Executor,
    Guard,
    Query,
    Registry,
    Store,
}

impl fmt::Display for ErrorOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Config => "config",
            Self::Executor => "executor",
            Self::Guard => "guard",
            Self::Query => "query",
            Self::Registry => "registry",
            Self::Store => "store",
        };
        write!(f, "{label}")
    }
}
