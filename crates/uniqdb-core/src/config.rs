use crate::error::{ErrorClass, ErrorOrigin, InternalError};
use derive_more::Display;
use serde::{Deserialize, Serialize};
use thiserror::Error as ThisError;

///
/// ConfigError
///

#[derive(Debug, ThisError)]
pub enum ConfigError {
    #[error("invalid repository config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("max_page_size must be greater than zero")]
    ZeroMaxPageSize,
}

impl From<ConfigError> for InternalError {
    fn from(err: ConfigError) -> Self {
        Self::new(ErrorClass::InvalidArgument, ErrorOrigin::Config, err.to_string())
    }
}

///
/// UniqueLookup
///
/// Which secondary identities take part in the upsert lookup.
///
/// CompositePreferred : when an entity declares composite groups, its
///                      single-unique fields are not looked up
/// Combined           : single-unique values and composite tuples are
///                      always looked up together
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UniqueLookup {
    #[default]
    CompositePreferred,
    Combined,
}

///
/// RepositoryConfig
///
/// ```toml
/// debug = true
/// max_page_size = 500
/// unique_lookup = "combined"
/// ```
///

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct RepositoryConfig {
    /// Emit rendered SQL and resolution decisions as debug logs.
    pub debug: bool,
    /// Upper bound on requested page sizes.
    pub max_page_size: Option<u32>,
    pub unique_lookup: UniqueLookup,
}

impl RepositoryConfig {
    /// Parse and validate a TOML config document.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if matches!(self.max_page_size, Some(0)) {
            return Err(ConfigError::ZeroMaxPageSize);
        }

        Ok(())
    }

    #[must_use]
    pub const fn with_debug(mut self) -> Self {
        self.debug = true;
        self
    }

    #[must_use]
    pub const fn with_unique_lookup(mut self, lookup: UniqueLookup) -> Self {
        self.unique_lookup = lookup;
        self
    }
}
