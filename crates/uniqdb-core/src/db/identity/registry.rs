use crate::{
    MAX_COMPOSITE_FIELDS,
    db::identity::KeyClassification,
    error::{ErrorClass, ErrorOrigin, InternalError},
    traits::EntityKind,
};
use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};
use thiserror::Error as ThisError;

///
/// RegistryError
///

#[derive(Debug, ThisError)]
pub enum RegistryError {
    #[error("entity '{0}' already registered")]
    AlreadyRegistered(String),

    #[error("composite group '{group}' on {entity} has {fields} fields (max {max})")]
    CompositeTooWide {
        entity: String,
        group: String,
        fields: usize,
        max: usize,
    },
}

impl RegistryError {
    pub(crate) const fn class(&self) -> ErrorClass {
        match self {
            Self::AlreadyRegistered(_) => ErrorClass::Internal,
            Self::CompositeTooWide { .. } => ErrorClass::InvalidArgument,
        }
    }
}

impl From<RegistryError> for InternalError {
    fn from(err: RegistryError) -> Self {
        Self::new(err.class(), ErrorOrigin::Registry, err.to_string())
    }
}

///
/// KeyRegistry
///
/// Per-type cache of key classifications, keyed by entity path.
/// Entries are computed once and never invalidated; concurrent first use
/// converges on whichever entry was inserted first.
///

#[derive(Debug, Default)]
pub struct KeyRegistry {
    entries: RwLock<HashMap<&'static str, Arc<KeyClassification>>>,
}

impl KeyRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Classify and cache `E` eagerly; registering a type twice is an error.
    pub fn register<E: EntityKind>(&self) -> Result<Arc<KeyClassification>, RegistryError> {
        let classification = Arc::new(classify::<E>()?);

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.contains_key(E::PATH) {
            return Err(RegistryError::AlreadyRegistered(E::PATH.to_string()));
        }
        entries.insert(E::PATH, Arc::clone(&classification));

        Ok(classification)
    }

    /// Cached classification for `E`, computed on first use.
    pub fn classification<E: EntityKind>(&self) -> Result<Arc<KeyClassification>, RegistryError> {
        {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(existing) = entries.get(E::PATH) {
                return Ok(Arc::clone(existing));
            }
        }

        let computed = Arc::new(classify::<E>()?);
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let entry = entries.entry(E::PATH).or_insert(computed);

        Ok(Arc::clone(entry))
    }

    #[must_use]
    pub fn is_registered(&self, path: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(path)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn classify<E: EntityKind>() -> Result<KeyClassification, RegistryError> {
    let classification = KeyClassification::classify(E::MODEL);

    for group in classification.composite_groups() {
        if group.fields().len() > MAX_COMPOSITE_FIELDS {
            return Err(RegistryError::CompositeTooWide {
                entity: E::PATH.to_string(),
                group: group.name().to_string(),
                fields: group.fields().len(),
                max: MAX_COMPOSITE_FIELDS,
            });
        }
    }

    Ok(classification)
}
