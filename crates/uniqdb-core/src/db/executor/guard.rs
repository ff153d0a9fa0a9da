use crate::{
    db::{executor::UpsertError, identity::KeyClassification},
    error::InternalError,
    obs::sink::{self, MetricsEvent},
    traits::EntityKind,
};
use std::collections::HashSet;
use tracing::warn;

/// Fail when two records in one batch claim the same secondary identity.
///
/// Every present single-unique value and every composite tuple (nulls
/// included) counts, whatever the lookup policy. Never touches the store.
pub(super) fn assert_no_internal_collisions<'a, E: EntityKind>(
    classification: &KeyClassification,
    entities: impl IntoIterator<Item = &'a E>,
) -> Result<(), InternalError> {
    let mut seen = HashSet::new();

    for entity in entities {
        for entry in classification.identity_entries(entity) {
            if seen.contains(&entry) {
                sink::record(MetricsEvent::DuplicateIdentity {
                    entity_path: E::PATH,
                });
                warn!(entity = E::PATH, identity = %entry, "batch shares a secondary identity");

                return Err(UpsertError::DuplicateBatchIdentity {
                    entity: E::PATH,
                    identity: entry.to_string(),
                }
                .into());
            }
            seen.insert(entry);
        }
    }

    Ok(())
}
