//! Module: identity
//! Responsibility: secondary identity of a record type: which fields identify
//! a row besides its primary key, and the values a given record carries for them.
//! Does not own: lookups or writes (executor) and predicate rendering (query).

mod registry;


use crate::{
    config::UniqueLookup,
    db::query::{Condition, ConditionBuilder, ConditionModel, JoinOperator, QueryError},
    model::entity::EntityModel,
    traits::{EntitySchema, FieldValues},
    value::Value,
};
use std::fmt;

pub use registry::{KeyRegistry, RegistryError};

///
/// CompositeGroup
///
/// Named composite-unique group; fields keep declaration order.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CompositeGroup {
    name: &'static str,
    fields: Vec<&'static str>,
}

impl CompositeGroup {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn fields(&self) -> &[&'static str] {
        &self.fields
    }
}

///
/// KeyClassification
///
/// Field roles derived once per record type from its static model.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct KeyClassification {
    unique_fields: Vec<&'static str>,
    composite_groups: Vec<CompositeGroup>,
}

impl KeyClassification {
    /// Split the model's fields into single-unique fields and composite groups.
    ///
    /// Groups are ordered by the first appearance of any of their members.
    #[must_use]
    pub fn classify(model: &EntityModel) -> Self {
        let mut classification = Self::default();

        for field in model.fields {
            if let Some(group) = field.index.composite_group() {
                match classification
                    .composite_groups
                    .iter_mut()
                    .find(|g| g.name == group)
                {
                    Some(existing) => existing.fields.push(field.name),
                    None => classification.composite_groups.push(CompositeGroup {
                        name: group,
                        fields: vec![field.name],
                    }),
                }
            } else if field.index.is_single_unique() {
                classification.unique_fields.push(field.name);
            }
        }

        classification
    }

    #[must_use]
    pub fn unique_fields(&self) -> &[&'static str] {
        &self.unique_fields
    }

    #[must_use]
    pub fn composite_groups(&self) -> &[CompositeGroup] {
        &self.composite_groups
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.unique_fields.is_empty() && self.composite_groups.is_empty()
    }

    /// Single-unique fields that take part in lookups under `policy`.
    #[must_use]
    pub fn lookup_unique_fields(&self, policy: UniqueLookup) -> &[&'static str] {
        match policy {
            UniqueLookup::CompositePreferred if !self.composite_groups.is_empty() => &[],
            _ => &self.unique_fields,
        }
    }

    /// Present single-unique values and one tuple per composite group.
    pub fn lookup_identity<E: FieldValues>(
        &self,
        entity: &E,
        policy: UniqueLookup,
    ) -> SecondaryIdentity {
        SecondaryIdentity {
            singles: existing_identifiers(entity, self.lookup_unique_fields(policy)),
            tuples: self.composite_tuples(entity),
        }
    }

    /// Every identity entry a record claims, regardless of lookup policy.
    pub fn identity_entries<E: FieldValues>(&self, entity: &E) -> Vec<IdentityEntry> {
        let singles = existing_identifiers(entity, &self.unique_fields)
            .into_iter()
            .map(IdentityEntry::Single);
        let tuples = self.composite_tuples(entity).into_iter().map(|tuple| {
            IdentityEntry::Composite(tuple.into_iter().map(Condition::into_parts).collect())
        });

        singles.chain(tuples).collect()
    }

    // Nulls are kept so the tuple always has one member per group field.
    fn composite_tuples<E: FieldValues>(&self, entity: &E) -> Vec<Vec<Condition>> {
        self.composite_groups
            .iter()
            .map(|group| {
                group
                    .fields
                    .iter()
                    .map(|field| Condition::new(*field, field_value(entity, field)))
                    .collect()
            })
            .collect()
    }
}

///
/// SecondaryIdentity
///
/// The identifying values one record carries.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct SecondaryIdentity {
    singles: Vec<Condition>,
    tuples: Vec<Vec<Condition>>,
}

impl SecondaryIdentity {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.singles.is_empty() && self.tuples.is_empty()
    }

    #[must_use]
    pub fn singles(&self) -> &[Condition] {
        &self.singles
    }

    #[must_use]
    pub fn tuples(&self) -> &[Vec<Condition>] {
        &self.tuples
    }

    /// OR-joined lookup: tuples as equality groups, singles as `LIKE` members.
    pub fn into_condition<E: EntitySchema>(self) -> Result<ConditionModel, QueryError> {
        ConditionBuilder::for_entity::<E>()
            .equality_groups(self.tuples)
            .like_all(self.singles)
            .join(JoinOperator::Or)
            .build()
    }
}

///
/// IdentityEntry
///
/// One claimed identity, compared for equality within a batch.
///

#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub enum IdentityEntry {
    Single(Condition),
    Composite(Vec<(String, Value)>),
}

impl fmt::Display for IdentityEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(condition) => write!(f, "{}={}", condition.field(), condition.value()),
            Self::Composite(members) => {
                let members: Vec<String> = members
                    .iter()
                    .map(|(field, value)| format!("{field}={value}"))
                    .collect();
                write!(f, "({})", members.join(", "))
            }
        }
    }
}

// Undeclared accessors read as null.
fn field_value<E: FieldValues>(entity: &E, field: &str) -> Value {
    entity.get_value(field).unwrap_or(Value::Null)
}

fn existing_identifiers<E: FieldValues>(entity: &E, fields: &[&'static str]) -> Vec<Condition> {
    fields
        .iter()
        .filter_map(|field| {
            let value = field_value(entity, field);
            (!value.is_null()).then(|| Condition::new(*field, value))
        })
        .collect()
}
