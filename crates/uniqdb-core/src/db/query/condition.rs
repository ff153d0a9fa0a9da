use crate::{
    db::query::{Pageable, QueryError, SqlQuery},
    model::entity::EntityModel,
    traits::{EntitySchema, FieldValue},
    value::Value,
};
use derive_more::Display;
use serde::{Deserialize, Serialize};

///
/// JoinOperator
///
/// The single operator placed between every top-level fragment.
///

#[derive(Clone, Copy, Debug, Default, Deserialize, Display, Eq, PartialEq, Serialize)]
pub enum JoinOperator {
    #[default]
    #[display("AND")]
    And,
    #[display("OR")]
    Or,
}

///
/// Condition
///
/// One named field paired with a comparison value.
/// A `Value::Null` renders as `IS NULL` wherever the operator allows it.
///

#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Condition {
    field: String,
    value: Value,
}

impl Condition {
    #[must_use]
    pub fn new(field: impl Into<String>, value: impl FieldValue) -> Self {
        Self {
            field: field.into(),
            value: value.to_value(),
        }
    }

    #[must_use]
    pub fn is_null(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: Value::Null,
        }
    }

    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    #[must_use]
    pub const fn value(&self) -> &Value {
        &self.value
    }

    pub(crate) fn into_parts(self) -> (String, Value) {
        (self.field, self.value)
    }

    // `field LIKE ?` or `field IS NULL`
    fn like_fragment(&self) -> String {
        if self.value.is_null() {
            format!("{} IS NULL", self.field)
        } else {
            format!("{} LIKE ?", self.field)
        }
    }
}

///
/// ConditionModel
///
/// Immutable, validated filter + pagination request for one entity.
/// Rendered exactly once via [`ConditionModel::into_sql_query`].
///

#[derive(Clone, Debug)]
pub struct ConditionModel {
    entity: &'static EntityModel,
    equality_groups: Vec<Vec<Condition>>,
    at_least: Vec<Condition>,
    at_most: Vec<Condition>,
    like: Vec<Condition>,
    join: JoinOperator,
    page: Pageable,
}

impl ConditionModel {
    #[must_use]
    pub const fn entity(&self) -> &'static EntityModel {
        self.entity
    }

    #[must_use]
    pub const fn join(&self) -> JoinOperator {
        self.join
    }

    #[must_use]
    pub const fn pageable(&self) -> &Pageable {
        &self.page
    }

    /// Whether no filter fragment is present.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.equality_groups.iter().all(Vec::is_empty)
            && self.at_least.is_empty()
            && self.at_most.is_empty()
            && self.like.is_empty()
    }

    /// Render into a parameterized predicate with positional arguments.
    ///
    /// Fragment order is fixed: equality groups, `>=`, `<=`, then `LIKE`/null.
    /// Arguments follow the same order and skip null values, which render as
    /// `IS NULL` without a placeholder.
    #[must_use]
    pub fn into_sql_query(self) -> SqlQuery {
        let groups = self
            .equality_groups
            .iter()
            .filter(|group| !group.is_empty())
            .map(|group| {
                let members: Vec<String> = group.iter().map(Condition::like_fragment).collect();
                format!("( {} )", members.join(" AND "))
            });
        let at_least = self.at_least.iter().map(|c| format!("{} >= ?", c.field));
        let at_most = self.at_most.iter().map(|c| format!("{} <= ?", c.field));
        let like = self.like.iter().map(Condition::like_fragment);

        let fragments: Vec<String> = groups.chain(at_least).chain(at_most).chain(like).collect();
        let separator = format!(" {} ", self.join);
        let predicate = fragments.join(separator.as_str());
        let tail = self.page.render();

        let args = self
            .equality_groups
            .into_iter()
            .flatten()
            .chain(self.at_least)
            .chain(self.at_most)
            .chain(self.like)
            .map(|c| c.value)
            .filter(|v| !v.is_null())
            .collect();

        SqlQuery::new(self.entity.entity_name, predicate, &tail, args)
    }
}

///
/// ConditionBuilder
///
/// Fluent builder for [`ConditionModel`]. Collections default to empty,
/// the join operator to AND and pagination to unpaged.
///

#[derive(Clone, Debug, Default)]
pub struct ConditionBuilder {
    entity: Option<&'static EntityModel>,
    equality_groups: Vec<Vec<Condition>>,
    at_least: Vec<Condition>,
    at_most: Vec<Condition>,
    like: Vec<Condition>,
    join: JoinOperator,
    page: Pageable,
}

impl ConditionBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a builder already bound to an entity type.
    #[must_use]
    pub fn for_entity<E: EntitySchema>() -> Self {
        Self::new().entity(E::MODEL)
    }

    #[must_use]
    pub const fn entity(mut self, entity: &'static EntityModel) -> Self {
        self.entity = Some(entity);
        self
    }

    /// Append one parenthesized AND group.
    #[must_use]
    pub fn equality_group(mut self, group: impl IntoIterator<Item = Condition>) -> Self {
        self.equality_groups.push(group.into_iter().collect());
        self
    }

    #[must_use]
    pub fn equality_groups(mut self, groups: impl IntoIterator<Item = Vec<Condition>>) -> Self {
        self.equality_groups.extend(groups);
        self
    }

    #[must_use]
    pub fn at_least(mut self, field: impl Into<String>, value: impl FieldValue) -> Self {
        self.at_least.push(Condition::new(field, value));
        self
    }

    #[must_use]
    pub fn at_most(mut self, field: impl Into<String>, value: impl FieldValue) -> Self {
        self.at_most.push(Condition::new(field, value));
        self
    }

    #[must_use]
    pub fn like(mut self, field: impl Into<String>, value: impl FieldValue) -> Self {
        self.like.push(Condition::new(field, value));
        self
    }

    #[must_use]
    pub fn like_all(mut self, conditions: impl IntoIterator<Item = Condition>) -> Self {
        self.like.extend(conditions);
        self
    }

    #[must_use]
    pub const fn join(mut self, join: JoinOperator) -> Self {
        self.join = join;
        self
    }

    #[must_use]
    pub fn page(mut self, page: impl Into<Pageable>) -> Self {
        self.page = page.into();
        self
    }

    /// Validate and freeze the model.
    pub fn build(self) -> Result<ConditionModel, QueryError> {
        let entity = self.entity.ok_or(QueryError::MissingEntity)?;

        let conditions = self
            .equality_groups
            .iter()
            .flatten()
            .chain(&self.at_least)
            .chain(&self.at_most)
            .chain(&self.like);
        for condition in conditions {
            validate_field(entity, &condition.field)?;
        }

        for condition in self.at_least.iter().chain(&self.at_most) {
            if condition.value.is_null() {
                return Err(QueryError::NullComparison {
                    field: condition.field.clone(),
                });
            }
        }

        if let Some(request) = self.page.request() {
            if request.size() == 0 {
                return Err(QueryError::ZeroPageSize);
            }
            for order in request.sort().orders() {
                validate_field(entity, order.field())?;
            }
        }

        Ok(ConditionModel {
            entity,
            equality_groups: self.equality_groups,
            at_least: self.at_least,
            at_most: self.at_most,
            like: self.like,
            join: self.join,
            page: self.page,
        })
    }

    /// Build and render in one step.
    pub fn to_sql_query(self) -> Result<SqlQuery, QueryError> {
        Ok(self.build()?.into_sql_query())
    }
}

/// Field names must be plain identifiers declared on the entity.
///
/// Keywords such as `LIMIT` are still plain identifiers; the COUNT
/// derivation cuts at the recorded predicate boundary, not by keyword.
pub(crate) fn validate_field(entity: &EntityModel, field: &str) -> Result<(), QueryError> {
    let mut chars = field.chars();
    let plain = chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_');
    if !plain {
        return Err(QueryError::InvalidFieldName(field.to_string()));
    }

    if !entity.has_field(field) {
        return Err(QueryError::UnknownField {
            entity: entity.path.to_string(),
            field: field.to_string(),
        });
    }

    Ok(())
}
