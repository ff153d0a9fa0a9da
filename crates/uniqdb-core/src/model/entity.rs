use crate::model::field::EntityFieldModel;

///
/// EntityModel
/// Minimal, statically declared runtime model for one entity.
///

#[derive(Debug)]
pub struct EntityModel {
    /// Fully-qualified Rust type path (for dispatch and diagnostics).
    pub path: &'static str,
    /// Stable external name used as the store's table/type name.
    pub entity_name: &'static str,
    /// Primary key field (points at an entry in `fields`).
    pub primary_key: &'static EntityFieldModel,
    /// Ordered field list; declaration order is significant for composite groups.
    pub fields: &'static [EntityFieldModel],
}

impl EntityModel {
    /// Look up a declared field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&'static EntityFieldModel> {
        self.fields.iter().find(|field| field.name == name)
    }

    #[must_use]
    pub fn has_field(&self, name: &str) -> bool {
        self.field(name).is_some()
    }
}
