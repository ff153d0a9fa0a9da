///
/// EntityFieldModel
/// Runtime field metadata used by classification and query validation.
///

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct EntityFieldModel {
    /// Field name as used in predicates.
    pub name: &'static str,
    /// Index role declared for this field.
    pub index: FieldIndex,
}

impl EntityFieldModel {
    /// A field with no index role.
    #[must_use]
    pub const fn plain(name: &'static str) -> Self {
        Self {
            name,
            index: FieldIndex::NONE,
        }
    }

    /// An indexed, non-unique field.
    #[must_use]
    pub const fn indexed(name: &'static str) -> Self {
        Self {
            name,
            index: FieldIndex {
                indexed: true,
                unique: false,
                group: None,
            },
        }
    }

    /// An indexed field that is unique on its own.
    #[must_use]
    pub const fn unique(name: &'static str) -> Self {
        Self {
            name,
            index: FieldIndex {
                indexed: true,
                unique: true,
                group: None,
            },
        }
    }

    /// An indexed field participating in the named composite-unique group.
    #[must_use]
    pub const fn composite(name: &'static str, group: &'static str) -> Self {
        Self {
            name,
            index: FieldIndex {
                indexed: true,
                unique: false,
                group: Some(group),
            },
        }
    }
}

///
/// FieldIndex
///
/// Index flags for one field.
/// `unique` without `indexed` is accepted but never used for lookup.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct FieldIndex {
    pub indexed: bool,
    pub unique: bool,
    pub group: Option<&'static str>,
}

impl FieldIndex {
    pub const NONE: Self = Self {
        indexed: false,
        unique: false,
        group: None,
    };

    /// Indexed + unique + ungrouped.
    #[must_use]
    pub const fn is_single_unique(&self) -> bool {
        self.indexed && self.unique && self.group.is_none()
    }

    /// Indexed + grouped; returns the group name.
    #[must_use]
    pub const fn composite_group(&self) -> Option<&'static str> {
        if self.indexed { self.group } else { None }
    }
}
