use crate::{
    model::{entity::EntityModel, field::EntityFieldModel},
    traits::{EntityKey, EntitySchema, EntityValue, FieldValue, FieldValues, Path},
    value::Value,
};

// Wires the identity traits for a fixture keyed by an `id: Option<u64>` field.
macro_rules! fixture_entity {
    ($entity:ident, $path:literal, $model:ident) => {
        impl Path for $entity {
            const PATH: &'static str = $path;
        }

        impl EntityKey for $entity {
            type Key = u64;
        }

        impl EntitySchema for $entity {
            const MODEL: &'static EntityModel = &$model;
        }

        impl EntityValue for $entity {
            fn primary_key(&self) -> Option<u64> {
                self.id
            }

            fn set_primary_key(&mut self, key: u64) {
                self.id = Some(key);
            }
        }
    };
}

///
/// Account
///
/// Two single-unique fields, no composite groups.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Account {
    pub(crate) id: Option<u64>,
    pub(crate) email: Option<String>,
    pub(crate) handle: Option<String>,
    pub(crate) name: String,
}

impl Account {
    pub(crate) fn new(email: &str, handle: &str) -> Self {
        Self {
            email: Some(email.to_string()),
            handle: Some(handle.to_string()),
            ..Self::default()
        }
    }

    pub(crate) fn with_id(mut self, id: u64) -> Self {
        self.id = Some(id);
        self
    }
}

static ACCOUNT_FIELDS: [EntityFieldModel; 4] = [
    EntityFieldModel::plain("id"),
    EntityFieldModel::unique("email"),
    EntityFieldModel::unique("handle"),
    EntityFieldModel::indexed("name"),
];

static ACCOUNT_MODEL: EntityModel = EntityModel {
    path: "test_support::Account",
    entity_name: "Account",
    primary_key: &ACCOUNT_FIELDS[0],
    fields: &ACCOUNT_FIELDS,
};

fixture_entity!(Account, "test_support::Account", ACCOUNT_MODEL);

impl FieldValues for Account {
    fn get_value(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(self.id.to_value()),
            "email" => Some(self.email.to_value()),
            "handle" => Some(self.handle.to_value()),
            "name" => Some(self.name.to_value()),
            _ => None,
        }
    }
}

///
/// Membership
///
/// Two composite groups plus a single-unique `code` that the default
/// lookup policy leaves out.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Membership {
    pub(crate) id: Option<u64>,
    pub(crate) org: Option<String>,
    pub(crate) code: Option<String>,
    pub(crate) member: Option<String>,
    pub(crate) region: Option<String>,
    pub(crate) seat: Option<u32>,
}

impl Membership {
    pub(crate) fn new(org: &str, member: &str, region: &str, seat: u32) -> Self {
        Self {
            org: Some(org.to_string()),
            member: Some(member.to_string()),
            region: Some(region.to_string()),
            seat: Some(seat),
            ..Self::default()
        }
    }
}

static MEMBERSHIP_FIELDS: [EntityFieldModel; 6] = [
    EntityFieldModel::plain("id"),
    EntityFieldModel::composite("org", "membership"),
    EntityFieldModel::unique("code"),
    EntityFieldModel::composite("member", "membership"),
    EntityFieldModel::composite("region", "seat"),
    EntityFieldModel::composite("seat", "seat"),
];

static MEMBERSHIP_MODEL: EntityModel = EntityModel {
    path: "test_support::Membership",
    entity_name: "Membership",
    primary_key: &MEMBERSHIP_FIELDS[0],
    fields: &MEMBERSHIP_FIELDS,
};

fixture_entity!(Membership, "test_support::Membership", MEMBERSHIP_MODEL);

impl FieldValues for Membership {
    fn get_value(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(self.id.to_value()),
            "org" => Some(self.org.to_value()),
            "code" => Some(self.code.to_value()),
            "member" => Some(self.member.to_value()),
            "region" => Some(self.region.to_value()),
            "seat" => Some(self.seat.to_value()),
            _ => None,
        }
    }
}

///
/// Listing
///
/// Plain queryable fields, no secondary identity.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Listing {
    pub(crate) id: Option<u64>,
    pub(crate) title: String,
}

impl Listing {
    pub(crate) fn new(id: u64, title: &str) -> Self {
        Self {
            id: Some(id),
            title: title.to_string(),
        }
    }
}

static LISTING_FIELDS: [EntityFieldModel; 8] = [
    EntityFieldModel::plain("id"),
    EntityFieldModel::plain("title"),
    EntityFieldModel::plain("fieldGroup0"),
    EntityFieldModel::plain("fieldGroup1"),
    EntityFieldModel::indexed("field0"),
    EntityFieldModel::indexed("field1"),
    EntityFieldModel::plain("field2"),
    EntityFieldModel::plain("field3"),
];

static LISTING_MODEL: EntityModel = EntityModel {
    path: "test_support::Listing",
    entity_name: "Listing",
    primary_key: &LISTING_FIELDS[0],
    fields: &LISTING_FIELDS,
};

fixture_entity!(Listing, "test_support::Listing", LISTING_MODEL);

impl FieldValues for Listing {
    fn get_value(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(self.id.to_value()),
            "title" => Some(self.title.to_value()),
            _ => None,
        }
    }
}

///
/// Wide
///
/// One composite group wider than the registry accepts.
///

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct Wide {
    pub(crate) id: Option<u64>,
}

static WIDE_FIELDS: [EntityFieldModel; 10] = [
    EntityFieldModel::plain("id"),
    EntityFieldModel::composite("w0", "wide"),
    EntityFieldModel::composite("w1", "wide"),
    EntityFieldModel::composite("w2", "wide"),
    EntityFieldModel::composite("w3", "wide"),
    EntityFieldModel::composite("w4", "wide"),
    EntityFieldModel::composite("w5", "wide"),
    EntityFieldModel::composite("w6", "wide"),
    EntityFieldModel::composite("w7", "wide"),
    EntityFieldModel::composite("w8", "wide"),
];

static WIDE_MODEL: EntityModel = EntityModel {
    path: "test_support::Wide",
    entity_name: "Wide",
    primary_key: &WIDE_FIELDS[0],
    fields: &WIDE_FIELDS,
};

fixture_entity!(Wide, "test_support::Wide", WIDE_MODEL);

impl FieldValues for Wide {
    fn get_value(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(self.id.to_value()),
            _ => None,
        }
    }
}
