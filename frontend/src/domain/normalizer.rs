//! Field-selection normalizer for user records.
//!
//! Features declare the user fields they consume as a [`FieldSelection`]; the
//! functions here discard everything else as early as possible. Both
//! functions are pure: no I/O, no validation, and a field the input lacks is
//! simply left out of the result.

use std::collections::BTreeSet;

use serde::Serialize;
use serde_json::{Map, Value};

use super::WireUser;

/// Selectable user field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum UserField {
    Id,
    FirstName,
    LastName,
    CreatedAt,
    UpdatedAt,
}

impl UserField {
    /// Every selectable field, in wire order.
    pub const ALL: [Self; 5] = [
        Self::Id,
        Self::FirstName,
        Self::LastName,
        Self::CreatedAt,
        Self::UpdatedAt,
    ];

    /// Key used for this field in wire payloads.
    pub const fn wire_name(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::FirstName => "firstName",
            Self::LastName => "lastName",
            Self::CreatedAt => "createdAt",
            Self::UpdatedAt => "updatedAt",
        }
    }
}

/// Set of fields a feature declares it needs.
///
/// # Examples
/// ```
/// use frontend::domain::{FieldSelection, UserField};
///
/// let selection = FieldSelection::new([UserField::Id, UserField::FirstName]);
/// assert!(selection.contains(UserField::Id));
/// assert!(!selection.contains(UserField::CreatedAt));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldSelection {
    fields: BTreeSet<UserField>,
}

impl FieldSelection {
    pub fn new(fields: impl IntoIterator<Item = UserField>) -> Self {
        Self {
            fields: fields.into_iter().collect(),
        }
    }

    /// Selection covering every field.
    pub fn all() -> Self {
        Self::new(UserField::ALL)
    }

    pub fn contains(&self, field: UserField) -> bool {
        self.fields.contains(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Selected fields in wire order.
    pub fn iter(&self) -> impl Iterator<Item = UserField> + '_ {
        self.fields.iter().copied()
    }
}

impl FromIterator<UserField> for FieldSelection {
    fn from_iter<I: IntoIterator<Item = UserField>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Reduced user record holding only selected fields.
///
/// Unselected fields are `None` and are omitted when serialised. Timestamps
/// stay in their wire text form; parsing them is the service's concern.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProjection {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

/// Project a wire record onto a field selection.
///
/// # Examples
/// ```
/// use frontend::domain::{FieldSelection, UserField, WireUser, normalize_user};
///
/// let wire = WireUser::new(1, "Ada", "Lovelace", "1970-01-01T00:00:00Z", "1970-01-01T00:00:00Z");
/// let projection = normalize_user(&wire, &FieldSelection::new([UserField::LastName]));
/// assert_eq!(projection.last_name.as_deref(), Some("Lovelace"));
/// assert!(projection.id.is_none());
/// ```
pub fn normalize_user(record: &WireUser, selection: &FieldSelection) -> UserProjection {
    let keep = |field: UserField| selection.contains(field);
    UserProjection {
        id: keep(UserField::Id).then_some(record.id()),
        first_name: keep(UserField::FirstName).then(|| record.first_name().to_owned()),
        last_name: keep(UserField::LastName).then(|| record.last_name().to_owned()),
        created_at: keep(UserField::CreatedAt).then(|| record.created_at().to_owned()),
        updated_at: keep(UserField::UpdatedAt).then(|| record.updated_at().to_owned()),
    }
}

/// Trim a raw JSON payload, possibly a superset of [`WireUser`], down to the
/// selected wire keys.
///
/// Keys the payload lacks are omitted. A payload that is not a JSON object
/// yields an empty map.
pub fn normalize_payload(payload: &Value, selection: &FieldSelection) -> Map<String, Value> {
    let Some(object) = payload.as_object() else {
        return Map::new();
    };

    selection
        .iter()
        .filter_map(|field| {
            let key = field.wire_name();
            object
                .get(key)
                .map(|value| (key.to_owned(), value.clone()))
        })
        .collect()
}
