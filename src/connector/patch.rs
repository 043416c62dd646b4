//! JSON-Patch construction for partial account updates.
//!
//! The vendor applies operations in order, so the builder walks a fixed table of
//! tracked attributes and emits at most one operation per entry:
//!
//! - a non-blank value produces `add`
//! - a key present with no usable value produces `remove`
//! - an absent key produces nothing
//!
//! `role` is special: a multi-valued `roles` attribute, when it names any known
//! role, replaces the single value with its strongest entry.

use crate::error::ValidationResult;
use crate::resource::attributes::{self, AttributeSet};
use crate::resource::record::{PatchOperation, PatchValue};
use crate::resource::value_objects::Role;

/// A tracked attribute and the vendor document path it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackedField {
    pub attribute: &'static str,
    path: Option<&'static str>,
}

impl TrackedField {
    const fn same(attribute: &'static str) -> Self {
        Self {
            attribute,
            path: None,
        }
    }

    const fn mapped(attribute: &'static str, path: &'static str) -> Self {
        Self {
            attribute,
            path: Some(path),
        }
    }

    /// Vendor path, defaulting to the attribute name.
    pub fn path(&self) -> &'static str {
        self.path.unwrap_or(self.attribute)
    }

    /// JSON pointer used in the patch document.
    pub fn pointer(&self) -> String {
        format!("/{}", self.path())
    }
}

/// Tracked attributes in emission order.
pub const TRACKED_FIELDS: [TrackedField; 17] = [
    TrackedField::same(attributes::FIRST_NAME),
    TrackedField::same(attributes::LAST_NAME),
    TrackedField::mapped(attributes::NAME, "email"),
    TrackedField::same(attributes::ROLE),
    TrackedField::same(attributes::EXTERNAL_DATA),
    TrackedField::same(attributes::UPDATED_ON),
    TrackedField::same(attributes::SSO_IDENTIFIER),
    TrackedField::mapped(attributes::COUNTRY, "location/country"),
    TrackedField::mapped(attributes::COUNTRY_CODE, "location/countryCode"),
    TrackedField::mapped(attributes::REGION_CODE, "location/regionCode"),
    TrackedField::mapped(attributes::REGION, "location/region"),
    TrackedField::mapped(attributes::CITY, "location/city"),
    TrackedField::mapped(attributes::ADDRESS, "location/address"),
    TrackedField::mapped(attributes::POSTAL_CODE, "location/postalCode"),
    TrackedField::mapped(attributes::LONGITUDE, "location/longitude"),
    TrackedField::mapped(attributes::LATITUDE, "location/latitude"),
    TrackedField::mapped(attributes::PASSWORD, "password"),
];

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .filter(|v| !v.trim().is_empty())
        .map(str::to_string)
}

/// Value to send for a tracked field, or `None` when it should be cleared.
fn value_for(attrs: &AttributeSet, field: &TrackedField) -> ValidationResult<Option<PatchValue>> {
    match field.attribute {
        attributes::PASSWORD => Ok(attrs
            .secret(attributes::PASSWORD)?
            .filter(|secret| !secret.is_blank())
            .cloned()
            .map(PatchValue::Secret)),
        attributes::ROLE => {
            let strongest = Role::strongest(attrs.strings(attributes::ROLES)?);
            Ok(match strongest {
                Some(role) => Some(PatchValue::Plain(role.as_str().to_string())),
                None => non_blank(attrs.string(attributes::ROLE)?).map(PatchValue::Plain),
            })
        }
        name => Ok(non_blank(attrs.string(name)?).map(PatchValue::Plain)),
    }
}

/// Build the ordered patch document for an update.
///
/// An empty result means there is nothing to send.
pub fn build_patch(attrs: &AttributeSet) -> ValidationResult<Vec<PatchOperation>> {
    let mut operations = Vec::new();

    for field in &TRACKED_FIELDS {
        match value_for(attrs, field)? {
            Some(value) => operations.push(PatchOperation::add(field.pointer(), value)),
            None if attrs.contains(field.attribute) => {
                operations.push(PatchOperation::remove(field.pointer()))
            }
            None => {}
        }
    }

    Ok(operations)
}

/// Render operations for logging with the password value masked.
pub fn describe(operations: &[PatchOperation]) -> String {
    operations
        .iter()
        .map(|op| match &op.value {
            Some(PatchValue::Plain(value)) => format!("add {}={}", op.path, value),
            Some(PatchValue::Secret(_)) => format!("add {}=********", op.path),
            None => format!("remove {}", op.path),
        })
        .collect::<Vec<_>>()
        .join(", ")
}
