//! Mapping between framework attribute sets and SmartRecruiters JSON.
//!
//! Two directions are covered:
//!
//! - [`build_create_request`] turns an inbound [`AttributeSet`] into the body of
//!   `POST <base>`, enforcing the mandatory fields.
//! - [`to_connector_object`] turns a [`VendorRecord`] into the framework's
//!   [`ConnectorObject`], flattening the nested location and mirroring the single
//!   vendor role into the multi-valued `roles` attribute.

use crate::error::{ConnectorError, ConnectorResult, ValidationError, ValidationResult};
use crate::resource::attributes::{self, AttributeSet, ConnectorObject, LOCATION_FIELDS};
use crate::resource::record::{CreateUserRequest, Location, VendorRecord};
use crate::resource::value_objects::{Role, Uid};

/// Resolve the role to send to the vendor.
///
/// A non-empty `roles` attribute wins over `role`: its strongest recognised entry
/// replaces whatever single role was given. Returns the single `role` untouched
/// when `roles` is absent or matches nothing.
pub fn resolve_role(attrs: &AttributeSet) -> ValidationResult<Option<String>> {
    let strongest = Role::strongest(attrs.strings(attributes::ROLES)?);
    match strongest {
        Some(role) => Ok(Some(role.as_str().to_string())),
        None => Ok(attrs.string(attributes::ROLE)?.map(str::to_string)),
    }
}

fn required(attrs: &AttributeSet, name: &str) -> ValidationResult<String> {
    match attrs.string(name)? {
        Some(value) if !value.trim().is_empty() => Ok(value.to_string()),
        _ => Err(ValidationError::missing_required(name)),
    }
}

fn optional(attrs: &AttributeSet, name: &str) -> ValidationResult<Option<String>> {
    Ok(attrs.string(name)?.map(str::to_string))
}

/// Collect location sub-fields into a nested object, if any are present.
fn location_from(attrs: &AttributeSet) -> ValidationResult<Option<Location>> {
    let mut location = Location::default();
    for field in LOCATION_FIELDS {
        location.set(field, optional(attrs, field)?);
    }
    Ok((!location.is_empty()).then_some(location))
}

/// Build the create body from an attribute set.
///
/// Fails with a validation error naming the first missing or blank mandatory
/// attribute, checked in the order e-mail, first name, last name, role.
pub fn build_create_request(attrs: &AttributeSet) -> ValidationResult<CreateUserRequest> {
    let email = required(attrs, attributes::NAME)?;
    let first_name = required(attrs, attributes::FIRST_NAME)?;
    let last_name = required(attrs, attributes::LAST_NAME)?;
    let role = match resolve_role(attrs)? {
        Some(role) if !role.trim().is_empty() => role,
        _ => return Err(ValidationError::missing_required(attributes::ROLE)),
    };

    Ok(CreateUserRequest {
        email,
        first_name,
        last_name,
        role,
        external_data: optional(attrs, attributes::EXTERNAL_DATA)?,
        updated_on: optional(attrs, attributes::UPDATED_ON)?,
        sso_identifier: optional(attrs, attributes::SSO_IDENTIFIER)?,
        location: location_from(attrs)?,
        password: attrs.secret(attributes::PASSWORD)?.cloned(),
    })
}

fn add_if_present(object: &mut ConnectorObject, name: &str, value: Option<&str>) {
    if let Some(value) = value {
        object.add_attribute(name, value);
    }
}

/// Convert a vendor record to a connector object.
pub fn to_connector_object(record: &VendorRecord) -> ConnectorResult<ConnectorObject> {
    let uid = Uid::new(record.id.as_str())
        .map_err(|_| ConnectorError::invalid_response("User record without an id"))?;

    let mut object = ConnectorObject::new(uid);
    if let Some(email) = &record.email {
        object = object.with_name(email.as_str());
    }

    add_if_present(&mut object, attributes::FIRST_NAME, record.first_name.as_deref());
    add_if_present(&mut object, attributes::LAST_NAME, record.last_name.as_deref());
    add_if_present(&mut object, attributes::EXTERNAL_DATA, record.external_data.as_deref());
    add_if_present(&mut object, attributes::UPDATED_ON, record.updated_on.as_deref());
    add_if_present(&mut object, attributes::SSO_IDENTIFIER, record.sso_identifier.as_deref());
    add_if_present(&mut object, attributes::ROLE, record.role.as_deref());
    add_if_present(&mut object, attributes::ROLES, record.role.as_deref());

    if let Some(location) = &record.location {
        for field in LOCATION_FIELDS {
            add_if_present(&mut object, field, location.get(field));
        }
    }

    if let Some(active) = record.active {
        object.add_attribute(attributes::ENABLE, active);
    }

    Ok(object)
}

/// Synthetic object standing for a conflict sentinel.
///
/// The vendor cannot be asked about the hidden account, so the object carries
/// only the sentinel, the e-mail it embeds and the `emailConflict` flag.
pub fn conflict_object(uid: &Uid) -> ConnectorObject {
    let mut object = ConnectorObject::new(uid.clone());
    if let Some(email) = uid.conflict_email() {
        object = object.with_name(email);
    }
    object.add_attribute(attributes::EMAIL_CONFLICT, true);
    object
}
