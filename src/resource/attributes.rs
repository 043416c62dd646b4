//! Generic attribute model exchanged with the provisioning framework.
//!
//! The framework speaks in loosely typed "bags of attributes": each name maps to
//! one or many values that are strings, booleans or secrets. [`AttributeSet`] is
//! that bag for inbound operations and [`ConnectorObject`] wraps it with identity
//! for search results.

use crate::error::{ValidationError, ValidationResult};
use crate::resource::value_objects::{GuardedString, Uid};
use std::collections::BTreeMap;
use std::fmt;

/// Framework attribute carrying the account identifier.
pub const UID: &str = "__UID__";
/// Framework naming attribute; for this connector it is the e-mail address.
pub const NAME: &str = "__NAME__";
/// Framework password attribute (secret, write-only).
pub const PASSWORD: &str = "__PASSWORD__";
/// Framework administrative status attribute.
pub const ENABLE: &str = "__ENABLE__";

pub const FIRST_NAME: &str = "firstName";
pub const LAST_NAME: &str = "lastName";
/// Single-valued role as stored by the vendor.
pub const ROLE: &str = "role";
/// Multi-valued candidate roles; the strongest one is sent to the vendor.
pub const ROLES: &str = "roles";
pub const EXTERNAL_DATA: &str = "externalData";
pub const UPDATED_ON: &str = "updatedOn";
pub const SSO_IDENTIFIER: &str = "ssoIdentifier";
/// Read-only flag set on objects that stand for a cross-tenant e-mail conflict.
pub const EMAIL_CONFLICT: &str = "emailConflict";

pub const COUNTRY: &str = "country";
pub const COUNTRY_CODE: &str = "countryCode";
pub const REGION_CODE: &str = "regionCode";
pub const REGION: &str = "region";
pub const CITY: &str = "city";
pub const ADDRESS: &str = "address";
pub const POSTAL_CODE: &str = "postalCode";
pub const LONGITUDE: &str = "longitude";
pub const LATITUDE: &str = "latitude";

/// Location sub-fields in vendor declaration order.
pub const LOCATION_FIELDS: [&str; 9] = [
    COUNTRY,
    COUNTRY_CODE,
    REGION_CODE,
    REGION,
    CITY,
    ADDRESS,
    POSTAL_CODE,
    LONGITUDE,
    LATITUDE,
];

/// Whether `name` is one of the nested location attributes.
pub fn is_location_attribute(name: &str) -> bool {
    LOCATION_FIELDS.contains(&name)
}

/// Case-insensitive e-mail comparison, Unicode aware.
pub fn same_email(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

/// A single attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    String(String),
    Boolean(bool),
    Secret(GuardedString),
}

impl AttributeValue {
    fn type_name(&self) -> &'static str {
        match self {
            AttributeValue::String(_) => "string",
            AttributeValue::Boolean(_) => "boolean",
            AttributeValue::Secret(_) => "secret",
        }
    }

    /// Get as a string slice if this is a string value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::String(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::String(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Boolean(value)
    }
}

impl From<GuardedString> for AttributeValue {
    fn from(value: GuardedString) -> Self {
        AttributeValue::Secret(value)
    }
}

/// A set of named, possibly multi-valued attributes.
///
/// An attribute present with no values is meaningful: on update it asks for the
/// vendor field to be cleared.
///
/// ```rust
/// use smartrecruiters_connector::resource::attributes::{self, AttributeSet};
///
/// let attrs = AttributeSet::new()
///     .with(attributes::NAME, "a@b.com")
///     .with_values(attributes::ROLES, ["EMPLOYEE", "STANDARD"])
///     .with_empty(attributes::EXTERNAL_DATA);
///
/// assert_eq!(attrs.string(attributes::NAME).unwrap(), Some("a@b.com"));
/// assert!(attrs.contains(attributes::EXTERNAL_DATA));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSet {
    attributes: BTreeMap<String, Vec<AttributeValue>>,
}

impl AttributeSet {
    /// Create a new empty attribute set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a single-valued attribute, replacing previous values.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) {
        self.attributes.insert(name.into(), vec![value.into()]);
    }

    /// Set a multi-valued attribute, replacing previous values.
    pub fn set_values<I, V>(&mut self, name: impl Into<String>, values: I)
    where
        I: IntoIterator<Item = V>,
        V: Into<AttributeValue>,
    {
        self.attributes
            .insert(name.into(), values.into_iter().map(Into::into).collect());
    }

    /// Append a value to an attribute.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) {
        self.attributes
            .entry(name.into())
            .or_default()
            .push(value.into());
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Builder form of [`set_values`](Self::set_values).
    pub fn with_values<I, V>(mut self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<AttributeValue>,
    {
        self.set_values(name, values);
        self
    }

    /// Mark an attribute as present without values.
    pub fn with_empty(mut self, name: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), Vec::new());
        self
    }

    /// Whether the attribute key is present, regardless of its values.
    pub fn contains(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Raw values of an attribute.
    pub fn values(&self, name: &str) -> Option<&[AttributeValue]> {
        self.attributes.get(name).map(Vec::as_slice)
    }

    /// First value of a single-valued string attribute.
    ///
    /// Fails when the attribute holds a non-string value.
    pub fn string(&self, name: &str) -> ValidationResult<Option<&str>> {
        match self.first(name) {
            None => Ok(None),
            Some(AttributeValue::String(s)) => Ok(Some(s)),
            Some(other) => Err(ValidationError::invalid_type(name, "string", other.type_name())),
        }
    }

    /// All values of a multi-valued string attribute.
    pub fn strings(&self, name: &str) -> ValidationResult<Vec<&str>> {
        self.values(name)
            .unwrap_or_default()
            .iter()
            .map(|value| {
                value
                    .as_str()
                    .ok_or_else(|| ValidationError::invalid_type(name, "string", value.type_name()))
            })
            .collect()
    }

    /// First value of a boolean attribute.
    pub fn boolean(&self, name: &str) -> ValidationResult<Option<bool>> {
        match self.first(name) {
            None => Ok(None),
            Some(AttributeValue::Boolean(b)) => Ok(Some(*b)),
            Some(other) => Err(ValidationError::invalid_type(name, "boolean", other.type_name())),
        }
    }

    /// First value of a secret attribute.
    pub fn secret(&self, name: &str) -> ValidationResult<Option<&GuardedString>> {
        match self.first(name) {
            None => Ok(None),
            Some(AttributeValue::Secret(s)) => Ok(Some(s)),
            Some(other) => Err(ValidationError::invalid_type(name, "secret", other.type_name())),
        }
    }

    fn first(&self, name: &str) -> Option<&AttributeValue> {
        self.attributes.get(name).and_then(|values| values.first())
    }

    /// Iterate over attribute names.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// Get the number of attributes.
    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    /// Check if the set is empty.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}

/// The account object class name.
pub const ACCOUNT_NAME: &str = "__ACCOUNT__";

/// Object class an operation is invoked for.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectClass(String);

impl ObjectClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The only object class this connector supports.
    pub fn account() -> Self {
        Self(ACCOUNT_NAME.to_string())
    }

    pub fn is_account(&self) -> bool {
        self.0 == ACCOUNT_NAME
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ObjectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An account as returned from search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorObject {
    uid: Uid,
    name: Option<String>,
    attributes: AttributeSet,
}

impl ConnectorObject {
    /// Create an object with only its identity set.
    pub fn new(uid: Uid) -> Self {
        Self {
            uid,
            name: None,
            attributes: AttributeSet::new(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Append a value to an attribute.
    pub fn add_attribute(&mut self, name: impl Into<String>, value: impl Into<AttributeValue>) {
        self.attributes.add(name, value);
    }

    pub fn uid(&self) -> &Uid {
        &self.uid
    }

    /// The naming attribute (e-mail address).
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn attributes(&self) -> &AttributeSet {
        &self.attributes
    }

    /// Convenience accessor for single string attributes.
    pub fn string(&self, name: &str) -> Option<&str> {
        self.attributes.string(name).ok().flatten()
    }

    /// Administrative status, if the vendor reported one.
    pub fn enabled(&self) -> Option<bool> {
        self.attributes.boolean(ENABLE).ok().flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_typed_getters() {
        let attrs = AttributeSet::new()
            .with(NAME, "a@b.com")
            .with(ENABLE, true)
            .with(PASSWORD, GuardedString::new("secret"));

        assert_eq!(attrs.string(NAME).unwrap(), Some("a@b.com"));
        assert_eq!(attrs.boolean(ENABLE).unwrap(), Some(true));
        assert_eq!(attrs.secret(PASSWORD).unwrap().map(|s| s.reveal()), Some("secret".to_string()));
        assert_eq!(attrs.string(FIRST_NAME).unwrap(), None);
    }

    #[test]
    fn test_type_mismatch_is_validation_error() {
        let attrs = AttributeSet::new().with(ENABLE, "yes");
        let err = attrs.boolean(ENABLE).unwrap_err();
        assert_eq!(err, ValidationError::invalid_type(ENABLE, "boolean", "string"));
    }

    #[test]
    fn test_present_but_empty() {
        let attrs = AttributeSet::new().with_empty(CITY);
        assert!(attrs.contains(CITY));
        assert_eq!(attrs.string(CITY).unwrap(), None);
        assert!(attrs.strings(CITY).unwrap().is_empty());
    }

    #[test]
    fn test_multi_valued() {
        let mut attrs = AttributeSet::new().with_values(ROLES, ["EMPLOYEE", "STANDARD"]);
        attrs.add(ROLES, "EXTENDED");
        assert_eq!(attrs.strings(ROLES).unwrap(), vec!["EMPLOYEE", "STANDARD", "EXTENDED"]);
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn test_location_attribute_detection() {
        assert!(is_location_attribute(CITY));
        assert!(is_location_attribute(LATITUDE));
        assert!(!is_location_attribute(FIRST_NAME));
    }

    #[test]
    fn test_same_email_ignores_unicode_case() {
        assert!(same_email("Ärni@X.com", "ärni@x.com"));
        assert!(same_email("ALICE@x.com", "alice@X.COM"));
        assert!(!same_email("alice@x.com", "malice@x.com"));
    }

    #[test]
    fn test_object_class() {
        assert!(ObjectClass::account().is_account());
        assert!(!ObjectClass::new("__GROUP__").is_account());
    }
}
