//! Uid value object for vendor account identifiers.
//!
//! This module provides a type-safe wrapper around the identifiers the connector
//! hands back to the provisioning framework. A Uid is either a plain vendor
//! identifier or a *conflict sentinel* produced when a create or update collided
//! with an account that lives in another tenant and is invisible to this one.

use crate::error::{ValidationError, ValidationResult};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Marker substring that identifies a conflict sentinel.
pub const CONFLICT_MARKER: &str = "CONFLICT";

/// Separator between the parts of a conflict sentinel.
pub const CONFLICT_SEPARATOR: char = '|';

/// An account identifier returned by connector operations.
///
/// ## Conflict sentinels
///
/// A sentinel has the form `CONFLICT|<email>|<originalUidOrEmpty>`. Any Uid whose
/// value contains [`CONFLICT_MARKER`] is non-committal: no real account was
/// mutated and activation follow-ups must be skipped.
///
/// ## Examples
///
/// ```rust
/// use smartrecruiters_connector::resource::Uid;
///
/// fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let uid = Uid::new("2819c223-7f76-453a-919d-413861904646")?;
///     assert!(!uid.is_conflict());
///
///     let sentinel = Uid::conflict("alice@example.com", None);
///     assert_eq!(sentinel.as_str(), "CONFLICT|alice@example.com|");
///     assert!(sentinel.is_conflict());
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Uid(String);

impl Uid {
    /// Create a new Uid with validation.
    ///
    /// # Returns
    ///
    /// * `Ok(Uid)` - If the value is non-empty
    /// * `Err(ValidationError)` - If the value is empty or blank
    pub fn new(value: impl Into<String>) -> ValidationResult<Self> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::missing_required("__UID__"));
        }
        Ok(Self(value))
    }

    /// Build a conflict sentinel for `email`.
    ///
    /// `original` is the identifier targeted by an update, or `None` for creates.
    pub fn conflict(email: &str, original: Option<&Uid>) -> Self {
        let original = original.map(Uid::as_str).unwrap_or_default();
        Self(format!(
            "{CONFLICT_MARKER}{CONFLICT_SEPARATOR}{email}{CONFLICT_SEPARATOR}{original}"
        ))
    }

    /// Whether this identifier is a conflict sentinel.
    ///
    /// Recognition is by substring containment, not by layout.
    pub fn is_conflict(&self) -> bool {
        self.0.contains(CONFLICT_MARKER)
    }

    /// The e-mail address embedded in a conflict sentinel.
    pub fn conflict_email(&self) -> Option<&str> {
        let mut parts = self.0.split(CONFLICT_SEPARATOR);
        match (parts.next(), parts.next()) {
            (Some(CONFLICT_MARKER), Some(email)) if !email.is_empty() => Some(email),
            _ => None,
        }
    }

    /// Get the string representation of the Uid.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<String> for Uid {
    type Error = ValidationError;

    fn try_from(value: String) -> ValidationResult<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for Uid {
    type Error = ValidationError;

    fn try_from(value: &str) -> ValidationResult<Self> {
        Self::new(value)
    }
}

impl Serialize for Uid {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Uid {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::new(value).map_err(serde::de::Error::custom)
    }
}
