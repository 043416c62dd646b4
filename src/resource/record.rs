//! Typed SmartRecruiters wire structures.
//!
//! Requests are built as immutable values per call and serialized with serde;
//! responses are parsed into the same structs. Secret values stay wrapped in
//! [`GuardedString`] until the serializer writes them onto the wire, so the
//! `Debug` output of any request is safe to log.

use crate::resource::value_objects::GuardedString;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Accept strings, numbers and booleans for scalar text fields.
///
/// The vendor is not consistent about quoting coordinates and codes.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s),
        Some(other) => Some(other.to_string()),
    })
}

fn serialize_secret<S>(secret: &Option<GuardedString>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match secret {
        Some(secret) => secret.access(|clear| serializer.serialize_str(clear)),
        None => serializer.serialize_none(),
    }
}

/// Nested `location` object of a vendor user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub region_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub postal_code: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub longitude: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub latitude: Option<String>,
}

impl Location {
    fn slot(&mut self, field: &str) -> Option<&mut Option<String>> {
        Some(match field {
            "country" => &mut self.country,
            "countryCode" => &mut self.country_code,
            "regionCode" => &mut self.region_code,
            "region" => &mut self.region,
            "city" => &mut self.city,
            "address" => &mut self.address,
            "postalCode" => &mut self.postal_code,
            "longitude" => &mut self.longitude,
            "latitude" => &mut self.latitude,
            _ => return None,
        })
    }

    /// Read a sub-field by its attribute name.
    pub fn get(&self, field: &str) -> Option<&str> {
        match field {
            "country" => self.country.as_deref(),
            "countryCode" => self.country_code.as_deref(),
            "regionCode" => self.region_code.as_deref(),
            "region" => self.region.as_deref(),
            "city" => self.city.as_deref(),
            "address" => self.address.as_deref(),
            "postalCode" => self.postal_code.as_deref(),
            "longitude" => self.longitude.as_deref(),
            "latitude" => self.latitude.as_deref(),
            _ => None,
        }
    }

    /// Write a sub-field by its attribute name. Unknown names are ignored.
    pub fn set(&mut self, field: &str, value: Option<String>) {
        if let Some(slot) = self.slot(field) {
            *slot = value;
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A user as returned by the vendor, either a list summary or a full detail.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorRecord {
    pub id: String,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub external_data: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub updated_on: Option<String>,
    #[serde(default, deserialize_with = "lenient_string", skip_serializing_if = "Option::is_none")]
    pub sso_identifier: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
}

/// One page of the user listing endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPage {
    #[serde(default)]
    pub total_found: u64,
    #[serde(default)]
    pub offset: u64,
    #[serde(default)]
    pub limit: u64,
    #[serde(default)]
    pub content: Vec<VendorRecord>,
}

/// Body of `POST <base>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sso_identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    #[serde(serialize_with = "serialize_secret", skip_serializing_if = "Option::is_none")]
    pub password: Option<GuardedString>,
}

/// JSON-Patch operation kinds the vendor accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatchOp {
    Add,
    Remove,
}

/// Value carried by an `add` operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchValue {
    Plain(String),
    Secret(GuardedString),
}

impl Serialize for PatchValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            PatchValue::Plain(value) => serializer.serialize_str(value),
            PatchValue::Secret(secret) => secret.access(|clear| serializer.serialize_str(clear)),
        }
    }
}

/// A single JSON-Patch operation (`application/json-patch+json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatchOperation {
    pub op: PatchOp,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<PatchValue>,
}

impl PatchOperation {
    /// `add` operation; `path` is a JSON pointer such as `/location/city`.
    pub fn add(path: impl Into<String>, value: PatchValue) -> Self {
        Self {
            op: PatchOp::Add,
            path: path.into(),
            value: Some(value),
        }
    }

    pub fn remove(path: impl Into<String>) -> Self {
        Self {
            op: PatchOp::Remove,
            path: path.into(),
            value: None,
        }
    }
}

/// Minimal response of create and patch calls.
#[derive(Debug, Clone, Deserialize)]
pub struct IdResponse {
    pub id: String,
}
