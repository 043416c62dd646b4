//! Schema type definitions for the object classes the connector declares.

use serde::{Deserialize, Serialize};

/// Value type of an attribute.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum AttributeType {
    #[default]
    String,
    Boolean,
    /// Secret value, never returned
    GuardedString,
}

/// Attribute mutability characteristics.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Mutability {
    /// Managed by the connector or vendor
    ReadOnly,
    /// Can be set on create and changed on update
    #[default]
    ReadWrite,
    /// Can be set but never read back (passwords)
    WriteOnly,
}

/// Definition of a single attribute of an object class.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AttributeInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub data_type: AttributeType,
    pub multi_valued: bool,
    pub required: bool,
    pub mutability: Mutability,
    /// Whether search results include the attribute unless asked otherwise
    pub returned_by_default: bool,
}

impl AttributeInfo {
    /// Single-valued, optional, read-write string returned by default.
    pub fn string(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: AttributeType::String,
            multi_valued: false,
            required: false,
            mutability: Mutability::ReadWrite,
            returned_by_default: true,
        }
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self {
            data_type: AttributeType::Boolean,
            ..Self::string(name)
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn multi_valued(mut self) -> Self {
        self.multi_valued = true;
        self
    }

    pub fn with_mutability(mut self, mutability: Mutability) -> Self {
        self.mutability = mutability;
        self
    }

    pub fn not_returned_by_default(mut self) -> Self {
        self.returned_by_default = false;
        self
    }

    pub fn is_createable(&self) -> bool {
        self.mutability != Mutability::ReadOnly
    }

    pub fn is_updateable(&self) -> bool {
        self.mutability != Mutability::ReadOnly
    }

    pub fn is_readable(&self) -> bool {
        self.mutability != Mutability::WriteOnly
    }
}

/// An object class with its attribute definitions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ObjectClassInfo {
    pub name: String,
    pub attributes: Vec<AttributeInfo>,
}

impl ObjectClassInfo {
    /// Look up an attribute definition by name.
    pub fn attribute(&self, name: &str) -> Option<&AttributeInfo> {
        self.attributes.iter().find(|attr| attr.name == name)
    }

    /// Names of attributes included in results by default.
    pub fn returned_by_default(&self) -> Vec<&str> {
        self.attributes
            .iter()
            .filter(|attr| attr.returned_by_default)
            .map(|attr| attr.name.as_str())
            .collect()
    }
}
