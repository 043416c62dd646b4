//! Error types for connector operations.
//!
//! This module provides the error taxonomy surfaced to the hosting provisioning
//! framework. Every public operation returns [`ConnectorResult`], and each variant
//! maps onto one failure class the framework understands: validation failures,
//! duplicate accounts, unknown identifiers and I/O failures.
//!
//! A conflict with an account hidden in another tenant is deliberately *not* an
//! error; it is reported through a conflict sentinel [`Uid`](crate::resource::Uid).

/// Main error type for connector operations.
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    /// Attribute set doesn't satisfy the account schema
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// An account with the same e-mail address is visible in the vendor system
    #[error("Account already exists: {message}")]
    AlreadyExists { message: String },

    /// The vendor answered 404 for an account resource
    #[error("Unknown account: {resource}")]
    UnknownUid { resource: String },

    /// Transport failure or unexpected HTTP status
    #[error("Connector I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Operation invoked for an object class other than accounts
    #[error("Unsupported object class: {0}")]
    UnsupportedObjectClass(String),

    /// Connector configuration is unusable
    #[error("Invalid configuration: {message}")]
    InvalidConfiguration { message: String },

    /// Vendor response is missing expected fields
    #[error("Invalid vendor response: {message}")]
    InvalidResponse { message: String },

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Validation errors for account attribute sets.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// Mandatory attribute is missing or blank
    #[error("Missing mandatory attribute '{attribute}'")]
    MissingRequiredAttribute { attribute: String },

    /// Attribute value has an unexpected type
    #[error("Attribute '{attribute}' has invalid type, expected {expected}, got {actual}")]
    InvalidAttributeType {
        attribute: String,
        expected: String,
        actual: String,
    },

    /// General validation error with custom message
    #[error("Validation failed: {message}")]
    Custom { message: String },
}

impl ConnectorError {
    /// Create an already-exists error
    pub fn already_exists(message: impl Into<String>) -> Self {
        Self::AlreadyExists {
            message: message.into(),
        }
    }

    /// Create an unknown account error for the given resource locator
    pub fn unknown_uid(resource: impl Into<String>) -> Self {
        Self::UnknownUid {
            resource: resource.into(),
        }
    }

    /// Create an I/O error without an underlying cause
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
            source: None,
        }
    }

    /// Create an I/O error wrapping its cause
    pub fn io_with_source<E>(message: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::Io {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_configuration(message: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            message: message.into(),
        }
    }

    /// Create an invalid response error
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// True for transport failures and unexpected statuses.
    pub fn is_io(&self) -> bool {
        matches!(self, Self::Io { .. })
    }
}

impl ValidationError {
    /// Create a missing required attribute error
    pub fn missing_required(attribute: impl Into<String>) -> Self {
        Self::MissingRequiredAttribute {
            attribute: attribute.into(),
        }
    }

    /// Create an invalid type error
    pub fn invalid_type(
        attribute: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self::InvalidAttributeType {
            attribute: attribute.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }

    /// Create a custom validation error
    pub fn custom(message: impl Into<String>) -> Self {
        Self::Custom {
            message: message.into(),
        }
    }
}

// Result type aliases for convenience
pub type ConnectorResult<T> = Result<T, ConnectorError>;
pub type ValidationResult<T> = Result<T, ValidationError>;
