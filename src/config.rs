//! Connector configuration.
//!
//! The configuration is immutable once built and passed by reference into every
//! operation. It can be deserialized from the host's configuration document or
//! assembled with the fluent `with_*` methods.
//!
//! # Examples
//!
//! ```rust
//! use smartrecruiters_connector::config::{AuthMethod, SmartRecruitersConfig};
//! use smartrecruiters_connector::resource::GuardedString;
//!
//! let config = SmartRecruitersConfig::new("https://api.smartrecruiters.com/users")
//!     .with_auth(AuthMethod::Token {
//!         token_name: "X-SmartToken".to_string(),
//!         token_value: GuardedString::new("secret"),
//!     })
//!     .with_page_size(50)
//!     .with_read_location(false);
//!
//! assert!(config.validate().is_ok());
//! assert!(!format!("{:?}", config).contains("secret"));
//! ```

use crate::error::{ConnectorError, ConnectorResult};
use crate::resource::GuardedString;
use serde::Deserialize;

/// Default vendor endpoint for user management.
pub const DEFAULT_SERVICE_ADDRESS: &str = "https://api.smartrecruiters.com/users";

/// Default number of users fetched per page during a full scan.
pub const DEFAULT_PAGE_SIZE: u32 = 100;

/// How requests authenticate against the vendor.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(tag = "method", rename_all = "lowercase")]
pub enum AuthMethod {
    /// No authentication header.
    #[default]
    None,
    /// HTTP basic authentication.
    Basic {
        username: String,
        password: GuardedString,
    },
    /// Token sent in a custom header, e.g. `X-SmartToken`.
    Token {
        token_name: String,
        token_value: GuardedString,
    },
}

/// Configuration for a SmartRecruiters connector instance.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SmartRecruitersConfig {
    /// Base address of the user endpoint, without a trailing query.
    pub service_address: String,

    pub auth: AuthMethod,

    /// Page size for unbounded scans.
    pub page_size: u32,

    /// Fetch each user's detail record to populate location attributes.
    pub read_location: bool,

    /// Skip TLS certificate verification.
    pub trust_all_certificates: bool,

    pub connect_timeout_secs: u64,

    pub request_timeout_secs: u64,
}

impl Default for SmartRecruitersConfig {
    fn default() -> Self {
        Self {
            service_address: DEFAULT_SERVICE_ADDRESS.to_string(),
            auth: AuthMethod::None,
            page_size: DEFAULT_PAGE_SIZE,
            read_location: true,
            trust_all_certificates: false,
            connect_timeout_secs: 10,
            request_timeout_secs: 30,
        }
    }
}

impl SmartRecruitersConfig {
    /// Create a configuration for the given service address with defaults.
    pub fn new(service_address: impl Into<String>) -> Self {
        Self {
            service_address: service_address.into(),
            ..Self::default()
        }
    }

    /// Parse a JSON configuration document.
    pub fn from_json(document: &str) -> ConnectorResult<Self> {
        let config: Self = serde_json::from_str(document).map_err(|e| {
            ConnectorError::invalid_configuration(format!("Unparseable configuration: {}", e))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn with_auth(mut self, auth: AuthMethod) -> Self {
        self.auth = auth;
        self
    }

    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_read_location(mut self, read_location: bool) -> Self {
        self.read_location = read_location;
        self
    }

    pub fn with_trust_all_certificates(mut self, trust: bool) -> Self {
        self.trust_all_certificates = trust;
        self
    }

    /// Validate the configuration.
    ///
    /// Ensures the service address is an http(s) URL and the page size is usable.
    pub fn validate(&self) -> ConnectorResult<()> {
        if self.service_address.trim().is_empty() {
            return Err(ConnectorError::invalid_configuration(
                "Service address cannot be empty",
            ));
        }

        if !self.service_address.starts_with("http://")
            && !self.service_address.starts_with("https://")
        {
            return Err(ConnectorError::invalid_configuration(
                "Service address must start with http:// or https://",
            ));
        }

        if self.page_size == 0 {
            return Err(ConnectorError::invalid_configuration(
                "Page size must be greater than zero",
            ));
        }

        match &self.auth {
            AuthMethod::Token { token_name, .. } if token_name.trim().is_empty() => Err(
                ConnectorError::invalid_configuration("Token header name cannot be empty"),
            ),
            AuthMethod::Basic { username, .. } if username.trim().is_empty() => Err(
                ConnectorError::invalid_configuration("Basic auth username cannot be empty"),
            ),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SmartRecruitersConfig::default();
        assert_eq!(config.page_size, 100);
        assert!(config.read_location);
        assert_eq!(config.auth, AuthMethod::None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = SmartRecruitersConfig::default();

        config.service_address = "".to_string();
        assert!(config.validate().is_err());

        config.service_address = "ftp://example.com/users".to_string();
        assert!(config.validate().is_err());

        config.service_address = "https://example.com/users".to_string();
        config.page_size = 0;
        assert!(config.validate().is_err());

        config.page_size = 10;
        config.auth = AuthMethod::Token {
            token_name: " ".to_string(),
            token_value: GuardedString::new("t"),
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_from_json_with_token_auth() {
        let config = SmartRecruitersConfig::from_json(
            r#"{
                "serviceAddress": "https://api.smartrecruiters.com/users",
                "auth": {"method": "token", "token_name": "X-SmartToken", "token_value": "abc"},
                "pageSize": 25
            }"#,
        )
        .unwrap();

        assert_eq!(config.page_size, 25);
        assert!(config.read_location);
        match &config.auth {
            AuthMethod::Token {
                token_name,
                token_value,
            } => {
                assert_eq!(token_name, "X-SmartToken");
                assert_eq!(token_value.reveal(), "abc");
            }
            other => panic!("Expected token auth, got: {:?}", other),
        }
    }

    #[test]
    fn test_from_json_rejects_invalid() {
        assert!(SmartRecruitersConfig::from_json(r#"{"pageSize": 0}"#).is_err());
        assert!(SmartRecruitersConfig::from_json("not json").is_err());
    }

    #[test]
    fn test_debug_hides_secrets() {
        let config = SmartRecruitersConfig::default().with_auth(AuthMethod::Basic {
            username: "admin".to_string(),
            password: GuardedString::new("hunter2"),
        });
        let rendered = format!("{:?}", config);
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("hunter2"));
    }
}
