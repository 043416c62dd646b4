//! SmartRecruiters identity-provisioning connector for Rust.
//!
//! Bridges a generic provisioning framework to the SmartRecruiters user API:
//! framework account operations become vendor REST calls, and vendor JSON is
//! mapped back into framework attribute sets.
//!
//! # Core Components
//!
//! - [`SmartRecruitersConnector`] - Create, update, delete and search accounts
//! - [`RestTransport`] - Seam to the vendor, with [`HttpTransport`] and [`InMemoryVendor`]
//! - [`AttributeSet`] - Framework attribute bag exchanged with every operation
//! - [`Uid`] - Account identifier, possibly a conflict sentinel
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use smartrecruiters_connector::{SmartRecruitersConfig, SmartRecruitersConnector};
//! use smartrecruiters_connector::config::AuthMethod;
//! use smartrecruiters_connector::resource::GuardedString;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = SmartRecruitersConfig::default().with_auth(AuthMethod::Token {
//!     token_name: "X-SmartToken".to_string(),
//!     token_value: GuardedString::new("..."),
//! });
//! let connector = SmartRecruitersConnector::from_config(config)?;
//! connector.test().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod connector;
pub mod error;
pub mod resource;
pub mod schema;
pub mod transport;

// Re-export commonly used types for convenience
pub use config::{AuthMethod, SmartRecruitersConfig};
pub use connector::{Filter, SearchOptions, SearchQuery, SmartRecruitersConnector};
pub use error::{ConnectorError, ConnectorResult, ValidationError, ValidationResult};
pub use resource::{AttributeSet, AttributeValue, ConnectorObject, GuardedString, ObjectClass, Role, Uid};
pub use schema::ObjectClassInfo;
pub use transport::{HttpTransport, InMemoryVendor, RestTransport};
