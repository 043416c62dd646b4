//! The SmartRecruiters account connector.
//!
//! [`SmartRecruitersConnector`] exposes the operations a provisioning framework
//! invokes: connection test, schema, create, update, delete and search. Each
//! operation issues a strictly sequential chain of requests through its
//! [`RestTransport`] and holds no state between calls, so one connector can
//! serve concurrent operations.
//!
//! # Conflict sentinels
//!
//! When create or update collides with an e-mail address owned by an account in
//! another tenant, the operation succeeds and returns a sentinel [`Uid`]
//! (`CONFLICT|<email>|<uid>`) instead of failing. Activation follow-ups are
//! skipped for sentinels.
//!
//! # Examples
//!
//! ```rust
//! use smartrecruiters_connector::config::SmartRecruitersConfig;
//! use smartrecruiters_connector::connector::SmartRecruitersConnector;
//! use smartrecruiters_connector::resource::attributes::{self, AttributeSet, ObjectClass};
//! use smartrecruiters_connector::transport::InMemoryVendor;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let vendor = InMemoryVendor::new();
//! let config = SmartRecruitersConfig::new(vendor.service_address());
//! let connector = SmartRecruitersConnector::new(config, vendor)?;
//!
//! let attrs = AttributeSet::new()
//!     .with(attributes::NAME, "jane@example.com")
//!     .with(attributes::FIRST_NAME, "Jane")
//!     .with(attributes::LAST_NAME, "Doe")
//!     .with_values(attributes::ROLES, ["EMPLOYEE", "STANDARD"]);
//!
//! let uid = connector.create(&ObjectClass::account(), &attrs).await?;
//! assert!(!uid.is_conflict());
//! # Ok(())
//! # }
//! ```

pub mod conflict;
pub mod patch;
pub mod search;

pub use search::{Filter, SearchOptions, SearchQuery};

use crate::config::SmartRecruitersConfig;
use crate::error::{ConnectorError, ConnectorResult};
use crate::resource::attributes::{self, AttributeSet, ConnectorObject, ObjectClass};
use crate::resource::mapper::build_create_request;
use crate::resource::record::{CreateUserRequest, IdResponse, UserPage};
use crate::resource::value_objects::Uid;
use crate::schema::{self, ObjectClassInfo};
use crate::transport::{Endpoints, HttpTransport, RestRequest, RestResponse, RestTransport};
use conflict::classify_conflict;
use log::{debug, info, warn};
use search::SearchEngine;

/// Connector bound to one vendor tenant.
#[derive(Debug)]
pub struct SmartRecruitersConnector<T: RestTransport = HttpTransport> {
    config: SmartRecruitersConfig,
    endpoints: Endpoints,
    transport: T,
}

impl SmartRecruitersConnector<HttpTransport> {
    /// Connector talking to the live vendor over HTTP.
    pub fn from_config(config: SmartRecruitersConfig) -> ConnectorResult<Self> {
        let transport = HttpTransport::new(&config)?;
        Self::new(config, transport)
    }
}

impl<T: RestTransport> SmartRecruitersConnector<T> {
    /// Create a connector over an arbitrary transport.
    ///
    /// Fails when the configuration does not validate.
    pub fn new(config: SmartRecruitersConfig, transport: T) -> ConnectorResult<Self> {
        config.validate()?;
        let endpoints = Endpoints::new(&config.service_address)?;
        info!("SmartRecruiters connector initialized for {}", endpoints.base());
        Ok(Self {
            config,
            endpoints,
            transport,
        })
    }

    /// The configuration this connector was built with.
    pub fn config(&self) -> &SmartRecruitersConfig {
        &self.config
    }

    /// The transport requests are sent through.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn ensure_account(object_class: &ObjectClass) -> ConnectorResult<()> {
        if object_class.is_account() {
            Ok(())
        } else {
            Err(ConnectorError::UnsupportedObjectClass(
                object_class.name().to_string(),
            ))
        }
    }

    async fn send(&self, request: RestRequest) -> ConnectorResult<RestResponse> {
        debug!("Request URI: {}, method: {}", request.url, request.method);
        self.transport.execute(request).await
    }

    /// Verify the service is reachable with the configured credentials.
    pub async fn test(&self) -> ConnectorResult<()> {
        info!("Testing connection to {}", self.endpoints.base());
        let result = match self.send(RestRequest::get(self.endpoints.me())).await {
            Ok(response) => response.error_for_status().map(|_| ()),
            Err(e) => Err(e),
        };
        result.map_err(|e| match e {
            e @ ConnectorError::Io { .. } => e,
            other => ConnectorError::io_with_source("Connection test failed", other),
        })
    }

    pub async fn check_alive(&self) -> ConnectorResult<()> {
        self.test().await
    }

    /// The account object class as declared to the framework.
    pub fn schema(&self) -> ObjectClassInfo {
        schema::account_object_class()
    }

    /// Create an account, returning its uid or a conflict sentinel.
    pub async fn create(
        &self,
        object_class: &ObjectClass,
        attrs: &AttributeSet,
    ) -> ConnectorResult<Uid> {
        Self::ensure_account(object_class)?;
        debug!("Create user, attributes: {:?}", attrs);

        let request = build_create_request(attrs)?;
        let enable = attrs.boolean(attributes::ENABLE)?;

        self.ensure_email_unused(&request.email).await?;

        let without_password = CreateUserRequest {
            password: None,
            ..request.clone()
        };
        debug!(
            "User request (without password): {}",
            serde_json::to_string(&without_password)?
        );
        let body = serde_json::to_string(&request)?;

        let response = self
            .send(RestRequest::post_json(self.endpoints.users(), body))
            .await?;
        let uid = if response.is_conflict() {
            classify_conflict(
                &self.transport,
                &self.endpoints,
                &request.email,
                None,
                &response.body,
            )
            .await?
        } else {
            Self::returned_uid(response)?
        };
        info!("Created user {}", uid);

        if !uid.is_conflict() {
            info!("Activating account {}", uid);
            self.set_activation(&uid, true).await?;
            if enable != Some(true) {
                info!(
                    "Deactivating account {}, administrative status is {:?}",
                    uid, enable
                );
                self.set_activation(&uid, false).await?;
            }
        }

        Ok(uid)
    }

    /// Best-effort duplicate check before create.
    ///
    /// Only a visible exact match fails; any other problem is logged and the
    /// create call's own 409 handling decides.
    async fn ensure_email_unused(&self, email: &str) -> ConnectorResult<()> {
        let lookup = async {
            let response = self
                .send(RestRequest::get(self.endpoints.list(Some(email), None)))
                .await?
                .error_for_status()?;
            response.json::<UserPage>()
        };

        match lookup.await {
            Ok(page) => {
                let existing: Vec<&str> = page
                    .content
                    .iter()
                    .filter(|user| {
                        user.email
                            .as_deref()
                            .is_some_and(|candidate| attributes::same_email(candidate, email))
                    })
                    .map(|user| user.id.as_str())
                    .collect();
                if existing.is_empty() {
                    Ok(())
                } else {
                    Err(ConnectorError::already_exists(format!(
                        "User with e-mail address {} already exists: {}",
                        email,
                        existing.join(", ")
                    )))
                }
            }
            Err(e) => {
                warn!("Duplicate check for {} failed, continuing: {}", email, e);
                Ok(())
            }
        }
    }

    /// Apply a partial update, returning the uid or a conflict sentinel.
    ///
    /// Activation changes only when `__ENABLE__` is part of the change-set.
    pub async fn update(
        &self,
        object_class: &ObjectClass,
        uid: &Uid,
        attrs: &AttributeSet,
    ) -> ConnectorResult<Uid> {
        Self::ensure_account(object_class)?;
        debug!("Update user {}, attributes: {:?}", uid, attrs);

        if attrs.is_empty() {
            debug!("Request ignored, empty attributes");
            return Ok(uid.clone());
        }

        let operations = patch::build_patch(attrs)?;
        let enable = attrs.boolean(attributes::ENABLE)?;
        let email = attrs.string(attributes::NAME)?;

        let new_uid = if operations.is_empty() {
            info!("Nothing changed for {}, not sending a patch", uid);
            uid.clone()
        } else {
            debug!("User patch (without password): {}", patch::describe(&operations));
            let body = serde_json::to_string(&operations)?;
            let response = self
                .send(RestRequest::patch_json(self.endpoints.user(uid), body))
                .await?;

            if response.is_conflict() {
                match email {
                    Some(email) => {
                        classify_conflict(
                            &self.transport,
                            &self.endpoints,
                            email,
                            Some(uid),
                            &response.body,
                        )
                        .await?
                    }
                    None => return Err(ConnectorError::already_exists(response.body)),
                }
            } else {
                Self::returned_uid(response)?
            }
        };

        if !new_uid.is_conflict() {
            match enable {
                Some(true) => {
                    info!("Activating account {}", new_uid);
                    self.set_activation(&new_uid, true).await?;
                }
                Some(false) => {
                    info!("Deactivating account {}", new_uid);
                    self.set_activation(&new_uid, false).await?;
                }
                None => {}
            }
        }

        Ok(new_uid)
    }

    /// Deactivate an account. The vendor record itself is kept.
    pub async fn delete(&self, object_class: &ObjectClass, uid: &Uid) -> ConnectorResult<()> {
        Self::ensure_account(object_class)?;
        info!("Deleting (deactivating) user {}", uid);
        self.set_activation(uid, false).await
    }

    /// Run a search, handing each result to `sink` until it returns `false`.
    ///
    /// Returns the number of objects handed over.
    pub async fn execute_query<F>(
        &self,
        object_class: &ObjectClass,
        query: &SearchQuery,
        options: &SearchOptions,
        mut sink: F,
    ) -> ConnectorResult<u64>
    where
        F: FnMut(ConnectorObject) -> bool,
    {
        Self::ensure_account(object_class)?;
        info!("Execute query on {}, query: {:?}, options: {:?}", object_class, query, options);

        let engine = SearchEngine {
            transport: &self.transport,
            endpoints: &self.endpoints,
            config: &self.config,
        };
        engine.run(query, options, &mut sink).await
    }

    async fn set_activation(&self, uid: &Uid, active: bool) -> ConnectorResult<()> {
        let url = self.endpoints.activation(uid);
        let request = if active {
            RestRequest::put(url)
        } else {
            RestRequest::delete(url)
        };
        self.send(request).await?.error_for_status()?;
        Ok(())
    }

    fn returned_uid(response: RestResponse) -> ConnectorResult<Uid> {
        let response = response.error_for_status()?;
        let id: IdResponse = response.json()?;
        debug!("Response ID: {}", id.id);
        Uid::new(id.id)
            .map_err(|_| ConnectorError::invalid_response("Vendor returned an empty user id"))
    }
}
