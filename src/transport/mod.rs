//! REST transport seam between the connector and the vendor API.
//!
//! The connector never talks to an HTTP client directly. It builds
//! [`RestRequest`] values, hands them to a [`RestTransport`] and interprets the
//! returned [`RestResponse`]. Two transports ship with the crate:
//!
//! * [`HttpTransport`] - `reqwest` client for the real vendor
//! * [`InMemoryVendor`] - in-process simulation for tests and offline work
//!
//! Status classification lives on [`RestResponse`]: 2xx passes, 404 becomes
//! [`ConnectorError::UnknownUid`], anything else becomes an I/O failure. Callers
//! that treat 409 specially check [`RestResponse::is_conflict`] first.

pub mod http;
pub mod in_memory;

pub use http::HttpTransport;
pub use in_memory::InMemoryVendor;

use crate::error::{ConnectorError, ConnectorResult};
use crate::resource::Uid;
use serde::de::DeserializeOwned;
use std::fmt;
use std::future::Future;
use url::Url;

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_JSON_PATCH: &str = "application/json-patch+json";

/// HTTP methods used by the vendor contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single request to the vendor.
///
/// The body may hold a clear-text password, so `Debug` only reports its length.
#[derive(Clone, PartialEq, Eq)]
pub struct RestRequest {
    pub method: HttpMethod,
    pub url: Url,
    pub content_type: Option<&'static str>,
    pub body: Option<String>,
}

impl RestRequest {
    pub fn get(url: Url) -> Self {
        Self {
            method: HttpMethod::Get,
            url,
            content_type: None,
            body: None,
        }
    }

    /// `POST` with an `application/json` body.
    pub fn post_json(url: Url, body: String) -> Self {
        Self {
            method: HttpMethod::Post,
            url,
            content_type: Some(CONTENT_TYPE_JSON),
            body: Some(body),
        }
    }

    /// `PATCH` with an `application/json-patch+json` body.
    pub fn patch_json(url: Url, body: String) -> Self {
        Self {
            method: HttpMethod::Patch,
            url,
            content_type: Some(CONTENT_TYPE_JSON_PATCH),
            body: Some(body),
        }
    }

    pub fn put(url: Url) -> Self {
        Self {
            method: HttpMethod::Put,
            url,
            content_type: None,
            body: None,
        }
    }

    pub fn delete(url: Url) -> Self {
        Self {
            method: HttpMethod::Delete,
            url,
            content_type: None,
            body: None,
        }
    }
}

impl fmt::Debug for RestRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RestRequest")
            .field("method", &self.method)
            .field("url", &self.url.as_str())
            .field("content_type", &self.content_type)
            .field("body_len", &self.body.as_ref().map(String::len))
            .finish()
    }
}

/// A vendor response with its body read to text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestResponse {
    pub status: u16,
    pub url: String,
    pub body: String,
}

impl RestResponse {
    pub fn new(status: u16, url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            status,
            url: url.into(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_conflict(&self) -> bool {
        self.status == 409
    }

    /// Classify the status, passing successful responses through.
    pub fn error_for_status(self) -> ConnectorResult<Self> {
        if self.is_success() {
            return Ok(self);
        }
        match self.status {
            404 => Err(ConnectorError::unknown_uid(self.url)),
            status => Err(ConnectorError::io(format!(
                "HTTP {} from {}: {}",
                status, self.url, self.body
            ))),
        }
    }

    /// Parse the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> ConnectorResult<T> {
        serde_json::from_str(&self.body).map_err(|e| {
            ConnectorError::invalid_response(format!(
                "Unparseable response from {}: {}",
                self.url, e
            ))
        })
    }
}

/// Executes requests against the vendor.
///
/// Implementations map connection-level failures to [`ConnectorError::Io`] and
/// return every HTTP response, whatever its status, as a [`RestResponse`].
pub trait RestTransport: Send + Sync {
    fn execute(
        &self,
        request: RestRequest,
    ) -> impl Future<Output = ConnectorResult<RestResponse>> + Send;
}

/// Offset/limit window of a listing request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageCursor {
    pub offset: u64,
    pub limit: u64,
}

impl PageCursor {
    pub fn new(offset: u64, limit: u64) -> Self {
        Self { offset, limit }
    }

    /// Cursor for the page that follows this one.
    pub fn next(self) -> Self {
        Self {
            offset: self.offset + self.limit,
            limit: self.limit,
        }
    }
}

/// URL builder for the vendor user endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    /// Parse the service address. Fails for addresses that cannot carry paths.
    pub fn new(service_address: &str) -> ConnectorResult<Self> {
        let base = Url::parse(service_address.trim_end_matches('/')).map_err(|e| {
            ConnectorError::invalid_configuration(format!(
                "Invalid service address '{}': {}",
                service_address, e
            ))
        })?;

        if base.cannot_be_a_base() {
            return Err(ConnectorError::invalid_configuration(format!(
                "Service address '{}' cannot be used as a base URL",
                service_address
            )));
        }

        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// `<base>` for creating users.
    pub fn users(&self) -> Url {
        self.base.clone()
    }

    /// `<base>?q=..&offset=..&limit=..`; parameters are included only when set.
    pub fn list(&self, query: Option<&str>, cursor: Option<PageCursor>) -> Url {
        let mut url = self.base.clone();
        {
            let mut pairs = url.query_pairs_mut();
            if let Some(query) = query {
                pairs.append_pair("q", query);
            }
            if let Some(cursor) = cursor {
                pairs.append_pair("offset", &cursor.offset.to_string());
                pairs.append_pair("limit", &cursor.limit.to_string());
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        url
    }

    /// `<base>/<id>`
    pub fn user(&self, uid: &Uid) -> Url {
        self.with_segments(&[uid.as_str()])
    }

    /// `<base>/<id>/activation`
    pub fn activation(&self, uid: &Uid) -> Url {
        self.with_segments(&[uid.as_str(), "activation"])
    }

    /// `<base>/me`
    pub fn me(&self) -> Url {
        self.with_segments(&["me"])
    }

    fn with_segments(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }
}
