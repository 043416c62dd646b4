//! In-memory simulation of the SmartRecruiters user API.
//!
//! This module provides a thread-safe [`RestTransport`] that answers the vendor
//! wire contract from process memory. It's designed for testing, development and
//! demos where a live tenant is not available.
//!
//! # Features
//!
//! * Listing with free-text `q`, `offset` and `limit`; list entries are
//!   summaries without the nested location
//! * Detail fetch, create, JSON-Patch update and activation toggling
//! * 409 on duplicate e-mail, including e-mails registered as owned by another
//!   tenant, which stay invisible to search
//! * Every request is recorded for later assertions
//! * Transport failures can be injected per HTTP method
//!
//! # Example Usage
//!
//! ```rust
//! use smartrecruiters_connector::transport::{
//!     Endpoints, InMemoryVendor, RestRequest, RestTransport,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let vendor = InMemoryVendor::new();
//! let endpoints = Endpoints::new(vendor.service_address())?;
//!
//! let response = vendor.execute(RestRequest::get(endpoints.me())).await?;
//! assert_eq!(response.status, 200);
//! assert_eq!(vendor.requests().await.len(), 1);
//! # Ok(())
//! # }
//! ```

use super::{HttpMethod, RestRequest, RestResponse, RestTransport};
use crate::config::DEFAULT_SERVICE_ADDRESS;
use crate::error::{ConnectorError, ConnectorResult};
use crate::resource::attributes::{is_location_attribute, same_email};
use crate::resource::record::{Location, UserPage, VendorRecord};
use chrono::{SecondsFormat, Utc};
use log::trace;
use serde_json::{Value, json};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;
use url::Url;

/// Listing page size the vendor applies when no `limit` is sent.
const VENDOR_DEFAULT_LIMIT: u64 = 10;

#[derive(Debug, Default)]
struct VendorState {
    // Insertion order is the listing order.
    users: Vec<VendorRecord>,
    passwords: HashMap<String, String>,
    hidden_emails: HashSet<String>,
    requests: Vec<RestRequest>,
    failures: Vec<HttpMethod>,
}

impl VendorState {
    fn position(&self, id: &str) -> Option<usize> {
        self.users.iter().position(|user| user.id == id)
    }

    fn email_taken(&self, email: &str, except_id: Option<&str>) -> bool {
        self.hidden_emails.contains(&email.to_lowercase())
            || self.users.iter().any(|user| {
                Some(user.id.as_str()) != except_id
                    && user
                        .email
                        .as_deref()
                        .is_some_and(|existing| same_email(existing, email))
            })
    }
}

/// Thread-safe in-memory vendor.
///
/// Clones share state, so a test can keep one handle for assertions while the
/// connector owns another.
#[derive(Debug, Clone)]
pub struct InMemoryVendor {
    service_address: String,
    state: Arc<RwLock<VendorState>>,
}

impl Default for InMemoryVendor {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryVendor {
    /// Vendor listening on the default service address.
    pub fn new() -> Self {
        Self::with_service_address(DEFAULT_SERVICE_ADDRESS)
    }

    /// Vendor answering under a custom service address.
    pub fn with_service_address(service_address: impl Into<String>) -> Self {
        let mut service_address = service_address.into();
        while service_address.ends_with('/') {
            service_address.pop();
        }
        Self {
            service_address,
            state: Arc::new(RwLock::new(VendorState::default())),
        }
    }

    pub fn service_address(&self) -> &str {
        &self.service_address
    }

    /// Store a user as-is. An empty id is replaced with a fresh one.
    pub async fn insert_user(&self, mut record: VendorRecord) -> VendorRecord {
        if record.id.is_empty() {
            record.id = uuid::Uuid::new_v4().to_string();
        }
        let mut state = self.state.write().await;
        state.users.push(record.clone());
        record
    }

    /// Register an e-mail owned by another tenant: creating it conflicts, but
    /// searching for it finds nothing.
    pub async fn hide_email(&self, email: &str) {
        let mut state = self.state.write().await;
        state.hidden_emails.insert(email.to_lowercase());
    }

    /// Make the next request with `method` fail at the transport level.
    pub async fn fail_next(&self, method: HttpMethod) {
        let mut state = self.state.write().await;
        state.failures.push(method);
    }

    pub async fn user(&self, id: &str) -> Option<VendorRecord> {
        let state = self.state.read().await;
        state.position(id).map(|i| state.users[i].clone())
    }

    pub async fn users(&self) -> Vec<VendorRecord> {
        self.state.read().await.users.clone()
    }

    /// Last password set for a user, if any.
    pub async fn password(&self, id: &str) -> Option<String> {
        self.state.read().await.passwords.get(id).cloned()
    }

    /// All requests received so far, in order.
    pub async fn requests(&self) -> Vec<RestRequest> {
        self.state.read().await.requests.clone()
    }

    pub async fn clear_requests(&self) {
        self.state.write().await.requests.clear();
    }

    /// Path segments below the service address, or `None` for foreign URLs.
    fn route<'a>(&self, url: &'a Url) -> Option<Vec<&'a str>> {
        let address = url.as_str().split(['?', '#']).next()?;
        let rest = address.strip_prefix(self.service_address.as_str())?;
        if !rest.is_empty() && !rest.starts_with('/') {
            return None;
        }
        Some(rest.split('/').filter(|s| !s.is_empty()).collect())
    }

    fn handle(&self, state: &mut VendorState, request: &RestRequest) -> (u16, Value) {
        let url = &request.url;
        let Some(segments) = self.route(url) else {
            return not_found("Unknown resource");
        };

        match (request.method, segments.as_slice()) {
            (HttpMethod::Get, []) => list(state, url),
            (HttpMethod::Post, []) => create(state, request.body.as_deref()),
            (HttpMethod::Get, ["me"]) => (
                200,
                json!({"id": "me", "email": "integration@smartrecruiters.test", "role": "ADMINISTRATOR"}),
            ),
            (HttpMethod::Get, [id]) => match state.position(id) {
                Some(i) => (200, to_value(&state.users[i])),
                None => not_found("User not found"),
            },
            (HttpMethod::Patch, [id]) => patch(state, id, request.body.as_deref()),
            (HttpMethod::Put, [id, "activation"]) => set_active(state, id, true),
            (HttpMethod::Delete, [id, "activation"]) => set_active(state, id, false),
            _ => (405, json!({"message": "Method not allowed"})),
        }
    }
}

impl RestTransport for InMemoryVendor {
    async fn execute(&self, request: RestRequest) -> ConnectorResult<RestResponse> {
        let mut state = self.state.write().await;
        state.requests.push(request.clone());

        if let Some(i) = state.failures.iter().position(|m| *m == request.method) {
            state.failures.remove(i);
            return Err(ConnectorError::io(format!(
                "{} {} failed: connection reset",
                request.method, request.url
            )));
        }

        let (status, body) = self.handle(&mut state, &request);
        trace!("{} {} -> {}", request.method, request.url, status);

        let body = if body.is_null() {
            String::new()
        } else {
            body.to_string()
        };
        Ok(RestResponse::new(status, request.url.as_str(), body))
    }
}

fn not_found(message: &str) -> (u16, Value) {
    (404, json!({"message": message}))
}

fn bad_request(message: impl Into<String>) -> (u16, Value) {
    (400, json!({"message": message.into()}))
}

fn conflict(email: &str) -> (u16, Value) {
    (
        409,
        json!({"errors": [{"code": "DUPLICATE_EMAIL", "message": format!("User with email {} already exists", email)}]}),
    )
}

fn to_value(record: &VendorRecord) -> Value {
    serde_json::to_value(record).unwrap_or(Value::Null)
}

fn now() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn list(state: &VendorState, url: &Url) -> (u16, Value) {
    let mut query = None;
    let mut offset = 0;
    let mut limit = VENDOR_DEFAULT_LIMIT;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "q" => query = Some(value.to_lowercase()),
            "offset" => offset = value.parse().unwrap_or(0),
            "limit" => limit = value.parse().unwrap_or(VENDOR_DEFAULT_LIMIT),
            _ => {}
        }
    }

    let matches = |user: &&VendorRecord| match &query {
        None => true,
        Some(q) => [&user.email, &user.first_name, &user.last_name]
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(q.as_str())),
    };

    let found: Vec<&VendorRecord> = state.users.iter().filter(matches).collect();
    let content = found
        .iter()
        .skip(offset as usize)
        .take(limit as usize)
        .map(|user| VendorRecord {
            location: None,
            ..(*user).clone()
        })
        .collect();

    let page = UserPage {
        total_found: found.len() as u64,
        offset,
        limit,
        content,
    };
    (200, serde_json::to_value(page).unwrap_or(Value::Null))
}

fn text(body: &Value, field: &str) -> Option<String> {
    match body.get(field)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

fn create(state: &mut VendorState, body: Option<&str>) -> (u16, Value) {
    let Some(body) = body.and_then(|b| serde_json::from_str::<Value>(b).ok()) else {
        return bad_request("Request body must be a JSON object");
    };
    let Some(email) = text(&body, "email") else {
        return bad_request("email is required");
    };
    if state.email_taken(&email, None) {
        return conflict(&email);
    }

    let location: Option<Location> = body
        .get("location")
        .and_then(|l| serde_json::from_value(l.clone()).ok());

    let record = VendorRecord {
        id: uuid::Uuid::new_v4().to_string(),
        email: Some(email),
        first_name: text(&body, "firstName"),
        last_name: text(&body, "lastName"),
        role: text(&body, "role"),
        external_data: text(&body, "externalData"),
        updated_on: text(&body, "updatedOn").or_else(|| Some(now())),
        sso_identifier: text(&body, "ssoIdentifier"),
        active: Some(false),
        location,
    };

    if let Some(password) = text(&body, "password") {
        state.passwords.insert(record.id.clone(), password);
    }
    state.users.push(record.clone());
    (201, to_value(&record))
}

fn apply_field(record: &mut VendorRecord, path: &str, value: Option<String>) -> Result<(), String> {
    if let Some(field) = path.strip_prefix("/location/") {
        let location = record.location.get_or_insert_with(Location::default);
        if !is_location_attribute(field) {
            return Err(format!("Unknown location field {}", field));
        }
        location.set(field, value);
        if location.is_empty() {
            record.location = None;
        }
        return Ok(());
    }

    let slot = match path {
        "/email" => &mut record.email,
        "/firstName" => &mut record.first_name,
        "/lastName" => &mut record.last_name,
        "/role" => &mut record.role,
        "/externalData" => &mut record.external_data,
        "/updatedOn" => &mut record.updated_on,
        "/ssoIdentifier" => &mut record.sso_identifier,
        _ => return Err(format!("Unsupported patch path {}", path)),
    };
    *slot = value;
    Ok(())
}

fn patch(state: &mut VendorState, id: &str, body: Option<&str>) -> (u16, Value) {
    let Some(index) = state.position(id) else {
        return not_found("User not found");
    };
    let Some(Value::Array(ops)) = body.and_then(|b| serde_json::from_str::<Value>(b).ok()) else {
        return bad_request("Request body must be a JSON-Patch array");
    };

    let mut record = state.users[index].clone();
    let mut password = None;
    for op in &ops {
        let (Some(kind), Some(path)) = (
            op.get("op").and_then(Value::as_str),
            op.get("path").and_then(Value::as_str),
        ) else {
            return bad_request("Patch operation needs op and path");
        };
        let value = match kind {
            "add" | "replace" => text(op, "value"),
            "remove" => None,
            other => return bad_request(format!("Unsupported patch op {}", other)),
        };

        if path == "/password" {
            password = value;
            continue;
        }
        if path == "/email" {
            if let Some(email) = &value {
                if state.email_taken(email, Some(id)) {
                    return conflict(email);
                }
            }
        }
        if let Err(message) = apply_field(&mut record, path, value) {
            return bad_request(message);
        }
    }

    record.updated_on = Some(now());
    if let Some(password) = password {
        state.passwords.insert(record.id.clone(), password);
    }
    state.users[index] = record.clone();
    (200, to_value(&record))
}

fn set_active(state: &mut VendorState, id: &str, active: bool) -> (u16, Value) {
    match state.position(id) {
        Some(index) => {
            state.users[index].active = Some(active);
            (204, Value::Null)
        }
        None => not_found("User not found"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::Uid;
    use crate::transport::{Endpoints, PageCursor};

    fn endpoints(vendor: &InMemoryVendor) -> Endpoints {
        Endpoints::new(vendor.service_address()).unwrap()
    }

    fn record(email: &str) -> VendorRecord {
        VendorRecord {
            email: Some(email.to_string()),
            first_name: Some("First".to_string()),
            last_name: Some("Last".to_string()),
            role: Some("EMPLOYEE".to_string()),
            active: Some(true),
            location: Some(Location {
                city: Some("Prague".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_create_and_fetch() {
        let vendor = InMemoryVendor::new();
        let endpoints = endpoints(&vendor);

        let body = json!({"email": "a@b.com", "firstName": "A", "lastName": "B", "role": "EMPLOYEE", "password": "pw"});
        let response = vendor
            .execute(RestRequest::post_json(endpoints.users(), body.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status, 201);

        let created: VendorRecord = response.json().unwrap();
        assert_eq!(created.active, Some(false));
        assert!(created.updated_on.is_some());
        assert_eq!(vendor.password(&created.id).await.as_deref(), Some("pw"));

        let uid = Uid::new(created.id.clone()).unwrap();
        let fetched = vendor.execute(RestRequest::get(endpoints.user(&uid))).await.unwrap();
        assert_eq!(fetched.status, 200);
        assert!(!fetched.body.contains("pw"));
    }

    #[tokio::test]
    async fn test_duplicate_and_hidden_emails_conflict() {
        let vendor = InMemoryVendor::new();
        let endpoints = endpoints(&vendor);
        vendor.insert_user(record("taken@x.com")).await;
        vendor.hide_email("Hidden@X.com").await;

        for email in ["TAKEN@x.com", "hidden@x.com"] {
            let body = json!({"email": email}).to_string();
            let response = vendor
                .execute(RestRequest::post_json(endpoints.users(), body))
                .await
                .unwrap();
            assert_eq!(response.status, 409);
        }

        let search = vendor
            .execute(RestRequest::get(endpoints.list(Some("hidden@x.com"), None)))
            .await
            .unwrap();
        let page: UserPage = search.json().unwrap();
        assert_eq!(page.total_found, 0);
    }

    #[tokio::test]
    async fn test_listing_pages_and_strips_location() {
        let vendor = InMemoryVendor::new();
        for i in 0..5 {
            vendor.insert_user(record(&format!("user{}@x.com", i))).await;
        }
        let endpoints = endpoints(&vendor);

        let response = vendor
            .execute(RestRequest::get(endpoints.list(None, Some(PageCursor::new(3, 10)))))
            .await
            .unwrap();
        let page: UserPage = response.json().unwrap();
        assert_eq!(page.total_found, 5);
        assert_eq!(page.content.len(), 2);
        assert!(page.content.iter().all(|u| u.location.is_none()));
    }

    #[tokio::test]
    async fn test_patch_and_activation() {
        let vendor = InMemoryVendor::new();
        let user = vendor.insert_user(record("p@x.com")).await;
        let uid = Uid::new(user.id.clone()).unwrap();
        let endpoints = endpoints(&vendor);

        let ops = json!([
            {"op": "add", "path": "/firstName", "value": "Ann"},
            {"op": "remove", "path": "/location/city"},
            {"op": "add", "path": "/location/country", "value": "Czechia"},
            {"op": "add", "path": "/password", "value": "new-pw"}
        ]);
        let response = vendor
            .execute(RestRequest::patch_json(endpoints.user(&uid), ops.to_string()))
            .await
            .unwrap();
        assert_eq!(response.status, 200);

        let stored = vendor.user(&user.id).await.unwrap();
        assert_eq!(stored.first_name.as_deref(), Some("Ann"));
        let location = stored.location.unwrap();
        assert_eq!(location.city, None);
        assert_eq!(location.country.as_deref(), Some("Czechia"));
        assert_eq!(vendor.password(&user.id).await.as_deref(), Some("new-pw"));

        let response = vendor
            .execute(RestRequest::delete(endpoints.activation(&uid)))
            .await
            .unwrap();
        assert_eq!(response.status, 204);
        assert_eq!(vendor.user(&user.id).await.unwrap().active, Some(false));
    }

    #[tokio::test]
    async fn test_unknown_user_is_404() {
        let vendor = InMemoryVendor::new();
        let uid = Uid::new("missing").unwrap();
        let response = vendor
            .execute(RestRequest::put(endpoints(&vendor).activation(&uid)))
            .await
            .unwrap();
        assert_eq!(response.status, 404);
    }

    #[tokio::test]
    async fn test_injected_failure_is_consumed_once() {
        let vendor = InMemoryVendor::new();
        let endpoints = endpoints(&vendor);
        vendor.fail_next(HttpMethod::Get).await;

        let first = vendor.execute(RestRequest::get(endpoints.me())).await;
        assert!(first.unwrap_err().is_io());

        let second = vendor.execute(RestRequest::get(endpoints.me())).await;
        assert_eq!(second.unwrap().status, 200);
        assert_eq!(vendor.requests().await.len(), 2);
    }
}
