//! Shared fixtures for connector integration tests.

#![allow(dead_code)]

use smartrecruiters_connector::resource::attributes::{self, AttributeSet};
use smartrecruiters_connector::resource::record::{Location, VendorRecord};
use smartrecruiters_connector::transport::{HttpMethod, InMemoryVendor, RestRequest};
use smartrecruiters_connector::{SmartRecruitersConfig, SmartRecruitersConnector};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Connector over a fresh in-memory vendor, plus a handle on that vendor.
pub fn connector_with(
    configure: impl FnOnce(SmartRecruitersConfig) -> SmartRecruitersConfig,
) -> (SmartRecruitersConnector<InMemoryVendor>, InMemoryVendor) {
    init_logging();
    let vendor = InMemoryVendor::new();
    let config = configure(SmartRecruitersConfig::new(vendor.service_address()));
    let connector = SmartRecruitersConnector::new(config, vendor.clone())
        .expect("in-memory connector configuration is valid");
    (connector, vendor)
}

pub fn connector() -> (SmartRecruitersConnector<InMemoryVendor>, InMemoryVendor) {
    connector_with(|config| config)
}

/// Minimal valid create attribute set.
pub fn new_user(email: &str) -> AttributeSet {
    AttributeSet::new()
        .with(attributes::NAME, email)
        .with(attributes::FIRST_NAME, "A")
        .with(attributes::LAST_NAME, "B")
        .with(attributes::ROLE, "EMPLOYEE")
}

/// Vendor record as it would exist after an earlier provisioning run.
pub fn vendor_user(email: &str, city: &str) -> VendorRecord {
    VendorRecord {
        email: Some(email.to_string()),
        first_name: Some("Existing".to_string()),
        last_name: Some("User".to_string()),
        role: Some("STANDARD".to_string()),
        active: Some(true),
        location: Some(Location {
            city: Some(city.to_string()),
            country_code: Some("cz".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

/// Method and path (with query) of each recorded request.
pub fn summarize(requests: &[RestRequest], service_address: &str) -> Vec<String> {
    requests
        .iter()
        .map(|request| {
            let url = request.url.as_str();
            let path = url.strip_prefix(service_address).unwrap_or(url);
            format!("{} {}", request.method, if path.is_empty() { "/" } else { path })
        })
        .collect()
}

pub fn methods(requests: &[RestRequest]) -> Vec<HttpMethod> {
    requests.iter().map(|request| request.method).collect()
}
