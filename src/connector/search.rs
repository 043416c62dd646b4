//! Account search: query translation and the paging engine.
//!
//! A search takes one of four routes:
//!
//! * **by uid** - one detail fetch; a 404 yields no results
//! * **by e-mail** - free-text listing search, then exact case-insensitive
//!   filtering on the e-mail field
//! * **bounded** - one page at the caller's offset and page size
//! * **unbounded** - successive pages of the configured size until a page comes
//!   back shorter than requested
//!
//! Listing entries are summaries. When location attributes are wanted, each
//! entry is re-fetched through the detail endpoint before conversion.
//!
//! The sink returns `false` to stop; no further request is issued after that.

use crate::config::SmartRecruitersConfig;
use crate::error::{ConnectorError, ConnectorResult, ValidationError, ValidationResult};
use crate::resource::attributes::{self, ConnectorObject, is_location_attribute, same_email};
use crate::resource::mapper::{conflict_object, to_connector_object};
use crate::resource::record::{UserPage, VendorRecord};
use crate::resource::value_objects::Uid;
use crate::transport::{Endpoints, PageCursor, RestRequest, RestTransport};
use log::{debug, info, trace};
use std::ops::ControlFlow;

/// Filter expression handed over by the framework.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Filter {
    Equals { attribute: String, value: String },
    Contains { attribute: String, value: String },
    StartsWith { attribute: String, value: String },
    And(Box<Filter>, Box<Filter>),
    Or(Box<Filter>, Box<Filter>),
}

impl Filter {
    pub fn equals(attribute: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Equals {
            attribute: attribute.into(),
            value: value.into(),
        }
    }
}

/// The query shapes the vendor API can answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchQuery {
    ByUid(Uid),
    ByEmail(String),
    All,
}

impl SearchQuery {
    /// Translate a framework filter.
    ///
    /// Equality on `__UID__` becomes a uid lookup and equality on `__NAME__` or
    /// `email` an e-mail search. Every other filter falls back to a full scan and
    /// is left to the framework to apply. A blank uid or e-mail is rejected.
    pub fn from_filter(filter: Option<&Filter>) -> ValidationResult<Self> {
        match filter {
            Some(Filter::Equals { attribute, value }) if attribute == attributes::UID => {
                Ok(Self::ByUid(Uid::new(value.as_str())?))
            }
            Some(Filter::Equals { attribute, value })
                if attribute == attributes::NAME || attribute == "email" =>
            {
                if value.trim().is_empty() {
                    return Err(ValidationError::custom(format!(
                        "Filter on {} needs a non-blank e-mail address",
                        attribute
                    )));
                }
                Ok(Self::ByEmail(value.clone()))
            }
            _ => Ok(Self::All),
        }
    }
}

/// Paging and attribute selection requested by the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchOptions {
    pub page_size: Option<u32>,
    pub paged_results_offset: Option<u32>,
    /// `None` means every attribute is wanted.
    pub attributes_to_get: Option<Vec<String>>,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a single page.
    pub fn with_page(mut self, offset: u32, page_size: u32) -> Self {
        self.paged_results_offset = Some(offset);
        self.page_size = Some(page_size);
        self
    }

    pub fn with_attributes_to_get<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.attributes_to_get = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Cursor of a bounded request, if both page size and offset were given.
    pub fn bounded_cursor(&self) -> Option<PageCursor> {
        match (self.page_size, self.paged_results_offset) {
            (Some(size), Some(offset)) => Some(PageCursor::new(offset.into(), size.into())),
            _ => None,
        }
    }
}

/// Whether listing entries must be re-fetched to get their location.
pub fn location_wanted(config: &SmartRecruitersConfig, options: &SearchOptions) -> bool {
    if !config.read_location {
        return false;
    }
    match &options.attributes_to_get {
        None => true,
        Some(names) => names.iter().any(|name| is_location_attribute(name)),
    }
}

/// Runs one search against the vendor. Holds no state beyond the call.
pub(crate) struct SearchEngine<'a, T: RestTransport> {
    pub transport: &'a T,
    pub endpoints: &'a Endpoints,
    pub config: &'a SmartRecruitersConfig,
}

impl<T: RestTransport> SearchEngine<'_, T> {
    /// Drive the search, returning the number of objects handed to `sink`.
    pub async fn run<F>(
        &self,
        query: &SearchQuery,
        options: &SearchOptions,
        sink: &mut F,
    ) -> ConnectorResult<u64>
    where
        F: FnMut(ConnectorObject) -> bool,
    {
        let mut emitted = 0;
        let enrich = location_wanted(self.config, options);

        match query {
            SearchQuery::ByUid(uid) => {
                self.find_by_uid(uid, sink, &mut emitted).await?;
            }
            SearchQuery::ByEmail(email) => {
                let page = self
                    .fetch_page(self.endpoints.list(Some(email.as_str()), None))
                    .await?;
                self.emit_page(page.content, Some(email.as_str()), enrich, sink, &mut emitted)
                    .await?;
            }
            SearchQuery::All => match options.bounded_cursor() {
                Some(cursor) => {
                    let page = self.fetch_page(self.endpoints.list(None, Some(cursor))).await?;
                    self.emit_page(page.content, None, enrich, sink, &mut emitted)
                        .await?;
                }
                None => self.scan(enrich, sink, &mut emitted).await?,
            },
        }

        debug!("Search {:?} returned {} objects", query, emitted);
        Ok(emitted)
    }

    async fn find_by_uid<F>(&self, uid: &Uid, sink: &mut F, emitted: &mut u64) -> ConnectorResult<()>
    where
        F: FnMut(ConnectorObject) -> bool,
    {
        if uid.is_conflict() {
            debug!("Uid {} is a conflict sentinel, not asking the vendor", uid);
            *emitted += 1;
            sink(conflict_object(uid));
            return Ok(());
        }

        let record = match self.fetch_detail(uid).await {
            Ok(record) => record,
            Err(ConnectorError::UnknownUid { resource }) => {
                debug!("No account at {}", resource);
                return Ok(());
            }
            Err(e) => return Err(e),
        };

        *emitted += 1;
        sink(to_connector_object(&record)?);
        Ok(())
    }

    async fn scan<F>(&self, enrich: bool, sink: &mut F, emitted: &mut u64) -> ConnectorResult<()>
    where
        F: FnMut(ConnectorObject) -> bool,
    {
        let page_size = u64::from(self.config.page_size);
        let mut cursor = PageCursor::new(0, page_size);

        loop {
            let page = self.fetch_page(self.endpoints.list(None, Some(cursor))).await?;
            let short = (page.content.len() as u64) < page_size;

            if self
                .emit_page(page.content, None, enrich, sink, emitted)
                .await?
                .is_break()
            {
                return Ok(());
            }
            if short {
                return Ok(());
            }
            cursor = cursor.next();
        }
    }

    async fn emit_page<F>(
        &self,
        records: Vec<VendorRecord>,
        email: Option<&str>,
        enrich: bool,
        sink: &mut F,
        emitted: &mut u64,
    ) -> ConnectorResult<ControlFlow<()>>
    where
        F: FnMut(ConnectorObject) -> bool,
    {
        let total = records.len();
        for (i, record) in records.into_iter().enumerate() {
            if i % 10 == 0 {
                trace!("Processing user {} of {}", i, total);
            }

            if let Some(email) = email {
                let exact = record
                    .email
                    .as_deref()
                    .is_some_and(|candidate| same_email(candidate, email));
                if !exact {
                    info!(
                        "Searching by email {} but {:?} is not an exact match, ignoring it",
                        email, record.email
                    );
                    continue;
                }
            }

            let record = if enrich {
                let uid = Uid::new(record.id.as_str()).map_err(|_| {
                    ConnectorError::invalid_response("Listed user without an id")
                })?;
                self.fetch_detail(&uid).await?
            } else {
                record
            };

            *emitted += 1;
            if !sink(to_connector_object(&record)?) {
                debug!("Result handler asked to stop");
                return Ok(ControlFlow::Break(()));
            }
        }
        Ok(ControlFlow::Continue(()))
    }

    async fn fetch_page(&self, url: url::Url) -> ConnectorResult<UserPage> {
        let response = self
            .transport
            .execute(RestRequest::get(url))
            .await?
            .error_for_status()?;
        let page: UserPage = response.json()?;
        debug!(
            "Number of users: {}, offset: {}, limit: {}",
            page.total_found, page.offset, page.limit
        );
        Ok(page)
    }

    async fn fetch_detail(&self, uid: &Uid) -> ConnectorResult<VendorRecord> {
        let response = self
            .transport
            .execute(RestRequest::get(self.endpoints.user(uid)))
            .await?
            .error_for_status()?;
        response.json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::record::Location;
    use crate::transport::InMemoryVendor;

    fn config(page_size: u32) -> SmartRecruitersConfig {
        SmartRecruitersConfig::default().with_page_size(page_size)
    }

    fn user(email: &str) -> VendorRecord {
        VendorRecord {
            email: Some(email.to_string()),
            first_name: Some("F".to_string()),
            location: Some(Location {
                city: Some("Brno".to_string()),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    async fn run(
        vendor: &InMemoryVendor,
        config: &SmartRecruitersConfig,
        query: SearchQuery,
        options: SearchOptions,
        stop_after: Option<usize>,
    ) -> Vec<ConnectorObject> {
        let endpoints = Endpoints::new(vendor.service_address()).unwrap();
        let engine = SearchEngine {
            transport: vendor,
            endpoints: &endpoints,
            config,
        };
        let mut found = Vec::new();
        let mut sink = |object: ConnectorObject| {
            found.push(object);
            stop_after.is_none_or(|limit| found.len() < limit)
        };
        engine.run(&query, &options, &mut sink).await.unwrap();
        found
    }

    async fn list_requests(vendor: &InMemoryVendor) -> Vec<String> {
        vendor
            .requests()
            .await
            .into_iter()
            .filter(|r| r.url.query().is_some())
            .map(|r| r.url.query().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_filter_translation() {
        let by_uid = Filter::equals("__UID__", "u1");
        assert_eq!(
            SearchQuery::from_filter(Some(&by_uid)).unwrap(),
            SearchQuery::ByUid(Uid::new("u1").unwrap())
        );

        for attribute in ["__NAME__", "email"] {
            let filter = Filter::equals(attribute, "a@b.com");
            assert_eq!(
                SearchQuery::from_filter(Some(&filter)).unwrap(),
                SearchQuery::ByEmail("a@b.com".to_string())
            );
        }

        let other = Filter::Contains {
            attribute: "__NAME__".to_string(),
            value: "a".to_string(),
        };
        assert_eq!(SearchQuery::from_filter(Some(&other)).unwrap(), SearchQuery::All);
        assert_eq!(SearchQuery::from_filter(None).unwrap(), SearchQuery::All);
        assert!(SearchQuery::from_filter(Some(&Filter::equals("__UID__", " "))).is_err());
    }

    #[test]
    fn test_blank_email_filter_is_rejected() {
        let err = SearchQuery::from_filter(Some(&Filter::equals("email", "  "))).unwrap_err();
        assert!(matches!(err, ValidationError::Custom { .. }));
        assert!(err.to_string().contains("non-blank e-mail"));
    }

    #[test]
    fn test_location_wanted() {
        let enabled = SmartRecruitersConfig::default();
        let disabled = SmartRecruitersConfig::default().with_read_location(false);

        assert!(location_wanted(&enabled, &SearchOptions::new()));
        assert!(!location_wanted(&disabled, &SearchOptions::new()));
        assert!(!location_wanted(
            &enabled,
            &SearchOptions::new().with_attributes_to_get(["firstName", "role"])
        ));
        assert!(location_wanted(
            &enabled,
            &SearchOptions::new().with_attributes_to_get(["firstName", "postalCode"])
        ));
    }

    #[tokio::test]
    async fn test_full_page_continues_short_page_stops() {
        let vendor = InMemoryVendor::new();
        for i in 0..13 {
            vendor.insert_user(user(&format!("u{}@x.com", i))).await;
        }
        let config = config(10).with_read_location(false);

        let found = run(&vendor, &config, SearchQuery::All, SearchOptions::new(), None).await;

        assert_eq!(found.len(), 13);
        assert_eq!(
            list_requests(&vendor).await,
            vec!["offset=0&limit=10", "offset=10&limit=10"]
        );
    }

    #[tokio::test]
    async fn test_exactly_full_last_page_needs_one_more_request() {
        let vendor = InMemoryVendor::new();
        for i in 0..4 {
            vendor.insert_user(user(&format!("u{}@x.com", i))).await;
        }
        let config = config(2).with_read_location(false);

        let found = run(&vendor, &config, SearchQuery::All, SearchOptions::new(), None).await;

        assert_eq!(found.len(), 4);
        assert_eq!(list_requests(&vendor).await.len(), 3);
    }

    #[tokio::test]
    async fn test_bounded_scan_fetches_one_page() {
        let vendor = InMemoryVendor::new();
        for i in 0..10 {
            vendor.insert_user(user(&format!("u{}@x.com", i))).await;
        }
        let config = config(100).with_read_location(false);

        let options = SearchOptions::new().with_page(4, 3);
        let found = run(&vendor, &config, SearchQuery::All, options, None).await;

        assert_eq!(found.len(), 3);
        assert_eq!(found[0].name(), Some("u4@x.com"));
        assert_eq!(list_requests(&vendor).await, vec!["offset=4&limit=3"]);
    }

    #[tokio::test]
    async fn test_email_search_keeps_exact_matches_only() {
        let vendor = InMemoryVendor::new();
        vendor.insert_user(user("Alice@X.com")).await;
        vendor.insert_user(user("malice@x.com")).await;
        vendor.insert_user(user("bob@x.com")).await;
        let config = config(100).with_read_location(false);

        let found = run(
            &vendor,
            &config,
            SearchQuery::ByEmail("alice@x.com".to_string()),
            SearchOptions::new(),
            None,
        )
        .await;

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name(), Some("Alice@X.com"));
    }

    #[tokio::test]
    async fn test_email_search_matches_non_ascii_case() {
        let vendor = InMemoryVendor::new();
        vendor.insert_user(user("Ärni@x.com")).await;
        let config = config(100).with_read_location(false);

        let found = run(
            &vendor,
            &config,
            SearchQuery::ByEmail("ärni@x.com".to_string()),
            SearchOptions::new(),
            None,
        )
        .await;

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name(), Some("Ärni@x.com"));
        assert_eq!(vendor.requests().await.len(), 1);
    }

    #[tokio::test]
    async fn test_location_enrichment_fetches_details() {
        let vendor = InMemoryVendor::new();
        vendor.insert_user(user("a@x.com")).await;
        vendor.insert_user(user("b@x.com")).await;

        let found = run(&vendor, &config(100), SearchQuery::All, SearchOptions::new(), None).await;

        assert!(found.iter().all(|o| o.string(attributes::CITY) == Some("Brno")));
        assert_eq!(vendor.requests().await.len(), 3);

        vendor.clear_requests().await;
        let options = SearchOptions::new().with_attributes_to_get(["firstName"]);
        let found = run(&vendor, &config(100), SearchQuery::All, options, None).await;

        assert!(found.iter().all(|o| o.string(attributes::CITY).is_none()));
        assert_eq!(vendor.requests().await.len(), 1);
    }

    #[tokio::test]
    async fn test_sink_stop_ends_scan() {
        let vendor = InMemoryVendor::new();
        for i in 0..6 {
            vendor.insert_user(user(&format!("u{}@x.com", i))).await;
        }
        let config = config(2).with_read_location(false);

        let found = run(&vendor, &config, SearchQuery::All, SearchOptions::new(), Some(3)).await;

        assert_eq!(found.len(), 3);
        assert_eq!(list_requests(&vendor).await.len(), 2);
    }

    #[tokio::test]
    async fn test_uid_lookup() {
        let vendor = InMemoryVendor::new();
        let stored = vendor.insert_user(user("a@x.com")).await;
        let uid = Uid::new(stored.id.clone()).unwrap();

        let found = run(&vendor, &config(100), SearchQuery::ByUid(uid), SearchOptions::new(), None).await;
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].string(attributes::CITY), Some("Brno"));

        let missing = SearchQuery::ByUid(Uid::new("missing").unwrap());
        assert!(run(&vendor, &config(100), missing, SearchOptions::new(), None).await.is_empty());
    }

    #[tokio::test]
    async fn test_sentinel_lookup_makes_no_request() {
        let vendor = InMemoryVendor::new();
        let sentinel = Uid::conflict("hidden@x.com", None);

        let found = run(&vendor, &config(100), SearchQuery::ByUid(sentinel), SearchOptions::new(), None).await;

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name(), Some("hidden@x.com"));
        assert!(vendor.requests().await.is_empty());
    }
}
