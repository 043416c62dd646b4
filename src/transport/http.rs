//! `reqwest`-backed transport for the live vendor API.

use super::{HttpMethod, RestRequest, RestResponse, RestTransport};
use crate::config::{AuthMethod, SmartRecruitersConfig};
use crate::error::{ConnectorError, ConnectorResult};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use log::{debug, trace};
use reqwest::{Client, Method, header};
use std::time::Duration;

/// HTTP transport honouring the configured timeouts, TLS policy and auth.
///
/// Requests are sent once; there is no retry or backoff.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    auth: AuthMethod,
}

impl HttpTransport {
    /// Build the client from configuration.
    pub fn new(config: &SmartRecruitersConfig) -> ConnectorResult<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs));

        if config.trust_all_certificates {
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build().map_err(|e| {
            ConnectorError::invalid_configuration(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self {
            client,
            auth: config.auth.clone(),
        })
    }

    fn method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.auth {
            AuthMethod::None => builder,
            AuthMethod::Basic { username, password } => {
                let credentials =
                    password.access(|clear| STANDARD.encode(format!("{}:{}", username, clear)));
                builder.header(header::AUTHORIZATION, format!("Basic {}", credentials))
            }
            AuthMethod::Token {
                token_name,
                token_value,
            } => token_value.access(|clear| builder.header(token_name.as_str(), clear)),
        }
    }
}

impl RestTransport for HttpTransport {
    async fn execute(&self, request: RestRequest) -> ConnectorResult<RestResponse> {
        let method = request.method;
        let url = request.url.to_string();
        debug!("{} {}", method, url);

        let mut builder = self
            .client
            .request(Self::method(method), request.url)
            .header(header::ACCEPT, super::CONTENT_TYPE_JSON);
        if let Some(content_type) = request.content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        builder = self.authorize(builder);

        let response = builder.send().await.map_err(|e| {
            ConnectorError::io_with_source(format!("{} {} failed", method, url), e)
        })?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| {
            ConnectorError::io_with_source(format!("Reading response of {} {} failed", method, url), e)
        })?;

        debug!("{} {} -> {}", method, url, status);
        trace!("Response body: {}", body);

        Ok(RestResponse::new(status, url, body))
    }
}
