use super::{RawResponse, Transport, TransportError};
use crate::client::config::ServiceConfiguration;
use crate::request::OutboundRequest;
use crate::{Error, ErrorContext, Result};
use async_trait::async_trait;
use reqwest::Proxy;
use std::env;
use std::time::Duration;
use url::Url;

/// reqwest-backed [`Transport`].
///
/// The total request deadline is enforced by [`send`](super::send); this
/// client only bounds connection setup.
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: Url,
    connect_timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &ServiceConfiguration) -> Result<Self> {
        // Minimal production-friendly defaults (env-overridable).
        let connect_timeout = Duration::from_secs(
            env::var("WATSON_HTTP_CONNECT_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(10),
        )
        .min(config.timeout);

        let mut builder = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .pool_max_idle_per_host(
                env::var("WATSON_HTTP_POOL_MAX_IDLE_PER_HOST")
                    .ok()
                    .and_then(|s| s.parse::<usize>().ok())
                    .unwrap_or(32),
            )
            .pool_idle_timeout(Some(Duration::from_secs(
                env::var("WATSON_HTTP_POOL_IDLE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse::<u64>().ok())
                    .unwrap_or(90),
            )));

        if let Ok(proxy_url) = env::var("WATSON_PROXY_URL") {
            if let Ok(proxy) = Proxy::all(&proxy_url) {
                builder = builder.proxy(proxy);
            }
        }

        let client = builder.build().map_err(|e| {
            Error::configuration_with_context(
                format!("failed to create HTTP client: {}", e),
                ErrorContext::new().with_source("http_transport"),
            )
        })?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            connect_timeout,
        })
    }

    /// Base URL joined with the request's percent-encoded path segments and query.
    pub fn url_for(&self, request: &OutboundRequest) -> std::result::Result<Url, TransportError> {
        let mut url = self.base_url.clone();
        let cannot_be_base =
            |()| TransportError::Other(format!("base URL {} cannot carry a path", self.base_url));
        url.path_segments_mut()
            .map_err(cannot_be_base)?
            .pop_if_empty()
            .extend(request.segments.iter());
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }
        Ok(url)
    }

    fn map_error(&self, err: reqwest::Error) -> TransportError {
        if err.is_timeout() {
            TransportError::Timeout {
                after: self.connect_timeout,
            }
        } else {
            TransportError::Network(err)
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(
        &self,
        request: OutboundRequest,
    ) -> std::result::Result<RawResponse, TransportError> {
        let url = self.url_for(&request)?;
        let mut builder = self.client.request(request.method.clone(), url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if !request.body.is_empty() {
            builder = builder.body(request.body.to_bytes());
        }

        let response = builder.send().await.map_err(|e| self.map_error(e))?;
        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_ascii_lowercase(), v.to_string()))
            })
            .collect();
        let body = response.bytes().await.map_err(|e| self.map_error(e))?;

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}
