//! AlchemyLanguage client.

use super::types::{CombinedAnalysisResult, CombinedRequest, Source};
use crate::client::validation::{require_http_url, require_non_blank};
use crate::client::{Service, ServiceClient, ServiceClientBuilder};
use crate::{Error, Result, ServiceError, ServiceResult};
use reqwest::Method;
use tracing::info;

const SOURCE: &str = "alchemy_language";

/// Client for AlchemyLanguage text analysis.
#[derive(Debug, Clone)]
pub struct AlchemyLanguage {
    client: ServiceClient,
}

impl Service for AlchemyLanguage {
    const NAME: &'static str = SOURCE;
    const DEFAULT_BASE_URL: &'static str = "https://gateway-a.watsonplatform.net/calls";
    const ENV_PREFIX: &'static str = "ALCHEMY_LANGUAGE";

    fn from_client(client: ServiceClient) -> Self {
        Self { client }
    }
}

impl AlchemyLanguage {
    /// Client for the public endpoint, authenticated with an API key.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Self::builder().api_key(api_key).build()
    }

    pub fn builder() -> ServiceClientBuilder<Self> {
        ServiceClientBuilder::new()
    }

    pub fn service_client(&self) -> &ServiceClient {
        &self.client
    }

    /// Run several analyses over one document in a single call.
    ///
    /// A response whose body reports `"status": "ERROR"` resolves to a remote
    /// error with code 400 and the service's `statusInfo` as message.
    pub async fn combined_analysis(
        &self,
        request: &CombinedRequest,
    ) -> ServiceResult<CombinedAnalysisResult> {
        match &request.source {
            Source::Url(url) => {
                require_http_url("url", url, SOURCE)?;
            }
            Source::Text(text) => {
                require_non_blank("text", text, SOURCE)?;
            }
            Source::Html(html) => {
                require_non_blank("html", html, SOURCE)?;
            }
        }

        let outbound = self
            .client
            .request(
                Method::POST,
                &[request.source.kind(), request.source.combined_call()],
            )
            .form(request.form_fields())
            .build()?;
        let request_id = outbound.request_id.clone();
        let result: CombinedAnalysisResult = self.client.execute(outbound).await?;

        if result.is_error_status() {
            let message = result
                .status_info
                .clone()
                .unwrap_or_else(|| "unknown AlchemyAPI error".to_string());
            info!(
                service = SOURCE,
                request_id = request_id.as_str(),
                code = 400,
                "watson-sdk request failed: {}",
                message
            );
            return Err(ServiceError::from(Error::Remote {
                status: 200,
                code: 400,
                message,
                description: None,
            }));
        }
        Ok(result)
    }

    pub fn combined_analysis_with_handler<H>(&self, request: CombinedRequest, handler: H)
    where
        H: FnOnce(Option<CombinedAnalysisResult>, Option<ServiceError>) + Send + 'static,
    {
        let this = self.clone();
        self.client
            .dispatcher()
            .submit(async move { this.combined_analysis(&request).await }, handler);
    }
}
