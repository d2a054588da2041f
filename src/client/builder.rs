use crate::client::config::{Credentials, ServiceConfiguration};
use crate::client::core::{Service, ServiceClient};
use crate::transport::{HttpTransport, Transport};
use crate::{Error, ErrorContext, Result};
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

/// Builder for service clients.
///
/// Explicit settings win over values loaded by [`ServiceClientBuilder::from_env`].
pub struct ServiceClientBuilder<S: Service> {
    base_url: Option<String>,
    credentials: Option<Credentials>,
    timeout: Option<Duration>,
    learning_opt_out: Option<bool>,
    user_agent: Option<String>,
    from_env: bool,
    /// Custom transport (primarily for tests and proxies that need full control)
    transport: Option<Arc<dyn Transport>>,
    _service: PhantomData<fn() -> S>,
}

impl<S: Service> Default for ServiceClientBuilder<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Service> ServiceClientBuilder<S> {
    pub fn new() -> Self {
        Self {
            base_url: None,
            credentials: None,
            timeout: None,
            learning_opt_out: None,
            user_agent: None,
            from_env: false,
            transport: None,
            _service: PhantomData,
        }
    }

    /// Override the service endpoint (defaults to the public gateway).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    pub fn basic_auth(self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.credentials(Credentials::basic(username, password))
    }

    pub fn bearer_token(self, token: impl Into<String>) -> Self {
        self.credentials(Credentials::bearer(token))
    }

    pub fn api_key(self, key: impl Into<String>) -> Self {
        self.credentials(Credentials::api_key(key))
    }

    /// Total time allowed for one request. Default is 60s.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn learning_opt_out(mut self, opt_out: bool) -> Self {
        self.learning_opt_out = Some(opt_out);
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Fill unset values from the keyring and environment (see
    /// [`ServiceConfiguration::from_env`]).
    pub fn from_env(mut self) -> Self {
        self.from_env = true;
        self
    }

    pub fn transport(mut self, transport: Arc<dyn Transport>) -> Self {
        self.transport = Some(transport);
        self
    }

    pub fn build(self) -> Result<S> {
        let base = if self.from_env {
            match ServiceConfiguration::from_env(S::ENV_PREFIX, S::DEFAULT_BASE_URL) {
                Ok(config) => Some(config),
                // Explicit credentials make missing env credentials irrelevant.
                Err(_) if self.credentials.is_some() => None,
                Err(e) => return Err(e),
            }
        } else {
            None
        };

        let mut config = match (base, self.credentials) {
            (Some(mut config), credentials) => {
                if let Some(credentials) = credentials {
                    config.credentials = credentials;
                }
                if let Some(url) = &self.base_url {
                    config = ServiceConfiguration::new(url, config.credentials)?
                        .with_timeout(config.timeout)
                        .with_learning_opt_out(config.learning_opt_out);
                }
                config
            }
            (None, Some(credentials)) => ServiceConfiguration::new(
                self.base_url.as_deref().unwrap_or(S::DEFAULT_BASE_URL),
                credentials,
            )?,
            (None, None) => {
                return Err(Error::configuration_with_context(
                    format!("{} client has no credentials", S::NAME),
                    ErrorContext::new()
                        .with_field_path("credentials")
                        .with_details(format!(
                            "call basic_auth/api_key or from_env ({}_API_KEY)",
                            S::ENV_PREFIX
                        ))
                        .with_source(S::NAME),
                ))
            }
        };

        if let Some(timeout) = self.timeout {
            if timeout.is_zero() {
                return Err(Error::configuration_with_context(
                    "timeout must be greater than zero",
                    ErrorContext::new().with_field_path("timeout").with_source(S::NAME),
                ));
            }
            config = config.with_timeout(timeout);
        }
        if let Some(opt_out) = self.learning_opt_out {
            config = config.with_learning_opt_out(opt_out);
        }
        if let Some(user_agent) = self.user_agent {
            config = config.with_user_agent(user_agent);
        }

        let transport: Arc<dyn Transport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(HttpTransport::new(&config)?),
        };

        Ok(S::from_client(ServiceClient::new(S::NAME, config, transport)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_code::ErrorKind;

    struct Probe(ServiceClient);

    impl Service for Probe {
        const NAME: &'static str = "probe";
        const DEFAULT_BASE_URL: &'static str = "https://gateway.example.com/probe/api";
        const ENV_PREFIX: &'static str = "WATSON_PROBE_TEST";

        fn from_client(client: ServiceClient) -> Self {
            Probe(client)
        }
    }

    #[test]
    fn defaults_to_public_endpoint() {
        let probe = ServiceClientBuilder::<Probe>::new()
            .basic_auth("user", "pass")
            .build()
            .unwrap();
        assert_eq!(
            probe.0.config().base_url.as_str(),
            "https://gateway.example.com/probe/api"
        );
        assert_eq!(probe.0.config().timeout, Duration::from_secs(60));
        assert_eq!(probe.0.service(), "probe");
    }

    #[test]
    fn explicit_settings_apply() {
        let probe = ServiceClientBuilder::<Probe>::new()
            .api_key("k")
            .base_url("http://127.0.0.1:9000")
            .timeout(Duration::from_secs(3))
            .learning_opt_out(true)
            .build()
            .unwrap();
        let config = probe.0.config();
        assert_eq!(config.base_url.as_str(), "http://127.0.0.1:9000/");
        assert_eq!(config.timeout, Duration::from_secs(3));
        assert!(config.learning_opt_out);
    }

    #[test]
    fn missing_credentials_is_configuration_error() {
        let err = ServiceClientBuilder::<Probe>::new().build().err().unwrap();
        assert_eq!(err.kind(), ErrorKind::Configuration);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = ServiceClientBuilder::<Probe>::new()
            .api_key("k")
            .timeout(Duration::ZERO)
            .build()
            .err()
            .unwrap();
        assert_eq!(err.context().unwrap().field_path.as_deref(), Some("timeout"));
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        assert!(ServiceClientBuilder::<Probe>::new()
            .api_key("k")
            .base_url("not a url")
            .build()
            .is_err());
    }
}
