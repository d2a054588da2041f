//! Service endpoint and credential configuration.

use crate::{Error, ErrorContext, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use keyring::Entry;
use std::fmt;
use std::time::Duration;
use url::Url;

/// Default per-call timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Keyring service name secrets are looked up under.
pub const KEYRING_SERVICE: &str = "watson-sdk";

/// How requests authenticate against the service.
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// HTTP Basic with service username/password.
    Basic { username: String, password: String },
    /// `Authorization: Bearer <token>`.
    Bearer { token: String },
    /// `apikey` query parameter (AlchemyAPI convention).
    ApiKey { key: String },
}

impl Credentials {
    pub fn basic(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self::Basic {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn bearer(token: impl Into<String>) -> Self {
        Self::Bearer {
            token: token.into(),
        }
    }

    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey { key: key.into() }
    }

    /// Value for the `Authorization` header, if these credentials use one.
    pub(crate) fn authorization(&self) -> Option<String> {
        match self {
            Self::Basic { username, password } => Some(format!(
                "Basic {}",
                STANDARD.encode(format!("{}:{}", username, password))
            )),
            Self::Bearer { token } => Some(format!("Bearer {}", token)),
            Self::ApiKey { .. } => None,
        }
    }

    /// Query parameter carrying the credentials, if these credentials use one.
    pub(crate) fn query_param(&self) -> Option<(&'static str, &str)> {
        match self {
            Self::ApiKey { key } => Some(("apikey", key.as_str())),
            _ => None,
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
            Self::Bearer { .. } => f.debug_struct("Bearer").field("token", &"<redacted>").finish(),
            Self::ApiKey { .. } => f.debug_struct("ApiKey").field("key", &"<redacted>").finish(),
        }
    }
}

/// Immutable per-client configuration, shared read-only by every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfiguration {
    pub base_url: Url,
    pub credentials: Credentials,
    pub timeout: Duration,
    /// Ask the service not to retain request data for training.
    pub learning_opt_out: bool,
    pub user_agent: String,
}

impl ServiceConfiguration {
    pub fn new(base_url: &str, credentials: Credentials) -> Result<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            credentials,
            timeout: DEFAULT_TIMEOUT,
            learning_opt_out: false,
            user_agent: format!("watson-sdk-rust/{}", env!("CARGO_PKG_VERSION")),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_learning_opt_out(mut self, opt_out: bool) -> Self {
        self.learning_opt_out = opt_out;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Load configuration for the service whose variables start with `prefix`.
    ///
    /// Secrets (`PASSWORD`, `API_KEY`) are read from the OS keyring first, then
    /// from the environment:
    /// - `{PREFIX}_URL` (defaults to `default_base_url`)
    /// - `{PREFIX}_API_KEY`, or `{PREFIX}_USERNAME` + `{PREFIX}_PASSWORD`
    /// - `WATSON_HTTP_TIMEOUT_SECS` (default 60)
    /// - `WATSON_LEARNING_OPT_OUT` (`1`/`true`)
    pub fn from_env(prefix: &str, default_base_url: &str) -> Result<Self> {
        Self::from_lookup(prefix, default_base_url, |name| {
            if name.ends_with("_PASSWORD") || name.ends_with("_API_KEY") {
                if let Some(secret) = keyring_secret(name) {
                    return Some(secret);
                }
            }
            std::env::var(name).ok()
        })
    }

    /// [`ServiceConfiguration::from_env`] over an arbitrary variable source.
    pub fn from_lookup<F>(prefix: &str, default_base_url: &str, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(&format!("{}_{}", prefix, name)).filter(|v| !v.trim().is_empty())
        };

        let base_url = var("URL").unwrap_or_else(|| default_base_url.to_string());
        let credentials = if let Some(key) = var("API_KEY") {
            Credentials::api_key(key)
        } else {
            match (var("USERNAME"), var("PASSWORD")) {
                (Some(username), Some(password)) => Credentials::basic(username, password),
                _ => {
                    return Err(Error::configuration_with_context(
                        format!(
                            "no credentials found: set {0}_API_KEY or {0}_USERNAME and {0}_PASSWORD",
                            prefix
                        ),
                        ErrorContext::new()
                            .with_field_path(format!("{}_USERNAME", prefix))
                            .with_source("service_configuration"),
                    ))
                }
            }
        };

        let timeout = lookup("WATSON_HTTP_TIMEOUT_SECS")
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT);
        let learning_opt_out = lookup("WATSON_LEARNING_OPT_OUT")
            .map(|v| matches!(v.trim(), "1" | "true" | "TRUE" | "yes"))
            .unwrap_or(false);

        Ok(Self::new(&base_url, credentials)?
            .with_timeout(timeout)
            .with_learning_opt_out(learning_opt_out))
    }
}

fn keyring_secret(variable: &str) -> Option<String> {
    let entry = Entry::new(KEYRING_SERVICE, &variable.to_lowercase()).ok()?;
    entry.get_password().ok()
}

fn parse_base_url(raw: &str) -> Result<Url> {
    let invalid = |details: String| {
        Error::configuration_with_context(
            format!("invalid base URL {:?}", raw),
            ErrorContext::new()
                .with_field_path("base_url")
                .with_details(details)
                .with_source("service_configuration"),
        )
    };

    let url = Url::parse(raw.trim()).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    if url.cannot_be_a_base() || url.host_str().is_none() {
        return Err(invalid("URL has no host".to_string()));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn basic_credentials_encode_username_and_password() {
        let creds = Credentials::basic("user", "pass");
        assert_eq!(creds.authorization().unwrap(), "Basic dXNlcjpwYXNz");
        assert!(creds.query_param().is_none());
    }

    #[test]
    fn api_key_goes_to_query() {
        let creds = Credentials::api_key("k-123");
        assert!(creds.authorization().is_none());
        assert_eq!(creds.query_param(), Some(("apikey", "k-123")));
    }

    #[test]
    fn debug_redacts_secrets() {
        let text = format!("{:?}", Credentials::basic("user", "hunter2"));
        assert!(text.contains("user"));
        assert!(!text.contains("hunter2"));
    }

    #[test]
    fn rejects_malformed_base_urls() {
        for raw in ["not a url", "ftp://example.com", "mailto:someone@example.com"] {
            let err = ServiceConfiguration::new(raw, Credentials::bearer("t")).unwrap_err();
            assert!(matches!(err, Error::Configuration { .. }), "{raw}");
        }
    }

    #[test]
    fn lookup_prefers_api_key() {
        let config = ServiceConfiguration::from_lookup(
            "ALCHEMY_LANGUAGE",
            "https://gateway-a.watsonplatform.net/calls",
            lookup(&[
                ("ALCHEMY_LANGUAGE_API_KEY", "abc"),
                ("ALCHEMY_LANGUAGE_USERNAME", "u"),
                ("ALCHEMY_LANGUAGE_PASSWORD", "p"),
                ("WATSON_HTTP_TIMEOUT_SECS", "5"),
            ]),
        )
        .unwrap();
        assert_eq!(config.credentials, Credentials::api_key("abc"));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.base_url.host_str(), Some("gateway-a.watsonplatform.net"));
    }

    #[test]
    fn lookup_reads_basic_credentials_and_url_override() {
        let config = ServiceConfiguration::from_lookup(
            "NATURAL_LANGUAGE_CLASSIFIER",
            "https://gateway.watsonplatform.net/natural-language-classifier/api",
            lookup(&[
                ("NATURAL_LANGUAGE_CLASSIFIER_URL", "http://localhost:9000/api"),
                ("NATURAL_LANGUAGE_CLASSIFIER_USERNAME", "u"),
                ("NATURAL_LANGUAGE_CLASSIFIER_PASSWORD", "p"),
                ("WATSON_LEARNING_OPT_OUT", "1"),
            ]),
        )
        .unwrap();
        assert_eq!(config.credentials, Credentials::basic("u", "p"));
        assert_eq!(config.base_url.as_str(), "http://localhost:9000/api");
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(config.learning_opt_out);
    }

    #[test]
    fn lookup_without_credentials_fails() {
        let err = ServiceConfiguration::from_lookup("X", "https://example.com", lookup(&[]))
            .unwrap_err();
        assert!(err.to_string().contains("X_API_KEY"));
    }
}
