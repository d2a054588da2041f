use crate::client::config::ServiceConfiguration;
use crate::client::dispatch::Dispatcher;
use crate::decode::{self, Decode};
use crate::error_code::RemoteErrorClass;
use crate::request::{OutboundRequest, RequestBuilder};
use crate::response::{classify, Outcome};
use crate::transport::{self, Transport};
use crate::{Error, ServiceError, ServiceResult};
use bytes::Bytes;
use reqwest::Method;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// A Watson service reachable through a [`ServiceClient`].
pub trait Service: Sized {
    /// Short name used in logs and error context.
    const NAME: &'static str;
    const DEFAULT_BASE_URL: &'static str;
    /// Prefix of the service's environment variables (`{PREFIX}_URL`, ...).
    const ENV_PREFIX: &'static str;

    fn from_client(client: ServiceClient) -> Self;
}

/// Shared request pipeline: build, send with timeout, classify, decode.
///
/// Cheap to clone; clones share the configuration, transport and callback queue.
#[derive(Clone)]
pub struct ServiceClient {
    service: &'static str,
    config: Arc<ServiceConfiguration>,
    transport: Arc<dyn Transport>,
    dispatcher: Dispatcher,
}

/// Successful exchange, before decoding.
enum Payload {
    Body(Bytes),
    Empty,
}

impl ServiceClient {
    pub fn new(
        service: &'static str,
        config: ServiceConfiguration,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            service,
            config: Arc::new(config),
            transport,
            dispatcher: Dispatcher::new(),
        }
    }

    pub fn service(&self) -> &'static str {
        self.service
    }

    pub fn config(&self) -> &ServiceConfiguration {
        &self.config
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder<'_> {
        RequestBuilder::new(&self.config, method, segments)
    }

    /// Execute `request` and decode its body as `T`.
    ///
    /// A successful response without a body is a decode error here.
    pub async fn execute<T: Decode>(&self, request: OutboundRequest) -> ServiceResult<T> {
        let request_id = request.request_id.clone();
        let path = request.path();
        match self.exchange(request).await? {
            Payload::Body(body) => decode::decode::<T>(&body).map_err(|e| {
                let err = ServiceError::from(Error::Decode(e));
                self.log_failure(&err, &path, &request_id);
                err
            }),
            Payload::Empty => {
                let err = ServiceError::from(Error::Decode(decode::DecodeError::new(
                    "$",
                    "JSON document",
                    "empty body",
                )));
                self.log_failure(&err, &path, &request_id);
                Err(err)
            }
        }
    }

    /// Execute `request` where only success matters; an empty or `{}` body is fine.
    pub async fn execute_empty(&self, request: OutboundRequest) -> ServiceResult<()> {
        self.exchange(request).await.map(|_| ())
    }

    async fn exchange(&self, request: OutboundRequest) -> ServiceResult<Payload> {
        let request_id = request.request_id.clone();
        let path = request.path();
        let start = Instant::now();

        let sent = transport::send(self.transport.as_ref(), request, self.config.timeout).await;
        let response = match sent {
            Ok(response) => response,
            Err(e) => {
                let err = ServiceError::from(Error::Transport(e));
                self.log_failure(&err, &path, &request_id);
                return Err(err);
            }
        };
        let http_status = response.status;

        match classify(response) {
            Outcome::Success(body) => {
                debug!(
                    service = self.service,
                    request_id = request_id.as_str(),
                    http_status,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "watson-sdk request succeeded"
                );
                Ok(Payload::Body(body))
            }
            Outcome::SuccessEmpty => Ok(Payload::Empty),
            Outcome::RemoteError(err) => {
                self.log_failure(&err, &path, &request_id);
                Err(err)
            }
            Outcome::DecodeError(e) => {
                let err = ServiceError::from(Error::Decode(e));
                self.log_failure(&err, &path, &request_id);
                Err(err)
            }
        }
    }

    fn log_failure(&self, err: &ServiceError, path: &str, request_id: &str) {
        let error_class = err
            .http_status()
            .map(|status| RemoteErrorClass::from_http_status(status).name())
            .unwrap_or_else(|| err.kind.name());
        info!(
            service = self.service,
            request_id,
            path,
            code = err.code,
            http_status = err.http_status().unwrap_or_default(),
            error_class,
            "watson-sdk request failed: {}",
            err.message
        );
    }
}

impl std::fmt::Debug for ServiceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceClient")
            .field("service", &self.service)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
