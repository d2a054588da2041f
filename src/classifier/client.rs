//! Natural Language Classifier client.

use super::types::{
    Classification, Classifier, ClassifierList, ClassifyRequest, TrainingMetadata,
};
use crate::client::validation::{require_non_blank, require_non_empty_bytes};
use crate::client::{Service, ServiceClient, ServiceClientBuilder};
use crate::request::{MultipartPart, CONTENT_TYPE_JSON};
use crate::{Error, ErrorContext, Result, ServiceError, ServiceResult};
use bytes::Bytes;
use reqwest::Method;
use std::path::Path;

const SOURCE: &str = "natural_language_classifier";

/// Client for the Natural Language Classifier service.
///
/// Every operation exists as an `async fn` and as a `*_with_handler` variant
/// whose handler is called exactly once on the client's callback queue.
#[derive(Debug, Clone)]
pub struct NaturalLanguageClassifier {
    client: ServiceClient,
}

impl Service for NaturalLanguageClassifier {
    const NAME: &'static str = SOURCE;
    const DEFAULT_BASE_URL: &'static str =
        "https://gateway.watsonplatform.net/natural-language-classifier/api";
    const ENV_PREFIX: &'static str = "NATURAL_LANGUAGE_CLASSIFIER";

    fn from_client(client: ServiceClient) -> Self {
        Self { client }
    }
}

impl NaturalLanguageClassifier {
    /// Client for the public endpoint with basic-auth service credentials.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Result<Self> {
        Self::builder().basic_auth(username, password).build()
    }

    pub fn builder() -> ServiceClientBuilder<Self> {
        ServiceClientBuilder::new()
    }

    pub fn service_client(&self) -> &ServiceClient {
        &self.client
    }

    pub async fn list_classifiers(&self) -> ServiceResult<Vec<Classifier>> {
        let request = self
            .client
            .request(Method::GET, &["v1", "classifiers"])
            .build()?;
        let list: ClassifierList = self.client.execute(request).await?;
        Ok(list.0)
    }

    pub async fn get_classifier(&self, classifier_id: &str) -> ServiceResult<Classifier> {
        let id = require_non_blank("classifier_id", classifier_id, SOURCE)?;
        let request = self
            .client
            .request(Method::GET, &["v1", "classifiers", id])
            .build()?;
        self.client.execute(request).await
    }

    pub async fn classify(&self, classifier_id: &str, text: &str) -> ServiceResult<Classification> {
        let id = require_non_blank("classifier_id", classifier_id, SOURCE)?;
        let text = require_non_blank("text", text, SOURCE)?;
        let request = self
            .client
            .request(Method::POST, &["v1", "classifiers", id, "classify"])
            .json(&ClassifyRequest { text })
            .build()?;
        self.client.execute(request).await
    }

    /// Train a new classifier from metadata and CSV training data.
    ///
    /// The metadata part is always sent before the training data.
    pub async fn create_classifier(
        &self,
        metadata: &TrainingMetadata,
        training_data: impl Into<Bytes>,
    ) -> ServiceResult<Classifier> {
        let metadata = serde_json::to_vec(metadata).map_err(|e| {
            Error::validation_with_context(
                format!("training metadata is not serializable: {}", e),
                ErrorContext::new()
                    .with_field_path("training_metadata")
                    .with_source(SOURCE),
            )
        })?;
        self.create_classifier_raw(Bytes::from(metadata), training_data.into())
            .await
    }

    /// Train a new classifier from a metadata file and a CSV training file.
    ///
    /// The metadata file is sent as-is; the service validates its keys.
    pub async fn create_classifier_from_files(
        &self,
        metadata_path: impl AsRef<Path>,
        training_data_path: impl AsRef<Path>,
    ) -> ServiceResult<Classifier> {
        let metadata = read_part("training_metadata", metadata_path.as_ref()).await?;
        let training_data = read_part("training_data", training_data_path.as_ref()).await?;
        self.create_classifier_raw(metadata, training_data).await
    }

    async fn create_classifier_raw(
        &self,
        metadata: Bytes,
        training_data: Bytes,
    ) -> ServiceResult<Classifier> {
        require_non_empty_bytes("training_metadata", &metadata, SOURCE)?;
        require_non_empty_bytes("training_data", &training_data, SOURCE)?;
        let request = self
            .client
            .request(Method::POST, &["v1", "classifiers"])
            .part(
                MultipartPart::new("training_metadata", CONTENT_TYPE_JSON, metadata)
                    .with_filename("training_metadata.json"),
            )
            .part(
                MultipartPart::new("training_data", "text/csv", training_data)
                    .with_filename("training_data.csv"),
            )
            .build()?;
        self.client.execute(request).await
    }

    pub async fn delete_classifier(&self, classifier_id: &str) -> ServiceResult<()> {
        let id = require_non_blank("classifier_id", classifier_id, SOURCE)?;
        let request = self
            .client
            .request(Method::DELETE, &["v1", "classifiers", id])
            .build()?;
        self.client.execute_empty(request).await
    }

    pub fn list_classifiers_with_handler<H>(&self, handler: H)
    where
        H: FnOnce(Option<Vec<Classifier>>, Option<ServiceError>) + Send + 'static,
    {
        let this = self.clone();
        self.client
            .dispatcher()
            .submit(async move { this.list_classifiers().await }, handler);
    }

    pub fn get_classifier_with_handler<H>(&self, classifier_id: impl Into<String>, handler: H)
    where
        H: FnOnce(Option<Classifier>, Option<ServiceError>) + Send + 'static,
    {
        let this = self.clone();
        let id = classifier_id.into();
        self.client
            .dispatcher()
            .submit(async move { this.get_classifier(&id).await }, handler);
    }

    pub fn classify_with_handler<H>(
        &self,
        classifier_id: impl Into<String>,
        text: impl Into<String>,
        handler: H,
    ) where
        H: FnOnce(Option<Classification>, Option<ServiceError>) + Send + 'static,
    {
        let this = self.clone();
        let (id, text) = (classifier_id.into(), text.into());
        self.client
            .dispatcher()
            .submit(async move { this.classify(&id, &text).await }, handler);
    }

    pub fn create_classifier_with_handler<H>(
        &self,
        metadata: TrainingMetadata,
        training_data: impl Into<Bytes>,
        handler: H,
    ) where
        H: FnOnce(Option<Classifier>, Option<ServiceError>) + Send + 'static,
    {
        let this = self.clone();
        let training_data = training_data.into();
        self.client.dispatcher().submit(
            async move { this.create_classifier(&metadata, training_data).await },
            handler,
        );
    }

    /// The handler receives `None` when the classifier was deleted.
    pub fn delete_classifier_with_handler<H>(&self, classifier_id: impl Into<String>, handler: H)
    where
        H: FnOnce(Option<ServiceError>) + Send + 'static,
    {
        let this = self.clone();
        let id = classifier_id.into();
        self.client.dispatcher().submit(
            async move { this.delete_classifier(&id).await },
            move |_: Option<()>, err| handler(err),
        );
    }
}

async fn read_part(field: &str, path: &Path) -> Result<Bytes> {
    tokio::fs::read(path).await.map(Bytes::from).map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("cannot read {} from {}: {}", field, path.display(), e),
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_code::{ErrorKind, SyntheticCode};
    use crate::request::OutboundRequest;
    use crate::transport::{RawResponse, Transport, TransportError};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Fails the test if any request reaches the network.
    #[derive(Default)]
    struct Unreachable {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Transport for Unreachable {
        async fn execute(
            &self,
            _request: OutboundRequest,
        ) -> std::result::Result<RawResponse, TransportError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(TransportError::Other("unexpected request".into()))
        }
    }

    fn service() -> (NaturalLanguageClassifier, Arc<Unreachable>) {
        let transport = Arc::new(Unreachable::default());
        let service = NaturalLanguageClassifier::builder()
            .basic_auth("user", "pass")
            .transport(transport.clone())
            .build()
            .unwrap();
        (service, transport)
    }

    #[tokio::test]
    async fn blank_parameters_fail_before_sending() {
        let (service, transport) = service();
        let err = service.classify(" ", "is it sunny?").await.unwrap_err();
        assert_eq!(err.code, SyntheticCode::Validation.code());
        let err = service.classify("abc", "").await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert!(service.get_classifier("").await.is_err());
        assert!(service.delete_classifier("\t").await.is_err());
        let err = service
            .create_classifier(&TrainingMetadata::new("en"), Bytes::new())
            .await
            .unwrap_err();
        assert!(err.message.contains("training_data"));
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn unreadable_training_file_is_a_validation_error() {
        let (service, transport) = service();
        let err = service
            .create_classifier_from_files("/nonexistent/meta.json", "/nonexistent/train.csv")
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn handler_receives_validation_error() {
        let (service, _) = service();
        let (tx, rx) = tokio::sync::oneshot::channel();
        service.delete_classifier_with_handler("", move |err| {
            let _ = tx.send(err.map(|e| e.kind));
        });
        assert_eq!(rx.await.unwrap(), Some(ErrorKind::Validation));
    }

    #[test]
    fn handler_outside_runtime_gets_configuration_error() {
        let (service, transport) = service();
        let (tx, rx) = std::sync::mpsc::channel();
        service.classify_with_handler("10D41B-nlc-1", "is it sunny?", move |result, err| {
            let _ = tx.send((result.is_some(), err.map(|e| (e.kind, e.code))));
        });
        let delivered = rx.recv_timeout(std::time::Duration::from_secs(1)).unwrap();
        assert_eq!(
            delivered,
            (false, Some((ErrorKind::Configuration, SyntheticCode::Configuration.code())))
        );
        assert_eq!(transport.calls.load(Ordering::SeqCst), 0);
    }
}
