//! Natural Language Classifier models.

use crate::decode::{Decode, DecodeError, Node};
use serde::{Deserialize, Serialize};

/// Training state reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum ClassifierStatus {
    Available,
    Training,
    NonExistent,
    Failed,
    Unavailable,
    /// A status this client does not know yet, kept verbatim.
    Other(String),
}

impl ClassifierStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Available => "Available",
            Self::Training => "Training",
            Self::NonExistent => "Non Existent",
            Self::Failed => "Failed",
            Self::Unavailable => "Unavailable",
            Self::Other(raw) => raw,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Available)
    }
}

impl From<&str> for ClassifierStatus {
    fn from(raw: &str) -> Self {
        match raw {
            "Available" => Self::Available,
            "Training" => Self::Training,
            "Non Existent" => Self::NonExistent,
            "Failed" => Self::Failed,
            "Unavailable" => Self::Unavailable,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<ClassifierStatus> for String {
    fn from(status: ClassifierStatus) -> Self {
        status.as_str().to_string()
    }
}

impl Decode for ClassifierStatus {
    fn decode(node: &Node<'_>) -> Result<Self, DecodeError> {
        Ok(Self::from(node.as_string()?.as_str()))
    }
}

/// A trained (or training) classifier.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Classifier {
    pub id: Option<String>,
    pub name: Option<String>,
    pub language: Option<String>,
    /// Creation timestamp as sent by the service (ISO 8601).
    pub created: Option<String>,
    pub url: Option<String>,
    pub status: Option<ClassifierStatus>,
    pub status_description: Option<String>,
}

impl Decode for Classifier {
    fn decode(node: &Node<'_>) -> Result<Self, DecodeError> {
        node.as_object()?;
        Ok(Self {
            id: node.opt_str("classifier_id")?,
            name: node.opt_str("name")?,
            language: node.opt_str("language")?,
            created: node.opt_str("created")?,
            url: node.opt_str("url")?,
            status: node.opt("status")?,
            status_description: node.opt_str("status_description")?,
        })
    }
}

/// `GET /v1/classifiers` envelope.
pub(crate) struct ClassifierList(pub Vec<Classifier>);

impl Decode for ClassifierList {
    fn decode(node: &Node<'_>) -> Result<Self, DecodeError> {
        node.as_object()?;
        Ok(Self(node.req_list("classifiers")?))
    }
}

/// One candidate class and the service's confidence in it.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassScore {
    pub class_name: Option<String>,
    pub confidence: Option<f64>,
}

impl Decode for ClassScore {
    fn decode(node: &Node<'_>) -> Result<Self, DecodeError> {
        node.as_object()?;
        Ok(Self {
            class_name: node.opt_str("class_name")?,
            confidence: node.opt_f64("confidence")?,
        })
    }
}

/// Result of classifying one phrase; `classes` keeps the service's ranking.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Classification {
    pub id: Option<String>,
    pub url: Option<String>,
    pub text: Option<String>,
    pub top_class: Option<String>,
    pub classes: Option<Vec<ClassScore>>,
}

impl Decode for Classification {
    fn decode(node: &Node<'_>) -> Result<Self, DecodeError> {
        node.as_object()?;
        Ok(Self {
            id: node.opt_str("classifier_id")?,
            url: node.opt_str("url")?,
            text: node.opt_str("text")?,
            top_class: node.opt_str("top_class")?,
            classes: node.opt_list("classes")?,
        })
    }
}

/// Contents of the `training_metadata` part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingMetadata {
    pub language: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl TrainingMetadata {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            name: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }
}

#[derive(Serialize)]
pub(crate) struct ClassifyRequest<'a> {
    pub text: &'a str,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;

    #[test]
    fn classifier_with_every_field() {
        let body = br#"{
            "classifier_id": "10D41B-nlc-1",
            "name": "weather",
            "language": "en",
            "created": "2015-08-24T18:42:25.324Z",
            "url": "https://gateway.watsonplatform.net/natural-language-classifier/api/v1/classifiers/10D41B-nlc-1",
            "status": "Training",
            "status_description": "The classifier instance is in its training phase"
        }"#;
        let classifier: Classifier = decode(body).unwrap();
        assert_eq!(classifier.id.as_deref(), Some("10D41B-nlc-1"));
        assert_eq!(classifier.status, Some(ClassifierStatus::Training));
        assert!(!classifier.status.unwrap().is_ready());
    }

    #[test]
    fn unknown_status_is_kept_verbatim() {
        let classifier: Classifier = decode(br#"{"status": "Paused"}"#).unwrap();
        assert_eq!(classifier.status, Some(ClassifierStatus::Other("Paused".into())));
        assert_eq!(ClassifierStatus::from("Non Existent"), ClassifierStatus::NonExistent);
    }

    #[test]
    fn classification_keeps_ranking() {
        let body = br#"{
            "classifier_id": "10D41B-nlc-1",
            "text": "is it sunny?",
            "top_class": "temperature",
            "classes": [
                {"class_name": "temperature", "confidence": 0.98},
                {"class_name": "conditions", "confidence": 0.02}
            ]
        }"#;
        let classification: Classification = decode(body).unwrap();
        let classes = classification.classes.unwrap();
        assert_eq!(classes[0].class_name.as_deref(), Some("temperature"));
        assert_eq!(classes[1].confidence, Some(0.02));
    }

    #[test]
    fn score_fields_may_be_absent() {
        let classification: Classification =
            decode(br#"{"classes": [{}, {"class_name": "a", "confidence": null}]}"#).unwrap();
        let classes = classification.classes.unwrap();
        assert_eq!(classes[0], ClassScore::default());
        assert_eq!(classes[1].class_name.as_deref(), Some("a"));
        assert_eq!(classes[1].confidence, None);
    }

    #[test]
    fn mistyped_confidence_fails_the_whole_classification() {
        let body =
            br#"{"classes": [{"class_name": "a", "confidence": 0.5}, {"confidence": [1]}]}"#;
        let err = decode::<Classification>(body).unwrap_err();
        assert_eq!(err.field, "$.classes[1].confidence");
    }

    #[test]
    fn missing_list_envelope_is_an_error() {
        assert!(decode::<ClassifierList>(br#"{}"#).is_err());
        let list: ClassifierList = decode(br#"{"classifiers": []}"#).unwrap();
        assert!(list.0.is_empty());
    }

    #[test]
    fn metadata_serializes_without_absent_name() {
        let json = serde_json::to_string(&TrainingMetadata::new("en")).unwrap();
        assert_eq!(json, r#"{"language":"en"}"#);
    }
}
