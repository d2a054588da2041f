//! AlchemyLanguage request and result models.
//!
//! The combined call returns only the sections for the features that were
//! requested, so every field here is optional. A missing collection is `None`,
//! never an empty vector; an empty JSON array decodes to `Some(vec![])`.

use crate::decode::{Decode, DecodeError, Node};
use serde::Serialize;

/// What to analyse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Text(String),
    /// Public web page, fetched by the service.
    Url(String),
    Html(String),
}

impl Source {
    /// Path segment selecting the input kind (`text`, `url`, `html`).
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Url(_) => "url",
            Self::Html(_) => "html",
        }
    }

    pub(crate) fn combined_call(&self) -> &'static str {
        match self {
            Self::Text(_) => "TextGetCombinedData",
            Self::Url(_) => "URLGetCombinedData",
            Self::Html(_) => "HTMLGetCombinedData",
        }
    }

    pub(crate) fn content(&self) -> &str {
        match self {
            Self::Text(s) | Self::Url(s) | Self::Html(s) => s,
        }
    }
}

/// One analysis section of the combined call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    PageImage,
    ImageKeywords,
    Feeds,
    Entities,
    Keywords,
    Title,
    Authors,
    Taxonomy,
    Concepts,
    Relations,
    PublicationDate,
    DocSentiment,
}

impl Feature {
    pub const ALL: [Feature; 12] = [
        Feature::PageImage,
        Feature::ImageKeywords,
        Feature::Feeds,
        Feature::Entities,
        Feature::Keywords,
        Feature::Title,
        Feature::Authors,
        Feature::Taxonomy,
        Feature::Concepts,
        Feature::Relations,
        Feature::PublicationDate,
        Feature::DocSentiment,
    ];

    /// Name used in the `extract` parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PageImage => "page-image",
            Self::ImageKeywords => "image-kw",
            Self::Feeds => "feed",
            Self::Entities => "entity",
            Self::Keywords => "keyword",
            Self::Title => "title",
            Self::Authors => "author",
            Self::Taxonomy => "taxonomy",
            Self::Concepts => "concept",
            Self::Relations => "relation",
            Self::PublicationDate => "pub-date",
            Self::DocSentiment => "doc-sentiment",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| f.as_str() == name)
    }
}

/// Parameters of one combined-analysis call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CombinedRequest {
    pub source: Source,
    /// Empty means the service's default feature set.
    pub features: Vec<Feature>,
    /// Per-entity and per-keyword sentiment.
    pub sentiment: bool,
    pub max_retrieve: Option<u32>,
    pub show_source_text: bool,
}

impl CombinedRequest {
    pub fn new(source: Source) -> Self {
        Self {
            source,
            features: Vec::new(),
            sentiment: false,
            max_retrieve: None,
            show_source_text: false,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(Source::Text(text.into()))
    }

    pub fn url(url: impl Into<String>) -> Self {
        Self::new(Source::Url(url.into()))
    }

    pub fn html(html: impl Into<String>) -> Self {
        Self::new(Source::Html(html.into()))
    }

    /// Add a feature; duplicates are ignored and request order is kept.
    pub fn feature(mut self, feature: Feature) -> Self {
        if !self.features.contains(&feature) {
            self.features.push(feature);
        }
        self
    }

    pub fn features(self, features: impl IntoIterator<Item = Feature>) -> Self {
        features.into_iter().fold(self, Self::feature)
    }

    pub fn with_sentiment(mut self, enabled: bool) -> Self {
        self.sentiment = enabled;
        self
    }

    pub fn max_retrieve(mut self, n: u32) -> Self {
        self.max_retrieve = Some(n);
        self
    }

    pub fn show_source_text(mut self, enabled: bool) -> Self {
        self.show_source_text = enabled;
        self
    }

    /// Form fields, in a stable order.
    pub(crate) fn form_fields(&self) -> Vec<(String, String)> {
        let mut fields = vec![
            (self.source.kind().to_string(), self.source.content().to_string()),
            ("outputMode".to_string(), "json".to_string()),
        ];
        if !self.features.is_empty() {
            let extract: Vec<&str> = self.features.iter().map(Feature::as_str).collect();
            fields.push(("extract".to_string(), extract.join(",")));
        }
        if self.sentiment {
            fields.push(("sentiment".to_string(), "1".to_string()));
        }
        if let Some(n) = self.max_retrieve {
            fields.push(("maxRetrieve".to_string(), n.to_string()));
        }
        if self.show_source_text {
            fields.push(("showSourceText".to_string(), "1".to_string()));
        }
        fields
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub enum SentimentLabel {
    Positive,
    Negative,
    Neutral,
    Other(String),
}

impl SentimentLabel {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Neutral => "neutral",
            Self::Other(raw) => raw,
        }
    }
}

impl From<SentimentLabel> for String {
    fn from(label: SentimentLabel) -> Self {
        label.as_str().to_string()
    }
}

impl Decode for SentimentLabel {
    fn decode(node: &Node<'_>) -> Result<Self, DecodeError> {
        let raw = node.as_string()?;
        Ok(match raw.as_str() {
            "positive" => Self::Positive,
            "negative" => Self::Negative,
            "neutral" => Self::Neutral,
            _ => Self::Other(raw),
        })
    }
}

/// Sentiment of a document or of one extracted item.
///
/// A neutral document usually comes without `score`; that stays `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Sentiment {
    pub label: Option<SentimentLabel>,
    pub score: Option<f64>,
    pub mixed: Option<bool>,
}

impl Decode for Sentiment {
    fn decode(node: &Node<'_>) -> Result<Self, DecodeError> {
        node.as_object()?;
        Ok(Self {
            label: node.opt("type")?,
            score: node.opt_f64("score")?,
            mixed: node.opt_flag("mixed")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct KnowledgeGraph {
    /// Slash-separated hierarchy, e.g. `/people/politicians/democrats/`.
    pub type_hierarchy: Option<String>,
}

impl Decode for KnowledgeGraph {
    fn decode(node: &Node<'_>) -> Result<Self, DecodeError> {
        node.as_object()?;
        Ok(Self {
            type_hierarchy: node.opt_str("typeHierarchy")?,
        })
    }
}

/// Linked-data references shared by concepts and disambiguated entities.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LinkedData {
    pub website: Option<String>,
    pub geo: Option<String>,
    pub dbpedia: Option<String>,
    pub freebase: Option<String>,
    pub yago: Option<String>,
    pub opencyc: Option<String>,
    pub umbel: Option<String>,
    pub cia_factbook: Option<String>,
    pub census: Option<String>,
    pub geonames: Option<String>,
    pub music_brainz: Option<String>,
    pub crunchbase: Option<String>,
}

impl Decode for LinkedData {
    fn decode(node: &Node<'_>) -> Result<Self, DecodeError> {
        node.as_object()?;
        Ok(Self {
            website: node.opt_str("website")?,
            geo: node.opt_str("geo")?,
            dbpedia: node.opt_str("dbpedia")?,
            freebase: node.opt_str("freebase")?,
            yago: node.opt_str("yago")?,
            opencyc: node.opt_str("opencyc")?,
            umbel: node.opt_str("umbel")?,
            cia_factbook: node.opt_str("ciaFactbook")?,
            census: node.opt_str("census")?,
            geonames: node.opt_str("geonames")?,
            music_brainz: node.opt_str("musicBrainz")?,
            crunchbase: node.opt_str("crunchbase")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Concept {
    pub text: Option<String>,
    pub relevance: Option<f64>,
    pub knowledge_graph: Option<KnowledgeGraph>,
    pub links: LinkedData,
}

impl Decode for Concept {
    fn decode(node: &Node<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            text: node.opt_str("text")?,
            relevance: node.opt_f64("relevance")?,
            knowledge_graph: node.opt("knowledgeGraph")?,
            links: node.decode()?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Disambiguation {
    pub name: Option<String>,
    pub sub_types: Option<Vec<String>>,
    pub links: LinkedData,
}

impl Decode for Disambiguation {
    fn decode(node: &Node<'_>) -> Result<Self, DecodeError> {
        Ok(Self {
            name: node.opt_str("name")?,
            sub_types: node.opt_list("subType")?,
            links: node.decode()?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Quotation {
    pub quotation: Option<String>,
}

impl Decode for Quotation {
    fn decode(node: &Node<'_>) -> Result<Self, DecodeError> {
        node.as_object()?;
        Ok(Self {
            quotation: node.opt_str("quotation")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Entity {
    pub entity_type: Option<String>,
    pub text: Option<String>,
    pub relevance: Option<f64>,
    pub count: Option<u64>,
    pub knowledge_graph: Option<KnowledgeGraph>,
    pub disambiguated: Option<Disambiguation>,
    pub quotations: Option<Vec<Quotation>>,
    pub sentiment: Option<Sentiment>,
}

impl Decode for Entity {
    fn decode(node: &Node<'_>) -> Result<Self, DecodeError> {
        node.as_object()?;
        Ok(Self {
            entity_type: node.opt_str("type")?,
            text: node.opt_str("text")?,
            relevance: node.opt_f64("relevance")?,
            count: node.opt_u64("count")?,
            knowledge_graph: node.opt("knowledgeGraph")?,
            disambiguated: node.opt("disambiguated")?,
            quotations: node.opt_list("quotations")?,
            sentiment: node.opt("sentiment")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Feed {
    pub feed: Option<String>,
}

impl Decode for Feed {
    fn decode(node: &Node<'_>) -> Result<Self, DecodeError> {
        node.as_object()?;
        Ok(Self {
            feed: node.opt_str("feed")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Keyword {
    pub text: Option<String>,
    pub relevance: Option<f64>,
    pub knowledge_graph: Option<KnowledgeGraph>,
    pub sentiment: Option<Sentiment>,
}

impl Decode for Keyword {
    fn decode(node: &Node<'_>) -> Result<Self, DecodeError> {
        node.as_object()?;
        Ok(Self {
            text: node.opt_str("text")?,
            relevance: node.opt_f64("relevance")?,
            knowledge_graph: node.opt("knowledgeGraph")?,
            sentiment: node.opt("sentiment")?,
        })
    }
}

/// Keyword describing the page's main image.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImageKeyword {
    pub text: Option<String>,
    pub score: Option<f64>,
}

impl Decode for ImageKeyword {
    fn decode(node: &Node<'_>) -> Result<Self, DecodeError> {
        node.as_object()?;
        Ok(Self {
            text: node.opt_str("text")?,
            score: node.opt_f64("score")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PublicationDate {
    /// As sent by the service (`20151103T000000`).
    pub date: Option<String>,
    pub confident: Option<bool>,
}

impl Decode for PublicationDate {
    fn decode(node: &Node<'_>) -> Result<Self, DecodeError> {
        node.as_object()?;
        Ok(Self {
            date: node.opt_str("date")?,
            confident: node.opt_flag("confident")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Taxonomy {
    pub label: Option<String>,
    pub score: Option<f64>,
    pub confident: Option<bool>,
}

impl Decode for Taxonomy {
    fn decode(node: &Node<'_>) -> Result<Self, DecodeError> {
        node.as_object()?;
        Ok(Self {
            label: node.opt_str("label")?,
            score: node.opt_f64("score")?,
            confident: node.opt_flag("confident")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Verb {
    pub text: Option<String>,
    pub tense: Option<String>,
    pub negated: Option<bool>,
}

impl Decode for Verb {
    fn decode(node: &Node<'_>) -> Result<Self, DecodeError> {
        node.as_object()?;
        Ok(Self {
            text: node.opt_str("text")?,
            tense: node.opt_str("tense")?,
            negated: node.opt_flag("negated")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RelationAction {
    pub text: Option<String>,
    pub lemmatized: Option<String>,
    pub verb: Option<Verb>,
}

impl Decode for RelationAction {
    fn decode(node: &Node<'_>) -> Result<Self, DecodeError> {
        node.as_object()?;
        Ok(Self {
            text: node.opt_str("text")?,
            lemmatized: node.opt_str("lemmatized")?,
            verb: node.opt("verb")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RelationSubject {
    pub text: Option<String>,
    pub sentiment: Option<Sentiment>,
    pub entities: Option<Vec<Entity>>,
    pub keywords: Option<Vec<Keyword>>,
}

impl Decode for RelationSubject {
    fn decode(node: &Node<'_>) -> Result<Self, DecodeError> {
        node.as_object()?;
        Ok(Self {
            text: node.opt_str("text")?,
            sentiment: node.opt("sentiment")?,
            entities: node.opt_list("entities")?,
            keywords: node.opt_list("keywords")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RelationObject {
    pub text: Option<String>,
    pub sentiment: Option<Sentiment>,
    /// Sentiment the subject expresses towards the object.
    pub sentiment_from_subject: Option<Sentiment>,
    pub entities: Option<Vec<Entity>>,
    pub keywords: Option<Vec<Keyword>>,
}

impl Decode for RelationObject {
    fn decode(node: &Node<'_>) -> Result<Self, DecodeError> {
        node.as_object()?;
        Ok(Self {
            text: node.opt_str("text")?,
            sentiment: node.opt("sentiment")?,
            sentiment_from_subject: node.opt("sentimentFromSubject")?,
            entities: node.opt_list("entities")?,
            keywords: node.opt_list("keywords")?,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RelationLocation {
    pub text: Option<String>,
    pub sentiment: Option<Sentiment>,
    pub entities: Option<Vec<Entity>>,
}

impl Decode for RelationLocation {
    fn decode(node: &Node<'_>) -> Result<Self, DecodeError> {
        node.as_object()?;
        Ok(Self {
            text: node.opt_str("text")?,
            sentiment: node.opt("sentiment")?,
            entities: node.opt_list("entities")?,
        })
    }
}

/// Subject-action-object relation extracted from one sentence.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Relation {
    pub sentence: Option<String>,
    pub subject: Option<RelationSubject>,
    pub action: Option<RelationAction>,
    pub object: Option<RelationObject>,
    pub location: Option<RelationLocation>,
}

impl Decode for Relation {
    fn decode(node: &Node<'_>) -> Result<Self, DecodeError> {
        node.as_object()?;
        Ok(Self {
            sentence: node.opt_str("sentence")?,
            subject: node.opt("subject")?,
            action: node.opt("action")?,
            object: node.opt("object")?,
            location: node.opt("location")?,
        })
    }
}

/// Everything a combined-analysis call returned.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CombinedAnalysisResult {
    /// `OK` or `ERROR`.
    pub status: Option<String>,
    pub status_info: Option<String>,
    pub total_transactions: Option<u64>,
    pub language: Option<String>,
    pub url: Option<String>,
    /// Analysed text, when `showSourceText` was requested.
    pub text: Option<String>,
    pub author: Option<String>,
    pub title: Option<String>,
    pub image: Option<String>,
    pub concepts: Option<Vec<Concept>>,
    pub entities: Option<Vec<Entity>>,
    pub feeds: Option<Vec<Feed>>,
    pub keywords: Option<Vec<Keyword>>,
    pub image_keywords: Option<Vec<ImageKeyword>>,
    pub publication_date: Option<PublicationDate>,
    pub relations: Option<Vec<Relation>>,
    pub sentiment: Option<Sentiment>,
    pub taxonomy: Option<Vec<Taxonomy>>,
}

impl CombinedAnalysisResult {
    /// The service answered 2xx but reported a failure in the body.
    pub fn is_error_status(&self) -> bool {
        self.status.as_deref() == Some("ERROR")
    }
}

impl Decode for CombinedAnalysisResult {
    fn decode(node: &Node<'_>) -> Result<Self, DecodeError> {
        node.as_object()?;
        Ok(Self {
            status: node.opt_str("status")?,
            status_info: node.opt_str("statusInfo")?,
            total_transactions: node.opt_u64("totalTransactions")?,
            language: node.opt_str("language")?,
            url: node.opt_str("url")?,
            text: node.opt_str("text")?,
            author: node.opt_str("author")?,
            title: node.opt_str("title")?,
            image: node.opt_str("image")?,
            concepts: node.opt_list("concepts")?,
            entities: node.opt_list("entities")?,
            feeds: node.opt_list("feeds")?,
            keywords: node.opt_list("keywords")?,
            image_keywords: node.opt_list("imageKeywords")?,
            publication_date: node.opt("publicationDate")?,
            relations: node.opt_list("relations")?,
            sentiment: node
                .field_any(&["docSentiment", "sentiment"])?
                .map(|n| n.decode())
                .transpose()?,
            taxonomy: node.opt_list("taxonomy")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decode::decode;

    #[test]
    fn sentiment_only_document() {
        let body = br#"{"status": "OK", "language": "english",
            "docSentiment": {"type": "negative", "score": "-0.54", "mixed": "1"}}"#;
        let result: CombinedAnalysisResult = decode(body).unwrap();
        let sentiment = result.sentiment.clone().unwrap();
        assert_eq!(sentiment.label, Some(SentimentLabel::Negative));
        assert_eq!(sentiment.score, Some(-0.54));
        assert_eq!(sentiment.mixed, Some(true));
        assert!(result.concepts.is_none());
        assert!(result.entities.is_none());
        assert!(result.relations.is_none());
        assert!(!result.is_error_status());
    }

    #[test]
    fn neutral_sentiment_has_no_score() {
        let result: CombinedAnalysisResult =
            decode(br#"{"sentiment": {"type": "neutral"}}"#).unwrap();
        let sentiment = result.sentiment.unwrap();
        assert_eq!(sentiment.label, Some(SentimentLabel::Neutral));
        assert_eq!(sentiment.score, None);
    }

    #[test]
    fn empty_document_decodes_to_all_absent() {
        let result: CombinedAnalysisResult = decode(b"{}").unwrap();
        assert_eq!(result, CombinedAnalysisResult::default());
    }

    #[test]
    fn nested_entities_and_relations() {
        let body = br#"{
            "totalTransactions": "8",
            "entities": [{
                "type": "Company", "text": "IBM", "relevance": "0.95", "count": "3",
                "disambiguated": {"name": "IBM", "subType": ["SoftwareLicense"], "dbpedia": "http://dbpedia.org/resource/IBM"},
                "quotations": [{"quotation": "\"We are open\""}]
            }],
            "relations": [{
                "sentence": "IBM bought the company.",
                "subject": {"text": "IBM"},
                "action": {"text": "bought", "lemmatized": "buy", "verb": {"text": "buy", "tense": "past", "negated": "0"}},
                "object": {"text": "the company", "sentimentFromSubject": {"type": "positive", "score": 0.3}}
            }],
            "publicationDate": {"date": "20151103T000000", "confident": "no"},
            "taxonomy": [{"label": "/technology", "score": "0.77", "confident": "yes"}]
        }"#;
        let result: CombinedAnalysisResult = decode(body).unwrap();
        assert_eq!(result.total_transactions, Some(8));

        let entity = &result.entities.as_ref().unwrap()[0];
        assert_eq!(entity.count, Some(3));
        let disambiguated = entity.disambiguated.as_ref().unwrap();
        assert_eq!(disambiguated.sub_types.as_deref(), Some(&["SoftwareLicense".to_string()][..]));
        assert_eq!(
            disambiguated.links.dbpedia.as_deref(),
            Some("http://dbpedia.org/resource/IBM")
        );

        let relation = &result.relations.as_ref().unwrap()[0];
        let verb = relation.action.as_ref().unwrap().verb.as_ref().unwrap();
        assert_eq!(verb.negated, Some(false));
        let object = relation.object.as_ref().unwrap();
        assert_eq!(
            object.sentiment_from_subject.as_ref().unwrap().label,
            Some(SentimentLabel::Positive)
        );
        assert_eq!(result.publication_date.unwrap().confident, Some(false));
        assert_eq!(result.taxonomy.unwrap()[0].confident, Some(true));
    }

    #[test]
    fn one_bad_keyword_rejects_the_document() {
        let body =
            br#"{"keywords": [{"text": "a", "relevance": 0.9}, {"text": "b", "relevance": "high"}]}"#;
        let err = decode::<CombinedAnalysisResult>(body).unwrap_err();
        assert_eq!(err.field, "$.keywords[1].relevance");
    }

    #[test]
    fn keyword_order_is_preserved() {
        let body = br#"{"keywords": [{"text": "c"}, {"text": "a"}, {"text": "b"}]}"#;
        let result: CombinedAnalysisResult = decode(body).unwrap();
        let texts: Vec<_> = result
            .keywords
            .unwrap()
            .into_iter()
            .map(|k| k.text.unwrap())
            .collect();
        assert_eq!(texts, ["c", "a", "b"]);
    }

    #[test]
    fn form_fields_follow_request() {
        let request = CombinedRequest::url("https://www.ibm.com")
            .features([Feature::Entities, Feature::DocSentiment, Feature::Entities])
            .with_sentiment(true)
            .max_retrieve(5);
        assert_eq!(
            request.form_fields(),
            vec![
                ("url".to_string(), "https://www.ibm.com".to_string()),
                ("outputMode".to_string(), "json".to_string()),
                ("extract".to_string(), "entity,doc-sentiment".to_string()),
                ("sentiment".to_string(), "1".to_string()),
                ("maxRetrieve".to_string(), "5".to_string()),
            ]
        );
        assert_eq!(request.source.combined_call(), "URLGetCombinedData");
    }

    #[test]
    fn feature_names_round_trip() {
        for feature in Feature::ALL {
            assert_eq!(Feature::parse(feature.as_str()), Some(feature));
        }
        assert_eq!(Feature::parse("nonsense"), None);
    }
}
