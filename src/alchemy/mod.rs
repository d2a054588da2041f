//! AlchemyLanguage 组合分析：一次调用同时抽取实体、概念、关键词与情感等。
//!
//! Combined text analysis: one call extracts entities, concepts, keywords,
//! relations, sentiment and more, depending on the requested features.

mod client;
mod types;

pub use client::AlchemyLanguage;
pub use types::{
    CombinedAnalysisResult, CombinedRequest, Concept, Disambiguation, Entity, Feature, Feed,
    ImageKeyword, Keyword, KnowledgeGraph, LinkedData, PublicationDate, Quotation, Relation,
    RelationAction, RelationLocation, RelationObject, RelationSubject, Sentiment, SentimentLabel,
    Source, Taxonomy, Verb,
};
