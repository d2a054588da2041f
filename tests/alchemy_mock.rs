//! AlchemyLanguage combined analysis against a mockito server.

use mockito::{Matcher, Server};
use watson_sdk::alchemy::{CombinedRequest, Feature, SentimentLabel};
use watson_sdk::error_code::ErrorKind;
use watson_sdk::AlchemyLanguage;

fn service(base_url: &str) -> AlchemyLanguage {
    AlchemyLanguage::builder()
        .base_url(base_url)
        .api_key("test-key")
        .build()
        .expect("client")
}

#[tokio::test]
async fn sentiment_only_response() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("POST", "/text/TextGetCombinedData")
        .match_query(Matcher::UrlEncoded("apikey".into(), "test-key".into()))
        .match_header("content-type", "application/x-www-form-urlencoded")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("text".into(), "I love this phone".into()),
            Matcher::UrlEncoded("outputMode".into(), "json".into()),
            Matcher::UrlEncoded("extract".into(), "doc-sentiment".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"status": "OK", "usage": "By accessing AlchemyAPI...", "totalTransactions": "2",
                "language": "english",
                "docSentiment": {"type": "positive", "score": "0.87"}}"#,
        )
        .create_async()
        .await;

    let request = CombinedRequest::text("I love this phone").feature(Feature::DocSentiment);
    let result = service(&server.url()).combined_analysis(&request).await.unwrap();
    mock.assert_async().await;

    let sentiment = result.sentiment.as_ref().unwrap();
    assert_eq!(sentiment.label, Some(SentimentLabel::Positive));
    assert_eq!(sentiment.score, Some(0.87));
    assert_eq!(sentiment.mixed, None);
    assert_eq!(result.total_transactions, Some(2));
    assert!(result.concepts.is_none());
    assert!(result.entities.is_none());
    assert!(result.keywords.is_none());
    assert!(result.relations.is_none());
    assert!(result.taxonomy.is_none());
}

#[tokio::test]
async fn url_analysis_with_entities_and_concepts() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/url/URLGetCombinedData")
        .match_query(Matcher::Any)
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("url".into(), "https://www.ibm.com/news".into()),
            Matcher::UrlEncoded("extract".into(), "entity,concept,title".into()),
            Matcher::UrlEncoded("sentiment".into(), "1".into()),
            Matcher::UrlEncoded("maxRetrieve".into(), "2".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"status": "OK", "url": "https://www.ibm.com/news", "title": "IBM News",
                "entities": [
                    {"type": "Company", "text": "IBM", "relevance": "0.93", "count": "4",
                     "sentiment": {"type": "positive", "score": "0.4", "mixed": "0"}},
                    {"type": "City", "text": "Armonk", "relevance": "0.41", "count": "1",
                     "sentiment": {"type": "neutral"}}
                ],
                "concepts": [
                    {"text": "International Business Machines", "relevance": "0.97",
                     "dbpedia": "http://dbpedia.org/resource/IBM",
                     "knowledgeGraph": {"typeHierarchy": "/companies/ibm"}}
                ]}"#,
        )
        .create_async()
        .await;

    let request = CombinedRequest::url("https://www.ibm.com/news")
        .features([Feature::Entities, Feature::Concepts, Feature::Title])
        .with_sentiment(true)
        .max_retrieve(2);
    let result = service(&server.url()).combined_analysis(&request).await.unwrap();

    assert_eq!(result.title.as_deref(), Some("IBM News"));
    let entities = result.entities.unwrap();
    assert_eq!(entities[0].text.as_deref(), Some("IBM"));
    assert_eq!(entities[1].text.as_deref(), Some("Armonk"));
    assert_eq!(entities[1].sentiment.as_ref().unwrap().score, None);
    let concept = &result.concepts.unwrap()[0];
    assert_eq!(concept.relevance, Some(0.97));
    assert_eq!(
        concept.knowledge_graph.as_ref().unwrap().type_hierarchy.as_deref(),
        Some("/companies/ibm")
    );
}

#[tokio::test]
async fn body_error_status_is_remote_400() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/text/TextGetCombinedData")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status": "ERROR", "statusInfo": "unsupported-text-language"}"#)
        .create_async()
        .await;

    let err = service(&server.url())
        .combined_analysis(&CombinedRequest::text("texto"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Remote);
    assert_eq!(err.code, 400);
    assert_eq!(err.message, "unsupported-text-language");
}

#[tokio::test]
async fn malformed_relation_rejects_whole_result() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/text/TextGetCombinedData")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(
            r#"{"status": "OK",
                "keywords": [{"text": "phone", "relevance": "0.9"}],
                "relations": [{"sentence": "ok"}, {"subject": "not an object"}]}"#,
        )
        .create_async()
        .await;

    let err = service(&server.url())
        .combined_analysis(&CombinedRequest::text("a phone"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Decode);
    assert!(err.message.contains("$.relations[1].subject"));
}

#[tokio::test]
async fn handler_receives_result() {
    let mut server = Server::new_async().await;
    server
        .mock("POST", "/text/TextGetCombinedData")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"status": "OK", "language": "english"}"#)
        .create_async()
        .await;

    let (tx, rx) = tokio::sync::oneshot::channel();
    service(&server.url()).combined_analysis_with_handler(
        CombinedRequest::text("hello world"),
        move |result, err| {
            let _ = tx.send((result.and_then(|r| r.language), err.is_none()));
        },
    );
    assert_eq!(rx.await.unwrap(), (Some("english".to_string()), true));
}
