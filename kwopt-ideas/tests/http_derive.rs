mod common;
use kwopt_common::{CampaignConfiguration, Criterion, KeywordOptimizerError, MatchType};
use kwopt_ideas::{
    AlternativesFinder, HttpIdeaService, IdeaAlternativesFinder, IdeaServiceError, Keyword, SeedSet,
};
use serde_json::{Value, json};
use std::error::Error as _;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TOKEN: &str = "test-token";

fn idea(text: &str, volume: i64) -> Value {
    json!({
        "data": [
            {"key": "KEYWORD_TEXT", "value": {"type": "STRING", "value": text}},
            {"key": "SEARCH_VOLUME", "value": {"type": "LONG", "value": volume}},
            {"key": "AVERAGE_CPC", "value": {"type": "MONEY", "value": {"microAmount": 900000}}}
        ]
    })
}

fn seeds() -> SeedSet {
    SeedSet::new(
        CampaignConfiguration::default()
            .with_criterion(Criterion::Language { id: 1000 })
            .with_criterion(Criterion::Location { id: 2840 }),
        ["shoe"],
        [MatchType::Exact, MatchType::Broad],
    )
}

async fn mount_page(server: &MockServer, start_index: u32, body: Value) {
    Mock::given(method("POST"))
        .and(path("/v1/targetingIdeas:get"))
        .and(header("authorization", format!("Bearer {TOKEN}").as_str()))
        .and(body_partial_json(json!({
            "requestType": "IDEAS",
            "ideaType": "KEYWORD",
            "paging": {"startIndex": start_index, "numberResults": 100}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .expect(1)
        .mount(server)
        .await;
}

fn finder(server: &MockServer) -> IdeaAlternativesFinder<HttpIdeaService> {
    common::init_test_tracing();
    IdeaAlternativesFinder::new(HttpIdeaService::new(&server.uri(), TOKEN).unwrap())
}

#[tokio::test]
async fn derives_across_pages_over_http() {
    let server = MockServer::start().await;
    let first: Vec<Value> = (0..100).map(|i| idea(&format!("shoe {i}"), i)).collect();
    mount_page(&server, 0, json!({"entries": first, "totalNumEntries": 102})).await;
    mount_page(
        &server,
        100,
        json!({"entries": [idea("boot", 7), idea("shoe 5", 500)], "totalNumEntries": 102}),
    )
    .await;

    let alternatives = finder(&server).derive(&seeds()).await.unwrap();

    // 101 distinct texts ("shoe 5" appears twice) times two match types.
    assert_eq!(alternatives.len(), 202);
    assert_eq!(alternatives.containing_keyword_texts().len(), 101);
    let shoe5 = alternatives
        .iter()
        .find(|r| r.keyword == Keyword::new("shoe 5", MatchType::Broad))
        .unwrap();
    assert_eq!(shoe5.estimate.search_volume, Some(500));
    assert_eq!(alternatives.campaign().additional_criteria.len(), 2);
}

#[tokio::test]
async fn sends_seed_texts_and_criteria_as_search_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "searchParameters": [
                {"type": "RELATED_TO_QUERY", "queries": ["shoe"]},
                {"type": "LANGUAGE", "languageIds": [1000]},
                {"type": "LOCATION", "locationIds": [2840]}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"totalNumEntries": 0})))
        .expect(1)
        .mount(&server)
        .await;

    let alternatives = finder(&server).derive(&seeds()).await.unwrap();
    assert!(alternatives.is_empty());
}

#[tokio::test]
async fn empty_seed_set_with_no_results_is_not_an_error() {
    let server = MockServer::start().await;
    mount_page(&server, 0, json!({"totalNumEntries": 0})).await;

    let empty = SeedSet::new(
        CampaignConfiguration::default(),
        Vec::<String>::new(),
        [MatchType::Exact],
    );
    let alternatives = finder(&server).derive(&empty).await.unwrap();
    assert!(alternatives.is_empty());
}

#[tokio::test]
async fn service_rejection_surfaces_the_original_message() {
    let server = MockServer::start().await;
    let first: Vec<Value> = (0..100).map(|i| idea(&format!("kw {i}"), i)).collect();
    mount_page(&server, 0, json!({"entries": first, "totalNumEntries": 150})).await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({"paging": {"startIndex": 100}})))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"message": "Too many search parameters", "reason": "INVALID_ARGUMENT"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = finder(&server).derive(&seeds()).await.unwrap_err();

    assert!(matches!(err, KeywordOptimizerError::Service { .. }));
    assert!(err.to_string().contains("Too many search parameters"));
    let cause = err.source().unwrap().downcast_ref::<IdeaServiceError>().unwrap();
    assert!(matches!(cause, IdeaServiceError::Api { status: Some(400), .. }));
}

#[tokio::test]
async fn unreachable_service_is_a_connection_error() {
    // Bind and release a port so nothing is listening on it.
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let uri = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);
    common::init_test_tracing();

    let finder = IdeaAlternativesFinder::new(HttpIdeaService::new(&uri, TOKEN).unwrap());
    let err = finder.derive(&seeds()).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "Problem while connecting to the keyword idea service"
    );
    let cause = err.source().unwrap().downcast_ref::<IdeaServiceError>().unwrap();
    assert!(matches!(cause, IdeaServiceError::Transport(_)));
}

#[tokio::test]
async fn garbled_page_is_a_connection_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>proxy error</html>"))
        .mount(&server)
        .await;

    let err = finder(&server).derive(&seeds()).await.unwrap_err();
    assert!(matches!(err, KeywordOptimizerError::Connection { .. }));
}
