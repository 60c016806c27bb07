//! Integration tests for Paper Browser
//!
//! These tests drive the data source and the views together, against the
//! in-memory source and against a local HTTP server.

use mockito::Matcher;
use tokio_test::{assert_err, assert_ok};
use paper_browser::models::{FetchKind, FetchStatus, Page, PaperId};
use paper_browser::observe::{BrowserEvent, RecordingObserver};
use paper_browser::sources::{DataSource, HttpSource, MockSource, SourceError};
use paper_browser::ui::list::NO_PAPERS;
use paper_browser::ui::{
    format_list, DetailContent, DetailView, ListContent, OutputFormat, PaperBrowser,
};
use std::sync::Arc;
use std::time::Duration;

const SERVICE_RESPONSE: &str = r#"[
    {
        "arxiv_id": "2301.00001v1",
        "title": "Mock Paper 1",
        "summary": "Summary for mock paper 1.",
        "authors": [{"name": "Author A"}, {"name": "Author B"}],
        "pdf_url": "https://arxiv.org/pdf/2301.00001v1",
        "published_date": "2023-01-01T00:00:00Z"
    },
    {
        "arxiv_id": "2301.00002v1",
        "title": "Mock Paper 2",
        "summary": "Summary for mock paper 2.",
        "authors": ["Author C"]
    }
]"#;

fn browser_with(observer: Arc<RecordingObserver>) -> PaperBrowser {
    PaperBrowser::new(observer).with_detail(DetailView::new().with_previews(false))
}

fn http_data(server: &mockito::ServerGuard, observer: Arc<RecordingObserver>) -> DataSource {
    let source = HttpSource::new(&server.url()).unwrap();
    DataSource::with_observer(Arc::new(source), observer)
}

#[tokio::test]
async fn test_latest_then_select_with_mock_source() {
    let observer = Arc::new(RecordingObserver::new());
    let data = DataSource::with_observer(Arc::new(MockSource::new()), observer.clone());
    let mut browser = browser_with(observer.clone());

    let fetched = data.fetch_latest().await;
    let set = data.accept(fetched).expect("only request is current");
    browser.apply(set);

    assert_eq!(browser.active().status, FetchStatus::Loaded);
    assert_eq!(browser.list().rows().len(), 3);
    assert!(matches!(browser.detail().content(), DetailContent::Placeholder));

    assert!(browser.select(&PaperId::from("1")));
    match browser.detail().content() {
        DetailContent::Paper(detail) => {
            assert!(detail.title.starts_with("Attention"));
            assert!(detail.document_url.is_some());
        }
        DetailContent::Placeholder => panic!("Expected paper detail"),
    }
    assert!(browser.detail().frame().is_some());

    let events = observer.events();
    assert!(matches!(events[0], BrowserEvent::FetchStarted { seq: 1, .. }));
    assert!(events.contains(&BrowserEvent::FetchSucceeded { seq: 1, count: 3 }));
    assert!(events.contains(&BrowserEvent::SelectionChanged {
        id: Some(PaperId::from("1"))
    }));
}

#[tokio::test]
async fn test_new_result_set_clears_selection_and_detail() {
    let observer = Arc::new(RecordingObserver::new());
    let data = DataSource::with_observer(Arc::new(MockSource::new()), observer.clone());
    let mut browser = browser_with(observer.clone());

    let set = data.accept(data.fetch_latest().await).unwrap();
    browser.apply(set);
    assert!(browser.select(&PaperId::from("2")));

    let fetched = assert_ok!(data.search("attention").await);
    let set = data.accept(fetched).unwrap();
    browser.apply(set);

    assert!(browser.selection().is_none());
    assert!(matches!(browser.detail().content(), DetailContent::Placeholder));
    assert_eq!(browser.list().rows().len(), 1);
    assert_eq!(browser.list().title(), "Results for \"attention\"");

    // The paper from the previous set can no longer be selected
    assert!(!browser.select(&PaperId::from("2")));
    assert!(observer
        .events()
        .contains(&BrowserEvent::SelectionChanged { id: None }));
}

#[tokio::test]
async fn test_search_with_no_matches_shows_indicator() {
    let data = DataSource::new(Arc::new(MockSource::new()));
    let mut browser = PaperBrowser::default();

    let set = data.accept(data.search("no such topic").await.unwrap()).unwrap();
    browser.apply(set);

    assert_eq!(browser.list().content(), &ListContent::Empty);
    assert_eq!(
        browser.list().content().indicator().as_deref(),
        Some(NO_PAPERS)
    );

    let plain = format_list(browser.list(), OutputFormat::Plain, 80);
    assert!(plain.contains(NO_PAPERS));
}

#[tokio::test]
async fn test_http_latest_normalizes_records() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/papers/latest")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("start".into(), "0".into()),
            Matcher::UrlEncoded("max_results".into(), "25".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(SERVICE_RESPONSE)
        .create_async()
        .await;

    let observer = Arc::new(RecordingObserver::new());
    let data = http_data(&server, observer.clone());
    let mut browser = browser_with(observer);

    let set = data.accept(data.fetch_latest().await).unwrap();
    browser.apply(set);
    mock.assert_async().await;

    let rows = browser.list().rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, PaperId::from("2301.00001v1"));
    assert_eq!(rows[0].authors, "Author A, Author B");
    assert_eq!(rows[0].year.as_deref(), Some("2023"));
    assert!(rows[0].has_document);
    assert_eq!(rows[1].authors, "Author C");
    assert!(!rows[1].has_document);

    // A paper without a document shows the unavailable indicator, not a frame
    assert!(browser.select(&PaperId::from("2301.00002v1")));
    assert!(browser.detail().shows_unavailable());
    assert!(browser.detail().frame().is_none());
}

#[tokio::test]
async fn test_http_search_encodes_keyword() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/papers/search")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("keyword".into(), "graph neural & co".into()),
            Matcher::UrlEncoded("start".into(), "10".into()),
            Matcher::UrlEncoded("max_results".into(), "5".into()),
        ]))
        .with_status(200)
        .with_body("[]")
        .create_async()
        .await;

    let data = http_data(&server, Arc::new(RecordingObserver::new())).with_page(Page::new(10, 5));
    let fetched = assert_ok!(data.search("  graph neural & co ").await);
    mock.assert_async().await;

    let set = data.accept(fetched).unwrap();
    assert_eq!(
        set.kind,
        Some(FetchKind::Search {
            keyword: "graph neural & co".to_string()
        })
    );
    assert!(set.is_empty());
    assert_eq!(set.status, FetchStatus::Loaded);
}

#[tokio::test]
async fn test_http_error_status_reaches_list() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/papers/latest")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let observer = Arc::new(RecordingObserver::new());
    let data = http_data(&server, observer.clone());
    let mut browser = browser_with(observer.clone());

    browser.apply(data.accept(data.fetch_latest().await).unwrap());
    mock.assert_async().await;

    assert!(browser.list().rows().is_empty());
    let indicator = browser.list().content().indicator().unwrap();
    assert!(indicator.contains("500"), "indicator was {}", indicator);
    assert!(matches!(
        &observer.events()[1],
        BrowserEvent::FetchFailed { seq: 1, reason } if reason.contains("500")
    ));
}

#[tokio::test]
async fn test_http_malformed_body_is_an_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/papers/latest")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body("{not json")
        .create_async()
        .await;

    let data = http_data(&server, Arc::new(RecordingObserver::new()));
    let set = data.accept(data.fetch_latest().await).unwrap();
    assert!(set.error_reason().is_some());
    assert!(set.is_empty());
}

#[tokio::test]
async fn test_empty_keyword_sends_no_request() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/papers/search")
        .match_query(Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let observer = Arc::new(RecordingObserver::new());
    let data = http_data(&server, observer.clone());

    for keyword in ["", "   ", "\t\n"] {
        let err = assert_err!(data.search(keyword).await);
        assert!(matches!(err, SourceError::InvalidArgument(_)));
    }

    mock.assert_async().await;
    assert_eq!(data.latest_issued(), 0);
    assert!(observer.events().is_empty());
}

#[tokio::test]
async fn test_last_issued_response_wins() {
    // Both requests are in flight together; the older response is delivered last
    let mock = Arc::new(MockSource::new().with_delay(Duration::from_millis(20)));
    let observer = Arc::new(RecordingObserver::new());
    let data = Arc::new(DataSource::with_observer(mock.clone(), observer.clone()));
    let mut browser = browser_with(observer.clone());

    let latest = data.issue_latest();
    let search = data.issue_search("bert").unwrap();
    let (slow, fast) = tokio::join!(data.run(latest), data.run(search));

    for fetched in [fast, slow] {
        if let Some(set) = data.accept(fetched) {
            browser.apply(set);
        }
    }

    assert_eq!(mock.request_count(), 2);
    assert_eq!(browser.list().title(), "Results for \"bert\"");
    assert_eq!(browser.list().rows().len(), 1);
    assert!(observer
        .events()
        .contains(&BrowserEvent::StaleResponseDiscarded { seq: 1, latest: 2 }));
}

#[tokio::test]
async fn test_repeated_fetch_replaces_contents() {
    let mock = MockSource::new();
    mock.push_latest(Ok(vec![
        paper_browser::sources::mock::make_paper("a", "Alpha"),
        paper_browser::sources::mock::make_paper("a", "Alpha duplicate"),
    ]));
    let data = DataSource::new(Arc::new(mock));
    let mut browser = PaperBrowser::default();

    browser.apply(data.accept(data.fetch_latest().await).unwrap());
    let rows = browser.list().rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "Alpha");

    browser.apply(data.accept(data.fetch_latest().await).unwrap());
    let titles: Vec<_> = browser
        .list()
        .rows()
        .iter()
        .map(|r| r.title.as_str())
        .collect();
    assert_eq!(titles.len(), 3);
    assert!(!titles.contains(&"Alpha"));
}

#[tokio::test]
async fn test_json_output_of_loaded_list() {
    let data = DataSource::new(Arc::new(MockSource::new()));
    let mut browser = PaperBrowser::default();
    browser.apply(data.accept(data.search("gener").await.unwrap()).unwrap());

    let json = format_list(browser.list(), OutputFormat::Json, 120);
    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    assert_eq!(value["title"], "Results for \"gener\"");
    assert_eq!(value["papers"].as_array().unwrap().len(), 1);
}
