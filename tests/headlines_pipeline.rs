//! End-to-end tests for the headlines pipeline: real HTTP client against a
//! mock server, through the repository, into the controller's screen state.

use newsflash::api::{NewsClient, StaticTokenProvider};
use newsflash::error::PresentationError;
use newsflash::headlines::{ControllerSettings, HeadlinesController, ScreenState, UNKNOWN_SOURCE};
use newsflash::repository::RemoteNewsRepository;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const HEADLINES: &str = r#"{
  "totalArticles": 2,
  "articles": [
    {
      "title": "Markets rally",
      "description": "Stocks up",
      "content": "Full text",
      "url": "https://news.example.com/markets",
      "image": "https://img.example.com/m.jpg",
      "publishedAt": "2024-03-01T08:00:00Z",
      "source": { "name": "Example Wire", "url": "https://news.example.com" }
    },
    {
      "title": "Untitled source",
      "description": null,
      "content": null,
      "url": "https://news.example.com/other",
      "image": null,
      "publishedAt": null,
      "source": { "name": null, "url": null }
    }
  ]
}"#;

const SEARCH_RESULTS: &str = r#"{
  "totalArticles": 1,
  "articles": [
    {
      "title": "Rust 2.0 announced",
      "url": "https://news.example.com/rust",
      "publishedAt": "2024-03-02T09:30:00Z",
      "source": { "name": "Dev Weekly" }
    }
  ]
}"#;

fn controller_for(server: &MockServer, token: &str, settings: ControllerSettings) -> HeadlinesController {
    let client = NewsClient::new(
        reqwest::Client::new(),
        &server.uri(),
        Arc::new(StaticTokenProvider::new(token)),
    )
    .unwrap();
    let repository = Arc::new(RemoteNewsRepository::new(Arc::new(client)));
    HeadlinesController::new(repository, settings)
}

async fn wait_for_settled(controller: &HeadlinesController) -> ScreenState {
    let mut updates = controller.subscribe();
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let state = updates.borrow_and_update().clone();
            if matches!(state, ScreenState::Loaded(_) | ScreenState::Error(_)) {
                return state;
            }
            updates.changed().await.unwrap();
        }
    })
    .await
    .expect("controller never settled")
}

#[tokio::test]
async fn test_initial_load_maps_headlines() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .and(query_param("lang", "en"))
        .and(query_param("max", "50"))
        .and(query_param("token", "KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_string(HEADLINES))
        .expect(1)
        .mount(&server)
        .await;

    let controller = controller_for(&server, "KEY", ControllerSettings::default());
    controller.load_initial_data().await;

    let state = controller.state();
    let items = state.items();
    assert_eq!(items.len(), 2);

    assert_eq!(items[0].id, "https://news.example.com/markets");
    assert_eq!(items[0].title, "Markets rally");
    assert_eq!(items[0].source, "Example Wire");
    assert_eq!(items[0].summary.as_deref(), Some("Stocks up"));
    assert_eq!(
        items[0].image_url.as_ref().map(|u| u.as_str()),
        Some("https://img.example.com/m.jpg")
    );
    assert!(items[0].published_relative.is_some());

    assert_eq!(items[1].source, UNKNOWN_SOURCE);
    assert!(items[1].image_url.is_none());
    assert!(items[1].published_relative.is_none());
}

#[tokio::test]
async fn test_unauthorized_shows_missing_auth() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let controller = controller_for(&server, "BAD", ControllerSettings::default());
    controller.load_initial_data().await;

    assert_eq!(
        controller.state(),
        ScreenState::Error(PresentationError::MissingAuth)
    );
}

#[tokio::test]
async fn test_missing_token_never_reaches_server() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_string(HEADLINES))
        .expect(0)
        .mount(&server)
        .await;

    let controller = controller_for(&server, "   ", ControllerSettings::default());
    controller.load_initial_data().await;

    assert_eq!(
        controller.state(),
        ScreenState::Error(PresentationError::MissingAuth)
    );
}

#[tokio::test]
async fn test_rate_limit_then_refresh_recovers() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .respond_with(ResponseTemplate::new(429))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .respond_with(ResponseTemplate::new(200).set_body_string(HEADLINES))
        .mount(&server)
        .await;

    let controller = controller_for(&server, "KEY", ControllerSettings::default());
    controller.load_initial_data().await;
    assert_eq!(
        controller.state(),
        ScreenState::Error(PresentationError::RateLimited)
    );

    controller.refresh().await;
    assert_eq!(controller.state().items().len(), 2);
}

#[tokio::test]
async fn test_typed_query_searches_after_debounce() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "rust"))
        .and(query_param("lang", "en"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_RESULTS))
        .expect(1)
        .mount(&server)
        .await;

    let settings = ControllerSettings {
        debounce: Duration::from_millis(50),
        ..ControllerSettings::default()
    };
    let controller = controller_for(&server, "KEY", settings);

    controller.query_changed("r");
    controller.query_changed("ru");
    controller.query_changed("  rust ");

    let state = wait_for_settled(&controller).await;
    let items = state.items();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].title, "Rust 2.0 announced");
    assert_eq!(items[0].source, "Dev Weekly");
}

#[tokio::test]
async fn test_refresh_with_query_uses_search_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("q", "rust"))
        .respond_with(ResponseTemplate::new(200).set_body_string(SEARCH_RESULTS))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/top-headlines"))
        .respond_with(ResponseTemplate::new(200).set_body_string(HEADLINES))
        .expect(0)
        .mount(&server)
        .await;

    let controller = controller_for(&server, "KEY", ControllerSettings::default());
    controller.query_changed("rust");
    controller.refresh().await;

    assert_eq!(controller.state().items().len(), 1);
    assert_eq!(controller.query(), "rust");
}
