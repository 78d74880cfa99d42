//! End-to-end tests through the HTTP API
//!
//! Each test spins up the real axum server over an on-disk SQLite snapshot,
//! with wiremock standing in for the movie site, and drives everything
//! through plain HTTP requests.

use filmrank::config::Config;
use filmrank::server::{build_router, AppState};
use serde_json::Value;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const LISTING_PATH: &str = "/zebricky/filmy/nejlepsi/";

struct TestApp {
    base: String,
    site: MockServer,
    client: reqwest::Client,
    _db_dir: TempDir,
}

impl TestApp {
    fn url(&self, path_and_query: &str) -> String {
        format!("{}{}", self.base, path_and_query)
    }

    async fn crawl(&self, query: &str) -> reqwest::Response {
        self.client
            .post(self.url(&format!("/crawl/load_movies_data{}", query)))
            .send()
            .await
            .unwrap()
    }

    async fn get_json(&self, path_and_query: &str) -> (reqwest::StatusCode, Value) {
        let response = self
            .client
            .get(self.url(path_and_query))
            .send()
            .await
            .unwrap();
        let status = response.status();
        let body = response.json().await.unwrap_or(Value::Null);
        (status, body)
    }
}

async fn spawn_app() -> TestApp {
    let site = MockServer::start().await;
    let db_dir = TempDir::new().unwrap();

    let mut config = Config::default();
    config.source.base_url = site.uri();
    config.source.listing_path = format!("{}?from=", LISTING_PATH);
    config.output.database_path = db_dir
        .path()
        .join("snapshot.db")
        .to_string_lossy()
        .into_owned();

    let state = AppState::from_config(config).unwrap();
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestApp {
        base: format!("http://{}", addr),
        site,
        client: reqwest::Client::new(),
        _db_dir: db_dir,
    }
}

async fn mount_matrix_fixtures(site: &MockServer) {
    let listing = r#"<html><body>
        <article>
            <span class="film-title-user">1.</span>
            <a class="film-title-name" href="/film/9499-matrix/">Matrix</a>
        </article>
    </body></html>"#;

    let detail = r##"<html><body><div class="creators">
        <div><h4>Režie:</h4><a href="/tvurce/3836-lana-wachowski/">Lana Wachowski</a></div>
        <div><h4>Hrají:</h4>
            <a href="/tvurce/69-hugh-jackman/">Hugh Jackman</a>
            <a href="#">více</a>
        </div>
    </div></body></html>"##;

    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .and(query_param("from", "0"))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing))
        .mount(site)
        .await;

    Mock::given(method("GET"))
        .and(path("/film/9499-matrix/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail))
        .mount(site)
        .await;
}

#[tokio::test]
async fn test_crawl_then_read_endpoints() {
    let app = spawn_app().await;
    mount_matrix_fixtures(&app.site).await;

    let response = app.crawl("?pages_to_crawl=1").await;
    assert_eq!(response.status(), reqwest::StatusCode::NO_CONTENT);

    let (status, movie) = app.get_json("/movie/9499").await;
    assert_eq!(status, reqwest::StatusCode::OK);
    assert_eq!(movie["movie"]["title"], "Matrix");
    assert_eq!(movie["movie"]["rank"], 1);
    assert_eq!(movie["actors"][0]["name"], "Hugh Jackman");

    let (status, actor) = app.get_json("/actor/69").await;
    assert_eq!(status, reqwest::StatusCode::OK);
    assert_eq!(actor["actor"]["name"], "Hugh Jackman");
    assert_eq!(actor["movies"][0]["id"], 9499);

    let (status, results) = app.get_json("/search?query=ma").await;
    assert_eq!(status, reqwest::StatusCode::OK);
    let titles: Vec<&str> = results["movies"]
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["title"].as_str().unwrap())
        .collect();
    assert!(titles.contains(&"Matrix"));

    // Case-insensitive via normalization on both sides.
    let (_, results) = app.get_json("/search?query=JACK").await;
    assert_eq!(results["actors"][0]["name"], "Hugh Jackman");
}

#[tokio::test]
async fn test_crawl_defaults_to_one_page() {
    let app = spawn_app().await;
    mount_matrix_fixtures(&app.site).await;

    let response = app.crawl("").await;
    assert_eq!(response.status(), reqwest::StatusCode::NO_CONTENT);

    let (status, _) = app.get_json("/movie/9499").await;
    assert_eq!(status, reqwest::StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_ids_return_404() {
    let app = spawn_app().await;

    let (status, body) = app.get_json("/movie/12345").await;
    assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Movie not found");

    let (status, body) = app.get_json("/actor/12345").await;
    assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Actor not found");
}

#[tokio::test]
async fn test_empty_search_query_rejected() {
    let app = spawn_app().await;

    let (status, _) = app.get_json("/search?query=").await;
    assert_eq!(status, reqwest::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_page_count_out_of_range_rejected() {
    let app = spawn_app().await;

    for query in ["?pages_to_crawl=0", "?pages_to_crawl=11"] {
        let response = app.crawl(query).await;
        assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_failed_crawl_maps_to_503_and_preserves_snapshot() {
    let app = spawn_app().await;
    mount_matrix_fixtures(&app.site).await;

    let response = app.crawl("?pages_to_crawl=1").await;
    assert_eq!(response.status(), reqwest::StatusCode::NO_CONTENT);

    // The site starts failing: the crawl reports 503 and the previously
    // committed snapshot keeps serving reads untouched.
    app.site.reset().await;
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(500).set_body_string("maintenance"))
        .mount(&app.site)
        .await;

    let response = app.crawl("?pages_to_crawl=1").await;
    assert_eq!(response.status(), reqwest::StatusCode::SERVICE_UNAVAILABLE);

    let (status, movie) = app.get_json("/movie/9499").await;
    assert_eq!(status, reqwest::StatusCode::OK);
    assert_eq!(movie["movie"]["title"], "Matrix");
}

#[tokio::test]
async fn test_recrawl_fully_replaces_snapshot() {
    let app = spawn_app().await;
    mount_matrix_fixtures(&app.site).await;

    let response = app.crawl("?pages_to_crawl=1").await;
    assert_eq!(response.status(), reqwest::StatusCode::NO_CONTENT);

    // The ranking changed wholesale; nothing of the old snapshot survives.
    app.site.reset().await;
    let listing = r#"<html><body>
        <article>
            <span class="film-title-user">1.</span>
            <a class="film-title-name" href="/film/787-sedm/">Sedm</a>
        </article>
    </body></html>"#;
    let detail = r#"<html><body><div class="creators">
        <div><h4>Hrají:</h4><a href="/tvurce/290-morgan-freeman/">Morgan Freeman</a></div>
    </div></body></html>"#;
    Mock::given(method("GET"))
        .and(path(LISTING_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(listing))
        .mount(&app.site)
        .await;
    Mock::given(method("GET"))
        .and(path("/film/787-sedm/"))
        .respond_with(ResponseTemplate::new(200).set_body_string(detail))
        .mount(&app.site)
        .await;

    let response = app.crawl("?pages_to_crawl=1").await;
    assert_eq!(response.status(), reqwest::StatusCode::NO_CONTENT);

    let (status, _) = app.get_json("/movie/9499").await;
    assert_eq!(status, reqwest::StatusCode::NOT_FOUND);
    let (status, movie) = app.get_json("/movie/787").await;
    assert_eq!(status, reqwest::StatusCode::OK);
    assert_eq!(movie["movie"]["title"], "Sedm");
    assert_eq!(movie["actors"][0]["name"], "Morgan Freeman");
}
