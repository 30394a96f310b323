use axum::{http::header, http::StatusCode, routing::get, Router};
use blogroll::category::Category;
use blogroll::controller::{LoadOutcome, PostListController};
use blogroll::render::{parse_template, HtmlRenderer, DEFAULT_TEMPLATE};
use blogroll::source::{self, HttpSource, Source};
use blogroll::widget::Widget;
use std::time::Duration;
use tokio::net::TcpListener;
use url::Url;

const MANIFEST: &str = r#"{"posts": [
    {"slug": "winter", "title": "Winter notes", "excerpt": "Cold", "author": "Sam",
     "category": "Diary", "tags": ["Snow"], "date": "2024-01-01", "featured": false},
    {"slug": "summer", "title": "Summer notes", "excerpt": "Warm", "author": "Sam",
     "category": "Diary", "tags": ["Gojo"], "date": "2024-06-01", "featured": true},
    {"slug": "rust-tips", "title": "Rust tips", "excerpt": "Borrowing", "author": "Kim",
     "category": "Code", "tags": [], "date": "2024-03-15"}
]}"#;

async fn spawn_manifest_server() -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let app = Router::new()
        .route(
            "/posts.json",
            get(|| async { ([(header::CONTENT_TYPE, "application/json")], MANIFEST) }),
        )
        .route(
            "/broken.json",
            get(|| async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") }),
        )
        .route("/garbage.json", get(|| async { "<html>not json</html>" }))
        .route(
            "/slow.json",
            get(|| async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                MANIFEST
            }),
        );
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

fn source(base: &str, path: &str, timeout: Option<Duration>) -> HttpSource {
    let url = Url::parse(&format!("{base}{path}")).expect("url");
    HttpSource::new(url, timeout).expect("client")
}

#[tokio::test]
async fn fetches_and_sorts_manifest() {
    let base = spawn_manifest_server().await;
    let mut controller = PostListController::default();
    let outcome = controller
        .load(&source(&base, "/posts.json", Some(Duration::from_secs(5))))
        .await;

    assert!(matches!(outcome, LoadOutcome::Loaded { count: 3 }));
    let slugs: Vec<&str> = controller.posts().iter().map(|p| p.slug.as_str()).collect();
    assert_eq!(slugs, vec!["summer", "rust-tips", "winter"]);
    assert_eq!(
        controller.list_categories(),
        vec![Category::All, Category::from("Diary"), Category::from("Code")]
    );

    let found: Vec<&str> = controller
        .search_posts("gojo")
        .iter()
        .map(|p| p.slug.as_str())
        .collect();
    assert_eq!(found, vec!["summer"]);
}

#[tokio::test]
async fn non_success_status_degrades_to_empty() {
    let base = spawn_manifest_server().await;
    let broken = source(&base, "/broken.json", None);

    assert!(matches!(
        broken.fetch().await,
        Err(source::Error::Status { status, .. }) if status.as_u16() == 500
    ));

    let mut controller = PostListController::default();
    let outcome = controller.load(&broken).await;
    assert!(!outcome.is_loaded());
    assert!(controller.posts().is_empty());
    assert_eq!(controller.list_categories(), vec![Category::All]);
}

#[tokio::test]
async fn malformed_payload_is_a_parse_error() {
    let base = spawn_manifest_server().await;
    let result = source(&base, "/garbage.json", None).fetch().await;
    assert!(matches!(result, Err(source::Error::Parse { .. })));
}

#[tokio::test]
async fn slow_manifest_times_out() {
    let base = spawn_manifest_server().await;
    let result = source(&base, "/slow.json", Some(Duration::from_millis(200)))
        .fetch()
        .await;
    assert!(matches!(result, Err(source::Error::Request { .. })));
}

#[tokio::test]
async fn unreachable_server_renders_empty_listing() {
    // Bind and drop a listener so the port is very likely closed.
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let url = Url::parse(&format!("http://{addr}/posts.json")).expect("url");
    let renderer = HtmlRenderer::new(parse_template(DEFAULT_TEMPLATE).expect("template"), Vec::new());
    let mut widget = Widget::new(
        PostListController::default(),
        Box::new(HttpSource::new(url, Some(Duration::from_secs(2))).expect("client")),
        renderer,
        Url::parse("https://example.com/posts/").expect("url"),
    );

    let outcome = widget.init().await.expect("render");
    assert!(!outcome.is_loaded());

    let html = String::from_utf8(widget.into_renderer().into_inner()).expect("utf-8");
    assert!(html.contains("No posts found."));
    assert!(html.contains(r#"id="category-all""#));
}
