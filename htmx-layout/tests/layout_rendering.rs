//! End-to-end rendering through an axum router.

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    extract::State,
    http::{header, HeaderMap, Request, StatusCode},
    response::Response,
    routing::get,
    Router,
};
use htmx_layout::prelude::*;
use tower::ServiceExt;

const TEMPLATES: &[(&str, &str)] = &[
    (
        "layout",
        r#"<html>
<body>
  <div>Menu Bar Here</div>
  <div>
    {{ Content }}
  </div>
  <div>Footer Here</div>
</body>
</html>"#,
    ),
    (
        "customlayout",
        r#"<html>
<body>
  <div>Menu Bar Here</div>
  <div>
    {{ CustomBody }}
  </div>
  <div>Footer Here</div>
</body>
</html>"#,
    ),
    ("hello", r#"<h1 id="greeting">Hello, {{ Name }}!</h1>"#),
    (
        "error",
        r#"{% if Message %}<div class="alert alert-danger" role="alert">{{ Message }}</div>{% endif %}"#,
    ),
    ("footer_note", r#"<p class="note">{{ Site }}</p>"#),
];

fn engine() -> Arc<dyn TemplateEngine> {
    let mut engine = MiniJinjaEngine::new();
    for (name, source) in TEMPLATES {
        engine.add_template(*name, *source).unwrap();
    }
    Arc::new(engine)
}

async fn hello(State(renderer): State<HtmxRenderer>, headers: HeaderMap) -> Result<Response> {
    renderer.respond_default(&headers, Model::new().with("Name", "Jerry"), &["hello"])
}

async fn hello_with_note(
    State(renderer): State<HtmxRenderer>,
    headers: HeaderMap,
) -> Result<Response> {
    renderer.respond(
        &headers,
        Model::new().with("Name", "Jerry"),
        &["hello", "footer_note"],
        StatusCode::OK,
    )
}

async fn not_found(State(renderer): State<HtmxRenderer>, headers: HeaderMap) -> Result<Response> {
    renderer.respond(
        &headers,
        Model::new().with("Message", "No such page"),
        &["error"],
        StatusCode::NOT_FOUND,
    )
}

async fn missing(State(renderer): State<HtmxRenderer>, headers: HeaderMap) -> Result<Response> {
    renderer.respond_default(&headers, Model::new(), &["does_not_exist"])
}

fn app(renderer: HtmxRenderer) -> Router {
    Router::new()
        .route("/", get(hello))
        .route("/noted", get(hello_with_note))
        .route("/gone", get(not_found))
        .route("/missing", get(missing))
        .with_state(renderer)
}

async fn send(app: Router, uri: &str, htmx: bool) -> (StatusCode, HeaderMap, String) {
    let mut request = Request::builder().uri(uri);
    if htmx {
        request = request.header("HX-Request", "true");
    }
    let response = app
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    (status, headers, String::from_utf8(bytes.to_vec()).unwrap())
}

fn divs(html: &str) -> Vec<String> {
    html.split("<div>")
        .skip(1)
        .map(|chunk| chunk.split("</div>").next().unwrap_or("").trim().to_string())
        .collect()
}

#[tokio::test]
async fn test_page_is_decorated_with_layout() {
    let (status, _, body) = send(app(HtmxRenderer::new(engine())), "/", false).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"<h1 id="greeting">Hello, Jerry!</h1>"#));

    let divs = divs(&body);
    assert_eq!(divs.len(), 3);
    assert_eq!(divs.first().map(String::as_str), Some("Menu Bar Here"));
    assert_eq!(divs.last().map(String::as_str), Some("Footer Here"));
}

#[tokio::test]
async fn test_page_is_not_decorated_with_layout_for_htmx_request() {
    let (status, headers, body) = send(app(HtmxRenderer::new(engine())), "/", true).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, r#"<h1 id="greeting">Hello, Jerry!</h1>"#);
    assert!(!body.contains("<div>"));
    assert_eq!(
        headers.get(header::CONTENT_TYPE).unwrap(),
        "text/html; charset=utf-8"
    );
}

#[tokio::test]
async fn test_page_is_decorated_with_non_default_layout() {
    let config = RenderConfig::default()
        .with_layout("customlayout")
        .with_content_key("CustomBody");
    let renderer = HtmxRenderer::with_config(engine(), config).unwrap();

    let (status, _, body) = send(app(renderer), "/", false).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains(r#"<h1 id="greeting">Hello, Jerry!</h1>"#));
    let divs = divs(&body);
    assert_eq!(divs.len(), 3);
    assert_eq!(divs[0], "Menu Bar Here");
    assert_eq!(divs[2], "Footer Here");
}

#[tokio::test]
async fn test_multiple_templates_in_one_fragment() {
    let config = RenderConfig::default().with_decorator(|_: &dyn Exchange, model: &mut Model| {
        model.insert("Site", "example.org");
    });
    let renderer = HtmxRenderer::with_config(engine(), config).unwrap();

    let (_, _, body) = send(app(renderer), "/noted", true).await;

    assert_eq!(
        body,
        r#"<h1 id="greeting">Hello, Jerry!</h1><p class="note">example.org</p>"#
    );
}

#[tokio::test]
async fn test_status_is_kept_for_full_page() {
    let (status, _, body) = send(app(HtmxRenderer::new(engine())), "/gone", false).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body.contains("No such page"));
    assert!(body.contains("Menu Bar Here"));
}

#[tokio::test]
async fn test_missing_template_still_renders_layout() {
    let (status, _, body) = send(app(HtmxRenderer::new(engine())), "/missing", false).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(divs(&body).len(), 3);
}

#[tokio::test]
async fn test_missing_template_propagates_when_configured() {
    let config = RenderConfig::default().with_error_policy(TemplateErrorPolicy::Propagate);
    let renderer = HtmxRenderer::with_config(engine(), config).unwrap();

    let (status, _, body) = send(app(renderer), "/missing", true).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("TEMPLATE_ERROR"));
}
