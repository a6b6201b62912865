//! Greeting Example
//!
//! Serves two pages that swap into each other with HTMX. Following a link
//! issues an HTMX request and only the page fragment is returned; loading the
//! same URL directly returns the page wrapped in the layout.
//!
//! ## Running
//!
//! ```bash
//! cargo run --manifest-path=htmx-layout/Cargo.toml --example greeting
//! ```
//!
//! Then open http://localhost:8080 in your browser.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::Response,
    routing::get,
    Router,
};
use htmx_layout::prelude::*;
use tracing_subscriber::EnvFilter;

const LAYOUT: &str = r##"<!DOCTYPE html>
<html lang="en">
  <head>
    <script src="https://unpkg.com/htmx.org@2.0.4"></script>
    <title>{{ SiteName }}</title>
  </head>
  <body>
    <header>
      <h1>Welcome</h1>
      <nav>
        <a hx-get="/" hx-push-url="true" hx-target="#content">Home</a> |
        <a hx-get="/hello/World" hx-push-url="true" hx-target="#content">Hello</a>
      </nav>
    </header>
    <main id="content">
      {{ Content }}
    </main>
    <footer><p>{{ SiteName }}</p></footer>
  </body>
</html>"##;

const HOME: &str = r#"<h2>Home Page</h2>"#;
const HELLO: &str = r#"<h2 id="greeting">Hello, {{ Name }}!</h2>"#;
const SERVED_BY: &str = r#"<p class="muted">Rendered as {% if Partial %}a fragment{% else %}a full page{% endif %}.</p>"#;

async fn home(State(renderer): State<HtmxRenderer>, headers: HeaderMap) -> Result<Response> {
    renderer.respond_default(&headers, Model::new(), &["home", "served_by"])
}

async fn hello(
    State(renderer): State<HtmxRenderer>,
    Path(name): Path<String>,
    headers: HeaderMap,
) -> Result<Response> {
    let model = Model::new().with("Name", name);
    renderer.respond(&headers, model, &["hello", "served_by"], StatusCode::OK)
}

fn site_decorator(exchange: &dyn Exchange, model: &mut Model) {
    model.insert("SiteName", "htmx-layout demo");
    model.insert("Partial", exchange.is_fragment_request());
}

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let engine = MiniJinjaEngine::new()
        .with_template("layout", LAYOUT)?
        .with_template("home", HOME)?
        .with_template("hello", HELLO)?
        .with_template("served_by", SERVED_BY)?;

    let settings = RenderSettings::load()?;
    tracing::info!(?settings, "Render settings loaded");

    let config = RenderConfig::from(settings).with_decorator(site_decorator);
    let renderer = HtmxRenderer::with_config(Arc::new(engine), config)?;

    let app = Router::new()
        .route("/", get(home))
        .route("/hello/{name}", get(hello))
        .with_state(renderer);

    let addr = SocketAddr::from(([127, 0, 0, 1], 8080));
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
