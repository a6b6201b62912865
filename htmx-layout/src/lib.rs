//! # htmx-layout
//!
//! Layout-or-fragment template rendering for HTMX-driven axum handlers.
//!
//! A handler names the templates it wants rendered. If the request came from
//! HTMX (a non-empty `HX-Request` header), the rendered templates are returned
//! as-is. Otherwise they are placed into a shared layout template under a
//! content key, so direct navigation still receives a complete page.
//!
//! ## Features
//!
//! - **One handler, two shapes**: the same handler serves HTMX swaps and full page loads
//! - **Multiple templates**: several named templates are concatenated into one fragment
//! - **Model decorators**: a hook to add shared data (user, navigation, CSRF) before rendering
//! - **Error policy**: template failures are logged and discarded, or propagated
//! - **Configuration**: layout name, content key and policy load from TOML and environment
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use axum::{extract::State, http::HeaderMap, response::Response, routing::get, Router};
//! use htmx_layout::prelude::*;
//!
//! async fn home(State(renderer): State<HtmxRenderer>, headers: HeaderMap) -> Result<Response> {
//!     renderer.respond_default(&headers, Model::new().with("Name", "Jerry"), &["home"])
//! }
//!
//! #[tokio::main]
//! async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
//!     let engine = MiniJinjaEngine::from_directory("templates")?;
//!     let config = RenderConfig::from(RenderSettings::load()?);
//!     let renderer = HtmxRenderer::with_config(Arc::new(engine), config)?;
//!
//!     let app = Router::new().route("/", get(home)).with_state(renderer);
//!     let listener = tokio::net::TcpListener::bind("127.0.0.1:8080").await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! With a `templates/layout.html` such as:
//!
//! ```html
//! <html>
//!   <body>
//!     <nav><a hx-get="/" hx-target="#content" hx-push-url="true">Home</a></nav>
//!     <main id="content">{{ Content }}</main>
//!   </body>
//! </html>
//! ```

pub mod config;
pub mod decorator;
pub mod engine;
pub mod error;
pub mod exchange;
pub mod model;
pub mod renderer;

pub use config::{RenderConfig, RenderSettings, TemplateErrorPolicy};
pub use decorator::ModelDecorator;
pub use engine::{MiniJinjaEngine, TemplateEngine};
pub use error::{Error, Result, TemplateError};
pub use exchange::{is_fragment_request, Exchange, ResponseExchange, HX_REQUEST};
pub use model::Model;
pub use renderer::HtmxRenderer;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{RenderConfig, RenderSettings, TemplateErrorPolicy};
    pub use crate::decorator::ModelDecorator;
    pub use crate::engine::{MiniJinjaEngine, TemplateEngine};
    pub use crate::error::{Error, Result, TemplateError};
    pub use crate::exchange::{is_fragment_request, Exchange, ResponseExchange, HX_REQUEST};
    pub use crate::model::Model;
    pub use crate::renderer::HtmxRenderer;
}
