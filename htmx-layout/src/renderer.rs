//! Layout-or-fragment rendering.

use std::sync::Arc;

use axum::{
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::config::{RenderConfig, TemplateErrorPolicy};
use crate::engine::TemplateEngine;
use crate::error::{Error, Result, TemplateError};
use crate::exchange::{Exchange, ResponseExchange, HTML_CONTENT_TYPE};
use crate::model::Model;

/// Renders named templates either bare (for HTMX requests) or wrapped in a
/// shared layout (for everything else).
///
/// A renderer is built once and shared across requests; it keeps no
/// per-request state, so cloning it is cheap and it can be used from any
/// number of handlers at once.
///
/// # Rendering
///
/// Each call to [`render`](Self::render):
///
/// 1. sets the response status,
/// 2. checks the `HX-Request` header,
/// 3. runs the configured [`ModelDecorator`](crate::ModelDecorator), if any,
/// 4. renders the named templates in order and concatenates their output,
/// 5. for HTMX requests, writes that content as `text/html; charset=utf-8`,
/// 6. otherwise stores it under the content key as raw HTML and streams the
///    layout template to the response body.
///
/// Template failures follow the configured [`TemplateErrorPolicy`]. Body write
/// failures are always returned. The layout template is not looked up until
/// the first full-page render.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use axum::http::{HeaderMap, StatusCode};
/// use htmx_layout::{HtmxRenderer, MiniJinjaEngine, Model, ResponseExchange};
///
/// let engine = MiniJinjaEngine::new()
///     .with_template("layout", "<main>{{ Content }}</main>")
///     .unwrap()
///     .with_template("hello", "<h1>Hello, {{ Name }}!</h1>")
///     .unwrap();
/// let renderer = HtmxRenderer::new(Arc::new(engine));
///
/// let headers = HeaderMap::new();
/// let mut exchange = ResponseExchange::new(&headers);
/// let mut model = Model::new().with("Name", "Jerry");
/// renderer
///     .render(&mut exchange, &mut model, &["hello"], StatusCode::OK)
///     .unwrap();
///
/// assert_eq!(exchange.body_bytes(), b"<main><h1>Hello, Jerry!</h1></main>");
/// ```
#[derive(Clone)]
pub struct HtmxRenderer {
    engine: Arc<dyn TemplateEngine>,
    config: RenderConfig,
}

impl HtmxRenderer {
    /// Create a renderer with the default configuration: layout `"layout"`,
    /// content key `"Content"`, template failures discarded, no decorator.
    pub fn new(engine: Arc<dyn TemplateEngine>) -> Self {
        Self {
            engine,
            config: RenderConfig::default(),
        }
    }

    /// Create a renderer with a custom configuration.
    ///
    /// Fails with [`Error::InvalidConfig`] when the layout name or content
    /// key is empty.
    pub fn with_config(engine: Arc<dyn TemplateEngine>, config: RenderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { engine, config })
    }

    /// Configuration this renderer was built with.
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render `templates` into `exchange` with the given status.
    pub fn render(
        &self,
        exchange: &mut dyn Exchange,
        model: &mut Model,
        templates: &[&str],
        status: StatusCode,
    ) -> Result<()> {
        exchange.set_status(status);
        let fragment = exchange.is_fragment_request();

        tracing::debug!(
            fragment,
            templates = templates.len(),
            status = status.as_u16(),
            "Rendering templates"
        );

        if let Some(decorator) = self.config.decorator() {
            decorator.decorate(&*exchange, model);
        }

        let content = self.render_content(model, templates)?;

        if fragment {
            exchange.set_header(
                header::CONTENT_TYPE,
                HeaderValue::from_static(HTML_CONTENT_TYPE),
            );
            return exchange
                .body()
                .write_all(content.as_bytes())
                .map_err(Error::Write);
        }

        let layout = self.config.layout_template_name();
        model.insert_raw_html(self.config.content_variable_key(), content);

        match self.engine.render_to(layout, model, exchange.body()) {
            Ok(()) => Ok(()),
            Err(err) => self.template_failed(layout, err),
        }
    }

    /// [`render`](Self::render) with `200 OK`.
    pub fn render_default(
        &self,
        exchange: &mut dyn Exchange,
        model: &mut Model,
        templates: &[&str],
    ) -> Result<()> {
        self.render(exchange, model, templates, StatusCode::OK)
    }

    /// Render for an axum handler and build the response.
    ///
    /// When rendering fails (a write failure, or any template failure under
    /// [`TemplateErrorPolicy::Propagate`]) the partial response is dropped and
    /// the error is returned; as an axum response it becomes a `500` JSON body
    /// that replaces `status`.
    ///
    /// ```rust,ignore
    /// async fn hello(State(renderer): State<HtmxRenderer>, headers: HeaderMap) -> Result<Response> {
    ///     let model = Model::new().with("Name", "Jerry");
    ///     renderer.respond(&headers, model, &["hello"], StatusCode::OK)
    /// }
    /// ```
    pub fn respond(
        &self,
        request_headers: &HeaderMap,
        mut model: Model,
        templates: &[&str],
        status: StatusCode,
    ) -> Result<Response> {
        let mut exchange = ResponseExchange::new(request_headers);
        self.render(&mut exchange, &mut model, templates, status)?;
        Ok(exchange.into_response())
    }

    /// [`respond`](Self::respond) with `200 OK`.
    pub fn respond_default(
        &self,
        request_headers: &HeaderMap,
        model: Model,
        templates: &[&str],
    ) -> Result<Response> {
        self.respond(request_headers, model, templates, StatusCode::OK)
    }

    fn render_content(&self, model: &Model, templates: &[&str]) -> Result<String> {
        let mut buf = Vec::new();
        for name in templates {
            if let Err(err) = self.engine.render_to(name, model, &mut buf) {
                self.template_failed(name, err)?;
            }
        }

        Ok(match String::from_utf8(buf) {
            Ok(content) => content,
            Err(err) => String::from_utf8_lossy(err.as_bytes()).into_owned(),
        })
    }

    fn template_failed(&self, name: &str, err: TemplateError) -> Result<()> {
        if let TemplateError::Write(io) = err {
            return Err(Error::Write(io));
        }

        match self.config.template_error_policy() {
            TemplateErrorPolicy::Discard => {
                tracing::warn!(
                    template = name,
                    error = %err,
                    "Template failed; continuing with partial output"
                );
                Ok(())
            }
            TemplateErrorPolicy::Propagate => Err(Error::Template {
                name: name.to_string(),
                source: err,
            }),
        }
    }
}

impl std::fmt::Debug for HtmxRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmxRenderer")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
