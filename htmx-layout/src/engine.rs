//! Named template lookup and execution.

use std::fs;
use std::io;
use std::path::Path;

use minijinja::{AutoEscape, Environment, ErrorKind};

use crate::error::TemplateError;
use crate::model::Model;

/// A namespace of named templates the renderer executes by name.
///
/// Implementations must be safe for concurrent read-only use; the renderer
/// shares a single engine across every request.
pub trait TemplateEngine: Send + Sync {
    /// Execute `name` against `model`, streaming output into `out`.
    ///
    /// Output produced before a failure stays in `out`. An unknown name is
    /// reported as [`TemplateError::NotFound`].
    fn render_to(
        &self,
        name: &str,
        model: &Model,
        out: &mut dyn io::Write,
    ) -> Result<(), TemplateError>;

    /// Execute `name` against `model` and collect the output.
    fn render(&self, name: &str, model: &Model) -> Result<String, TemplateError> {
        let mut buf = Vec::new();
        self.render_to(name, model, &mut buf)?;
        String::from_utf8(buf).map_err(|err| TemplateError::Execution {
            name: name.to_string(),
            message: err.to_string(),
        })
    }
}

/// [`TemplateEngine`] backed by a minijinja [`Environment`].
///
/// Templates registered through this type are HTML auto-escaped regardless of
/// their name, so content injected with
/// [`Model::insert_raw_html`](crate::Model::insert_raw_html) is the only
/// unescaped output.
///
/// # Example
///
/// ```rust
/// use htmx_layout::{MiniJinjaEngine, Model, TemplateEngine};
///
/// let engine = MiniJinjaEngine::new()
///     .with_template("hello", "<h1>Hello, {{ Name }}!</h1>")
///     .unwrap();
///
/// let html = engine.render("hello", &Model::new().with("Name", "Jerry")).unwrap();
/// assert_eq!(html, "<h1>Hello, Jerry!</h1>");
/// ```
#[derive(Debug)]
pub struct MiniJinjaEngine {
    env: Environment<'static>,
}

impl MiniJinjaEngine {
    /// Create an engine with no templates.
    #[must_use]
    pub fn new() -> Self {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::Html);
        Self { env }
    }

    /// Wrap an environment configured elsewhere (filters, loaders, globals).
    /// Its own auto-escape settings are kept.
    #[must_use]
    pub fn from_environment(env: Environment<'static>) -> Self {
        Self { env }
    }

    /// Load every `*.html` file in `dir`, each named after its file stem.
    pub fn from_directory(dir: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let dir = dir.as_ref();
        let entries = fs::read_dir(dir).map_err(|err| TemplateError::Syntax {
            name: dir.display().to_string(),
            message: err.to_string(),
        })?;

        let mut engine = Self::new();
        for entry in entries {
            let path = entry
                .map_err(|err| TemplateError::Syntax {
                    name: dir.display().to_string(),
                    message: err.to_string(),
                })?
                .path();

            if path.extension().and_then(|ext| ext.to_str()) != Some("html") {
                continue;
            }
            let Some(name) = path.file_stem().and_then(|stem| stem.to_str()) else {
                continue;
            };

            let source = fs::read_to_string(&path).map_err(|err| TemplateError::Syntax {
                name: name.to_string(),
                message: err.to_string(),
            })?;
            tracing::debug!(template = name, path = %path.display(), "Loaded template");
            engine.add_template(name, source)?;
        }

        Ok(engine)
    }

    /// Register a template under `name`, replacing any previous one.
    pub fn add_template(
        &mut self,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<(), TemplateError> {
        let name = name.into();
        self.env
            .add_template_owned(name.clone(), source.into())
            .map_err(|err| TemplateError::Syntax {
                name,
                message: err.to_string(),
            })
    }

    /// Builder form of [`MiniJinjaEngine::add_template`].
    pub fn with_template(
        mut self,
        name: impl Into<String>,
        source: impl Into<String>,
    ) -> Result<Self, TemplateError> {
        self.add_template(name, source)?;
        Ok(self)
    }

    /// Underlying environment.
    #[must_use]
    pub fn environment(&self) -> &Environment<'static> {
        &self.env
    }
}

impl Default for MiniJinjaEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateEngine for MiniJinjaEngine {
    fn render_to(
        &self,
        name: &str,
        model: &Model,
        out: &mut dyn io::Write,
    ) -> Result<(), TemplateError> {
        let template = self.env.get_template(name).map_err(|err| match err.kind() {
            ErrorKind::TemplateNotFound => TemplateError::NotFound(name.to_string()),
            _ => TemplateError::Syntax {
                name: name.to_string(),
                message: err.to_string(),
            },
        })?;

        template
            .render_to_write(model.to_value(), out)
            .map(|_| ())
            .map_err(|err| {
                if err.kind() == ErrorKind::WriteFailure {
                    TemplateError::Write(io::Error::other(err))
                } else {
                    TemplateError::Execution {
                        name: name.to_string(),
                        message: err.to_string(),
                    }
                }
            })
    }
}
