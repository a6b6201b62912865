//! Configuration management using Figment
//!
//! [`RenderSettings`] is loaded from multiple sources with the following
//! precedence (highest to lowest):
//! 1. Environment variables (prefix: `HTMX_LAYOUT_`)
//! 2. A TOML file (`./htmx-layout.toml` unless a path is given)
//! 3. Default values
//!
//! [`RenderConfig`] is what a renderer is built with: the loaded settings plus
//! an optional [`ModelDecorator`], which only code can supply.

use std::fmt;
use std::path::Path;
use std::sync::Arc;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::decorator::ModelDecorator;
use crate::error::{Error, Result};

/// Default layout template name
pub const DEFAULT_LAYOUT_TEMPLATE: &str = "layout";

/// Default model key receiving the rendered content
pub const DEFAULT_CONTENT_KEY: &str = "Content";

/// Default settings file looked up by [`RenderSettings::load`]
pub const DEFAULT_SETTINGS_FILE: &str = "htmx-layout.toml";

/// Environment variable prefix for settings overrides
pub const ENV_PREFIX: &str = "HTMX_LAYOUT_";

/// What to do when a content or layout template fails to execute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateErrorPolicy {
    /// Log a warning and keep whatever output was produced
    #[default]
    Discard,
    /// Return the failure to the caller
    Propagate,
}

/// File and environment loadable renderer settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Template wrapped around full-page responses
    pub layout_template: String,

    /// Model key the layout reads the rendered content from
    pub content_key: String,

    /// Template failure handling
    pub on_template_error: TemplateErrorPolicy,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            layout_template: DEFAULT_LAYOUT_TEMPLATE.to_string(),
            content_key: DEFAULT_CONTENT_KEY.to_string(),
            on_template_error: TemplateErrorPolicy::default(),
        }
    }
}

impl RenderSettings {
    /// Load settings from `./htmx-layout.toml` (if present) and the environment
    pub fn load() -> Result<Self> {
        Self::load_from(DEFAULT_SETTINGS_FILE)
    }

    /// Load settings from a specific file, with environment overrides
    ///
    /// A missing file is not an error; defaults and environment still apply.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            tracing::info!("Loading render settings from: {}", path.display());
        }

        let settings = Figment::new()
            // Start with defaults
            .merge(Serialized::defaults(RenderSettings::default()))
            // Load from file (if exists)
            .merge(Toml::file(path))
            // Override with environment variables
            .merge(Env::prefixed(ENV_PREFIX))
            .extract()?;

        Ok(settings)
    }
}

/// Renderer configuration, fixed once a renderer is built
#[derive(Clone)]
pub struct RenderConfig {
    layout_template_name: String,
    content_variable_key: String,
    template_error_policy: TemplateErrorPolicy,
    decorator: Option<Arc<dyn ModelDecorator>>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderSettings::default().into()
    }
}

impl From<RenderSettings> for RenderConfig {
    fn from(settings: RenderSettings) -> Self {
        Self {
            layout_template_name: settings.layout_template,
            content_variable_key: settings.content_key,
            template_error_policy: settings.on_template_error,
            decorator: None,
        }
    }
}

impl RenderConfig {
    /// Use a different layout template
    #[must_use]
    pub fn with_layout(mut self, name: impl Into<String>) -> Self {
        self.layout_template_name = name.into();
        self
    }

    /// Expose the rendered content under a different model key
    #[must_use]
    pub fn with_content_key(mut self, key: impl Into<String>) -> Self {
        self.content_variable_key = key.into();
        self
    }

    /// Set the template failure policy
    #[must_use]
    pub fn with_error_policy(mut self, policy: TemplateErrorPolicy) -> Self {
        self.template_error_policy = policy;
        self
    }

    /// Attach a model decorator, replacing any previous one
    #[must_use]
    pub fn with_decorator(mut self, decorator: impl ModelDecorator + 'static) -> Self {
        self.decorator = Some(Arc::new(decorator));
        self
    }

    /// Attach an already shared model decorator
    #[must_use]
    pub fn with_shared_decorator(mut self, decorator: Arc<dyn ModelDecorator>) -> Self {
        self.decorator = Some(decorator);
        self
    }

    /// Layout template name
    pub fn layout_template_name(&self) -> &str {
        &self.layout_template_name
    }

    /// Model key receiving the rendered content
    pub fn content_variable_key(&self) -> &str {
        &self.content_variable_key
    }

    /// Template failure policy
    pub fn template_error_policy(&self) -> TemplateErrorPolicy {
        self.template_error_policy
    }

    /// Configured decorator, if any
    pub fn decorator(&self) -> Option<&Arc<dyn ModelDecorator>> {
        self.decorator.as_ref()
    }

    /// Reject configurations no render could succeed with
    pub fn validate(&self) -> Result<()> {
        if self.layout_template_name.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "layout template name must not be empty".to_string(),
            ));
        }
        if self.content_variable_key.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "content variable key must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for RenderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderConfig")
            .field("layout_template_name", &self.layout_template_name)
            .field("content_variable_key", &self.content_variable_key)
            .field("template_error_policy", &self.template_error_policy)
            .field("decorator", &self.decorator.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exchange::Exchange;
    use crate::model::Model;

    #[test]
    fn test_default_config() {
        let config = RenderConfig::default();
        assert_eq!(config.layout_template_name(), "layout");
        assert_eq!(config.content_variable_key(), "Content");
        assert_eq!(config.template_error_policy(), TemplateErrorPolicy::Discard);
        assert!(config.decorator().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder_overrides() {
        let config = RenderConfig::default()
            .with_layout("customlayout")
            .with_content_key("CustomBody")
            .with_error_policy(TemplateErrorPolicy::Propagate)
            .with_decorator(|_: &dyn Exchange, _: &mut Model| {});

        assert_eq!(config.layout_template_name(), "customlayout");
        assert_eq!(config.content_variable_key(), "CustomBody");
        assert_eq!(config.template_error_policy(), TemplateErrorPolicy::Propagate);
        assert!(config.decorator().is_some());
    }

    #[test]
    fn test_validate_rejects_empty_names() {
        let err = RenderConfig::default().with_layout("").validate().unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(ref msg) if msg.contains("layout")));

        let err = RenderConfig::default()
            .with_content_key("  ")
            .validate()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(ref msg) if msg.contains("content")));
    }

    #[test]
    fn test_debug_hides_decorator() {
        let config = RenderConfig::default().with_decorator(|_: &dyn Exchange, _: &mut Model| {});
        let debug = format!("{:?}", config);
        assert!(debug.contains("decorator: true"));
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        figment::Jail::expect_with(|_| {
            let settings = RenderSettings::load_from("absent.toml").expect("settings should load");
            assert_eq!(settings.layout_template, "layout");
            assert_eq!(settings.content_key, "Content");
            Ok(())
        });
    }

    #[test]
    fn test_load_from_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                "custom.toml",
                "layout_template = \"customlayout\"\non_template_error = \"propagate\"\n",
            )?;

            let settings = RenderSettings::load_from("custom.toml").expect("settings should load");
            assert_eq!(settings.layout_template, "customlayout");
            assert_eq!(settings.content_key, "Content");
            assert_eq!(settings.on_template_error, TemplateErrorPolicy::Propagate);

            let config = RenderConfig::from(settings);
            assert_eq!(config.layout_template_name(), "customlayout");
            Ok(())
        });
    }

    #[test]
    fn test_load_from_env_overrides_file() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(
                DEFAULT_SETTINGS_FILE,
                "layout_template = \"filelayout\"\ncontent_key = \"Body\"\n",
            )?;
            jail.set_env("HTMX_LAYOUT_LAYOUT_TEMPLATE", "envlayout");
            jail.set_env("HTMX_LAYOUT_ON_TEMPLATE_ERROR", "propagate");

            let settings = RenderSettings::load().expect("settings should load");
            assert_eq!(settings.layout_template, "envlayout");
            assert_eq!(settings.content_key, "Body");
            assert_eq!(settings.on_template_error, TemplateErrorPolicy::Propagate);
            Ok(())
        });
    }

    #[test]
    fn test_load_from_env_without_file() {
        figment::Jail::expect_with(|jail| {
            jail.set_env("HTMX_LAYOUT_CONTENT_KEY", "Main");

            let settings = RenderSettings::load_from("absent.toml").expect("settings should load");
            assert_eq!(settings.layout_template, "layout");
            assert_eq!(settings.content_key, "Main");
            Ok(())
        });
    }

    #[test]
    fn test_load_from_invalid_policy_fails() {
        figment::Jail::expect_with(|jail| {
            jail.create_file(DEFAULT_SETTINGS_FILE, "on_template_error = \"explode\"\n")?;

            let err = RenderSettings::load().unwrap_err();
            assert!(matches!(err, Error::Config(_)));
            Ok(())
        });
    }
}
