//! Pre-render hook for adjusting the model.

use crate::exchange::Exchange;
use crate::model::Model;

/// Hook run once per render, before any template executes.
///
/// Decorators see the request through the [`Exchange`] and may add, replace,
/// or remove model entries. Whatever they leave in the model is visible to
/// both the content templates and the layout.
///
/// Closures with the matching signature implement this trait:
///
/// ```rust
/// use htmx_layout::{Exchange, Model, RenderConfig};
///
/// let config = RenderConfig::default().with_decorator(|exchange: &dyn Exchange, model: &mut Model| {
///     model.insert("Partial", exchange.is_fragment_request());
/// });
/// assert!(config.decorator().is_some());
/// ```
pub trait ModelDecorator: Send + Sync {
    /// Adjust `model` for the request behind `exchange`.
    fn decorate(&self, exchange: &dyn Exchange, model: &mut Model);
}

impl<F> ModelDecorator for F
where
    F: Fn(&dyn Exchange, &mut Model) + Send + Sync,
{
    fn decorate(&self, exchange: &dyn Exchange, model: &mut Model) {
        self(exchange, model)
    }
}
