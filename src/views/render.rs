use serde_json::{json, Map, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Template {template} failed: {message}")]
    Failed { template: String, message: String },
}

/// Rendered page body
#[derive(Debug, Clone)]
pub struct Rendered {
    pub content_type: &'static str,
    pub body: String,
}

/// Turns a template name and its context into a response body.
///
/// Every context carries `user` and `messages` in addition to the
/// view-specific keys.
pub trait Renderer: Send + Sync {
    fn render(&self, template: &str, context: &Map<String, Value>) -> Result<Rendered, RenderError>;
}

/// Answers `{"template": ..., "context": ...}`; used when no HTML templates
/// are configured, and by the integration tests to inspect contexts.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, template: &str, context: &Map<String, Value>) -> Result<Rendered, RenderError> {
        Ok(Rendered {
            content_type: "application/json",
            body: json!({ "template": template, "context": context }).to_string(),
        })
    }
}
