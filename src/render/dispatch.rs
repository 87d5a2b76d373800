//! Renderer selection by template name extension.

use std::io::Write;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde_json::Value;
use tracing::debug;

use crate::error::{Result, TemplateError};
use crate::template::Template;

// =============================================================================
// Renderer Traits
// =============================================================================

/// Produces output from a template and a model.
///
/// Implementations typically compile the template through a
/// [`RenderableTemplateCache`](crate::cache::RenderableTemplateCache) and
/// resolve includes with [`Template::read_sibling_to_string`].
pub trait TemplateRenderer: Send + Sync {
    /// Render `template` with `model` into `out`.
    fn render(&self, out: &mut dyn Write, template: &dyn Template, model: &Value) -> Result<()>;
}

/// Selects the renderer for a template.
pub trait TemplateRenderers: Send + Sync {
    /// Renderer for `template`, or an error if none applies.
    fn renderer(&self, template: &dyn Template) -> Result<&dyn TemplateRenderer>;
}

// =============================================================================
// ByExtensionRenderers
// =============================================================================

/// Dispatches on the template name's extension (`.mustache`, `.ftl`, ...).
pub struct ByExtensionRenderers {
    renderers: FxHashMap<String, Arc<dyn TemplateRenderer>>,
}

impl ByExtensionRenderers {
    /// Create an empty registry builder.
    pub fn builder() -> ByExtensionRenderersBuilder {
        ByExtensionRenderersBuilder::default()
    }

    /// Supported extensions, sorted, each with a leading dot.
    pub fn extensions(&self) -> Vec<String> {
        let mut extensions: Vec<_> = self.renderers.keys().cloned().collect();
        extensions.sort();
        extensions
    }
}

impl TemplateRenderers for ByExtensionRenderers {
    fn renderer(&self, template: &dyn Template) -> Result<&dyn TemplateRenderer> {
        let ext = extension(template.name())?;
        match self.renderers.get(ext) {
            Some(renderer) => Ok(renderer.as_ref()),
            None => {
                debug!(template = template.name(), ext, "no renderer for extension");
                Err(TemplateError::UnsupportedExtension {
                    extension: ext.to_string(),
                    supported: self.extensions(),
                })
            }
        }
    }
}

/// Builder for [`ByExtensionRenderers`].
#[derive(Default)]
pub struct ByExtensionRenderersBuilder {
    renderers: FxHashMap<String, Arc<dyn TemplateRenderer>>,
}

impl ByExtensionRenderersBuilder {
    /// Register a renderer for an extension. A missing leading dot is added.
    pub fn register(
        mut self,
        extension: impl AsRef<str>,
        renderer: impl TemplateRenderer + 'static,
    ) -> Self {
        self.renderers
            .insert(normalize_extension(extension.as_ref()), Arc::new(renderer));
        self
    }

    /// Register a shared renderer for an extension.
    pub fn register_shared(
        mut self,
        extension: impl AsRef<str>,
        renderer: Arc<dyn TemplateRenderer>,
    ) -> Self {
        self.renderers
            .insert(normalize_extension(extension.as_ref()), renderer);
        self
    }

    /// Build the registry.
    pub fn build(self) -> ByExtensionRenderers {
        ByExtensionRenderers {
            renderers: self.renderers,
        }
    }
}

fn normalize_extension(extension: &str) -> String {
    if extension.starts_with('.') {
        extension.to_string()
    } else {
        format!(".{extension}")
    }
}

/// Extension of a template name, including the dot.
///
/// Fails if there is no dot, or the last dot is the first or last character.
pub fn extension(name: &str) -> Result<&str> {
    match name.rfind('.') {
        Some(dot) if dot > 0 && dot < name.len() - 1 => Ok(&name[dot..]),
        _ => Err(TemplateError::MissingExtension {
            name: name.to_string(),
        }),
    }
}
