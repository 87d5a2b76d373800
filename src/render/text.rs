//! Renderer that emits template content verbatim.

use std::io::Write;
use std::sync::Arc;

use serde_json::Value;

use super::dispatch::TemplateRenderer;
use crate::cache::RenderableTemplateCache;
use crate::error::{Result, TemplateError};
use crate::template::Template;

/// Writes the decoded template source as UTF-8, ignoring the model.
///
/// Useful for static pages served through the same resolution and caching
/// path as real templates.
pub struct StaticTemplateRenderer {
    cache: RenderableTemplateCache<Arc<str>>,
}

impl StaticTemplateRenderer {
    /// Create a renderer backed by `cache`.
    pub fn new(cache: RenderableTemplateCache<Arc<str>>) -> Self {
        Self { cache }
    }
}

impl TemplateRenderer for StaticTemplateRenderer {
    fn render(&self, out: &mut dyn Write, template: &dyn Template, _model: &Value) -> Result<()> {
        let text = self
            .cache
            .get(template, |t| t.read_to_string().map(Arc::from))?;
        out.write_all(text.as_bytes())
            .map_err(|e| TemplateError::io(template.name(), e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::ResourceLocator;
    use crate::template::{DefaultTemplate, FailurePolicy};
    use std::fs;
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_render_verbatim() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("page.txt"), "Hello {{name}}").unwrap();

        let locator = ResourceLocator::parse(dir.path().to_str().unwrap()).unwrap();
        let template = DefaultTemplate::new(
            locator,
            "",
            "page.txt",
            encoding_rs::UTF_8,
            FailurePolicy::strict(),
        );
        let renderer =
            StaticTemplateRenderer::new(RenderableTemplateCache::ttl(Duration::from_secs(60)));

        let mut out = Vec::new();
        renderer.render(&mut out, &template, &Value::Null).unwrap();
        assert_eq!(out, b"Hello {{name}}");

        // Cached: edits are not visible until the TTL elapses
        fs::write(dir.path().join("page.txt"), "changed").unwrap();
        let mut out = Vec::new();
        renderer.render(&mut out, &template, &Value::Null).unwrap();
        assert_eq!(out, b"Hello {{name}}");
    }
}
