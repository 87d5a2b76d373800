//! Resolve, dispatch and render a view in one call.

use std::io::Write;
use std::sync::Arc;

use serde_json::Value;

use super::dispatch::TemplateRenderers;
use crate::error::{Result, TemplateError};
use crate::template::{TemplateResolver, ViewType};

/// A view object: a template name plus the model it renders with.
///
/// The implementing type's module path selects the template namespace.
pub trait View {
    /// Template name, relative to the view's namespace unless it starts with `/`.
    fn template_name(&self) -> &str;

    /// Model handed to the renderer.
    fn model(&self) -> Value;
}

/// Writes views to an output stream.
///
/// This is the transport-independent half of an HTTP body writer: the
/// caller owns the stream and maps errors to responses.
#[derive(Clone)]
pub struct ViewWriter {
    resolver: Arc<dyn TemplateResolver>,
    renderers: Arc<dyn TemplateRenderers>,
}

impl ViewWriter {
    /// Create a writer from a resolver and a renderer registry.
    pub fn new(resolver: Arc<dyn TemplateResolver>, renderers: Arc<dyn TemplateRenderers>) -> Self {
        Self {
            resolver,
            renderers,
        }
    }

    /// Render `template_name` requested by `view_type` into `out`.
    ///
    /// Flushes `out` but does not close it.
    pub fn write(
        &self,
        out: &mut dyn Write,
        template_name: &str,
        view_type: &ViewType,
        model: &Value,
    ) -> Result<()> {
        let template = self.resolver.resolve(template_name, view_type);
        self.renderers
            .renderer(template.as_ref())?
            .render(out, template.as_ref(), model)?;
        out.flush()
            .map_err(|e| TemplateError::io(template_name, e))
    }

    /// Render a typed view.
    pub fn write_view<V: View>(&self, out: &mut dyn Write, view: &V) -> Result<()> {
        self.write(out, view.template_name(), &ViewType::of::<V>(), &view.model())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::RenderableTemplateCache;
    use crate::render::{ByExtensionRenderers, StaticTemplateRenderer, TemplateRenderer};
    use crate::resource::{EmbeddedResources, MapResources, ResourceLocator};
    use crate::template::{DefaultTemplateResolver, FailurePolicy, Template};
    use url::Url;

    mod pages {
        use super::*;

        pub struct Home;

        impl View for Home {
            fn template_name(&self) -> &str {
                "home.txt"
            }

            fn model(&self) -> Value {
                Value::Null
            }
        }
    }

    /// Echoes the `name` field of the model.
    struct Greeting;

    impl TemplateRenderer for Greeting {
        fn render(
            &self,
            out: &mut dyn Write,
            template: &dyn Template,
            model: &Value,
        ) -> Result<()> {
            let greeting = template.read_to_string()?;
            let name = model["name"].as_str().unwrap_or("nobody");
            write!(out, "{greeting} {name}").map_err(|e| TemplateError::io(template.name(), e))
        }
    }

    fn writer(policy: FailurePolicy) -> ViewWriter {
        let namespace = ViewType::of::<pages::Home>().namespace_path();
        let mut resources = MapResources::new();
        resources.insert(format!("{namespace}home.txt"), "home page");
        resources.insert("hello.greet", "Hello");
        let resources: Arc<dyn EmbeddedResources> = Arc::new(resources);

        let locator = ResourceLocator::with_resources("classpath:", resources).unwrap();
        let resolver = DefaultTemplateResolver::with_policy(locator, encoding_rs::UTF_8, policy);
        let renderers = ByExtensionRenderers::builder()
            .register(".txt", StaticTemplateRenderer::new(RenderableTemplateCache::no_cache()))
            .register(".greet", Greeting)
            .build();

        ViewWriter::new(Arc::new(resolver), Arc::new(renderers))
    }

    #[test]
    fn test_write_view() {
        let mut out = Vec::new();
        writer(FailurePolicy::strict())
            .write_view(&mut out, &pages::Home)
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "home page");
    }

    #[test]
    fn test_write_with_model() {
        let mut out = Vec::new();
        writer(FailurePolicy::strict())
            .write(
                &mut out,
                "/hello.greet",
                &ViewType::root(),
                &serde_json::json!({ "name": "world" }),
            )
            .unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Hello world");
    }

    #[test]
    fn test_write_missing_template() {
        let mut out = Vec::new();
        let err = writer(FailurePolicy::strict())
            .write(&mut out, "missing.txt", &ViewType::root(), &Value::Null)
            .unwrap_err();
        assert!(err.is_recoverable());

        let lenient = writer(FailurePolicy::allow_missing(Url::parse("data:,").unwrap()));
        let mut out = Vec::new();
        lenient
            .write(&mut out, "missing.txt", &ViewType::root(), &Value::Null)
            .unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_write_unsupported_extension() {
        let mut out = Vec::new();
        let err = writer(FailurePolicy::strict())
            .write(&mut out, "page.ftl", &ViewType::root(), &Value::Null)
            .unwrap_err();
        assert!(matches!(err, TemplateError::UnsupportedExtension { .. }));
    }
}
