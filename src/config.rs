//! Configuration for template resolution and caching.
//!
//! Use [`ConfigBuilder`] at application startup, then create the resolver and
//! per-renderer caches from the resulting [`Config`].

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use encoding_rs::Encoding;
use url::Url;

use crate::cache::RenderableTemplateCache;
use crate::error::{Result, TemplateError};
use crate::render::{TemplateRenderers, ViewWriter};
use crate::resource::{EmbeddedResources, NoEmbeddedResources, ResourceLocator};
use crate::template::{DefaultTemplateResolver, FailurePolicy};

/// Address served in place of missing templates when they are allowed.
pub const DEFAULT_EMPTY_TEMPLATE: &str = "data:,";

/// Validated configuration.
#[derive(Clone)]
pub struct Config {
    base: String,
    locator: ResourceLocator,
    encoding: &'static Encoding,
    ttl: Option<Duration>,
    allow_missing: bool,
    empty_template: Url,
}

impl Config {
    /// Configuration with every default: templates under the current
    /// directory, UTF-8, no caching, strict missing policy.
    pub fn new() -> Result<Self> {
        ConfigBuilder::new().build()
    }

    /// Start a builder.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// The template base as configured.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// The parsed template base.
    pub fn locator(&self) -> &ResourceLocator {
        &self.locator
    }

    /// Encoding used to decode template sources.
    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Compiled-template TTL. `None` means recompile on every render.
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl
    }

    /// Whether missing templates render as [`Config::empty_template`].
    pub fn allow_missing_templates(&self) -> bool {
        self.allow_missing
    }

    /// Substitute address for missing templates.
    pub fn empty_template(&self) -> &Url {
        &self.empty_template
    }

    /// Failure policy matching the missing-template setting.
    pub fn failure_policy(&self) -> FailurePolicy {
        if self.allow_missing {
            FailurePolicy::allow_missing(self.empty_template.clone())
        } else {
            FailurePolicy::strict()
        }
    }

    /// Create a resolver for the configured base.
    pub fn create_resolver(&self) -> DefaultTemplateResolver {
        DefaultTemplateResolver::with_policy(
            self.locator.clone(),
            self.encoding,
            self.failure_policy(),
        )
    }

    /// Create a compiled-template cache honoring the configured TTL.
    pub fn create_cache<T: Clone>(&self) -> RenderableTemplateCache<T> {
        RenderableTemplateCache::from_ttl(self.ttl)
    }

    /// Create a view writer backed by a fresh resolver.
    pub fn create_view_writer(&self, renderers: impl TemplateRenderers + 'static) -> ViewWriter {
        ViewWriter::new(Arc::new(self.create_resolver()), Arc::new(renderers))
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base", &self.base)
            .field("root", &self.locator.root().as_str())
            .field("encoding", &self.encoding.name())
            .field("ttl", &self.ttl)
            .field("allow_missing", &self.allow_missing)
            .field("empty_template", &self.empty_template.as_str())
            .finish()
    }
}

/// Configuration builder for fluent API.
#[derive(Default)]
pub struct ConfigBuilder {
    base: Option<String>,
    encoding: Option<String>,
    ttl: Option<Duration>,
    allow_missing: bool,
    empty_template: Option<Url>,
    resources: Option<Arc<dyn EmbeddedResources>>,
}

impl ConfigBuilder {
    /// Create a new configuration builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the template base: a directory, `classpath:prefix`, or a URL.
    ///
    /// Default: the current working directory.
    pub fn template_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Set the template encoding by label (`"utf-8"`, `"windows-1252"`, ...).
    ///
    /// Default: UTF-8.
    pub fn template_encoding(mut self, label: impl Into<String>) -> Self {
        self.encoding = Some(label.into());
        self
    }

    /// Keep compiled templates for `ttl`. A zero TTL disables caching.
    ///
    /// Default: no caching, so edits are visible on the next render.
    pub fn template_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = (!ttl.is_zero()).then_some(ttl);
        self
    }

    /// Render missing templates as the empty template instead of failing.
    pub fn allow_missing_templates(mut self, allow: bool) -> Self {
        self.allow_missing = allow;
        self
    }

    /// Set the address substituted for missing templates.
    ///
    /// Default: [`DEFAULT_EMPTY_TEMPLATE`], which reads as empty content.
    pub fn empty_template(mut self, url: Url) -> Self {
        self.empty_template = Some(url);
        self
    }

    /// Resources served for a `classpath:` base.
    pub fn embedded(mut self, resources: impl EmbeddedResources + 'static) -> Self {
        self.resources = Some(Arc::new(resources));
        self
    }

    /// Validate and build the configuration.
    ///
    /// Fails with [`TemplateError::UnknownEncoding`] or
    /// [`TemplateError::InvalidBase`].
    pub fn build(self) -> Result<Config> {
        let encoding = match &self.encoding {
            Some(label) => Encoding::for_label(label.trim().as_bytes()).ok_or_else(|| {
                TemplateError::UnknownEncoding {
                    label: label.clone(),
                }
            })?,
            None => encoding_rs::UTF_8,
        };

        let base = self.base.unwrap_or_default();
        let resources = self
            .resources
            .unwrap_or_else(|| Arc::new(NoEmbeddedResources));
        let locator = ResourceLocator::with_resources(&base, resources)?;

        let empty_template = match self.empty_template {
            Some(url) => url,
            None => Url::parse(DEFAULT_EMPTY_TEMPLATE)
                .map_err(|e| TemplateError::unreachable(DEFAULT_EMPTY_TEMPLATE, e.to_string()))?,
        };

        Ok(Config {
            base,
            locator,
            encoding,
            ttl: self.ttl,
            allow_missing: self.allow_missing,
            empty_template,
        })
    }
}
