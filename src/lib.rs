//! # mvc-templates
//!
//! View-template resolution and compiled-template caching for server-side
//! MVC rendering.
//!
//! Given a logical template name and the view type requesting it, this crate
//! locates the backing resource (file, embedded resource, or URL), rejects
//! names that would escape the configured template base, and caches
//! renderer-compiled artifacts with a time-to-live so repeated requests skip
//! recompilation while still picking up edits after expiry.
//!
//! Template engines are not included. They plug in through
//! [`TemplateRenderer`] and use [`RenderableTemplateCache`] for their
//! compiled form.
//!
//! ## Quick Start
//!
//! ```ignore
//! use mvc_templates::prelude::*;
//! use std::time::Duration;
//!
//! let config = ConfigBuilder::new()
//!     .template_base("templates")
//!     .template_ttl(Duration::from_secs(5))
//!     .build()?;
//!
//! let renderers = ByExtensionRenderers::builder()
//!     .register(".txt", StaticTemplateRenderer::new(config.create_cache()))
//!     .build();
//! let writer = config.create_view_writer(renderers);
//!
//! // Relative names resolve under the view type's module path
//! let mut out = Vec::new();
//! let view = ViewType::namespaced("app::home");
//! writer.write(&mut out, "index.txt", &view, &serde_json::Value::Null)?;
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Validated configuration and component factories
//! - [`resource`]: Template base parsing and stream opening
//! - [`template`]: Path guarding, templates and the resolver
//! - [`cache`]: Single-flight TTL cache for compiled templates
//! - [`render`]: Renderer dispatch and view output
//! - [`error`]: Error type

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cache;
pub mod config;
pub mod error;
pub mod prelude;
pub mod render;
pub mod resource;
pub mod template;

// =============================================================================
// Core API
// =============================================================================

pub use template::{
    check_path_within_bounds, resource_path, DefaultTemplate, DefaultTemplateResolver,
    FailurePolicy, Template, TemplateResolver, ViewType,
};

pub use cache::{RenderableTemplateCache, TtlCache};

pub use render::{
    ByExtensionRenderers, StaticTemplateRenderer, TemplateRenderer, TemplateRenderers, View,
    ViewWriter,
};

// =============================================================================
// Infrastructure
// =============================================================================

pub use config::{Config, ConfigBuilder};
pub use error::{Result, TemplateError};
pub use resource::{
    EmbeddedResources, MapResources, NoEmbeddedResources, ResourceLocator, ResourceStream,
};

/// encoding_rs, for naming template encodings.
pub use encoding_rs;

/// serde_json, whose `Value` is the render model.
pub use serde_json;

/// url, whose `Url` is the template address type.
pub use url;
