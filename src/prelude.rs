//! Prelude module for convenient imports.
//!
//! ```ignore
//! use mvc_templates::prelude::*;
//! ```

pub use crate::cache::{RenderableTemplateCache, TtlCache};
pub use crate::config::{Config, ConfigBuilder};
pub use crate::error::{Result, TemplateError};
pub use crate::render::{
    ByExtensionRenderers, StaticTemplateRenderer, TemplateRenderer, TemplateRenderers, View,
    ViewWriter,
};
pub use crate::resource::{EmbeddedResources, MapResources, ResourceLocator};
pub use crate::template::{
    DefaultTemplateResolver, FailurePolicy, Template, TemplateResolver, ViewType,
};
