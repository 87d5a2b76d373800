//! Renderer dispatch and view output.
//!
//! ```text
//! ViewWriter::write(out, "index.mustache", view_type, model)
//!     │
//!     ├─► TemplateResolver::resolve      name + view type -> Template
//!     ├─► TemplateRenderers::renderer    extension        -> TemplateRenderer
//!     └─► TemplateRenderer::render       template + model -> out
//! ```

mod dispatch;
mod text;
mod writer;

pub use dispatch::{
    extension, ByExtensionRenderers, ByExtensionRenderersBuilder, TemplateRenderer,
    TemplateRenderers,
};
pub use text::StaticTemplateRenderer;
pub use writer::{View, ViewWriter};
