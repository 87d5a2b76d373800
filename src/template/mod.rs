//! Template resolution.
//!
//! ```text
//! (name, ViewType) ──► TemplateResolver::resolve ──► Arc<dyn Template>
//!                                                        │
//!          resource_path(name, namespace_path)  ◄────────┤ first use
//!          check_path_within_bounds(path)                │
//!          ResourceLocator::address(path) ──► Url        │
//!          FailurePolicy (missing resources only)  ◄─────┘
//! ```

mod core;
mod path;
mod policy;
mod resolver;
mod view;

pub use self::core::{decode_stream, DefaultTemplate, Template};
pub use path::{check_path_within_bounds, resource_path};
pub use policy::{AddressFallback, FailurePolicy, ReaderFallback};
pub use resolver::{DefaultTemplateResolver, TemplateResolver};
pub use view::ViewType;
