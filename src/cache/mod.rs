//! Caching of compiled template artifacts.
//!
//! - [`TtlCache`] - generic single-flight cache with stale-while-revalidate
//! - [`RenderableTemplateCache`] - per-renderer artifact cache keyed by template address

mod renderable;
mod ttl;

pub use renderable::RenderableTemplateCache;
pub use ttl::TtlCache;
