//! Resource location for template bases.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  Resource Access Flow                       │
//! ├─────────────────────────────────────────────────────────────┤
//! │                                                             │
//! │  path ──► ResourceLocator::address(path) ──► Url            │
//! │                                                │            │
//! │  Url  ──► ResourceLocator::open(url)           │            │
//! │                    │                                        │
//! │                    ├─► file:       read from disk           │
//! │                    ├─► classpath:  EmbeddedResources::read  │
//! │                    ├─► data:       inline payload           │
//! │                    └─► http(s):    remote fetch (feature)   │
//! │                                                             │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod embedded;
mod locator;

pub use embedded::{EmbeddedResources, MapResources, NoEmbeddedResources};
pub use locator::{ResourceLocator, ResourceStream};
