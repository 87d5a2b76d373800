//! Embedded resource sets backing `classpath:` template bases.
//!
//! Provides the lookup used when templates ship inside the binary (or are
//! injected by the host) instead of living on disk.

use rustc_hash::FxHashMap;

// =============================================================================
// EmbeddedResources Trait
// =============================================================================

/// Trait for providing template content that is not on the filesystem.
///
/// Paths are root-relative without a leading slash
/// (e.g. `"app/views/index.mustache"`).
///
/// # Example
///
/// ```ignore
/// use mvc_templates::{EmbeddedResources, ConfigBuilder};
///
/// struct Bundled;
///
/// impl EmbeddedResources for Bundled {
///     fn read(&self, path: &str) -> Option<Vec<u8>> {
///         match path {
///             "views/index.txt" => Some(b"hello".to_vec()),
///             _ => None,
///         }
///     }
/// }
///
/// let config = ConfigBuilder::new()
///     .template_base("classpath:views")
///     .embedded(Bundled)
///     .build()?;
/// ```
pub trait EmbeddedResources: Send + Sync {
    /// Read an embedded resource, or `None` if there is no such entry.
    fn read(&self, path: &str) -> Option<Vec<u8>>;

    /// Check whether an entry exists.
    fn contains(&self, path: &str) -> bool {
        self.read(path).is_some()
    }
}

// =============================================================================
// NoEmbeddedResources - Default Implementation
// =============================================================================

/// Empty resource set. Every `classpath:` lookup misses.
pub struct NoEmbeddedResources;

impl EmbeddedResources for NoEmbeddedResources {
    fn read(&self, _path: &str) -> Option<Vec<u8>> {
        None
    }

    fn contains(&self, _path: &str) -> bool {
        false
    }
}

// =============================================================================
// MapResources - Map-based Implementation
// =============================================================================

/// A simple map-based resource set.
///
/// # Example
///
/// ```ignore
/// use mvc_templates::MapResources;
///
/// let mut resources = MapResources::new();
/// resources.insert("views/index.txt", "hello");
/// ```
#[derive(Default, Clone)]
pub struct MapResources {
    files: FxHashMap<String, Vec<u8>>,
}

impl MapResources {
    /// Create a new empty resource set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a resource with string content.
    ///
    /// A leading `/` in the path is ignored.
    pub fn insert(&mut self, path: impl AsRef<str>, content: impl AsRef<str>) {
        self.insert_bytes(path, content.as_ref().as_bytes());
    }

    /// Insert a resource with binary content.
    pub fn insert_bytes(&mut self, path: impl AsRef<str>, content: impl Into<Vec<u8>>) {
        let key = path.as_ref().trim_start_matches('/').to_string();
        self.files.insert(key, content.into());
    }

    /// Remove a resource.
    pub fn remove(&mut self, path: &str) -> Option<Vec<u8>> {
        self.files.remove(path.trim_start_matches('/'))
    }

    /// Get the number of resources.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl EmbeddedResources for MapResources {
    fn read(&self, path: &str) -> Option<Vec<u8>> {
        self.files.get(path).cloned()
    }

    fn contains(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }
}
