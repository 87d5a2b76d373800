//! Cache of provider-compiled template artifacts.

use std::time::Duration;

use super::ttl::TtlCache;
use crate::error::TemplateError;
use crate::template::Template;

/// Caches renderable artifacts (compiled templates) produced by a renderer.
///
/// Entries are keyed by the template's resolved address rather than its
/// logical name, so two names resolving to the same resource share an entry.
///
/// # Example
///
/// ```ignore
/// let cache = RenderableTemplateCache::ttl(Duration::from_secs(5));
/// let compiled = cache.get(template, |t| compile(&t.read_to_string()?))?;
/// ```
pub enum RenderableTemplateCache<T> {
    /// Compile on every call. Edits are visible immediately.
    NoCache,
    /// Reuse artifacts until their TTL elapses.
    Ttl(TtlCache<String, T>),
}

impl<T: Clone> RenderableTemplateCache<T> {
    /// Cache that always recompiles.
    pub fn no_cache() -> Self {
        Self::NoCache
    }

    /// Cache that keeps artifacts for `ttl`.
    pub fn ttl(ttl: Duration) -> Self {
        Self::Ttl(TtlCache::new(ttl))
    }

    /// Create from an optional TTL: `None` means no caching.
    pub fn from_ttl(ttl: Option<Duration>) -> Self {
        ttl.map_or_else(Self::no_cache, Self::ttl)
    }

    /// Get the artifact for `template`, compiling it when needed.
    ///
    /// Errors from `compile` propagate unchanged and are never cached.
    pub fn get<E>(
        &self,
        template: &dyn Template,
        compile: impl FnOnce(&dyn Template) -> Result<T, E>,
    ) -> Result<T, E>
    where
        E: From<TemplateError>,
    {
        match self {
            Self::NoCache => compile(template),
            Self::Ttl(cache) => {
                let address = template.address()?;
                cache.get(address.as_str(), || compile(template))
            }
        }
    }
}

impl<T> std::fmt::Debug for RenderableTemplateCache<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoCache => f.write_str("NoCache"),
            Self::Ttl(cache) => f.debug_tuple("Ttl").field(cache).finish(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Result;
    use crate::resource::{ResourceLocator, ResourceStream};
    use crate::template::{DefaultTemplate, FailurePolicy};
    use encoding_rs::Encoding;
    use std::fs;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use tempfile::TempDir;
    use url::Url;

    /// Template with a fixed address and no content.
    struct FixedTemplate(Url);

    impl Template for FixedTemplate {
        fn name(&self) -> &str {
            "t.txt"
        }

        fn encoding(&self) -> &'static Encoding {
            encoding_rs::UTF_8
        }

        fn address(&self) -> Result<Url> {
            Ok(self.0.clone())
        }

        fn sibling_address(&self, resource_name: &str) -> Result<Url> {
            self.0
                .join(resource_name)
                .map_err(|e| TemplateError::unreachable(resource_name, e.to_string()))
        }

        fn open_stream(&self) -> Result<ResourceStream> {
            Ok(Box::new(std::io::empty()))
        }

        fn open_sibling_stream(&self, _resource_name: &str) -> Result<ResourceStream> {
            Ok(Box::new(std::io::empty()))
        }
    }

    fn fixed(url: &str) -> FixedTemplate {
        FixedTemplate(Url::parse(url).unwrap())
    }

    #[test]
    fn test_no_cache_compiles_every_call() {
        let cache: RenderableTemplateCache<usize> = RenderableTemplateCache::no_cache();
        let template = fixed("file:///tmp/t1.txt");
        let compiles = AtomicUsize::new(0);

        for i in 1..=5 {
            let value = cache
                .get(&template, |_| {
                    Ok::<_, TemplateError>(compiles.fetch_add(1, Ordering::SeqCst) + 1)
                })
                .unwrap();
            assert_eq!(value, i);
        }
        assert_eq!(compiles.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn test_keyed_by_address() {
        let cache: RenderableTemplateCache<&str> =
            RenderableTemplateCache::ttl(Duration::from_secs(60));

        let a = fixed("file:///tmp/t1.txt");
        let b = fixed("file:///tmp/t1.txt");
        let c = fixed("file:///tmp/t2.txt");

        assert_eq!(cache.get(&a, |_| Ok::<_, TemplateError>("a")).unwrap(), "a");
        assert_eq!(cache.get(&b, |_| Ok::<_, TemplateError>("b")).unwrap(), "a");
        assert_eq!(cache.get(&c, |_| Ok::<_, TemplateError>("c")).unwrap(), "c");
    }

    #[test]
    fn test_from_ttl() {
        assert!(matches!(
            RenderableTemplateCache::<()>::from_ttl(None),
            RenderableTemplateCache::NoCache
        ));
        assert!(matches!(
            RenderableTemplateCache::<()>::from_ttl(Some(Duration::from_secs(1))),
            RenderableTemplateCache::Ttl(_)
        ));
    }

    #[test]
    fn test_address_failure_propagates() {
        let dir = TempDir::new().unwrap();
        let locator = ResourceLocator::parse(dir.path().to_str().unwrap()).unwrap();
        let template = DefaultTemplate::new(
            locator,
            "",
            "../t.txt",
            encoding_rs::UTF_8,
            FailurePolicy::strict(),
        );

        let cache: RenderableTemplateCache<String> =
            RenderableTemplateCache::ttl(Duration::from_secs(60));
        let result = cache.get(&template, |t| t.read_to_string());
        assert!(matches!(result, Err(TemplateError::PathTraversal { .. })));
    }

    #[test]
    fn test_ttl_picks_up_edits_after_expiry() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.txt");
        fs::write(&path, "v1").unwrap();

        let locator = ResourceLocator::parse(dir.path().to_str().unwrap()).unwrap();
        let template =
            DefaultTemplate::new(locator, "", "t.txt", encoding_rs::UTF_8, FailurePolicy::strict());
        let cache: RenderableTemplateCache<String> =
            RenderableTemplateCache::ttl(Duration::from_millis(300));

        assert_eq!(cache.get(&template, |t| t.read_to_string()).unwrap(), "v1");

        fs::write(&path, "v2").unwrap();
        assert_eq!(cache.get(&template, |t| t.read_to_string()).unwrap(), "v1");

        thread::sleep(Duration::from_millis(400));
        assert_eq!(cache.get(&template, |t| t.read_to_string()).unwrap(), "v2");
    }
}
