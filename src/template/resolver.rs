//! Mapping of `(template name, view type)` pairs to templates.

use std::sync::Arc;

use encoding_rs::Encoding;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use tracing::debug;

use super::core::{DefaultTemplate, Template};
use super::policy::FailurePolicy;
use super::view::ViewType;
use crate::resource::ResourceLocator;

/// Resolves a logical template name requested by a view type.
pub trait TemplateResolver: Send + Sync {
    /// Resolve a template. Performs no I/O; addresses resolve on first use.
    fn resolve(&self, template_name: &str, view_type: &ViewType) -> Arc<dyn Template>;
}

/// Memoization key: namespace plus name, not the resource path.
type ResolverKey = (String, String);

/// Resolver producing [`DefaultTemplate`]s under the view type's namespace.
///
/// Templates are memoized per `(namespace, name)` and never evicted, so
/// repeated resolutions share one template and its memoized address.
pub struct DefaultTemplateResolver {
    locator: ResourceLocator,
    encoding: &'static Encoding,
    policy: FailurePolicy,
    templates: RwLock<FxHashMap<ResolverKey, Arc<DefaultTemplate>>>,
}

impl DefaultTemplateResolver {
    /// Create a resolver with a strict failure policy.
    pub fn new(locator: ResourceLocator, encoding: &'static Encoding) -> Self {
        Self::with_policy(locator, encoding, FailurePolicy::strict())
    }

    /// Create a resolver with custom failure recovery.
    pub fn with_policy(
        locator: ResourceLocator,
        encoding: &'static Encoding,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            locator,
            encoding,
            policy,
            templates: RwLock::new(FxHashMap::default()),
        }
    }

    /// The resource locator templates resolve against.
    pub fn locator(&self) -> &ResourceLocator {
        &self.locator
    }

    /// Number of memoized templates.
    pub fn len(&self) -> usize {
        self.templates.read().len()
    }

    /// Check if no template has been resolved yet.
    pub fn is_empty(&self) -> bool {
        self.templates.read().is_empty()
    }

    fn create_template(&self, template_name: &str, view_type: &ViewType) -> DefaultTemplate {
        DefaultTemplate::new(
            self.locator.clone(),
            view_type.namespace_path(),
            template_name,
            self.encoding,
            self.policy.clone(),
        )
    }
}

impl TemplateResolver for DefaultTemplateResolver {
    fn resolve(&self, template_name: &str, view_type: &ViewType) -> Arc<dyn Template> {
        let key = (
            view_type.namespace().unwrap_or_default().to_string(),
            template_name.to_string(),
        );

        if let Some(template) = self.templates.read().get(&key) {
            return template.clone();
        }

        // Built outside the lock. A racing thread may build a duplicate; the first insert wins
        let template = Arc::new(self.create_template(template_name, view_type));
        debug!(
            template = template_name,
            namespace = view_type.namespace().unwrap_or_default(),
            "created template"
        );

        self.templates
            .write()
            .entry(key)
            .or_insert(template)
            .clone()
    }
}

impl std::fmt::Debug for DefaultTemplateResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultTemplateResolver")
            .field("locator", &self.locator)
            .field("encoding", &self.encoding.name())
            .field("policy", &self.policy)
            .field("templates", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{EmbeddedResources, MapResources};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use url::Url;

    mod views {
        pub struct Home;
    }

    fn resolver(base: &str) -> DefaultTemplateResolver {
        DefaultTemplateResolver::new(ResourceLocator::parse(base).unwrap(), encoding_rs::UTF_8)
    }

    fn namespace_path() -> String {
        ViewType::of::<views::Home>().namespace_path()
    }

    #[test]
    fn test_resolve_empty_base() {
        let resolver = resolver("");
        let url = resolver
            .resolve("tName.txt", &ViewType::of::<views::Home>())
            .address()
            .unwrap();

        let expected = resolver
            .locator()
            .root()
            .join(&format!("{}tName.txt", namespace_path()))
            .unwrap();
        assert_eq!(url, expected);
    }

    #[test]
    fn test_resolve_empty_base_absolute() {
        let resolver = resolver("");
        let url = resolver
            .resolve("/tName.txt", &ViewType::of::<views::Home>())
            .address()
            .unwrap();
        assert_eq!(url, resolver.locator().root().join("tName.txt").unwrap());
    }

    #[test]
    fn test_resolve_url_base() {
        let view = ViewType::namespaced("app::views::mvc");
        for base in ["http://example.org/a", "http://example.org/a/"] {
            let resolver = resolver(base);
            assert_eq!(
                resolver.resolve("tName.txt", &view).address().unwrap().as_str(),
                "http://example.org/a/app/views/mvc/tName.txt"
            );
            assert_eq!(
                resolver.resolve("/tName.txt", &view).address().unwrap().as_str(),
                "http://example.org/a/tName.txt"
            );
        }
    }

    #[test]
    fn test_resolve_file_base() {
        let dir = tempfile::TempDir::new().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let view = ViewType::namespaced("a::b");

        for base in [root.display().to_string(), format!("{}/", root.display())] {
            let resolver = resolver(&base);
            assert_eq!(
                resolver.resolve("tName.txt", &view).address().unwrap(),
                Url::from_file_path(root.join("a/b/tName.txt")).unwrap()
            );
            assert_eq!(
                resolver.resolve("/tName.txt", &view).address().unwrap(),
                Url::from_file_path(root.join("tName.txt")).unwrap()
            );
        }
    }

    #[test]
    fn test_resolve_classpath_base() {
        let mut resources = MapResources::new();
        resources.insert("a/b/tName.txt", "test");
        resources.insert("rootName.txt", "root");
        let resources: Arc<dyn EmbeddedResources> = Arc::new(resources);
        let view = ViewType::namespaced("a::b");

        for base in ["classpath:", "classpath:/"] {
            let locator = ResourceLocator::with_resources(base, resources.clone()).unwrap();
            let resolver = DefaultTemplateResolver::new(locator, encoding_rs::UTF_8);

            assert_eq!(
                resolver.resolve("tName.txt", &view).address().unwrap().as_str(),
                "classpath:/a/b/tName.txt"
            );
            // Root resource regardless of the view namespace
            assert_eq!(
                resolver.resolve("/rootName.txt", &view).address().unwrap().as_str(),
                "classpath:/rootName.txt"
            );
        }
    }

    #[test]
    fn test_resolve_memoized() {
        let resolver = resolver("http://example.org/");
        let view = ViewType::namespaced("a");

        let t1 = resolver.resolve("t.txt", &view);
        let t2 = resolver.resolve("t.txt", &view);
        assert!(Arc::ptr_eq(&t1, &t2));
        assert_eq!(t1.address().unwrap(), t2.address().unwrap());

        let other = resolver.resolve("t.txt", &ViewType::namespaced("b"));
        assert!(!Arc::ptr_eq(&t1, &other));
        assert_eq!(resolver.len(), 2);
    }

    #[test]
    fn test_resolve_no_repeated_address_io() {
        struct Counting {
            inner: MapResources,
            lookups: AtomicUsize,
        }

        impl EmbeddedResources for Counting {
            fn read(&self, path: &str) -> Option<Vec<u8>> {
                self.inner.read(path)
            }

            fn contains(&self, path: &str) -> bool {
                self.lookups.fetch_add(1, Ordering::SeqCst);
                self.inner.contains(path)
            }
        }

        let mut inner = MapResources::new();
        inner.insert("a/t.txt", "test");
        let resources = Arc::new(Counting {
            inner,
            lookups: AtomicUsize::new(0),
        });

        let locator = ResourceLocator::with_resources("classpath:", resources.clone()).unwrap();
        let resolver = DefaultTemplateResolver::new(locator, encoding_rs::UTF_8);
        let view = ViewType::namespaced("a");

        for _ in 0..5 {
            let template = resolver.resolve("t.txt", &view);
            assert_eq!(template.address().unwrap().as_str(), "classpath:/a/t.txt");
        }
        assert_eq!(resources.lookups.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_resolve_concurrent() {
        let resolver = Arc::new(resolver("http://example.org/"));
        let view = ViewType::namespaced("a");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let resolver = resolver.clone();
                let view = view.clone();
                thread::spawn(move || resolver.resolve("t.txt", &view))
            })
            .collect();

        let templates: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        assert!(templates.iter().all(|t| Arc::ptr_eq(t, &templates[0])));
        assert_eq!(resolver.len(), 1);
    }
}
