//! Requesting view types and their namespace paths.

use std::sync::Arc;

/// Identifies the type requesting a template.
///
/// Relative template names resolve under the view's namespace, so a view
/// declared in `app::views::home` looks up `index.txt` as
/// `app/views/home/index.txt`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ViewType {
    namespace: Option<Arc<str>>,
}

impl ViewType {
    /// View type with no namespace. Relative names resolve at the base root.
    pub const fn root() -> Self {
        Self { namespace: None }
    }

    /// View type with an explicit `::`-separated namespace.
    pub fn namespaced(namespace: &str) -> Self {
        let namespace = namespace.trim_matches(':');
        if namespace.is_empty() {
            Self::root()
        } else {
            Self {
                namespace: Some(namespace.into()),
            }
        }
    }

    /// Derive the view type from a Rust type's module path.
    ///
    /// ```ignore
    /// mod views { pub struct Home; }
    /// assert_eq!(ViewType::of::<views::Home>().namespace_path(), "my_crate/views/");
    /// ```
    pub fn of<V: ?Sized>() -> Self {
        Self::from_type_name(std::any::type_name::<V>())
    }

    /// Derive the view type from a value's type.
    pub fn of_val<V: ?Sized>(_view: &V) -> Self {
        Self::of::<V>()
    }

    fn from_type_name(type_name: &str) -> Self {
        // Generic arguments carry their own paths; only the outer type counts
        let outer = type_name.split('<').next().unwrap_or(type_name);
        let outer = outer.trim_start_matches(['&', '*']).trim_start_matches("mut ");

        match outer.rsplit_once("::") {
            Some((namespace, _)) => Self::namespaced(namespace),
            None => Self::root(),
        }
    }

    /// The `::`-separated namespace, if any.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Namespace as a relative path with a trailing `/`, or empty.
    pub fn namespace_path(&self) -> String {
        match &self.namespace {
            Some(namespace) => {
                let mut path = namespace
                    .split("::")
                    .filter(|s| !s.is_empty())
                    .collect::<Vec<_>>()
                    .join("/");
                path.push('/');
                path
            }
            None => String::new(),
        }
    }
}
