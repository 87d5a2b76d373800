//! Error types for template resolution and rendering.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = TemplateError> = std::result::Result<T, E>;

/// Error type for template resolution, loading and rendering failures.
///
/// # Example
///
/// ```ignore
/// match template.read_to_string() {
///     Ok(text) => { /* compile */ }
///     Err(TemplateError::PathTraversal { path }) => {
///         eprintln!("rejected: {path}");
///     }
///     Err(e) if e.is_recoverable() => { /* resource missing */ }
///     Err(e) => eprintln!("{e}"),
/// }
/// ```
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Resolved path would ascend above the template base.
    #[error("path is outside the template base: {path}")]
    PathTraversal {
        /// The offending resource path.
        path: String,
    },

    /// The resource address could not be computed or the resource is absent.
    #[error("error resolving resource '{resource}': {reason}")]
    ResourceUnreachable {
        /// Resource name or address.
        resource: String,
        /// Why resolution failed.
        reason: String,
    },

    /// Opening or reading a resource failed.
    #[error("error opening '{resource}': {source}")]
    Io {
        /// Resource address.
        resource: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Template name has no usable extension.
    #[error("path without extension: {name}")]
    MissingExtension {
        /// The template name.
        name: String,
    },

    /// No renderer registered for the template extension.
    #[error("unsupported template extension: {extension}, supported extensions: {supported:?}")]
    UnsupportedExtension {
        /// The extension, including the leading dot.
        extension: String,
        /// Registered extensions.
        supported: Vec<String>,
    },

    /// Template base string could not be interpreted.
    #[error("invalid template base '{base}': {reason}")]
    InvalidBase {
        /// The configured base.
        base: String,
        /// Why parsing failed.
        reason: String,
    },

    /// Encoding label not known.
    #[error("unknown template encoding: {label}")]
    UnknownEncoding {
        /// The configured label.
        label: String,
    },

    /// Content is not valid in the template encoding.
    #[error("'{resource}' is not valid {encoding}")]
    Decode {
        /// Resource address.
        resource: String,
        /// Encoding name.
        encoding: &'static str,
    },

    /// A renderer failed to produce output.
    #[error("failed to render '{template}': {message}")]
    Render {
        /// Template name.
        template: String,
        /// Error message from the renderer.
        message: String,
    },
}

impl TemplateError {
    /// Create a resource unreachable error.
    pub fn unreachable(resource: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::ResourceUnreachable {
            resource: resource.into(),
            reason: reason.into(),
        }
    }

    /// Create an IO error for a resource.
    pub fn io(resource: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            resource: resource.into(),
            source,
        }
    }

    /// Create a render error.
    pub fn render(template: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Render {
            template: template.into(),
            message: message.into(),
        }
    }

    /// Whether a configured fallback may substitute for this failure.
    ///
    /// Only missing or unreadable resources qualify. Traversal violations
    /// never do.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ResourceUnreachable { .. } | Self::Io { .. })
    }
}
