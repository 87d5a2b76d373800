//! The `Template` contract and its default implementation.

use std::io::Read;
use std::sync::OnceLock;

use encoding_rs::Encoding;
use tracing::trace;
use url::Url;

use super::path::resource_path;
use super::policy::FailurePolicy;
use crate::error::{Result, TemplateError};
use crate::resource::{ResourceLocator, ResourceStream};

// =============================================================================
// Template Trait
// =============================================================================

/// A named, addressable template exposed to renderers.
///
/// Sibling resources (includes, partials) are resolved through the owning
/// template, so renderers pass the template explicitly instead of keeping
/// per-thread context.
pub trait Template: Send + Sync {
    /// Logical template name, including its extension.
    fn name(&self) -> &str;

    /// Character encoding of the template source.
    fn encoding(&self) -> &'static Encoding;

    /// Address of this template.
    fn address(&self) -> Result<Url>;

    /// Address of a related resource, such as a sub-template.
    fn sibling_address(&self, resource_name: &str) -> Result<Url>;

    /// Open a byte stream for this template.
    fn open_stream(&self) -> Result<ResourceStream>;

    /// Open a byte stream for a related resource.
    fn open_sibling_stream(&self, resource_name: &str) -> Result<ResourceStream>;

    /// Read and decode the template source.
    fn read_to_string(&self) -> Result<String> {
        decode_stream(self.open_stream()?, self.encoding(), self.name())
    }

    /// Read and decode a related resource.
    fn read_sibling_to_string(&self, resource_name: &str) -> Result<String> {
        decode_stream(
            self.open_sibling_stream(resource_name)?,
            self.encoding(),
            resource_name,
        )
    }
}

/// Read a stream to the end and decode it, dropping a leading BOM.
pub fn decode_stream(
    mut stream: ResourceStream,
    encoding: &'static Encoding,
    resource: &str,
) -> Result<String> {
    let mut buf = Vec::new();
    stream
        .read_to_end(&mut buf)
        .map_err(|e| TemplateError::io(resource, e))?;

    let (text, had_errors) = encoding.decode_with_bom_removal(&buf);
    if had_errors {
        return Err(TemplateError::Decode {
            resource: resource.to_string(),
            encoding: encoding.name(),
        });
    }
    Ok(text.into_owned())
}

// =============================================================================
// DefaultTemplate
// =============================================================================

/// Template resolved relative to a base, under a namespace path.
///
/// Both the template address and sibling addresses are built from the
/// namespace path and checked against the base root before any I/O.
pub struct DefaultTemplate {
    locator: ResourceLocator,
    namespace_path: String,
    name: String,
    encoding: &'static Encoding,
    policy: FailurePolicy,
    address: OnceLock<Url>,
}

impl DefaultTemplate {
    /// Create a template. No I/O happens until first use.
    pub fn new(
        locator: ResourceLocator,
        namespace_path: impl Into<String>,
        name: impl Into<String>,
        encoding: &'static Encoding,
        policy: FailurePolicy,
    ) -> Self {
        Self {
            locator,
            namespace_path: namespace_path.into(),
            name: name.into(),
            encoding,
            policy,
            address: OnceLock::new(),
        }
    }

    /// Namespace path prepended to relative names.
    pub fn namespace_path(&self) -> &str {
        &self.namespace_path
    }

    fn resolve_address(&self, resource: &str) -> Result<Url> {
        let path = resource_path(resource, &self.namespace_path)?;
        let url = self
            .locator
            .address(&path)
            .or_else(|e| self.policy.recover_address(resource, e))?;
        trace!(resource, address = %url, "resolved template address");
        Ok(url)
    }

    fn open(&self, url: &Url) -> Result<ResourceStream> {
        self.locator
            .open(url)
            .or_else(|e| self.policy.recover_reader(url, e))
    }
}

impl Template for DefaultTemplate {
    fn name(&self) -> &str {
        &self.name
    }

    fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    fn address(&self) -> Result<Url> {
        // Unsynchronized: concurrent first calls may both resolve, with equal results
        if let Some(url) = self.address.get() {
            return Ok(url.clone());
        }

        let url = self.resolve_address(&self.name)?;
        let _ = self.address.set(url.clone());
        Ok(url)
    }

    fn sibling_address(&self, resource_name: &str) -> Result<Url> {
        self.resolve_address(resource_name)
    }

    fn open_stream(&self) -> Result<ResourceStream> {
        let url = self.address()?;
        self.open(&url)
    }

    fn open_sibling_stream(&self, resource_name: &str) -> Result<ResourceStream> {
        let url = self.sibling_address(resource_name)?;
        self.open(&url)
    }
}

impl std::fmt::Debug for DefaultTemplate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DefaultTemplate")
            .field("name", &self.name)
            .field("namespace_path", &self.namespace_path)
            .field("encoding", &self.encoding.name())
            .field("root", &self.locator.root().as_str())
            .finish()
    }
}
