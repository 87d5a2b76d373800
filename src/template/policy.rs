//! Recovery hooks for missing or unreadable templates.

use std::fmt;
use std::io;
use std::sync::Arc;

use tracing::warn;
use url::Url;

use crate::error::{Result, TemplateError};
use crate::resource::ResourceStream;

/// Substitutes an address for a resource whose address could not be resolved.
pub type AddressFallback = Arc<dyn Fn(&str) -> Url + Send + Sync>;

/// Substitutes content for an address that could not be opened.
pub type ReaderFallback = Arc<dyn Fn(&Url) -> ResourceStream + Send + Sync>;

/// What to do when a template resource is missing.
///
/// Hooks run only after the primary lookup fails, and only for recoverable
/// failures. Path traversal violations always propagate.
#[derive(Clone, Default)]
pub struct FailurePolicy {
    on_failed_address: Option<AddressFallback>,
    on_failed_reader: Option<ReaderFallback>,
}

impl FailurePolicy {
    /// Every failure propagates.
    pub fn strict() -> Self {
        Self::default()
    }

    /// Missing templates resolve to `empty_template` and unreadable ones
    /// read as empty content.
    pub fn allow_missing(empty_template: Url) -> Self {
        Self::strict()
            .with_address_fallback(move |_| empty_template.clone())
            .with_reader_fallback(|_| Box::new(io::empty()) as ResourceStream)
    }

    /// Set the address fallback hook.
    pub fn with_address_fallback(
        mut self,
        hook: impl Fn(&str) -> Url + Send + Sync + 'static,
    ) -> Self {
        self.on_failed_address = Some(Arc::new(hook));
        self
    }

    /// Set the reader fallback hook.
    pub fn with_reader_fallback(
        mut self,
        hook: impl Fn(&Url) -> ResourceStream + Send + Sync + 'static,
    ) -> Self {
        self.on_failed_reader = Some(Arc::new(hook));
        self
    }

    /// True if no hook is configured.
    pub fn is_strict(&self) -> bool {
        self.on_failed_address.is_none() && self.on_failed_reader.is_none()
    }

    pub(crate) fn recover_address(&self, resource: &str, error: TemplateError) -> Result<Url> {
        match &self.on_failed_address {
            Some(hook) if error.is_recoverable() => {
                let url = hook(resource);
                warn!(resource, fallback = %url, %error, "template address failed, using fallback");
                Ok(url)
            }
            _ => Err(error),
        }
    }

    pub(crate) fn recover_reader(&self, url: &Url, error: TemplateError) -> Result<ResourceStream> {
        match &self.on_failed_reader {
            Some(hook) if error.is_recoverable() => {
                warn!(address = %url, %error, "template read failed, using fallback content");
                Ok(hook(url))
            }
            _ => Err(error),
        }
    }
}

impl fmt::Debug for FailurePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FailurePolicy")
            .field("on_failed_address", &self.on_failed_address.is_some())
            .field("on_failed_reader", &self.on_failed_reader.is_some())
            .finish()
    }
}
