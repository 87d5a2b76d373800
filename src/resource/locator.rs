//! Template base parsing, address joining and stream opening.
//!
//! A base is one of:
//!
//! ```text
//! ""                         current working directory
//! "/var/app/templates"       file path      -> file:///var/app/templates/...
//! "classpath:views"          embedded root  -> classpath:/views/...
//! "http://example.org/a"     absolute URL   -> http://example.org/a/...
//! ```

use std::fmt;
use std::fs;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use base64::Engine;
use percent_encoding::percent_decode_str;
use url::Url;

use super::embedded::{EmbeddedResources, NoEmbeddedResources};
use crate::error::{Result, TemplateError};

const CLASSPATH_PREFIX: &str = "classpath:";

/// Boxed byte stream returned when opening a resource.
pub type ResourceStream = Box<dyn Read + Send>;

/// Resolves relative resource paths against a configured base and opens
/// the resulting addresses.
///
/// Cloning is cheap; the embedded resource set is shared.
#[derive(Clone)]
pub struct ResourceLocator {
    root: Url,
    resources: Arc<dyn EmbeddedResources>,
}

impl ResourceLocator {
    /// Parse a base location with no embedded resources.
    pub fn parse(base: &str) -> Result<Self> {
        Self::with_resources(base, Arc::new(NoEmbeddedResources))
    }

    /// Parse a base location, resolving `classpath:` against `resources`.
    pub fn with_resources(base: &str, resources: Arc<dyn EmbeddedResources>) -> Result<Self> {
        let root = parse_root(base)?;
        Ok(Self { root, resources })
    }

    /// The base address. Always ends with `/`.
    pub fn root(&self) -> &Url {
        &self.root
    }

    /// Compute the address of `path` under the base.
    ///
    /// A leading separator is ignored: every path is relative to the base.
    /// Components are appended as literal path segments, so `%2e%2e`,
    /// `file:`, `?` and `#` never leave the base. Embedded addresses fail when
    /// the resource set has no such entry.
    pub fn address(&self, path: &str) -> Result<Url> {
        let traversal = || TemplateError::PathTraversal {
            path: path.to_string(),
        };

        let mut url = self.root.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| TemplateError::unreachable(path, "base cannot hold paths"))?;
            segments.pop_if_empty();

            let mut depth: usize = 0;
            for component in path.split(['/', '\\']) {
                match component {
                    "" | "." => {}
                    ".." => {
                        depth = depth.checked_sub(1).ok_or_else(traversal)?;
                        segments.pop();
                    }
                    segment => {
                        depth += 1;
                        segments.push(segment);
                    }
                }
            }
        }

        if url.path() == self.root.path().trim_end_matches('/') {
            url = self.root.clone();
        }

        // Segment parsing drops tabs and newlines, which can re-form `..`
        if !self.contains(&url) {
            return Err(traversal());
        }

        if url.scheme() == "classpath" && !self.resources.contains(&embedded_path(&url)) {
            return Err(TemplateError::unreachable(
                path,
                format!("no embedded resource at {url}"),
            ));
        }

        Ok(url)
    }

    /// Whether `url` lies under the base root.
    pub fn contains(&self, url: &Url) -> bool {
        url.scheme() == self.root.scheme()
            && url.host() == self.root.host()
            && url.port() == self.root.port()
            && url.path().starts_with(self.root.path())
    }

    /// Open a byte stream for an address.
    ///
    /// Supported schemes: `file`, `classpath`, `data`, and `http`/`https`
    /// with the `http` feature.
    pub fn open(&self, url: &Url) -> Result<ResourceStream> {
        match url.scheme() {
            "file" => {
                let path = url.to_file_path().map_err(|_| {
                    TemplateError::unreachable(url.as_str(), "not a local file path")
                })?;
                let data = read_disk(&path).map_err(|e| TemplateError::io(url.as_str(), e))?;
                Ok(Box::new(Cursor::new(data)))
            }
            "classpath" => self
                .resources
                .read(&embedded_path(url))
                .map(|data| Box::new(Cursor::new(data)) as ResourceStream)
                .ok_or_else(|| {
                    TemplateError::unreachable(url.as_str(), "no such embedded resource")
                }),
            "data" => {
                decode_data_url(url).map(|data| Box::new(Cursor::new(data)) as ResourceStream)
            }
            "http" | "https" => open_remote(url),
            scheme => Err(TemplateError::unreachable(
                url.as_str(),
                format!("unsupported scheme '{scheme}'"),
            )),
        }
    }
}

impl fmt::Debug for ResourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceLocator")
            .field("root", &self.root.as_str())
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Base Parsing
// =============================================================================

fn parse_root(base: &str) -> Result<Url> {
    let invalid = |reason: &str| TemplateError::InvalidBase {
        base: base.to_string(),
        reason: reason.to_string(),
    };

    if let Some(prefix) = base.strip_prefix(CLASSPATH_PREFIX) {
        let prefix = prefix.replace('\\', "/");
        let prefix = prefix.trim_matches('/');
        let root = if prefix.is_empty() {
            "classpath:/".to_string()
        } else {
            format!("classpath:/{prefix}/")
        };
        return Url::parse(&root).map_err(|e| invalid(&e.to_string()));
    }

    // Single-letter schemes are Windows drive letters, not URLs
    if let Ok(mut url) = Url::parse(base)
        && url.scheme().len() > 1
    {
        if url.cannot_be_a_base() {
            return Err(invalid("URL cannot be used as a base"));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        return Ok(url);
    }

    let path = if base.is_empty() {
        std::env::current_dir().map_err(|e| invalid(&e.to_string()))?
    } else {
        PathBuf::from(base)
    };

    Url::from_directory_path(normalize_path(&path)).map_err(|_| invalid("not an absolute path"))
}

/// Normalize a file system path to absolute form.
///
/// Tries `canonicalize()` first, falling back to joining with the current
/// directory for paths that do not exist yet.
fn normalize_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            std::env::current_dir().map_or_else(|_| path.to_path_buf(), |cwd| cwd.join(path))
        }
    })
}

// =============================================================================
// Readers
// =============================================================================

/// Path of an embedded resource, without the leading slash.
fn embedded_path(url: &Url) -> String {
    let path = url.path().trim_start_matches('/');
    percent_decode_str(path).decode_utf8_lossy().into_owned()
}

fn read_disk(path: &Path) -> std::io::Result<Vec<u8>> {
    let meta = fs::metadata(path)?;
    if meta.is_dir() {
        return Err(std::io::Error::other(format!("{} is a directory", path.display())));
    }
    fs::read(path)
}

/// Decode an RFC 2397 `data:` URL payload.
fn decode_data_url(url: &Url) -> Result<Vec<u8>> {
    let raw = url.as_str();
    let raw = raw.split_once('#').map_or(raw, |(head, _)| head);
    let raw = raw.strip_prefix("data:").unwrap_or(raw);

    let (meta, payload) = raw
        .split_once(',')
        .ok_or_else(|| TemplateError::unreachable(url.as_str(), "malformed data URL"))?;
    let bytes: Vec<u8> = percent_decode_str(payload).collect();

    if meta.ends_with(";base64") {
        base64::engine::general_purpose::STANDARD
            .decode(bytes)
            .map_err(|e| TemplateError::unreachable(url.as_str(), e.to_string()))
    } else {
        Ok(bytes)
    }
}

#[cfg(feature = "http")]
fn open_remote(url: &Url) -> Result<ResourceStream> {
    let response = reqwest::blocking::get(url.as_str())
        .and_then(|r| r.error_for_status())
        .map_err(|e| TemplateError::unreachable(url.as_str(), e.to_string()))?;
    Ok(Box::new(response))
}

#[cfg(not(feature = "http"))]
fn open_remote(url: &Url) -> Result<ResourceStream> {
    Err(TemplateError::unreachable(
        url.as_str(),
        "remote templates require the `http` feature",
    ))
}
