//! Resource path construction and base-root containment.
//!
//! The check is purely syntactic. It runs before any I/O and does not
//! resolve symlinks.

use crate::error::{Result, TemplateError};

/// Build the path of `resource` relative to the template base.
///
/// Like URI resolution, a resource starting with `/` is absolute and is
/// resolved against the base root, ignoring the namespace. Anything else is
/// prefixed with `namespace_path`.
pub fn resource_path(resource: &str, namespace_path: &str) -> Result<String> {
    let path = if resource.starts_with('/') {
        resource.to_string()
    } else {
        format!("{namespace_path}{resource}")
    };

    check_path_within_bounds(&path)?;
    Ok(path)
}

/// Fail if walking `path` would ever ascend above the base root.
///
/// Both `/` and `\` separate components. Each normal component descends one
/// level, `..` ascends one, empty and `.` components stay put.
pub fn check_path_within_bounds(path: &str) -> Result<()> {
    if path.len() < 2 {
        return Ok(());
    }

    let mut depth: usize = 0;
    for component in path.split(['/', '\\']) {
        match component {
            "" | "." => {}
            ".." => {
                depth = depth.checked_sub(1).ok_or_else(|| TemplateError::PathTraversal {
                    path: path.to_string(),
                })?;
            }
            _ => depth += 1,
        }
    }

    Ok(())
}
