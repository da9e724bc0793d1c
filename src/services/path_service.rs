use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use percent_encoding::percent_decode_str;

use crate::errors::ReaderError;
use crate::types::Resolution;

/// Maps request paths onto the directory tree under a root.
///
/// Resolution order is fixed: the root listing for an empty path, then an
/// existing directory, then `<path>.md`. Every accepted target is checked by
/// canonical-path containment in the canonical root, so symlinks pointing
/// out of the tree are refused even when the textual path looks harmless.
#[derive(Debug, Clone)]
pub struct PathService {
    root_dir: PathBuf,
    entry_prefix: Option<String>,
}

impl PathService {
    /// Create a new path service
    pub fn new(root_dir: PathBuf, entry_prefix: Option<String>) -> Self {
        debug!("Creating PathService with root directory: {:?}", root_dir);
        Self {
            root_dir,
            entry_prefix: entry_prefix.filter(|p| !p.is_empty()),
        }
    }

    /// Reduce a raw request target to a relative path with no leading or
    /// trailing slash. Paths containing `..` or `//` are rejected both before
    /// and after normalization.
    pub fn normalize(&self, raw: &str) -> Result<String, ReaderError> {
        let path = path_component(raw);
        let decoded = percent_decode_str(path).decode_utf8().map_err(|_| {
            warn!("Rejecting request path with invalid UTF-8: '{}'", path);
            ReaderError::TraversalRejected
        })?;
        ensure_no_traversal(&decoded)?;

        let mut normalized: &str = &decoded;
        normalized = normalized.strip_prefix('/').unwrap_or(normalized);
        normalized = normalized.strip_suffix('/').unwrap_or(normalized);

        if let Some(prefix) = self.entry_prefix.as_deref() {
            if let Some(rest) = normalized.strip_prefix(prefix) {
                if rest.is_empty() {
                    normalized = rest;
                } else if let Some(rest) = rest.strip_prefix('/') {
                    normalized = rest;
                }
            }
        }

        ensure_no_traversal(normalized)?;
        Ok(normalized.to_string())
    }

    /// Classify a raw request target
    pub fn resolve(&self, raw: &str) -> Result<Resolution, ReaderError> {
        let request_path = self.normalize(raw)?;
        let root = fs::canonicalize(&self.root_dir)?;

        if request_path.is_empty() {
            debug!("Resolved '{}' to the root listing", raw);
            return Ok(Resolution::RootListing { dir: root });
        }

        let candidate = self.root_dir.join(&request_path);
        if candidate.is_dir() {
            let dir = match fs::canonicalize(&candidate) {
                Ok(dir) => dir,
                Err(e) => {
                    warn!("Cannot canonicalize directory {:?}: {}", candidate, e);
                    return Err(ReaderError::OutsideRoot);
                }
            };
            if !dir.starts_with(&root) {
                warn!("Directory {:?} escapes root {:?}", dir, root);
                return Err(ReaderError::OutsideRoot);
            }
            debug!("Resolved '{}' to directory {:?}", request_path, dir);
            return Ok(Resolution::DirectoryListing { request_path, dir });
        }

        let markdown_path = format!("{}.md", request_path);
        match contained_file(&root, &self.root_dir.join(&markdown_path)) {
            Some(file) => {
                debug!("Resolved '{}' to document {:?}", request_path, file);
                Ok(Resolution::Document { request_path, file })
            }
            None => Err(ReaderError::FileNotFound(markdown_path)),
        }
    }
}

/// Drop query and fragment, and the scheme and authority of an absolute URL
fn path_component(raw: &str) -> &str {
    let end = raw.find(['?', '#']).unwrap_or(raw.len());
    let target = &raw[..end];
    if target.starts_with('/') {
        return target;
    }
    match target.find("://") {
        Some(idx) => {
            let rest = &target[idx + 3..];
            rest.find('/').map_or("", |slash| &rest[slash..])
        }
        None => target,
    }
}

fn ensure_no_traversal(path: &str) -> Result<(), ReaderError> {
    if path.contains("..") || path.contains("//") {
        warn!("Rejecting traversal attempt: '{}'", path);
        return Err(ReaderError::TraversalRejected);
    }
    Ok(())
}

/// Canonical form of `candidate` if it is a regular file inside `root`
fn contained_file(root: &Path, candidate: &Path) -> Option<PathBuf> {
    let canonical = match fs::canonicalize(candidate) {
        Ok(path) => path,
        Err(e) => {
            debug!("No document at {:?}: {}", candidate, e);
            return None;
        }
    };
    if !canonical.starts_with(root) {
        warn!("Document {:?} escapes root {:?}", canonical, root);
        return None;
    }
    canonical.is_file().then_some(canonical)
}
