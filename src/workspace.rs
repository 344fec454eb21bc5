//! Workspace allowlist: canonicalization and prefix-containment checks.
//!
//! Canonicalizes a candidate path, including the not-yet-existing-path case
//! by resolving the nearest existing ancestor, and checks it against an
//! ordered list of workspace roots.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PathError {
    #[error("path '{0}' escapes all allowed roots")]
    Escapes(String),

    #[error("no allowed roots configured")]
    NoRoots,

    #[error("path could not be resolved: {0}")]
    Unresolvable(String),
}

/// Canonicalize `path`, following symlinks fully. If `path` (or some
/// trailing suffix of it) does not exist yet, canonicalize the nearest
/// existing ancestor and re-append the missing suffix.
pub fn canonicalize_lenient(path: &Path) -> Result<PathBuf, PathError> {
    if let Ok(resolved) = path.canonicalize() {
        return Ok(resolved);
    }

    // Walk up until we find an ancestor that exists, then re-append the
    // components we stripped off.
    let mut missing = Vec::new();
    let mut cursor = path;
    loop {
        match cursor.parent() {
            Some(parent) => {
                missing.push(
                    cursor
                        .file_name()
                        .ok_or_else(|| PathError::Unresolvable(path.display().to_string()))?,
                );
                if let Ok(base) = parent.canonicalize() {
                    let mut resolved = base;
                    for component in missing.into_iter().rev() {
                        resolved.push(component);
                    }
                    return Ok(resolved);
                }
                cursor = parent;
            }
            None => return Err(PathError::Unresolvable(path.display().to_string())),
        }
    }
}

/// An ordered allowlist of canonical workspace roots.
#[derive(Debug, Clone)]
pub struct Allowlist {
    roots: Vec<PathBuf>,
}

impl Allowlist {
    /// Canonicalize every configured root up front; a root that does not
    /// exist on disk cannot admit any path, so it is dropped with a
    /// resolution error surfaced to the caller.
    pub fn new<I, S>(roots: I) -> Result<Self, PathError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut canonical_roots = Vec::new();
        for root in roots {
            let path = PathBuf::from(root.as_ref());
            let resolved = canonicalize_lenient(&path)?;
            canonical_roots.push(resolved);
        }
        Ok(Self { roots: canonical_roots })
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Resolve `candidate` and check it is a prefix-descendant of some
    /// configured root. Returns the canonical resolved path on success.
    pub fn check(&self, candidate: &str) -> Result<PathBuf, PathError> {
        if self.roots.is_empty() {
            return Err(PathError::NoRoots);
        }
        let resolved = canonicalize_lenient(Path::new(candidate))?;
        if self.roots.iter().any(|root| resolved.starts_with(root)) {
            Ok(resolved)
        } else {
            Err(PathError::Escapes(candidate.to_string()))
        }
    }
}
