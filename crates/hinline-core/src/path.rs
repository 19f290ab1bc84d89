//! Lexical path normalization.
//!
//! Paths are `/`-separated strings and are never touched on disk here. Join
//! and clean follow slash-path semantics: `.` segments vanish, `..` consumes
//! the preceding segment, and a `..` with nothing to consume is kept on
//! relative paths and dropped at the root of absolute ones.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    #[error("cannot strip {requested} leading components from {path} ({available} available)")]
    TooManyComponents {
        path: String,
        requested: usize,
        available: usize,
    },
}

/// Lexically clean `path`.
///
/// An empty result becomes `"."`.
#[must_use]
pub fn clean(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                _ if rooted => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Join `base` and `rel`, then clean the result.
#[must_use]
pub fn join(base: &str, rel: &str) -> String {
    match (base.is_empty(), rel.is_empty()) {
        (true, true) => String::new(),
        (true, false) => clean(rel),
        (false, true) => clean(base),
        (false, false) => clean(&format!("{base}/{rel}")),
    }
}

/// Directory part of `path`: everything but the last segment, cleaned.
#[must_use]
pub fn dir(path: &str) -> String {
    match path.rfind('/') {
        Some(0) => "/".to_string(),
        Some(idx) => clean(&path[..idx]),
        None => ".".to_string(),
    }
}

/// Number of non-empty segments in a cleaned path. `"."` has none.
#[must_use]
pub fn component_count(path: &str) -> usize {
    let cleaned = clean(path);
    if cleaned == "." {
        return 0;
    }
    cleaned.split('/').filter(|s| !s.is_empty()).count()
}

/// True when cleaned `path` equals cleaned `base` or lies below it.
///
/// A `"."` base contains every relative path that does not climb out with
/// a leading `..`.
#[must_use]
pub fn is_within(path: &str, base: &str) -> bool {
    let path = clean(path);
    let base = clean(base);
    if base == "." {
        return !path.starts_with('/') && path != ".." && !path.starts_with("../");
    }
    if base == "/" {
        return path.starts_with('/');
    }
    path == base || path.strip_prefix(&base).is_some_and(|rest| rest.starts_with('/'))
}

/// Drop the first `n` segments of `path`.
///
/// # Errors
///
/// Returns [`PathError::TooManyComponents`] when `n` exceeds the number of
/// segments.
pub fn strip_leading_components(path: &str, n: usize) -> Result<String, PathError> {
    let cleaned = clean(path);
    let parts: Vec<&str> = cleaned.split('/').filter(|s| !s.is_empty()).collect();
    if n > parts.len() {
        return Err(PathError::TooManyComponents {
            path: path.to_string(),
            requested: n,
            available: parts.len(),
        });
    }
    Ok(parts[n..].join("/"))
}
