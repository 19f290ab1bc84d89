//! Include line grammar.
//!
//! Two patterns, matched anywhere in a line:
//!
//! - quoted local include: `#include "path"` (shortest quoted capture)
//! - angle-bracket system include: `#include <token>`
//!
//! The patterns are process-wide immutable constants.

use std::sync::LazyLock;

use regex::Regex;

static LOCAL_INCLUDE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"#include\s+"(?P<path>.*?)""#).unwrap_or_else(|e| panic!("local include pattern: {e}"))
});

static SYSTEM_INCLUDE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"#include\s+<(?P<token>.+)>").unwrap_or_else(|e| panic!("system include pattern: {e}"))
});

/// Classification of a single source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// `#include "path"`; carries the quoted path verbatim.
    Local(&'a str),
    /// `#include <token>`; carries the bracketed token.
    System(&'a str),
    /// Anything else.
    Text,
}

impl Line<'_> {
    #[must_use]
    pub const fn is_include(&self) -> bool {
        !matches!(self, Self::Text)
    }
}

/// Classify `line`.
///
/// A line matching both patterns (e.g. `#include "a.h" // <b>`) is a local
/// include: the local path is what determines traversal.
#[must_use]
pub fn classify(line: &str) -> Line<'_> {
    if let Some(path) = local_path(line) {
        return Line::Local(path);
    }
    if let Some(caps) = SYSTEM_INCLUDE.captures(line) {
        if let Some(token) = caps.name("token") {
            return Line::System(token.as_str());
        }
    }
    Line::Text
}

/// Quoted path of a local include line, if any.
#[must_use]
pub fn local_path(line: &str) -> Option<&str> {
    LOCAL_INCLUDE
        .captures(line)
        .and_then(|caps| caps.name("path"))
        .map(|m| m.as_str())
}

#[must_use]
pub fn is_local_include(line: &str) -> bool {
    LOCAL_INCLUDE.is_match(line)
}

#[must_use]
pub fn is_system_include(line: &str) -> bool {
    SYSTEM_INCLUDE.is_match(line)
}

/// True for either kind of include line.
#[must_use]
pub fn is_include(line: &str) -> bool {
    is_local_include(line) || is_system_include(line)
}
