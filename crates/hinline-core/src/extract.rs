//! Include extraction.
//!
//! # Overview
//!
//! Walks quoted includes depth-first starting at the root source and
//! produces:
//!
//! - the directed edge list `dependent → dependency`, in discovery order;
//! - the ordered list of system include lines seen anywhere in the tree;
//! - the content of every header that was read.
//!
//! ## Visited Guard
//!
//! A normalized path is followed at most once per run. A second include of
//! the same header (diamond) or an include of a header that is still being
//! processed (include loop) produces no edge; the header keeps the position
//! of its first discovery.
//!
//! ## Traversal
//!
//! An explicit stack of frames replaces recursion. Each frame remembers the
//! next line to scan, so a header is processed completely before the line
//! after its include directive, exactly like the recursive walk.

#![allow(clippy::module_name_repetitions)]

use std::collections::{HashMap, HashSet};
use std::io;

use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::ExcludeFilter;
use crate::grammar::{self, Line};
use crate::path;
use crate::reader::ContentReader;

/// Vertex label of the root source file.
pub const ROOT_LABEL: &str = "<root>";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ExtractError {
    /// A resolved include could not be read.
    #[error("cannot read {path} (included from {referrer})")]
    Unreadable {
        path: String,
        referrer: String,
        #[source]
        source: io::Error,
    },
}

// ---------------------------------------------------------------------------
// Edge / IncludeSet / Extraction
// ---------------------------------------------------------------------------

/// `from` directly includes `to`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Edge {
    pub from: String,
    pub to: String,
}

impl Edge {
    #[must_use]
    pub fn new(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Insertion-ordered system include lines.
///
/// Duplicates are kept on insert and removed by [`IncludeSet::unique_ordered`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncludeSet {
    includes: Vec<String>,
}

impl IncludeSet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.includes.push(line.into());
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.includes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.includes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.includes.iter().map(String::as_str)
    }

    /// Unique lines by exact text: `base` first, then this set, each in
    /// first-seen order.
    #[must_use]
    pub fn unique_ordered<S: AsRef<str>>(&self, base: &[S]) -> Vec<String> {
        let mut seen: HashSet<&str> = HashSet::new();
        base.iter()
            .map(AsRef::as_ref)
            .chain(self.iter())
            .filter(|line| seen.insert(*line))
            .map(str::to_string)
            .collect()
    }
}

/// Result of walking the include tree of one root source.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    /// Edges in discovery order.
    pub edges: Vec<Edge>,
    /// System include lines (and lifted excluded locals) in discovery order.
    pub includes: IncludeSet,
    sources: HashMap<String, String>,
}

impl Extraction {
    /// Content of a header read during extraction.
    #[must_use]
    pub fn source(&self, path: &str) -> Option<&str> {
        self.sources.get(path).map(String::as_str)
    }

    /// Number of distinct headers that were read.
    #[must_use]
    pub fn header_count(&self) -> usize {
        self.sources.len()
    }

    /// True when the root follows no local include at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Directive classification
// ---------------------------------------------------------------------------

/// What a single line asks the inliner to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Local include resolved to a normalized path that must be inlined.
    Follow(String),
    /// Include line kept verbatim and lifted to the top: every system
    /// include, and local includes matched by an exclude filter.
    Lift,
    /// Not an include.
    Text,
}

/// Classify `line` found in a file located in `current_dir`.
#[must_use]
pub fn directive(line: &str, current_dir: &str, excludes: &ExcludeFilter) -> Directive {
    match grammar::classify(line) {
        Line::Local(rel) => {
            let target = path::join(current_dir, rel);
            if excludes.is_excluded(&target) {
                Directive::Lift
            } else {
                Directive::Follow(target)
            }
        }
        Line::System(_) => Directive::Lift,
        Line::Text => Directive::Text,
    }
}

// ---------------------------------------------------------------------------
// Extraction
// ---------------------------------------------------------------------------

struct Frame {
    label: String,
    dir: String,
    lines: Vec<String>,
    next: usize,
}

impl Frame {
    fn new(label: String, dir: String, content: &str) -> Self {
        Self {
            label,
            dir,
            lines: content.lines().map(str::to_string).collect(),
            next: 0,
        }
    }
}

/// Walk every local include reachable from `root_content`.
///
/// `root_dir` is the directory quoted includes of the root are resolved
/// against (the include directory). The root itself is attributed as
/// [`ROOT_LABEL`].
///
/// # Errors
///
/// Returns [`ExtractError::Unreadable`] naming the header and the file that
/// included it when `reader` fails.
#[instrument(skip(root_content, reader, excludes))]
pub fn extract<R: ContentReader + ?Sized>(
    root_dir: &str,
    root_content: &str,
    reader: &R,
    excludes: &ExcludeFilter,
) -> Result<Extraction, ExtractError> {
    let mut out = Extraction::default();
    let mut visited: HashSet<String> = HashSet::new();
    let mut stack = vec![Frame::new(
        ROOT_LABEL.to_string(),
        root_dir.to_string(),
        root_content,
    )];

    while let Some(frame) = stack.last_mut() {
        let Some(slot) = frame.lines.get_mut(frame.next) else {
            stack.pop();
            continue;
        };
        let line = std::mem::take(slot);
        frame.next += 1;

        match directive(&line, &frame.dir, excludes) {
            Directive::Lift => out.includes.push(line),
            Directive::Text => {}
            Directive::Follow(target) => {
                if !visited.insert(target.clone()) {
                    continue;
                }
                let referrer = frame.label.clone();
                debug!(path = %target, referrer = %referrer, "reading header");

                let content = reader
                    .read(&target)
                    .map_err(|source| ExtractError::Unreadable {
                        path: target.clone(),
                        referrer: referrer.clone(),
                        source,
                    })?;

                out.edges.push(Edge::new(referrer, target.clone()));
                let next = Frame::new(target.clone(), path::dir(&target), &content);
                out.sources.insert(target, content);
                stack.push(next);
            }
        }
    }

    debug!(
        edges = out.edges.len(),
        includes = out.includes.len(),
        "extraction complete"
    );
    Ok(out)
}

/// [`extract`] without exclude filters.
///
/// # Errors
///
/// See [`extract`].
pub fn extract_links<R: ContentReader + ?Sized>(
    root_dir: &str,
    root_content: &str,
    reader: &R,
) -> Result<Extraction, ExtractError> {
    extract(root_dir, root_content, reader, &ExcludeFilter::none())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
