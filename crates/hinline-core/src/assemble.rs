//! Translation unit assembly.
//!
//! # Layout
//!
//! ```text
//! <root lines before the first include line>
//! <system includes: root first, then transitive, each once>
//! <root non-include lines between the first and last include line>
//! // BEGIN <header>          ┐
//! <header minus includes>   │ one block per header,
//! // END <header>            ┘ dependencies first
//! <root lines after the last include line>
//! ```
//!
//! A root that follows no local include is returned unchanged.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::config::{ConfigError, ExcludeFilter, InlineConfig};
use crate::error::InlineError;
use crate::extract::{self, Directive, Extraction, ROOT_LABEL};
use crate::grammar;
use crate::graph::IncludeGraph;
use crate::path::{self, PathError};
use crate::reader::ContentReader;

// ---------------------------------------------------------------------------
// MarkerStyle
// ---------------------------------------------------------------------------

/// How headers are named in `// BEGIN` / `// END` markers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarkerStyle {
    /// The resolved path, include directory included.
    #[default]
    Resolved,
    /// The path below the include directory.
    Relative,
}

impl fmt::Display for MarkerStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Resolved => f.write_str("resolved"),
            Self::Relative => f.write_str("relative"),
        }
    }
}

impl FromStr for MarkerStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "resolved" => Ok(Self::Resolved),
            "relative" => Ok(Self::Relative),
            other => Err(format!("unknown marker style `{other}` (expected resolved|relative)")),
        }
    }
}

// ---------------------------------------------------------------------------
// Plan
// ---------------------------------------------------------------------------

/// Everything the renderer needs, computed before any output is produced.
#[derive(Debug, Clone)]
pub struct Plan {
    /// Headers in emission order (dependencies first).
    pub order: Vec<String>,
    /// Lifted include lines, unique, root lines first.
    pub includes: Vec<String>,
    pub extraction: Extraction,
}

/// Root source split around its include block.
struct RootLayout<'a> {
    lines: Vec<&'a str>,
    /// Index of the first and last include line, if any.
    block: Option<(usize, usize)>,
    lifted: Vec<&'a str>,
    interlude: Vec<&'a str>,
}

impl<'a> RootLayout<'a> {
    fn scan(source: &'a str, include_dir: &str, excludes: &ExcludeFilter) -> Self {
        let lines: Vec<&str> = source.split('\n').collect();
        let mut block: Option<(usize, usize)> = None;
        let mut lifted = Vec::new();
        let mut between = Vec::new();

        for (idx, line) in lines.iter().enumerate() {
            match extract::directive(line, include_dir, excludes) {
                Directive::Text => {
                    if block.is_some() {
                        between.push((idx, *line));
                    }
                }
                other => {
                    if matches!(other, Directive::Lift) {
                        lifted.push(*line);
                    }
                    block = Some(block.map_or((idx, idx), |(first, _)| (first, idx)));
                }
            }
        }

        // Text lines after the last include belong to the tail.
        let last = block.map_or(0, |(_, last)| last);
        let interlude = between
            .into_iter()
            .filter(|(idx, _)| *idx < last)
            .map(|(_, line)| line)
            .collect();

        Self {
            lines,
            block,
            lifted,
            interlude,
        }
    }

    fn head(&self) -> &[&'a str] {
        self.block.map_or(&[][..], |(first, _)| &self.lines[..first])
    }

    fn tail(&self) -> &[&'a str] {
        self.block
            .map_or(&self.lines[..], |(_, last)| &self.lines[last + 1..])
    }
}

// ---------------------------------------------------------------------------
// Inliner
// ---------------------------------------------------------------------------

/// Inlines local headers of a root source.
#[derive(Debug, Clone)]
pub struct Inliner<R> {
    include_dir: String,
    excludes: ExcludeFilter,
    markers: MarkerStyle,
    reader: R,
}

impl<R: ContentReader> Inliner<R> {
    /// Build an inliner from resolved settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidExclude`] if an exclude pattern is
    /// malformed. Nothing is read in that case.
    pub fn new(config: &InlineConfig, reader: R) -> Result<Self, ConfigError> {
        Ok(Self {
            include_dir: config.include_dir.clone(),
            excludes: config.exclude_filter()?,
            markers: config.markers,
            reader,
        })
    }

    /// Inliner with default settings rooted at `include_dir`.
    pub fn with_reader(include_dir: impl Into<String>, reader: R) -> Self {
        Self {
            include_dir: include_dir.into(),
            excludes: ExcludeFilter::none(),
            markers: MarkerStyle::default(),
            reader,
        }
    }

    /// Resolve the header order and lifted includes of `source`.
    ///
    /// # Errors
    ///
    /// Fails if a header cannot be read or the include graph is cyclic.
    #[instrument(skip(self, source), fields(include_dir = %self.include_dir))]
    pub fn plan(&self, source: &str) -> Result<Plan, InlineError> {
        let layout = RootLayout::scan(source, &self.include_dir, &self.excludes);
        self.plan_with(source, &layout)
    }

    fn plan_with(&self, source: &str, layout: &RootLayout<'_>) -> Result<Plan, InlineError> {
        let extraction = extract::extract(&self.include_dir, source, &self.reader, &self.excludes)?;
        let graph = IncludeGraph::from_edges(&extraction.edges);
        let order = graph.order(ROOT_LABEL)?;
        let includes = extraction.includes.unique_ordered(&layout.lifted);

        info!(
            headers = order.len(),
            system_includes = includes.len(),
            "resolved include graph"
        );
        Ok(Plan {
            order,
            includes,
            extraction,
        })
    }

    /// Produce the self-contained translation unit for `source`.
    ///
    /// # Errors
    ///
    /// Fails if a header cannot be read, the include graph is cyclic, or a
    /// relative marker label cannot be derived. No output is produced on
    /// failure.
    #[instrument(skip(self, source), fields(include_dir = %self.include_dir))]
    pub fn inline(&self, source: &str) -> Result<String, InlineError> {
        let layout = RootLayout::scan(source, &self.include_dir, &self.excludes);
        let plan = self.plan_with(source, &layout)?;
        if plan.extraction.is_empty() {
            return Ok(source.to_string());
        }
        self.render(&layout, &plan)
    }

    fn render(&self, layout: &RootLayout<'_>, plan: &Plan) -> Result<String, InlineError> {
        let mut out = String::with_capacity(plan.extraction.header_count() * 256);

        for line in layout.head() {
            push_line(&mut out, line);
        }
        for include in &plan.includes {
            push_line(&mut out, include);
        }
        for line in &layout.interlude {
            push_line(&mut out, line);
        }

        for header in &plan.order {
            let label = self.marker_label(header)?;
            push_line(&mut out, &format!("// BEGIN {label}"));
            let content = plan.extraction.source(header).unwrap_or_default();
            for line in content.lines().filter(|line| !grammar::is_include(line)) {
                push_line(&mut out, line);
            }
            push_line(&mut out, &format!("// END {label}"));
        }

        out.push_str(&layout.tail().join("\n"));
        Ok(out)
    }

    fn marker_label(&self, header: &str) -> Result<String, PathError> {
        if self.markers == MarkerStyle::Relative && path::is_within(header, &self.include_dir) {
            return path::strip_leading_components(header, path::component_count(&self.include_dir));
        }
        Ok(header.to_string())
    }
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
