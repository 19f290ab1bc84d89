#![forbid(unsafe_code)]
//! hinline-core library.
//!
//! Turns a source file written against a header-only library into one
//! self-contained translation unit.
//!
//! ## Pipeline
//!
//! ```text
//! root source
//!        ↓  extract::extract()
//! Extraction (edges, system includes, header sources)
//!        ↓  graph::IncludeGraph::from_edges()
//! IncludeGraph
//!        ↓  IncludeGraph::order()
//! header order (dependencies first)
//!        ↓  assemble::Inliner::inline()
//! translation unit
//! ```
//!
//! # Conventions
//!
//! - **Errors**: Use `thiserror` enums per module, wrapped by [`error::InlineError`].
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `error!`, `debug!`, `trace!`).

pub mod assemble;
pub mod config;
pub mod error;
pub mod extract;
pub mod grammar;
pub mod graph;
pub mod path;
pub mod reader;

pub use assemble::{Inliner, MarkerStyle, Plan};
pub use config::{ExcludeFilter, InlineConfig};
pub use error::InlineError;
pub use extract::{Edge, Extraction, IncludeSet, ROOT_LABEL};
pub use graph::IncludeGraph;
pub use reader::{ContentReader, FsReader, MemoryReader};
