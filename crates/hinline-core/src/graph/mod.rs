//! Include dependency graph.
//!
//! # Overview
//!
//! Vertices are normalized header paths (plus the synthetic root label).
//! An edge `A → B` means "A includes B", so B must be emitted before A.
//!
//! ## Pipeline
//!
//! ```text
//! Vec<Edge> from extract::extract()
//!        ↓  build::IncludeGraph::from_edges()
//! IncludeGraph (petgraph DiGraph, first-discovery node order)
//!        ↓  IncludeGraph::order()
//! Vec<String> (dependencies first)
//! ```
//!
//! ## Typical Usage
//!
//! ```rust
//! use hinline_core::extract::Edge;
//! use hinline_core::graph::IncludeGraph;
//!
//! let graph = IncludeGraph::from_edges(&[Edge::new("a.h", "b.h"), Edge::new("b.h", "c.h")]);
//! assert_eq!(graph.order("<root>").expect("acyclic"), vec!["c.h", "b.h", "a.h"]);
//! ```

pub mod build;
pub mod cycles;
pub mod order;

use thiserror::Error;

pub use build::IncludeGraph;
pub use cycles::find_all_cycles;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// Some headers never became ready because they sit on an include loop.
    ///
    /// `members` holds one sorted entry per strongly connected component.
    #[error("include cycle detected: {}", render_cycles(.members))]
    Cycle { members: Vec<Vec<String>> },
}

fn render_cycles(members: &[Vec<String>]) -> String {
    members
        .iter()
        .map(|cycle| cycle.join(" <-> "))
        .collect::<Vec<_>>()
        .join("; ")
}
