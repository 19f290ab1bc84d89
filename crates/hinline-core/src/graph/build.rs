//! Graph construction from extracted edges.
//!
//! ## Edge Direction
//!
//! An edge `A → B` means "A includes B". Node indices are assigned in
//! first-discovery order over the edge list (`from` before `to`), and the
//! out-edges of a node keep the order their edges were inserted. Both orders
//! feed the deterministic tie-break of [`IncludeGraph::order`].

#![allow(clippy::module_name_repetitions)]

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use tracing::instrument;

use crate::extract::Edge;

// ---------------------------------------------------------------------------
// IncludeGraph
// ---------------------------------------------------------------------------

/// A directed include graph.
#[derive(Debug, Clone, Default)]
pub struct IncludeGraph {
    /// Directed graph: nodes = header paths, edges = include relationships.
    pub graph: DiGraph<String, ()>,
    /// Mapping from header path to petgraph `NodeIndex`.
    pub node_map: HashMap<String, NodeIndex>,
}

impl IncludeGraph {
    /// Build an [`IncludeGraph`] from `edges`.
    ///
    /// Every endpoint becomes a node, terminal headers included. A repeated
    /// edge is stored once.
    #[must_use]
    #[instrument(skip(edges), fields(edges = edges.len()))]
    pub fn from_edges(edges: &[Edge]) -> Self {
        let mut graph = DiGraph::<String, ()>::new();
        let mut node_map: HashMap<String, NodeIndex> = HashMap::new();

        for edge in edges {
            let from = *node_map
                .entry(edge.from.clone())
                .or_insert_with(|| graph.add_node(edge.from.clone()));
            let to = *node_map
                .entry(edge.to.clone())
                .or_insert_with(|| graph.add_node(edge.to.clone()));

            // Avoid duplicate edges (petgraph allows them by default).
            if !graph.contains_edge(from, to) {
                graph.add_edge(from, to, ());
            }
        }

        Self { graph, node_map }
    }

    /// Return the number of nodes (headers) in the graph.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Return the number of edges (include relationships) in the graph.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Look up the `NodeIndex` for a header path.
    #[must_use]
    pub fn node_index(&self, path: &str) -> Option<NodeIndex> {
        self.node_map.get(path).copied()
    }

    /// Return the header path label for a node.
    #[must_use]
    pub fn label(&self, idx: NodeIndex) -> Option<&str> {
        self.graph.node_weight(idx).map(String::as_str)
    }

    /// Number of distinct headers that include `idx`.
    #[must_use]
    pub fn indegree(&self, idx: NodeIndex) -> usize {
        self.graph.neighbors_directed(idx, Direction::Incoming).count()
    }

    /// Direct dependencies of `idx` in edge insertion order.
    ///
    /// petgraph walks a node's edge list newest first, so the edges are
    /// re-sorted by index.
    #[must_use]
    pub fn dependency_indices(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        let mut edges: Vec<_> = self.graph.edges(idx).collect();
        edges.sort_by_key(|edge| edge.id());
        edges.into_iter().map(|edge| edge.target()).collect()
    }

    /// Direct dependencies of `path` in edge insertion order.
    #[must_use]
    pub fn dependencies(&self, path: &str) -> Vec<&str> {
        self.node_index(path)
            .map(|idx| {
                self.dependency_indices(idx)
                    .into_iter()
                    .filter_map(|dep| self.label(dep))
                    .collect()
            })
            .unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
